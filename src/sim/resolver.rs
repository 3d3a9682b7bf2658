//! Token-vs-bucket settle resolution
//!
//! The first contact between an unsettled token and a bucket freezes the
//! token, turns it into a contact-free sensor, and awards the bucket's points.
//! Engines may report the same contact again on later steps; the token's own
//! `settled` flag is what keeps it from scoring twice.

use glam::Vec2;

use super::filter::CollisionCategory;
use super::physics::{BodyHandle, CollisionPair, PhysicsWorld};
use super::state::{GameEvent, Playfield};

/// Which side of a pair is the bucket and which the token
fn classify(state: &Playfield, pair: CollisionPair) -> Option<(u32, BodyHandle)> {
    for CollisionPair { a, b } in [pair, pair.swapped()] {
        if let Some(bucket) = state.bucket_by_body(a) {
            if state.token_by_body(b).is_some() {
                return Some((bucket.id, b));
            }
        }
    }
    None
}

/// Settle one token in one bucket. Returns the points awarded, or `None` if
/// the token had already settled.
pub fn settle<W: PhysicsWorld + ?Sized>(
    state: &mut Playfield,
    world: &mut W,
    bucket_id: u32,
    token_body: BodyHandle,
) -> Option<u64> {
    let per = state.config.buckets.points_per_multiplier;
    let points = state
        .buckets
        .iter()
        .find(|b| b.id == bucket_id)?
        .points(per);
    let token_cfg = state.config.token.clone();

    let token = state.token_by_body_mut(token_body)?;
    if token.settled {
        return None;
    }
    token.settled = true;
    token.bucket = Some(bucket_id);
    token.vel = Vec2::ZERO;
    let token_id = token.id;

    world.set_angular_velocity(token_body, 0.0);
    world.set_velocity(token_body, Vec2::ZERO);
    world.set_bounce(token_body, 0.0);
    world.set_mass(token_body, token_cfg.settled_mass);
    world.set_air_friction(token_body, token_cfg.settled_air_friction);
    world.set_sensor(token_body, true);
    world.set_collision_mask(token_body, CollisionCategory::NONE);

    state.score.score = state.score.score.saturating_add(points);
    log::debug!(
        "Token {} settled in bucket {} for {} points (score {})",
        token_id,
        bucket_id,
        points,
        state.score.score
    );
    state.push_event(GameEvent::TokenSettled {
        token: token_id,
        bucket: bucket_id,
        points,
    });
    state.notify_score_changed();

    Some(points)
}

/// Process one step's contact starts in delivery order.
///
/// Pairs that are not bucket-and-token are skipped. Returns the number of
/// tokens settled.
pub fn resolve_collisions<W: PhysicsWorld + ?Sized>(
    state: &mut Playfield,
    world: &mut W,
    pairs: &[CollisionPair],
) -> usize {
    let mut settled = 0;
    for &pair in pairs {
        let Some((bucket_id, token_body)) = classify(state, pair) else {
            continue;
        };
        match settle(state, world, bucket_id, token_body) {
            Some(_) => settled += 1,
            None => log::trace!("Duplicate bucket contact for body {:?} ignored", token_body),
        }
    }
    settled
}
