//! Fixed timestep simulation tick
//!
//! One step, in order: player drop, physics integrate, contact starts drained
//! and resolved, token motion synced back, out-of-bounds reaping.

use super::physics::PhysicsWorld;
use super::reaper::reap_out_of_bounds;
use super::resolver::resolve_collisions;
use super::spawn::SpawnError;
use super::state::{GameEvent, Playfield};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drop a token at this x on the drop line (click/tap)
    pub drop_x: Option<f32>,
}

/// Advance the playfield and its world by one fixed timestep
pub fn tick<W: PhysicsWorld + ?Sized>(
    state: &mut Playfield,
    world: &mut W,
    input: &TickInput,
    dt: f32,
) {
    if let Some(x) = input.drop_x {
        if let Err(SpawnError::BudgetExhausted) = state.drop_at(x, world).map(|_| ()) {
            log::warn!("Drop at x={} ignored: no tokens left", x);
            state.push_event(GameEvent::SpawnRejected { x });
        }
    }

    world.step(dt);

    let pairs = world.drain_collision_starts();
    if !pairs.is_empty() {
        resolve_collisions(state, world, &pairs);
    }

    sync_tokens(state, world);
    reap_out_of_bounds(state, world);

    state.time_ticks += 1;

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Copy engine motion back onto the token records
fn sync_tokens<W: PhysicsWorld + ?Sized>(state: &mut Playfield, world: &W) {
    state.tokens.retain_mut(|token| match world.body_state(token.body) {
        Some(body) => {
            token.pos = body.position;
            token.vel = body.velocity;
            true
        }
        None => {
            log::warn!("Token {} lost its body, dropping it", token.id);
            false
        }
    });
}
