//! Out-of-bounds cleanup
//!
//! Runs every step. Any token below the reap line is dropped from the live
//! set and its body destroyed, settled or not.

use super::physics::PhysicsWorld;
use super::state::{GameEvent, Playfield};

/// Remove tokens past `height + reap_margin`. Returns how many were reaped.
pub fn reap_out_of_bounds<W: PhysicsWorld + ?Sized>(state: &mut Playfield, world: &mut W) -> usize {
    let line = state.config.reap_line();
    if !state.tokens.iter().any(|t| t.pos.y > line) {
        return 0;
    }

    let (gone, live): (Vec<_>, Vec<_>) = std::mem::take(&mut state.tokens)
        .into_iter()
        .partition(|t| t.pos.y > line);
    state.tokens = live;

    for token in &gone {
        world.remove_body(token.body);
        if !token.settled {
            log::debug!("Token {} fell out of bounds unscored", token.id);
        }
        state.push_event(GameEvent::TokenReaped {
            token: token.id,
            settled: token.settled,
        });
    }

    gone.len()
}
