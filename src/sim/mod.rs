//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod filter;
pub mod layout;
pub mod physics;
pub mod reaper;
pub mod resolver;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{CollisionResult, circle_circle_collision, circle_rect_collision};
pub use filter::{CollisionCategory, CollisionFilter};
pub use layout::{bucket_slots, draw_multipliers, generate_buckets, generate_pegs, peg_positions};
pub use physics::{
    BodyHandle, BodyState, CollisionPair, DynamicBodyDesc, PhysicsWorld, Shape, StaticBodyDesc,
};
pub use reaper::reap_out_of_bounds;
pub use resolver::{resolve_collisions, settle};
pub use spawn::SpawnError;
pub use state::{
    Bucket, BucketVariant, GameEvent, Peg, Playfield, RngState, ScoreState, Token,
};
pub use tick::{TickInput, tick};
pub use world::SimWorld;
