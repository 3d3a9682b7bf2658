//! Plinko - a peg-field drop game simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, spawning, settle scoring, reaping)
//! - `config`: Data-driven playfield layout
//! - `hud`: Text the presentation layer shows for the score state

pub mod config;
pub mod hud;
pub mod sim;

pub use config::{ConfigError, LayoutError, PlayfieldConfig};
pub use hud::HudText;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Reference field size (portrait)
    pub const FIELD_WIDTH: f32 = 1080.0;
    pub const FIELD_HEIGHT: f32 = 1920.0;

    /// Downward gravity in pixels/s²
    pub const GRAVITY: f32 = 1000.0;

    /// Tokens fall this far past the bottom edge before they are reaped
    pub const REAP_MARGIN: f32 = 200.0;

    /// Points awarded per unit of bucket multiplier
    pub const POINTS_PER_MULTIPLIER: u64 = 10;

    /// Tokens available per round
    pub const TOKEN_BUDGET: u32 = 100;

    /// Token defaults
    pub const TOKEN_RADIUS: f32 = 22.5;
    pub const TOKEN_FRICTION: f32 = 0.005;
    pub const TOKEN_BOUNCE: f32 = 1.0;
    /// Velocity lost to drag per 60 Hz frame while falling
    pub const TOKEN_AIR_FRICTION: f32 = 0.01;
    /// Mass a token takes on when it settles so it stops reacting to contacts
    pub const SETTLED_MASS: f32 = 10_000.0;
    pub const SETTLED_AIR_FRICTION: f32 = 0.01;

    /// Peg defaults
    pub const PEG_RADIUS: f32 = 15.0;
    pub const PEG_FRICTION: f32 = 0.1;
    /// Upper bound on rows x columns
    pub const MAX_PEGS: u64 = 10_000;
}

/// Round a coordinate to the nearest multiple of `step` (0 disables snapping)
#[inline]
pub fn snap_to(value: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}
