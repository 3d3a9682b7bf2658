//! Physics engine boundary
//!
//! The simulation never owns rigid-body integration. It talks to an engine
//! through [`PhysicsWorld`], names bodies by [`BodyHandle`], and reads contact
//! starts back as a per-step queue of [`CollisionPair`]s.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::filter::{CollisionCategory, CollisionFilter};

/// Stable opaque identifier for an engine body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Collision shape, centered on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Axis-aligned box
    Rect { half_extents: Vec2 },
}

/// Parameters for an immovable body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBodyDesc {
    pub position: Vec2,
    pub shape: Shape,
    pub category: CollisionCategory,
    /// Categories this body reports contacts with
    pub mask: CollisionCategory,
    pub is_sensor: bool,
    /// Sliding friction against moving bodies
    pub friction: f32,
    /// Resting friction; engines without a separate model may ignore it
    pub static_friction: f32,
}

/// Parameters for a body moved by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicBodyDesc {
    pub position: Vec2,
    pub shape: Shape,
    pub category: CollisionCategory,
    pub mask: CollisionCategory,
    pub friction: f32,
    /// Velocity lost to drag per 60 Hz frame, 0..1
    pub air_friction: f32,
    /// Restitution, 0 = dead stop, 1 = perfectly elastic
    pub bounce: f32,
}

/// Snapshot of a body's motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub filter: CollisionFilter,
    pub is_sensor: bool,
    pub mass: f32,
    pub bounce: f32,
    pub friction: f32,
    pub air_friction: f32,
}

/// Two bodies that started touching during the last step.
///
/// Order is chosen by the engine; consumers must check both orientations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

impl CollisionPair {
    pub fn new(a: BodyHandle, b: BodyHandle) -> Self {
        Self { a, b }
    }

    /// Same pair in the opposite order
    pub fn swapped(self) -> Self {
        Self { a: self.b, b: self.a }
    }
}

/// What the simulation needs from a rigid-body engine.
///
/// Setters on an unknown handle are ignored; the engine owns body lifetime.
pub trait PhysicsWorld {
    fn create_static_body(&mut self, desc: StaticBodyDesc) -> BodyHandle;

    fn create_dynamic_body(&mut self, desc: DynamicBodyDesc) -> BodyHandle;

    fn set_position(&mut self, body: BodyHandle, position: Vec2);

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: f32);

    fn set_mass(&mut self, body: BodyHandle, mass: f32);

    fn set_bounce(&mut self, body: BodyHandle, bounce: f32);

    fn set_air_friction(&mut self, body: BodyHandle, air_friction: f32);

    fn set_sensor(&mut self, body: BodyHandle, is_sensor: bool);

    fn set_collision_mask(&mut self, body: BodyHandle, mask: CollisionCategory);

    /// Current motion of a body, `None` once it has been removed
    fn body_state(&self, body: BodyHandle) -> Option<BodyState>;

    fn remove_body(&mut self, body: BodyHandle);

    /// Advance all bodies by one fixed step
    fn step(&mut self, dt: f32);

    /// Take the contact-start pairs produced since the last drain
    fn drain_collision_starts(&mut self) -> Vec<CollisionPair>;
}
