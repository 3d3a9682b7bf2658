//! Reference rigid-body world
//!
//! A small deterministic engine behind [`PhysicsWorld`]: gravity, air
//! friction, circle and box shapes, sensors, category filtering, and
//! contact-start reporting. Bodies are stored in handle order and every pass
//! walks them in that order, so identical inputs give identical runs.

use std::collections::BTreeSet;

use glam::Vec2;

use super::collision::{
    CollisionResult, bounce_velocity, circle_circle_collision, circle_rect_collision,
};
use super::filter::{CollisionCategory, CollisionFilter};
use super::physics::{
    BodyHandle, BodyState, CollisionPair, DynamicBodyDesc, PhysicsWorld, Shape, StaticBodyDesc,
};

/// Mass per unit area for dynamic bodies
const DENSITY: f32 = 0.001;

/// Air friction is tuned per 60 Hz frame
const AIR_FRICTION_RATE: f32 = 60.0;

#[derive(Debug, Clone)]
struct Body {
    handle: BodyHandle,
    position: Vec2,
    velocity: Vec2,
    angular_velocity: f32,
    shape: Shape,
    filter: CollisionFilter,
    is_static: bool,
    is_sensor: bool,
    mass: f32,
    bounce: f32,
    friction: f32,
    air_friction: f32,
}

impl Body {
    fn inverse_mass(&self) -> f32 {
        if self.is_static || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    fn state(&self) -> BodyState {
        BodyState {
            position: self.position,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
            filter: self.filter,
            is_sensor: self.is_sensor,
            mass: self.mass,
            bounce: self.bounce,
            friction: self.friction,
            air_friction: self.air_friction,
        }
    }
}

/// Contact between `a` and `b`, normal pointing from `b` toward `a`
fn contact(a: &Body, b: &Body) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle_collision(a.position, ra, b.position, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect_collision(a.position, radius, b.position, half_extents)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            let mut result = circle_rect_collision(b.position, radius, a.position, half_extents);
            result.normal = -result.normal;
            result
        }
        // Boxes are only ever static here
        (Shape::Rect { .. }, Shape::Rect { .. }) => CollisionResult::miss(),
    }
}

/// Deterministic reference physics world
#[derive(Debug, Clone)]
pub struct SimWorld {
    gravity: Vec2,
    /// Sorted by handle
    bodies: Vec<Body>,
    /// Pairs (lower handle first) touching at the end of the last step
    contacts: BTreeSet<(BodyHandle, BodyHandle)>,
    pending: Vec<CollisionPair>,
    next_handle: u32,
}

impl SimWorld {
    /// World with downward (+y) gravity in pixels/s²
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity: Vec2::new(0.0, gravity),
            bodies: Vec::new(),
            contacts: BTreeSet::new(),
            pending: Vec::new(),
            next_handle: 1,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Queue a contact start as if the engine had reported it.
    ///
    /// Engines may repeat contact events for bodies that stay in touch; this
    /// lets drivers and tests reproduce that.
    pub fn inject_collision_start(&mut self, pair: CollisionPair) {
        self.pending.push(pair);
    }

    fn alloc_handle(&mut self) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.bodies.binary_search_by_key(&handle, |b| b.handle).ok()
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let idx = self.index_of(handle)?;
        self.bodies.get_mut(idx)
    }

    fn integrate(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            body.velocity += gravity * dt;
            if body.air_friction > 0.0 {
                body.velocity *= (1.0 - body.air_friction).max(0.0).powf(dt * AIR_FRICTION_RATE);
            }
            body.position += body.velocity * dt;
        }
    }

    /// Push two overlapping solid bodies apart and exchange momentum
    fn respond(&mut self, i: usize, j: usize, result: &CollisionResult) {
        let (ia, ib) = (self.bodies[i].inverse_mass(), self.bodies[j].inverse_mass());
        let total = ia + ib;
        if total <= 0.0 {
            return;
        }

        let normal = result.normal;
        let correction = normal * result.penetration;
        self.bodies[i].position += correction * (ia / total);
        self.bodies[j].position -= correction * (ib / total);

        let restitution = self.bodies[i].bounce.max(self.bodies[j].bounce);
        let friction = self.bodies[i].friction.min(self.bodies[j].friction).clamp(0.0, 1.0);

        // Against an immovable body only the moving side changes
        if ib == 0.0 {
            let body = &mut self.bodies[i];
            body.velocity = bounce_velocity(body.velocity, normal, restitution, friction);
            return;
        }
        if ia == 0.0 {
            let body = &mut self.bodies[j];
            body.velocity = bounce_velocity(body.velocity, -normal, restitution, friction);
            return;
        }

        let relative = self.bodies[i].velocity - self.bodies[j].velocity;
        let vn = relative.dot(normal);
        if vn >= 0.0 {
            return;
        }

        let impulse = -(1.0 + restitution) * vn / total;
        let tangent = relative - normal * vn;

        self.bodies[i].velocity += normal * impulse * ia - tangent * friction * (ia / total);
        self.bodies[j].velocity -= normal * impulse * ib - tangent * friction * (ib / total);
    }

    fn detect(&mut self) {
        let mut touching = BTreeSet::new();

        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                if a.is_static && b.is_static {
                    continue;
                }
                if !a.filter.can_collide(&b.filter) {
                    continue;
                }

                let result = contact(a, b);
                if !result.hit {
                    continue;
                }

                let key = (a.handle, b.handle);
                let solid = !a.is_sensor && !b.is_sensor;
                if !self.contacts.contains(&key) {
                    self.pending.push(CollisionPair::new(key.0, key.1));
                }
                touching.insert(key);

                if solid {
                    self.respond(i, j, &result);
                }
            }
        }

        self.contacts = touching;
    }
}

impl PhysicsWorld for SimWorld {
    fn create_static_body(&mut self, desc: StaticBodyDesc) -> BodyHandle {
        let handle = self.alloc_handle();
        self.bodies.push(Body {
            handle,
            position: desc.position,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            shape: desc.shape,
            filter: CollisionFilter::new(desc.category, desc.mask),
            is_static: true,
            is_sensor: desc.is_sensor,
            mass: f32::INFINITY,
            bounce: 0.0,
            friction: desc.friction,
            air_friction: 0.0,
        });
        handle
    }

    fn create_dynamic_body(&mut self, desc: DynamicBodyDesc) -> BodyHandle {
        let handle = self.alloc_handle();
        let area = match desc.shape {
            Shape::Circle { radius } => std::f32::consts::PI * radius * radius,
            Shape::Rect { half_extents } => 4.0 * half_extents.x * half_extents.y,
        };
        self.bodies.push(Body {
            handle,
            position: desc.position,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            shape: desc.shape,
            filter: CollisionFilter::new(desc.category, desc.mask),
            is_static: false,
            is_sensor: false,
            mass: (area * DENSITY).max(f32::EPSILON),
            bounce: desc.bounce,
            friction: desc.friction,
            air_friction: desc.air_friction,
        });
        handle
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.body_mut(body) {
            b.position = position;
        }
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.body_mut(body) {
            b.velocity = velocity;
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, angular_velocity: f32) {
        if let Some(b) = self.body_mut(body) {
            b.angular_velocity = angular_velocity;
        }
    }

    fn set_mass(&mut self, body: BodyHandle, mass: f32) {
        if let Some(b) = self.body_mut(body) {
            b.mass = mass;
        }
    }

    fn set_bounce(&mut self, body: BodyHandle, bounce: f32) {
        if let Some(b) = self.body_mut(body) {
            b.bounce = bounce;
        }
    }

    fn set_air_friction(&mut self, body: BodyHandle, air_friction: f32) {
        if let Some(b) = self.body_mut(body) {
            b.air_friction = air_friction;
        }
    }

    fn set_sensor(&mut self, body: BodyHandle, is_sensor: bool) {
        if let Some(b) = self.body_mut(body) {
            b.is_sensor = is_sensor;
        }
    }

    fn set_collision_mask(&mut self, body: BodyHandle, mask: CollisionCategory) {
        if let Some(b) = self.body_mut(body) {
            b.filter.mask = mask;
        }
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        self.index_of(body).map(|idx| self.bodies[idx].state())
    }

    fn remove_body(&mut self, body: BodyHandle) {
        if let Some(idx) = self.index_of(body) {
            self.bodies.remove(idx);
            self.contacts.retain(|&(a, b)| a != body && b != body);
            self.pending.retain(|p| p.a != body && p.b != body);
        }
    }

    fn step(&mut self, dt: f32) {
        self.integrate(dt);
        self.detect();
    }

    fn drain_collision_starts(&mut self) -> Vec<CollisionPair> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    const PIN: CollisionCategory = CollisionCategory(1 << 1);
    const TOKEN: CollisionCategory = CollisionCategory(1 << 2);
    const BUCKET: CollisionCategory = CollisionCategory(1 << 3);

    fn drop_ball(world: &mut SimWorld, position: Vec2) -> BodyHandle {
        world.create_dynamic_body(DynamicBodyDesc {
            position,
            shape: Shape::Circle { radius: 10.0 },
            category: TOKEN,
            mask: TOKEN | PIN | BUCKET,
            friction: 0.0,
            air_friction: 0.0,
            bounce: 1.0,
        })
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut world = SimWorld::new(1000.0);
        let ball = drop_ball(&mut world, Vec2::ZERO);
        for _ in 0..10 {
            world.step(SIM_DT);
        }
        let state = world.body_state(ball).unwrap();
        assert!(state.position.y > 0.0);
        assert!(state.velocity.y > 0.0);
        assert_eq!(state.position.x, 0.0);
    }

    #[test]
    fn test_air_friction_caps_fall_speed() {
        let fall = |air_friction| {
            let mut world = SimWorld::new(1000.0);
            let ball = world.create_dynamic_body(DynamicBodyDesc {
                position: Vec2::ZERO,
                shape: Shape::Circle { radius: 10.0 },
                category: TOKEN,
                mask: PIN,
                friction: 0.0,
                air_friction,
                bounce: 1.0,
            });
            for _ in 0..1200 {
                world.step(SIM_DT);
            }
            world.body_state(ball).unwrap().velocity.y
        };

        // Drag of 0.01 per frame settles near 1000 * (1/60) / 0.01 px/s
        let dragged = fall(0.01);
        assert!(dragged < 1800.0, "terminal speed {}", dragged);
        assert!(fall(0.0) > 9000.0);
    }

    #[test]
    fn test_ball_bounces_off_peg() {
        let mut world = SimWorld::new(1000.0);
        world.create_static_body(StaticBodyDesc {
            position: Vec2::new(0.0, 100.0),
            shape: Shape::Circle { radius: 15.0 },
            category: PIN,
            mask: TOKEN,
            is_sensor: false,
            friction: 0.0,
            static_friction: 0.0,
        });
        let ball = drop_ball(&mut world, Vec2::new(0.0, 0.0));

        let mut bounced = false;
        for _ in 0..120 {
            world.step(SIM_DT);
            if world.body_state(ball).unwrap().velocity.y < 0.0 {
                bounced = true;
                break;
            }
        }
        assert!(bounced);
        assert_eq!(world.drain_collision_starts().len(), 1);
    }

    #[test]
    fn test_sensor_reports_once_without_response() {
        let mut world = SimWorld::new(0.0);
        let bucket = world.create_static_body(StaticBodyDesc {
            position: Vec2::ZERO,
            shape: Shape::Rect {
                half_extents: Vec2::new(50.0, 50.0),
            },
            category: BUCKET,
            mask: TOKEN,
            is_sensor: true,
            friction: 0.0,
            static_friction: 0.0,
        });
        let ball = drop_ball(&mut world, Vec2::new(0.0, -70.0));
        world.set_velocity(ball, Vec2::new(0.0, 600.0));

        let mut starts = Vec::new();
        for _ in 0..20 {
            world.step(SIM_DT);
            starts.extend(world.drain_collision_starts());
        }

        assert_eq!(starts, vec![CollisionPair::new(bucket, ball)]);
        // Passed straight through the sensor
        assert_eq!(world.body_state(ball).unwrap().velocity, Vec2::new(0.0, 600.0));
    }

    #[test]
    fn test_cleared_mask_stops_events() {
        let mut world = SimWorld::new(0.0);
        world.create_static_body(StaticBodyDesc {
            position: Vec2::ZERO,
            shape: Shape::Circle { radius: 15.0 },
            category: PIN,
            mask: TOKEN,
            is_sensor: false,
            friction: 0.0,
            static_friction: 0.0,
        });
        let ball = drop_ball(&mut world, Vec2::new(0.0, 5.0));
        world.set_collision_mask(ball, CollisionCategory::NONE);
        world.step(SIM_DT);
        assert!(world.drain_collision_starts().is_empty());
    }

    #[test]
    fn test_remove_body() {
        let mut world = SimWorld::new(1000.0);
        let a = drop_ball(&mut world, Vec2::ZERO);
        let b = drop_ball(&mut world, Vec2::new(100.0, 0.0));
        world.remove_body(a);
        assert!(world.body_state(a).is_none());
        assert!(world.body_state(b).is_some());
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_world_determinism() {
        let run = || {
            let mut world = SimWorld::new(1000.0);
            for x in [0.0, 30.0, 60.0] {
                world.create_static_body(StaticBodyDesc {
                    position: Vec2::new(x, 200.0),
                    shape: Shape::Circle { radius: 15.0 },
                    category: PIN,
                    mask: TOKEN,
                    is_sensor: false,
                    friction: 0.0,
                    static_friction: 0.0,
                });
            }
            let ball = drop_ball(&mut world, Vec2::new(20.0, 0.0));
            for _ in 0..240 {
                world.step(SIM_DT);
            }
            world.body_state(ball).unwrap().position
        };
        assert_eq!(run(), run());
    }
}
