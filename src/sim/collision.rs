//! Narrow-phase contact tests for circles and axis-aligned boxes
//!
//! Every test answers from the point of view of a moving circle: the normal
//! points from the obstacle toward the circle center, ready for reflection.

use glam::Vec2;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing toward the circle center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a circle against another circle
pub fn circle_circle_collision(
    pos: Vec2,
    radius: f32,
    other_pos: Vec2,
    other_radius: f32,
) -> CollisionResult {
    let delta = pos - other_pos;
    let dist = delta.length();
    let reach = radius + other_radius;

    if dist >= reach {
        return CollisionResult::miss();
    }

    // Coincident centers: push straight up so the result stays deterministic
    let normal = if dist > 0.0001 { delta / dist } else { Vec2::NEG_Y };
    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Check a circle against an axis-aligned box
pub fn circle_rect_collision(
    pos: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let local = pos - rect_center;
    let closest = local.clamp(-half_extents, half_extents);
    let delta = local - closest;
    let dist_sq = delta.length_squared();

    if dist_sq >= radius * radius {
        return CollisionResult::miss();
    }

    if dist_sq > 0.000_001 {
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Center is inside the box: exit through the nearest face
    let to_face = half_extents - local.abs();
    let (normal, depth) = if to_face.x < to_face.y {
        (Vec2::new(local.x.signum(), 0.0), to_face.x)
    } else {
        (Vec2::new(0.0, local.y.signum()), to_face.y)
    };
    CollisionResult {
        hit: true,
        normal,
        penetration: depth + radius,
    }
}

/// Reflect with energy loss along the normal and friction along the surface
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, restitution: f32, friction: f32) -> Vec2 {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        // Already separating
        return velocity;
    }
    let normal_part = normal * vn;
    let tangent_part = velocity - normal_part;
    tangent_part * (1.0 - friction.clamp(0.0, 1.0)) - normal_part * restitution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_hit() {
        let result = circle_circle_collision(Vec2::new(10.0, 0.0), 8.0, Vec2::ZERO, 5.0);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 0.001);
        assert!((result.penetration - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_circle_miss() {
        let result = circle_circle_collision(Vec2::new(20.0, 0.0), 8.0, Vec2::ZERO, 5.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_rect_side_hit() {
        // Box 20 wide at origin, circle touching its top face
        let result =
            circle_rect_collision(Vec2::new(0.0, -14.0), 5.0, Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(result.hit);
        assert!((result.normal - Vec2::NEG_Y).length() < 0.001);
        assert!((result.penetration - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_rect_corner_miss() {
        // Diagonal distance to the corner is > radius
        let result =
            circle_rect_collision(Vec2::new(14.0, 14.0), 5.0, Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_center_inside_rect() {
        let result =
            circle_rect_collision(Vec2::new(8.0, 0.0), 5.0, Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 0.001);
        assert!((result.penetration - 7.0).abs() < 0.001);
    }

    #[test]
    fn test_bounce_velocity() {
        // Perfectly elastic: plain reflection
        let v = bounce_velocity(Vec2::new(100.0, 0.0), Vec2::NEG_X, 1.0, 0.0);
        assert!((v - Vec2::new(-100.0, 0.0)).length() < 0.001);

        // Falling onto a floor whose normal points up
        let v = bounce_velocity(Vec2::new(10.0, 100.0), Vec2::NEG_Y, 0.5, 0.0);
        assert!((v.y - (-50.0)).abs() < 0.001);
        assert!((v.x - 10.0).abs() < 0.001);

        // Separating contacts are left alone
        let v = bounce_velocity(Vec2::new(0.0, -30.0), Vec2::NEG_Y, 0.5, 0.0);
        assert_eq!(v, Vec2::new(0.0, -30.0));
    }
}
