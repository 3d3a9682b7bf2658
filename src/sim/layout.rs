//! Field construction: the peg grid and the bucket row
//!
//! Peg positions are a pure function of the grid config. Bucket positions are
//! too; only the reward multipliers come from the injected random source.

use glam::Vec2;
use rand::Rng;

use super::physics::{PhysicsWorld, Shape, StaticBodyDesc};
use super::state::{Bucket, BucketVariant, Peg, Playfield};
use crate::config::{BucketLayoutConfig, PegGridConfig, PlayfieldConfig};

/// Peg centers, row by row, left to right.
///
/// Odd rows shift right by `row_offset_x` to form the zig-zag.
pub fn peg_positions(grid: &PegGridConfig) -> Vec<Vec2> {
    (0..grid.rows)
        .flat_map(|row| {
            let shift = if row % 2 == 1 { grid.row_offset_x } else { 0.0 };
            let y = grid.offset_y + row as f32 * grid.vertical_spacing;
            (0..grid.columns).map(move |col| {
                let x = grid.offset_x + col as f32 * grid.horizontal_spacing + shift;
                grid.origin + Vec2::new(x, y)
            })
        })
        .collect()
}

/// Bucket centers and variants, left to right along the bottom edge
pub fn bucket_slots(config: &PlayfieldConfig) -> Vec<(Vec2, BucketVariant)> {
    let buckets: &BucketLayoutConfig = &config.buckets;
    let center_y = config.height - buckets.bottom_inset - buckets.size.y / 2.0;
    (0..buckets.count)
        .map(|i| {
            let left = buckets.left_inset + i as f32 * buckets.spacing;
            (
                Vec2::new(left + buckets.size.x / 2.0, center_y),
                BucketVariant::for_index(i),
            )
        })
        .collect()
}

/// Draw `count` multipliers, each uniformly and independently from `pool`
pub fn draw_multipliers<R: Rng + ?Sized>(pool: &[u32], count: u32, rng: &mut R) -> Vec<u32> {
    if pool.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| pool[rng.random_range(0..pool.len())])
        .collect()
}

/// Register the peg grid as static bodies
pub fn generate_pegs<W: PhysicsWorld + ?Sized>(state: &mut Playfield, world: &mut W) {
    let positions = peg_positions(&state.config.pegs);
    let radius = state.config.pegs.radius;
    let friction = state.config.pegs.friction;
    let static_friction = state.config.pegs.static_friction;
    let cats = state.config.categories;

    for pos in positions {
        let body = world.create_static_body(StaticBodyDesc {
            position: pos,
            shape: Shape::Circle { radius },
            category: cats.pin,
            // Pegs only ever touch tokens
            mask: cats.token,
            is_sensor: false,
            friction,
            static_friction,
        });
        let id = state.next_entity_id();
        state.pegs.push(Peg {
            id,
            body,
            pos,
            radius,
        });
    }
}

/// Register the bucket row as static sensors with random multipliers
pub fn generate_buckets<W: PhysicsWorld + ?Sized, R: Rng + ?Sized>(
    state: &mut Playfield,
    rng: &mut R,
    world: &mut W,
) {
    let slots = bucket_slots(&state.config);
    let multipliers = draw_multipliers(
        &state.config.buckets.reward_pool,
        state.config.buckets.count,
        rng,
    );
    let size = state.config.buckets.size;
    let cats = state.config.categories;

    for ((pos, variant), multiplier) in slots.into_iter().zip(multipliers) {
        let body = world.create_static_body(StaticBodyDesc {
            position: pos,
            shape: Shape::Rect {
                half_extents: size / 2.0,
            },
            category: cats.bucket,
            mask: cats.token,
            is_sensor: true,
            friction: 0.0,
            static_friction: 0.0,
        });
        let id = state.next_entity_id();
        state.buckets.push(Bucket {
            id,
            body,
            pos,
            size,
            multiplier,
            variant,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::physics::PhysicsWorld;
    use crate::sim::world::SimWorld;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn small_grid() -> PegGridConfig {
        PegGridConfig {
            origin: Vec2::ZERO,
            rows: 2,
            columns: 2,
            horizontal_spacing: 90.0,
            vertical_spacing: 95.0,
            offset_x: 50.0,
            offset_y: 50.0,
            row_offset_x: 50.0,
            ..PegGridConfig::default()
        }
    }

    #[test]
    fn test_zigzag_positions() {
        let positions = peg_positions(&small_grid());
        assert_eq!(
            positions,
            vec![
                Vec2::new(50.0, 50.0),
                Vec2::new(140.0, 50.0),
                Vec2::new(100.0, 145.0),
                Vec2::new(190.0, 145.0),
            ]
        );
    }

    #[test]
    fn test_origin_translates_grid() {
        let mut grid = small_grid();
        grid.origin = Vec2::new(10.0, 280.0);
        let positions = peg_positions(&grid);
        assert_eq!(positions[0], Vec2::new(60.0, 330.0));
        assert_eq!(positions[3], Vec2::new(200.0, 425.0));
    }

    #[test]
    fn test_empty_grid() {
        let mut grid = small_grid();
        grid.rows = 0;
        assert!(peg_positions(&grid).is_empty());
    }

    #[test]
    fn test_bucket_slots_left_to_right() {
        let config = PlayfieldConfig::default();
        let slots = bucket_slots(&config);
        assert_eq!(slots.len(), 8);

        let bottom = config.height - config.buckets.bottom_inset;
        for (i, (pos, variant)) in slots.iter().enumerate() {
            assert_eq!(*variant, BucketVariant::for_index(i as u32));
            assert_eq!(pos.y + config.buckets.size.y / 2.0, bottom);
            if i > 0 {
                assert_eq!(pos.x - slots[i - 1].0.x, config.buckets.spacing);
            }
        }
        assert_eq!(slots[0].0.x, 80.0 + 55.0);
    }

    #[test]
    fn test_multipliers_come_from_pool() {
        let mut rng = Pcg32::seed_from_u64(42);
        let pool = [1, 2, 3, 4, 5];
        let drawn = draw_multipliers(&pool, 500, &mut rng);
        assert_eq!(drawn.len(), 500);
        assert!(drawn.iter().all(|m| pool.contains(m)));
        // Every value shows up over enough draws
        for m in pool {
            assert!(drawn.contains(&m));
        }
    }

    #[test]
    fn test_multipliers_reproducible() {
        let pool = [1, 2, 3, 4, 5];
        let a = draw_multipliers(&pool, 8, &mut Pcg32::seed_from_u64(9));
        let b = draw_multipliers(&pool, 8, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_bodies_are_filtered() {
        let config = PlayfieldConfig::default();
        let cats = config.categories;
        let mut world = SimWorld::new(config.gravity);
        let field = Playfield::new(config, 3, &mut world).unwrap();

        let peg = world.body_state(field.pegs[0].body).unwrap();
        assert_eq!(peg.filter.category, cats.pin);
        assert_eq!(peg.filter.mask, cats.token);
        assert!(!peg.is_sensor);
        assert_eq!(peg.friction, field.config.pegs.friction);

        let bucket = world.body_state(field.buckets[0].body).unwrap();
        assert_eq!(bucket.filter.category, cats.bucket);
        assert!(bucket.is_sensor);
    }

    #[test]
    fn test_same_seed_same_field() {
        let build = |seed| {
            let config = PlayfieldConfig::default();
            let mut world = SimWorld::new(config.gravity);
            Playfield::new(config, seed, &mut world).unwrap()
        };
        let a = build(11);
        let b = build(11);
        assert_eq!(a.pegs, b.pegs);
        assert_eq!(a.buckets, b.buckets);
    }
}
