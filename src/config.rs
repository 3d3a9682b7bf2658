//! Playfield configuration
//!
//! Everything the layout generators and the spawner need, as one immutable
//! structure. `Default` is the reference portrait field; a JSON file may
//! override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::filter::CollisionCategory;
use crate::snap_to;

/// A layout config that cannot produce a sane field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("field size must be positive and finite, got {width}x{height}")]
    FieldSize { width: f32, height: f32 },

    #[error("{name} must be finite and non-negative, got {value}")]
    NegativeOrNonFinite { name: &'static str, value: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("reward pool is empty")]
    EmptyRewardPool,

    #[error("reward multiplier must be positive, got {0}")]
    ZeroMultiplier(u32),

    #[error("bucket spacing {spacing} is narrower than bucket width {width}; buckets would overlap")]
    OverlappingBuckets { spacing: f32, width: f32 },

    #[error("bucket row ends at x={right_edge}, past the field width {width}")]
    BucketsOutsideField { right_edge: f32, width: f32 },

    #[error("peg grid of {rows}x{columns} exceeds {max} pegs")]
    TooManyPegs { rows: u32, columns: u32, max: u64 },

    #[error("drop strip {left}..{right} x {top}..{bottom} does not fit a {width}x{height} field")]
    DropZoneOutsideField {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        width: f32,
        height: f32,
    },

    #[error("collision category {name} must be a single non-default bit, got {bits:#06x}")]
    InvalidCategory { name: &'static str, bits: u32 },

    #[error("collision categories must be distinct")]
    SharedCategory,
}

/// Failure loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid layout: {0}")]
    Invalid(#[from] LayoutError),
}

/// Zig-zag peg grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PegGridConfig {
    /// Field-space translation applied to every peg
    pub origin: Vec2,
    pub rows: u32,
    pub columns: u32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    /// Extra x shift applied to odd rows
    pub row_offset_x: f32,
    pub radius: f32,
    /// Sliding friction against tokens
    pub friction: f32,
    pub static_friction: f32,
}

impl Default for PegGridConfig {
    fn default() -> Self {
        Self {
            origin: Vec2::new(10.0, 280.0),
            rows: 13,
            columns: 11,
            horizontal_spacing: 90.0,
            vertical_spacing: 95.0,
            offset_x: 50.0,
            offset_y: 50.0,
            row_offset_x: 50.0,
            radius: PEG_RADIUS,
            friction: PEG_FRICTION,
            static_friction: 0.0,
        }
    }
}

/// Scoring buckets along the bottom edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketLayoutConfig {
    pub count: u32,
    /// Left edge to left edge
    pub spacing: f32,
    /// Gap between the field's left edge and the first bucket
    pub left_inset: f32,
    /// Gap between the field's bottom edge and the bucket bottoms
    pub bottom_inset: f32,
    /// Sensor width and height
    pub size: Vec2,
    /// Multipliers drawn uniformly per bucket
    pub reward_pool: Vec<u32>,
    pub points_per_multiplier: u64,
}

impl Default for BucketLayoutConfig {
    fn default() -> Self {
        Self {
            count: 8,
            spacing: 120.0,
            left_inset: 80.0,
            bottom_inset: 40.0,
            size: Vec2::new(110.0, 140.0),
            reward_pool: vec![1, 2, 3, 4, 5],
            points_per_multiplier: POINTS_PER_MULTIPLIER,
        }
    }
}

/// Physical setup of a dropped token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Tokens the player may drop this round
    pub budget: u32,
    pub radius: f32,
    pub friction: f32,
    /// Drag while falling, per 60 Hz frame
    pub air_friction: f32,
    pub bounce: f32,
    pub settled_mass: f32,
    pub settled_air_friction: f32,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            budget: TOKEN_BUDGET,
            radius: TOKEN_RADIUS,
            friction: TOKEN_FRICTION,
            air_friction: TOKEN_AIR_FRICTION,
            bounce: TOKEN_BOUNCE,
            settled_mass: SETTLED_MASS,
            settled_air_friction: SETTLED_AIR_FRICTION,
        }
    }
}

/// The strip near the top of the field where the player aims drops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropZoneConfig {
    /// Top edge of the strip
    pub top: f32,
    pub height: f32,
    /// Horizontal gap kept free on each side
    pub side_margin: f32,
    /// Drop line, measured down from the strip's center
    pub drop_offset: f32,
    /// Grid the aiming indicator snaps to
    pub snap: f32,
}

impl Default for DropZoneConfig {
    fn default() -> Self {
        Self {
            top: 150.0,
            height: 100.0,
            side_margin: 25.0,
            drop_offset: 20.0,
            snap: 25.0,
        }
    }
}

/// Category bits for the three body kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionCategories {
    pub pin: CollisionCategory,
    pub token: CollisionCategory,
    pub bucket: CollisionCategory,
}

impl Default for CollisionCategories {
    fn default() -> Self {
        // Bit 0 stays with the engine default category
        Self {
            pin: CollisionCategory(1 << 1),
            token: CollisionCategory(1 << 2),
            bucket: CollisionCategory(1 << 3),
        }
    }
}

impl CollisionCategories {
    /// Mask a live token uses: other tokens, pegs, and buckets
    pub fn token_mask(&self) -> CollisionCategory {
        self.token | self.pin | self.bucket
    }
}

/// Full playfield description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
    /// Downward acceleration handed to the physics world
    pub gravity: f32,
    /// Distance below the bottom edge past which tokens are reaped
    pub reap_margin: f32,
    pub pegs: PegGridConfig,
    pub buckets: BucketLayoutConfig,
    pub token: TokenConfig,
    pub drop_zone: DropZoneConfig,
    pub categories: CollisionCategories,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            gravity: GRAVITY,
            reap_margin: REAP_MARGIN,
            pegs: PegGridConfig::default(),
            buckets: BucketLayoutConfig::default(),
            token: TokenConfig::default(),
            drop_zone: DropZoneConfig::default(),
            categories: CollisionCategories::default(),
        }
    }
}

impl PlayfieldConfig {
    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded playfield config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a JSON config; missing fields take reference values
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Y coordinate past which a token is out of bounds
    pub fn reap_line(&self) -> f32 {
        self.height + self.reap_margin
    }

    /// Y coordinate new tokens are dropped from
    pub fn drop_line(&self) -> f32 {
        let zone = &self.drop_zone;
        zone.top + zone.height / 2.0 + zone.drop_offset
    }

    /// Whether a pointer position falls inside the drop strip
    pub fn in_drop_zone(&self, point: Vec2) -> bool {
        let zone = &self.drop_zone;
        point.x >= zone.side_margin
            && point.x <= self.width - zone.side_margin
            && point.y >= zone.top
            && point.y <= zone.top + zone.height
    }

    /// Where the aiming indicator sits for a pointer at `x`
    pub fn indicator_x(&self, x: f32) -> f32 {
        snap_to(x, self.drop_zone.snap)
    }

    /// Reject layouts that cannot be built
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(LayoutError::FieldSize {
                width: self.width,
                height: self.height,
            });
        }

        let pegs = &self.pegs;
        let buckets = &self.buckets;
        let token = &self.token;
        let zone = &self.drop_zone;

        for (name, value) in [
            ("gravity", self.gravity),
            ("reap_margin", self.reap_margin),
            ("pegs.origin.x", pegs.origin.x),
            ("pegs.origin.y", pegs.origin.y),
            ("pegs.horizontal_spacing", pegs.horizontal_spacing),
            ("pegs.vertical_spacing", pegs.vertical_spacing),
            ("pegs.offset_x", pegs.offset_x),
            ("pegs.offset_y", pegs.offset_y),
            ("pegs.row_offset_x", pegs.row_offset_x),
            ("pegs.friction", pegs.friction),
            ("pegs.static_friction", pegs.static_friction),
            ("buckets.spacing", buckets.spacing),
            ("buckets.left_inset", buckets.left_inset),
            ("buckets.bottom_inset", buckets.bottom_inset),
            ("token.friction", token.friction),
            ("token.air_friction", token.air_friction),
            ("token.bounce", token.bounce),
            ("token.settled_air_friction", token.settled_air_friction),
            ("drop_zone.top", zone.top),
            ("drop_zone.height", zone.height),
            ("drop_zone.side_margin", zone.side_margin),
            ("drop_zone.snap", zone.snap),
        ] {
            non_negative(name, value)?;
        }

        for (name, value) in [
            ("pegs.radius", pegs.radius),
            ("buckets.size.x", buckets.size.x),
            ("buckets.size.y", buckets.size.y),
            ("token.radius", token.radius),
            ("token.settled_mass", token.settled_mass),
        ] {
            positive(name, value)?;
        }

        if !zone.drop_offset.is_finite() {
            return Err(LayoutError::NegativeOrNonFinite {
                name: "drop_zone.drop_offset",
                value: zone.drop_offset,
            });
        }

        if u64::from(pegs.rows) * u64::from(pegs.columns) > MAX_PEGS {
            return Err(LayoutError::TooManyPegs {
                rows: pegs.rows,
                columns: pegs.columns,
                max: MAX_PEGS,
            });
        }

        let (left, right) = (zone.side_margin, self.width - zone.side_margin);
        let (top, bottom) = (zone.top, zone.top + zone.height);
        if left > right || bottom > self.height {
            return Err(LayoutError::DropZoneOutsideField {
                left,
                right,
                top,
                bottom,
                width: self.width,
                height: self.height,
            });
        }

        if buckets.reward_pool.is_empty() {
            return Err(LayoutError::EmptyRewardPool);
        }
        if let Some(&zero) = buckets.reward_pool.iter().find(|&&m| m == 0) {
            return Err(LayoutError::ZeroMultiplier(zero));
        }

        if buckets.count > 1 && buckets.spacing < buckets.size.x {
            return Err(LayoutError::OverlappingBuckets {
                spacing: buckets.spacing,
                width: buckets.size.x,
            });
        }
        if buckets.count > 0 {
            let right_edge = buckets.left_inset
                + (buckets.count - 1) as f32 * buckets.spacing
                + buckets.size.x;
            if right_edge > self.width {
                return Err(LayoutError::BucketsOutsideField {
                    right_edge,
                    width: self.width,
                });
            }
        }

        let cats = &self.categories;
        for (name, cat) in [("pin", cats.pin), ("token", cats.token), ("bucket", cats.bucket)] {
            if !cat.is_single() || cat == CollisionCategory::DEFAULT {
                return Err(LayoutError::InvalidCategory { name, bits: cat.0 });
            }
        }
        if cats.pin == cats.token || cats.pin == cats.bucket || cats.token == cats.bucket {
            return Err(LayoutError::SharedCategory);
        }

        Ok(())
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::NegativeOrNonFinite { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::NonPositive { name, value })
    }
}
