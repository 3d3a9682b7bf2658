//! Playfield state and core simulation types
//!
//! Plain records for pegs, buckets and tokens. Each one points at its engine
//! body through a [`BodyHandle`]; rendering handles live elsewhere and are
//! keyed by the same entity ids.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{generate_buckets, generate_pegs};
use super::physics::{BodyHandle, PhysicsWorld};
use crate::config::{LayoutError, PlayfieldConfig};

/// A static obstacle in the zig-zag grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub id: u32,
    pub body: BodyHandle,
    pub pos: Vec2,
    pub radius: f32,
}

/// Alternating bucket artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketVariant {
    Primary,
    Alternate,
}

impl BucketVariant {
    /// Variant for the bucket at `index` (even = primary)
    pub fn for_index(index: u32) -> Self {
        if index % 2 == 0 {
            BucketVariant::Primary
        } else {
            BucketVariant::Alternate
        }
    }
}

/// A scoring sensor along the bottom edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: u32,
    pub body: BodyHandle,
    /// Center of the sensor
    pub pos: Vec2,
    pub size: Vec2,
    pub multiplier: u32,
    pub variant: BucketVariant,
}

impl Bucket {
    /// Prize text shown under the bucket
    pub fn label(&self) -> String {
        format!("x{}", self.multiplier)
    }

    /// Points a token earns by settling here
    pub fn points(&self, points_per_multiplier: u64) -> u64 {
        u64::from(self.multiplier).saturating_mul(points_per_multiplier)
    }
}

/// A dropped coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: u32,
    pub body: BodyHandle,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Set once, when the token first enters a bucket
    pub settled: bool,
    /// Bucket that scored this token
    pub bucket: Option<u32>,
}

/// Score and remaining budget, observed by the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u64,
    pub tokens_remaining: u32,
}

/// Something presentation may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    TokenSpawned { token: u32, pos: Vec2 },
    /// Drop requested with no tokens left
    SpawnRejected { x: f32 },
    TokenSettled { token: u32, bucket: u32, points: u64 },
    TokenReaped { token: u32, settled: bool },
    ScoreChanged { score: u64, tokens_remaining: u32 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// One round on one field
#[derive(Debug, Clone)]
pub struct Playfield {
    pub config: PlayfieldConfig,
    /// Seed the bucket rewards were drawn from, when built via [`Playfield::new`]
    pub rng_state: Option<RngState>,
    pub score: ScoreState,
    /// Sorted by id
    pub pegs: Vec<Peg>,
    /// Sorted by id, left to right
    pub buckets: Vec<Bucket>,
    /// Live tokens, sorted by id
    pub tokens: Vec<Token>,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Playfield {
    /// Build a field with rewards drawn from a seeded generator
    pub fn new<W: PhysicsWorld + ?Sized>(
        config: PlayfieldConfig,
        seed: u64,
        world: &mut W,
    ) -> Result<Self, LayoutError> {
        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();
        let mut field = Self::with_rng(config, &mut rng, world)?;
        field.rng_state = Some(rng_state);
        Ok(field)
    }

    /// Build a field drawing rewards from the given source
    pub fn with_rng<W: PhysicsWorld + ?Sized, R: Rng + ?Sized>(
        config: PlayfieldConfig,
        rng: &mut R,
        world: &mut W,
    ) -> Result<Self, LayoutError> {
        config.validate()?;

        let mut field = Self {
            score: ScoreState {
                score: 0,
                tokens_remaining: config.token.budget,
            },
            config,
            rng_state: None,
            pegs: Vec::new(),
            buckets: Vec::new(),
            tokens: Vec::new(),
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };

        generate_pegs(&mut field, world);
        generate_buckets(&mut field, rng, world);

        log::info!(
            "Playfield {}x{} built: {} pegs, {} buckets {:?}, {} tokens",
            field.config.width,
            field.config.height,
            field.pegs.len(),
            field.buckets.len(),
            field.buckets.iter().map(|b| b.multiplier).collect::<Vec<_>>(),
            field.score.tokens_remaining,
        );

        Ok(field)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn bucket_by_body(&self, body: BodyHandle) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.body == body)
    }

    pub fn token_by_body(&self, body: BodyHandle) -> Option<&Token> {
        self.tokens.iter().find(|t| t.body == body)
    }

    pub(crate) fn token_by_body_mut(&mut self, body: BodyHandle) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.body == body)
    }

    pub fn token(&self, id: u32) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Live tokens that have not landed in a bucket yet
    pub fn unsettled_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.settled).count()
    }

    /// No budget left and nothing still in flight
    pub fn is_round_complete(&self) -> bool {
        self.score.tokens_remaining == 0 && self.unsettled_count() == 0
    }

    /// Events recorded since the last drain, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Tell observers the score state moved
    pub(crate) fn notify_score_changed(&mut self) {
        let ScoreState {
            score,
            tokens_remaining,
        } = self.score;
        self.events.push(GameEvent::ScoreChanged {
            score,
            tokens_remaining,
        });
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.pegs.sort_by_key(|p| p.id);
        self.buckets.sort_by_key(|b| b.id);
        self.tokens.sort_by_key(|t| t.id);
    }
}
