//! Plinko entry point
//!
//! Headless driver: builds the reference field on the built-in physics world,
//! drops the whole token budget at random positions and runs the fixed-step
//! loop until the round completes.
//!
//! Usage: `plinko [config.json] [seed]`

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use plinko::HudText;
use plinko::PlayfieldConfig;
use plinko::consts::*;
use plinko::sim::{GameEvent, Playfield, SimWorld, TickInput, tick};

/// Frame time the driver pretends to render at
const FRAME_DT: f32 = 1.0 / 60.0;
/// Frames between automatic drops
const DROP_INTERVAL_FRAMES: u32 = 20;
/// Give up after ten simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 10;

/// Game instance holding all state
struct Game {
    state: Playfield,
    world: SimWorld,
    accumulator: f32,
    input: TickInput,
    /// Picks drop positions, seeded separately from the field
    aim_rng: Pcg32,
    frames: u32,
    hud: HudText,
}

impl Game {
    fn new(config: PlayfieldConfig, seed: u64) -> Result<Self, plinko::LayoutError> {
        let mut world = SimWorld::new(config.gravity);
        let state = Playfield::new(config, seed, &mut world)?;
        let hud = HudText::from(&state.score);
        Ok(Self {
            state,
            world,
            accumulator: 0.0,
            input: TickInput::default(),
            aim_rng: Pcg32::seed_from_u64(seed.wrapping_add(1)),
            frames: 0,
            hud,
        })
    }

    /// Pick a pointer position over the drop strip, like a player tap
    fn aim(&mut self) -> Vec2 {
        let config = &self.state.config;
        let zone = &config.drop_zone;
        let x = self
            .aim_rng
            .random_range(zone.side_margin..=config.width - zone.side_margin);
        let y = self.aim_rng.random_range(zone.top..=zone.top + zone.height);
        Vec2::new(x, y)
    }

    /// Turn a pointer position into a drop, ignoring taps outside the strip
    fn tap(&mut self, pointer: Vec2) {
        let config = &self.state.config;
        if config.in_drop_zone(pointer) {
            self.input.drop_x = Some(config.indicator_x(pointer.x));
        } else {
            log::debug!("Tap at ({}, {}) outside the drop strip", pointer.x, pointer.y);
        }
    }

    /// Run simulation ticks
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &mut self.world, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.drop_x = None;
        }

        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::TokenSettled {
                    token,
                    bucket,
                    points,
                } => log::info!("Token {} landed in bucket {} (+{})", token, bucket, points),
                GameEvent::TokenReaped {
                    token,
                    settled: false,
                } => log::info!("Token {} missed every bucket", token),
                _ => {}
            }
        }
        if let Some(hud) = HudText::latest(&events) {
            log::debug!("HUD: {} | {}", hud.score, hud.coins_left);
            self.hud = hud;
        }
    }

    fn run(&mut self) {
        while self.frames < MAX_FRAMES {
            if self.frames % DROP_INTERVAL_FRAMES == 0 && self.state.score.tokens_remaining > 0 {
                let pointer = self.aim();
                self.tap(pointer);
            }
            self.update(FRAME_DT);
            self.frames += 1;

            if self.state.is_round_complete() && self.state.tokens.is_empty() {
                break;
            }
        }
    }
}

fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Plinko (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match PlayfieldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Cannot use config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => PlayfieldConfig::default(),
    };
    let seed = match args.next() {
        Some(arg) => match arg.parse() {
            Ok(seed) => seed,
            Err(_) => {
                log::warn!("Seed {:?} is not a number, using clock", arg);
                seed_from_clock()
            }
        },
        None => seed_from_clock(),
    };

    let mut game = match Game::new(config, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid playfield layout: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Game initialized with seed: {} (buckets: {})",
        seed,
        game.state
            .buckets
            .iter()
            .map(|b| b.label())
            .collect::<Vec<_>>()
            .join(" ")
    );

    game.run();

    log::info!(
        "Round over after {:.1}s: {} | {}",
        game.frames as f32 * FRAME_DT,
        game.hud.score,
        game.hud.coins_left
    );
    println!("{}", game.hud.score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds embed the library directly
}
