//! Space Impact - a side-scrolling shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, motion, broad-phase, collisions,
//!   spawning, benchmark lifecycle)
//! - `settings`: Harness configuration loaded from JSON
//! - `clock`: Fixed-timestep accumulator for callers that drive `sim::step`
//! - `report`: Frame-time statistics for benchmark runs

pub mod clock;
pub mod report;
pub mod settings;
pub mod sim;

pub use clock::FixedStep;
pub use report::FrameStats;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical playfield dimensions
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 320.0;

    /// Pool capacities
    pub const MAX_BULLETS: usize = 30;
    pub const MAX_ENEMIES: usize = 30;
    pub const MAX_ENEMY_BULLETS: usize = 30;
    pub const MAX_POWERUPS: usize = 5;
    pub const MAX_EXPLOSIONS: usize = 10;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 16.0;
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 150.0;
    pub const PLAYER_LIVES: u32 = 3;
    /// Lives sentinel used while benchmarking (never decremented)
    pub const BENCHMARK_LIVES: u32 = 9999;
    /// sqrt(2)/2, applied to both axes on diagonal moves
    pub const DIAGONAL_FACTOR: f32 = std::f32::consts::FRAC_1_SQRT_2;

    /// Projectiles
    pub const BULLET_WIDTH: f32 = 8.0;
    pub const BULLET_HEIGHT: f32 = 4.0;
    pub const BULLET_SPEED: f32 = 300.0;
    pub const ENEMY_BULLET_SPEED: f32 = 200.0;
    pub const BULLET_COOLDOWN: f32 = 0.5;
    pub const RAPID_FIRE_COOLDOWN: f32 = 0.2;
    /// Vertical offset of the second bullet while double-bullet is active
    pub const DOUBLE_BULLET_OFFSET: f32 = 10.0;
    /// Vertical spacing of the boss three-bullet spread
    pub const BOSS_SPREAD: f32 = 20.0;
    /// Seconds between Large enemy shots and between boss spreads
    pub const LARGE_FIRE_INTERVAL: f32 = 2.0;
    pub const BOSS_FIRE_INTERVAL: f32 = 1.0;

    /// Powerups
    pub const POWERUP_WIDTH: f32 = 16.0;
    pub const POWERUP_HEIGHT: f32 = 16.0;
    pub const POWERUP_SPEED: f32 = 60.0;
    pub const POWERUP_DURATION: f32 = 10.0;
    pub const POWERUP_SPAWN_DELAY: f32 = 15.0;
    /// Percent chance a non-boss kill drops a powerup
    pub const DROP_CHANCE_PERCENT: u32 = 10;
    /// Percent chance a spawned powerup is forced to Health while hurt
    pub const HEALTH_BIAS_PERCENT: u32 = 40;

    /// Explosions
    pub const EXPLOSION_LIFESPAN: f32 = 0.5;
    pub const KILL_EXPLOSION_SCALE: f32 = 1.5;

    /// Level progression
    pub const START_SCROLL_SPEED: f32 = 50.0;
    pub const SCROLL_SPEED_STEP: f32 = 5.0;
    pub const START_SPAWN_RATE: f32 = 3.0;
    pub const SPAWN_RATE_FACTOR: f32 = 0.6;
    pub const MIN_SPAWN_RATE: f32 = 1.0;
    pub const LEVEL_START_SPAWN_DELAY: f32 = 2.0;
    /// Score required per level number before the boss appears
    pub const BOSS_SCORE_PER_LEVEL: u32 = 10;
    /// Parallax multipliers for background, midground and foreground
    pub const PARALLAX: [f32; 3] = [0.3, 0.7, 1.4];

    /// Broad-phase grid
    pub const CELL_SIZE: f32 = 32.0;
    pub const CELL_CAPACITY: usize = 16;

    /// Benchmark scene
    pub const DEFAULT_SPAWN_BAND: f32 = 0.10;
    pub const BENCHMARK_BOSS_QUOTA: usize = 10;
    pub const BENCHMARK_SCROLL_SPEED: f32 = 80.0;
    pub const BENCHMARK_SPAWN_RATE: f32 = 0.15;
    pub const BENCHMARK_EXPLOSION_SIZE: f32 = 24.0;
    pub const BENCHMARK_EXPLOSION_LIFESPAN: f32 = 0.6;
}

/// Clamp `value` into `[min, max]`, preferring `min` when the range is empty
#[inline]
pub fn clamp_span(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        min
    } else if value > max {
        max.max(min)
    } else {
        value
    }
}
