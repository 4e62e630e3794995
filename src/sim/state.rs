//! Game state and core simulation types
//!
//! Everything the caller renders lives here. `SimulationState` is the single
//! unit of ownership: every operation takes it by mutable reference.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::CollisionScratch;
use super::pool::{Pool, Slot};
use super::rect::Aabb;
use crate::consts::*;

/// Discrete movement input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 9] = [
        Direction::None,
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Movement vector (screen space, +y down); diagonals use the
    /// precomputed factor on both axes
    pub fn vector(self) -> Vec2 {
        let d = DIAGONAL_FACTOR;
        match self {
            Direction::None => Vec2::ZERO,
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
            Direction::UpLeft => Vec2::new(-d, -d),
            Direction::UpRight => Vec2::new(d, -d),
            Direction::DownLeft => Vec2::new(-d, d),
            Direction::DownRight => Vec2::new(d, d),
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub direction: Direction,
    pub lives: u32,
    pub rapid_fire: bool,
    pub double_bullet: bool,
    /// Shared countdown for both power flags
    pub powerup_timer: f32,
    pub fire_cooldown: f32,
    pub score: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, SCREEN_HEIGHT / 2.0),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            direction: Direction::None,
            lives: PLAYER_LIVES,
            rapid_fire: false,
            double_bullet: false,
            powerup_timer: 0.0,
            fire_cooldown: 0.0,
            score: 0,
        }
    }
}

impl Player {
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Drop both power flags and their timer (on any hit)
    pub fn clear_powerups(&mut self) {
        self.rapid_fire = false;
        self.double_bullet = false;
        self.powerup_timer = 0.0;
    }

    /// Clamp into the playfield: x in `[w/2, W - w/2]`, y in `[h/2, H - h]`
    pub fn clamp_to_field(&mut self) {
        let half = self.size * 0.5;
        self.pos.x = crate::clamp_span(self.pos.x, half.x, SCREEN_WIDTH - half.x);
        self.pos.y = crate::clamp_span(self.pos.y, half.y, SCREEN_HEIGHT - self.size.y);
    }
}

/// A player or enemy projectile. Speed is signed: positive travels +x.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub active: bool,
}

impl Bullet {
    /// Active projectile with the standard bullet size
    pub fn new(x: f32, y: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed,
            active: true,
        }
    }

    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

impl Slot for Bullet {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Small,
    Medium,
    Large,
    Boss,
}

/// Per-kind constants. Level-scaled values are `base + per_level * level`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub width: f32,
    pub height: f32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub base_health: i32,
    pub health_per_level: i32,
    pub base_score: u32,
    pub score_per_level: u32,
    /// Seconds between shots (Large and Boss only)
    pub fire_interval: Option<f32>,
}

impl EnemyProfile {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn speed(&self, level: u32) -> f32 {
        self.base_speed + self.speed_per_level * level as f32
    }

    pub fn health(&self, level: u32) -> i32 {
        self.base_health + self.health_per_level * level as i32
    }

    pub fn score(&self, level: u32) -> u32 {
        self.base_score + self.score_per_level * level
    }
}

const fn profile(
    width: f32,
    height: f32,
    base_speed: f32,
    speed_per_level: f32,
    (base_health, health_per_level): (i32, i32),
    (base_score, score_per_level): (u32, u32),
    fire_interval: Option<f32>,
) -> EnemyProfile {
    EnemyProfile {
        width,
        height,
        base_speed,
        speed_per_level,
        base_health,
        health_per_level,
        base_score,
        score_per_level,
        fire_interval,
    }
}

const NORMAL_PROFILES: [EnemyProfile; 4] = [
    profile(16.0, 12.0, 80.0, 5.0, (1, 0), (30, 0), None),
    profile(24.0, 16.0, 60.0, 3.0, (2, 0), (50, 0), None),
    profile(32.0, 24.0, 40.0, 2.0, (3, 0), (150, 0), Some(LARGE_FIRE_INTERVAL)),
    profile(64.0, 48.0, 20.0, 0.0, (10, 5), (0, 100), Some(BOSS_FIRE_INTERVAL)),
];

const BENCHMARK_PROFILES: [EnemyProfile; 4] = [
    profile(16.0, 12.0, 90.0, 5.0, (1, 0), (30, 0), None),
    profile(24.0, 16.0, 70.0, 3.0, (2, 0), (50, 0), None),
    profile(32.0, 24.0, 50.0, 2.0, (3, 0), (150, 0), Some(LARGE_FIRE_INTERVAL)),
    profile(64.0, 48.0, 20.0, 0.0, (100, 0), (1000, 0), Some(BOSS_FIRE_INTERVAL)),
];

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Small,
        EnemyKind::Medium,
        EnemyKind::Large,
        EnemyKind::Boss,
    ];

    fn table_index(self) -> usize {
        match self {
            EnemyKind::Small => 0,
            EnemyKind::Medium => 1,
            EnemyKind::Large => 2,
            EnemyKind::Boss => 3,
        }
    }

    /// Stats used by the regular spawner
    pub fn profile(self) -> &'static EnemyProfile {
        &NORMAL_PROFILES[self.table_index()]
    }

    /// Stats used when seeding a benchmark scene
    pub fn benchmark_profile(self) -> &'static EnemyProfile {
        &BENCHMARK_PROFILES[self.table_index()]
    }

    /// Weighted draw: 60% Small, 25% Medium, 15% Large
    pub fn from_roll(roll: u32) -> Self {
        match roll {
            0..60 => EnemyKind::Small,
            60..85 => EnemyKind::Medium,
            _ => EnemyKind::Large,
        }
    }

    pub fn fires(self) -> bool {
        matches!(self, EnemyKind::Large | EnemyKind::Boss)
    }
}

/// An enemy ship
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed (always non-negative)
    pub speed: f32,
    pub health: i32,
    /// Health restored when recycled in benchmark mode
    pub max_health: i32,
    pub kind: EnemyKind,
    /// Sine phase (Small, Boss) or countdown to the next drift flip (Medium)
    pub phase: f32,
    /// Vertical drift sign for Medium enemies (+1 down, -1 up)
    pub drift: f32,
    pub fire_cooldown: f32,
    pub score: u32,
    pub active: bool,
}

impl Enemy {
    /// Active enemy built from a profile at the given level
    pub fn from_profile(kind: EnemyKind, profile: &EnemyProfile, level: u32, pos: Vec2) -> Self {
        let health = profile.health(level);
        Self {
            pos,
            size: profile.size(),
            speed: profile.speed(level),
            health,
            max_health: health,
            kind,
            phase: 0.0,
            drift: 1.0,
            fire_cooldown: profile.fire_interval.unwrap_or(0.0),
            score: profile.score(level),
            active: true,
        }
    }

    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

impl Slot for Enemy {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerupKind {
    #[default]
    Health,
    RapidFire,
    DoubleBullet,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [
        PowerupKind::Health,
        PowerupKind::RapidFire,
        PowerupKind::DoubleBullet,
    ];

    pub fn from_index(index: u32) -> Self {
        Self::ALL[index as usize % Self::ALL.len()]
    }
}

/// A pickup drifting left across the playfield
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Powerup {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerupKind,
    pub speed: f32,
    pub active: bool,
}

impl Powerup {
    pub fn new(x: f32, y: f32, kind: PowerupKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(POWERUP_WIDTH, POWERUP_HEIGHT),
            kind,
            speed: POWERUP_SPEED,
            active: true,
        }
    }

    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

impl Slot for Powerup {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// A short-lived (or, in benchmark scenes, looping) explosion effect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub size: Vec2,
    pub lifespan: f32,
    pub remaining: f32,
    /// Restart the countdown instead of expiring (benchmark scenes only)
    pub persistent: bool,
    pub active: bool,
}

impl Slot for Explosion {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Level progression and parallax scroll state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub number: u32,
    pub scroll_speed: f32,
    /// Seconds between regular enemy spawns
    pub spawn_rate: f32,
    pub background_offset: f32,
    pub midground_offset: f32,
    pub foreground_offset: f32,
    pub boss_spawned: bool,
    pub boss_defeated: bool,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            number: 1,
            scroll_speed: START_SCROLL_SPEED,
            spawn_rate: START_SPAWN_RATE,
            background_offset: 0.0,
            midground_offset: 0.0,
            foreground_offset: 0.0,
            boss_spawned: false,
            boss_defeated: false,
        }
    }
}

impl Level {
    /// Score the player must reach before this level's boss appears
    pub fn boss_threshold(&self) -> u32 {
        self.number * BOSS_SCORE_PER_LEVEL
    }

    /// Accumulate the three parallax offsets
    pub fn scroll(&mut self, dt: f32) {
        let [bg, mid, fg] = PARALLAX;
        self.background_offset += self.scroll_speed * bg * dt;
        self.midground_offset += self.scroll_speed * mid * dt;
        self.foreground_offset += self.scroll_speed * fg * dt;
    }
}

/// Complete simulation state (deterministic given the random stream)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub player: Player,
    pub bullets: Pool<Bullet>,
    pub enemies: Pool<Enemy>,
    pub enemy_bullets: Pool<Bullet>,
    pub powerups: Pool<Powerup>,
    pub explosions: Pool<Explosion>,
    pub level: Level,
    pub enemy_spawn_timer: f32,
    pub powerup_spawn_timer: f32,
    pub game_over: bool,
    pub paused: bool,
    /// Recycle instead of freeing entities (sustained-load measurement)
    pub benchmark: bool,
    /// Fraction of the playfield width near the right edge where recycled
    /// enemies reappear
    pub spawn_band: f32,
    /// Simulation steps executed since the last `init`
    pub ticks: u64,
    /// Broad-phase scratch, rebuilt every step
    #[serde(skip)]
    pub(crate) scratch: CollisionScratch,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationState {
    /// Fresh game at level 1
    pub fn new() -> Self {
        Self {
            player: Player::default(),
            bullets: Pool::with_capacity(MAX_BULLETS),
            enemies: Pool::with_capacity(MAX_ENEMIES),
            enemy_bullets: Pool::with_capacity(MAX_ENEMY_BULLETS),
            powerups: Pool::with_capacity(MAX_POWERUPS),
            explosions: Pool::with_capacity(MAX_EXPLOSIONS),
            level: Level::default(),
            enemy_spawn_timer: 0.0,
            powerup_spawn_timer: 0.0,
            game_over: false,
            paused: false,
            benchmark: false,
            spawn_band: DEFAULT_SPAWN_BAND,
            ticks: 0,
            scratch: CollisionScratch::default(),
        }
    }

    /// Spawn band clamped to `(0, 1]`, falling back to the default when unset
    pub fn effective_spawn_band(&self) -> f32 {
        if self.spawn_band.is_nan() || self.spawn_band <= 0.0 {
            DEFAULT_SPAWN_BAND
        } else {
            self.spawn_band.min(1.0)
        }
    }
}
