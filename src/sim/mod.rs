//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied delta time only, no wall clock
//! - Injected random source only
//! - Stable iteration order (by pool slot index)
//! - No rendering or platform dependencies

pub mod benchmark;
pub mod collision;
pub mod error;
pub mod grid;
pub mod lifecycle;
pub mod pool;
pub mod rect;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use benchmark::prepare_benchmark_scene;
pub use collision::{CollisionReport, resolve_collisions};
pub use error::SimError;
pub use grid::{Candidates, SpatialGrid};
pub use lifecycle::{BenchmarkLifecycle, LifecyclePolicy, NormalLifecycle};
pub use pool::{Pool, Slot};
pub use rect::Aabb;
pub use rng::{GameRng, RandomSource, seeded_rng};
pub use spawn::{create_explosion, fire, next_level, spawn_boss, spawn_enemy, spawn_powerup};
pub use state::{
    Bullet, Direction, Enemy, EnemyKind, EnemyProfile, Explosion, Level, Player, Powerup, PowerupKind,
    SimulationState,
};
pub use tick::{init, step};
