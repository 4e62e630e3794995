//! Entity lifecycle policies
//!
//! Motion and collision math never look at the benchmark flag. Instead one
//! policy is selected per step and decides what happens when an entity
//! leaves the playfield, is spent in a collision, or dies.

use super::benchmark::{recycle_enemy_right, recycle_powerup, respawn_enemy_right, wrap_projectile};
use super::rng::RandomSource;
use super::state::{Bullet, Enemy, EnemyKind, Explosion, Player, Powerup};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Mode-specific answers to "what happens to this slot now?"
pub trait LifecyclePolicy {
    /// Handle a projectile after it moved this step
    fn settle_bullet(&self, bullet: &mut Bullet, rng: &mut dyn RandomSource);
    /// Handle an enemy after it moved this step
    fn settle_enemy(&self, enemy: &mut Enemy, rng: &mut dyn RandomSource);
    /// Handle a powerup after it moved this step
    fn settle_powerup(&self, powerup: &mut Powerup, rng: &mut dyn RandomSource);
    /// Countdown of an explosion reached zero
    fn explosion_expired(&self, explosion: &mut Explosion);
    /// A projectile hit something
    fn bullet_spent(&self, bullet: &mut Bullet, rng: &mut dyn RandomSource);
    /// The player picked up a powerup
    fn powerup_spent(&self, powerup: &mut Powerup, rng: &mut dyn RandomSource);
    /// An enemy's health ran out, or a non-boss rammed the player
    fn enemy_destroyed(&self, enemy: &mut Enemy, rng: &mut dyn RandomSource);
    /// The player was struck by an enemy or enemy bullet
    fn player_hit(&self, player: &mut Player);
    /// Whether losing all lives ends the run
    fn can_end_game(&self) -> bool;
    /// Whether the boss is held in the right half of the playfield
    fn confines_boss(&self) -> bool;
    /// Whether the timed enemy/powerup spawner runs
    fn runs_spawner(&self) -> bool;
    /// Whether a full explosion pool evicts its weakest slot
    fn evicts_explosions(&self) -> bool;
}

/// Regular play: spent or departed entities free their slot
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalLifecycle;

impl LifecyclePolicy for NormalLifecycle {
    fn settle_bullet(&self, bullet: &mut Bullet, _rng: &mut dyn RandomSource) {
        let (x, y) = (bullet.pos.x, bullet.pos.y);
        let off_x = x > SCREEN_WIDTH + bullet.size.x || x < -bullet.size.x;
        let off_y = y < -bullet.size.y || y > SCREEN_HEIGHT + bullet.size.y;
        if off_x || off_y {
            bullet.active = false;
        }
    }

    fn settle_enemy(&self, enemy: &mut Enemy, _rng: &mut dyn RandomSource) {
        if enemy.kind != EnemyKind::Boss && enemy.pos.x < -enemy.size.x {
            enemy.active = false;
        }
    }

    fn settle_powerup(&self, powerup: &mut Powerup, _rng: &mut dyn RandomSource) {
        if powerup.pos.x < -powerup.size.x {
            powerup.active = false;
        }
    }

    fn explosion_expired(&self, explosion: &mut Explosion) {
        explosion.active = false;
    }

    fn bullet_spent(&self, bullet: &mut Bullet, _rng: &mut dyn RandomSource) {
        bullet.active = false;
    }

    fn powerup_spent(&self, powerup: &mut Powerup, _rng: &mut dyn RandomSource) {
        powerup.active = false;
    }

    fn enemy_destroyed(&self, enemy: &mut Enemy, _rng: &mut dyn RandomSource) {
        enemy.active = false;
    }

    fn player_hit(&self, player: &mut Player) {
        player.lives = player.lives.saturating_sub(1);
    }

    fn can_end_game(&self) -> bool {
        true
    }

    fn confines_boss(&self) -> bool {
        true
    }

    fn runs_spawner(&self) -> bool {
        true
    }

    fn evicts_explosions(&self) -> bool {
        false
    }
}

/// Benchmark play: every slot is recycled in place so the load stays flat
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkLifecycle {
    /// Fraction of the playfield width, from the right edge, where recycled
    /// enemies reappear
    pub spawn_band: f32,
}

impl BenchmarkLifecycle {
    pub fn new(spawn_band: f32) -> Self {
        Self { spawn_band }
    }
}

impl LifecyclePolicy for BenchmarkLifecycle {
    fn settle_bullet(&self, bullet: &mut Bullet, rng: &mut dyn RandomSource) {
        let leaving_left = bullet.speed < 0.0 && bullet.pos.x < -bullet.size.x;
        let leaving_right = bullet.speed > 0.0 && bullet.pos.x > SCREEN_WIDTH + bullet.size.x;
        if leaving_left || leaving_right {
            wrap_projectile(bullet, rng);
        }
    }

    fn settle_enemy(&self, enemy: &mut Enemy, rng: &mut dyn RandomSource) {
        if enemy.pos.x < -enemy.size.x * 0.25 {
            recycle_enemy_right(enemy, self.spawn_band, rng);
        }
    }

    fn settle_powerup(&self, powerup: &mut Powerup, rng: &mut dyn RandomSource) {
        if powerup.pos.x < -powerup.size.x {
            recycle_powerup(powerup, rng);
        }
    }

    fn explosion_expired(&self, explosion: &mut Explosion) {
        if explosion.persistent {
            explosion.remaining = explosion.lifespan;
        } else {
            explosion.active = false;
        }
    }

    fn bullet_spent(&self, bullet: &mut Bullet, rng: &mut dyn RandomSource) {
        wrap_projectile(bullet, rng);
    }

    fn powerup_spent(&self, powerup: &mut Powerup, rng: &mut dyn RandomSource) {
        recycle_powerup(powerup, rng);
    }

    fn enemy_destroyed(&self, enemy: &mut Enemy, rng: &mut dyn RandomSource) {
        respawn_enemy_right(enemy, self.spawn_band, rng);
    }

    fn player_hit(&self, _player: &mut Player) {}

    fn can_end_game(&self) -> bool {
        false
    }

    fn confines_boss(&self) -> bool {
        false
    }

    fn runs_spawner(&self) -> bool {
        false
    }

    fn evicts_explosions(&self) -> bool {
        true
    }
}
