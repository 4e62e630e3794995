//! Benchmark scenes and recycle-in-place helpers
//!
//! A benchmark scene fills every pool to a fixed share of its capacity and
//! flips the state into recycle mode, so frame-time measurements see a
//! sustained load instead of decaying activity.

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Bullet, Enemy, EnemyKind, Explosion, Powerup, PowerupKind, SimulationState};
use crate::clamp_span;
use crate::consts::*;

/// Random lane for a body of the given height: `[h/2, H - h]`
fn random_lane(height: f32, rng: &mut dyn RandomSource) -> f32 {
    rng.lane(height / 2.0, SCREEN_HEIGHT - height)
}

/// Jittered x inside the right-edge spawn band
fn band_x(width: f32, spawn_band: f32, rng: &mut dyn RandomSource) -> f32 {
    let band = SCREEN_WIDTH * clamp_span(spawn_band, f32::MIN_POSITIVE, 1.0);
    let jitter = rng.below(band as u32 + 1) as f32;
    (SCREEN_WIDTH - width / 2.0) - jitter
}

/// Move a projectile back to the edge it entered from, on a new lane
pub fn wrap_projectile(bullet: &mut Bullet, rng: &mut dyn RandomSource) {
    bullet.pos.x = if bullet.speed < 0.0 {
        SCREEN_WIDTH - bullet.size.x / 2.0
    } else {
        bullet.size.x / 2.0
    };
    bullet.pos.y = rng.lane(BULLET_HEIGHT / 2.0, SCREEN_HEIGHT - BULLET_HEIGHT);
}

/// Send a powerup back to the right edge with a new lane and kind
pub fn recycle_powerup(powerup: &mut Powerup, rng: &mut dyn RandomSource) {
    powerup.pos.x = SCREEN_WIDTH - powerup.size.x / 2.0;
    powerup.pos.y = random_lane(powerup.size.y, rng);
    powerup.kind = PowerupKind::from_index(rng.below(3));
}

/// Reposition an enemy inside the right-edge spawn band with a fresh phase
/// (and, for shooters, a fresh short cooldown). Health is untouched.
pub fn recycle_enemy_right(enemy: &mut Enemy, spawn_band: f32, rng: &mut dyn RandomSource) {
    enemy.pos.x = band_x(enemy.size.x, spawn_band, rng);
    enemy.pos.y = random_lane(enemy.size.y, rng);
    enemy.phase = rng.phase();
    if enemy.kind.fires() {
        enemy.fire_cooldown = rng.below(3) as f32 * 0.5 + 0.2;
    }
}

/// Bring a destroyed enemy straight back at the right edge with full health
pub fn respawn_enemy_right(enemy: &mut Enemy, spawn_band: f32, rng: &mut dyn RandomSource) {
    recycle_enemy_right(enemy, spawn_band, rng);
    enemy.health = enemy.max_health;
    enemy.active = true;
}

/// Target slot count for a pool at `density` percent
pub fn target_count(capacity: usize, density: u32) -> usize {
    capacity * density as usize / 100
}

/// Seed every pool to `density` percent (clamped to 0..=100) of capacity and
/// switch the state into benchmark mode.
pub fn prepare_benchmark_scene(state: &mut SimulationState, rng: &mut dyn RandomSource, density: i32) {
    let density = density.clamp(0, 100) as u32;

    state.benchmark = true;
    state.spawn_band = DEFAULT_SPAWN_BAND;
    state.game_over = false;
    state.player.lives = BENCHMARK_LIVES;
    state.player.fire_cooldown = 0.0;

    state.level.scroll_speed = BENCHMARK_SCROLL_SPEED;
    state.level.spawn_rate = BENCHMARK_SPAWN_RATE;
    state.level.boss_spawned = false;
    state.level.boss_defeated = false;
    state.enemy_spawn_timer = 0.0;
    state.powerup_spawn_timer = 2.0;

    seed_bullets(state, rng, density);
    seed_enemies(state, rng, density);
    seed_powerups(state, rng, density);
    seed_explosions(state, rng, density);

    log::info!(
        "Benchmark scene at density {}: bullets={} enemy_bullets={} enemies={} powerups={} explosions={}",
        density,
        state.bullets.active_count(),
        state.enemy_bullets.active_count(),
        state.enemies.active_count(),
        state.powerups.active_count(),
        state.explosions.active_count(),
    );
}

fn seed_bullets(state: &mut SimulationState, rng: &mut dyn RandomSource, density: u32) {
    let lane_span = (SCREEN_HEIGHT - BULLET_HEIGHT) as u32;

    let target = target_count(state.bullets.capacity(), density);
    for (i, slot) in state.bullets.slots_mut().iter_mut().enumerate() {
        if i < target {
            let x = rng.below(SCREEN_WIDTH as u32) as f32;
            let y = rng.below(lane_span) as f32 + BULLET_HEIGHT / 2.0;
            *slot = Bullet::new(x, y, -BULLET_SPEED);
        } else {
            slot.active = false;
        }
    }

    let target = target_count(state.enemy_bullets.capacity(), density);
    for (i, slot) in state.enemy_bullets.slots_mut().iter_mut().enumerate() {
        if i < target {
            let x = SCREEN_WIDTH - rng.below(SCREEN_WIDTH as u32 / 2) as f32;
            let y = rng.below(lane_span) as f32 + BULLET_HEIGHT / 2.0;
            *slot = Bullet::new(x, y, -ENEMY_BULLET_SPEED);
        } else {
            slot.active = false;
        }
    }
}

fn seed_enemies(state: &mut SimulationState, rng: &mut dyn RandomSource, density: u32) {
    let target = target_count(state.enemies.capacity(), density);
    let boss_target = BENCHMARK_BOSS_QUOTA.min(target);
    let band = state.effective_spawn_band();
    let level = state.level.number;
    let mut bosses_placed = 0usize;

    for (i, slot) in state.enemies.slots_mut().iter_mut().enumerate() {
        if i >= target {
            slot.active = false;
            continue;
        }

        let kind = if bosses_placed < boss_target {
            bosses_placed += 1;
            EnemyKind::Boss
        } else {
            EnemyKind::from_roll(rng.below(100))
        };

        let mut enemy = Enemy::from_profile(kind, kind.benchmark_profile(), level, Vec2::ZERO);
        enemy.phase = rng.phase();
        match kind {
            EnemyKind::Large => enemy.fire_cooldown = 0.2,
            EnemyKind::Boss => {
                enemy.phase = 0.0;
                enemy.fire_cooldown = 0.5;
            }
            _ => {}
        }

        let ex_max = SCREEN_WIDTH - enemy.size.x / 2.0;
        enemy.pos.x = if kind == EnemyKind::Boss {
            // Bosses get evenly spaced slots across a wider band
            let boss_band = clamp_span(band * 3.0, 0.30, 1.0);
            let ex_min = SCREEN_WIDTH * (1.0 - boss_band);
            let slot_width = (ex_max - ex_min).max(1.0) / boss_target as f32;
            let jitter = slot_width * 0.2 * (rng.below(100) as f32 / 100.0);
            ex_min + slot_width * (bosses_placed - 1) as f32 + slot_width * 0.4 + jitter
        } else {
            let ex_min = SCREEN_WIDTH * (1.0 - band);
            ex_min + rng.below((ex_max - ex_min + 1.0).max(1.0) as u32) as f32
        };
        enemy.pos.y = random_lane(enemy.size.y, rng);

        *slot = enemy;
    }
}

fn seed_powerups(state: &mut SimulationState, rng: &mut dyn RandomSource, density: u32) {
    let target = target_count(state.powerups.capacity(), density);
    for (i, slot) in state.powerups.slots_mut().iter_mut().enumerate() {
        if i < target {
            let kind = PowerupKind::from_index(rng.below(3));
            let x = SCREEN_WIDTH - rng.below(SCREEN_WIDTH as u32 / 3) as f32;
            let y = rng.below((SCREEN_HEIGHT - POWERUP_HEIGHT) as u32) as f32 + POWERUP_HEIGHT / 2.0;
            *slot = Powerup::new(x, y, kind);
        } else {
            slot.active = false;
        }
    }
}

fn seed_explosions(state: &mut SimulationState, rng: &mut dyn RandomSource, density: u32) {
    let target = target_count(state.explosions.capacity(), density);
    for (i, slot) in state.explosions.slots_mut().iter_mut().enumerate() {
        if i < target {
            let remaining = BENCHMARK_EXPLOSION_LIFESPAN * rng.below(100) as f32 / 100.0;
            let x = rng.below(SCREEN_WIDTH as u32) as f32;
            let y = rng.below(SCREEN_HEIGHT as u32) as f32;
            *slot = Explosion {
                pos: Vec2::new(x, y),
                size: Vec2::splat(BENCHMARK_EXPLOSION_SIZE),
                lifespan: BENCHMARK_EXPLOSION_LIFESPAN,
                remaining,
                persistent: true,
                active: true,
            };
        } else {
            slot.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded_rng;

    #[test]
    fn test_target_count_floors() {
        assert_eq!(target_count(30, 50), 15);
        assert_eq!(target_count(5, 50), 2);
        assert_eq!(target_count(10, 0), 0);
        assert_eq!(target_count(30, 100), 30);
    }

    #[test]
    fn test_prepare_fills_pools() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(42);
        prepare_benchmark_scene(&mut state, &mut rng, 50);

        assert!(state.benchmark);
        assert_eq!(state.player.lives, BENCHMARK_LIVES);
        assert_eq!(state.bullets.active_count(), 15);
        assert_eq!(state.enemy_bullets.active_count(), 15);
        assert_eq!(state.enemies.active_count(), 15);
        assert_eq!(state.powerups.active_count(), 2);
        assert_eq!(state.explosions.active_count(), 5);
        assert!(state.explosions.iter_active().all(|(_, e)| e.persistent));
    }

    #[test]
    fn test_prepare_reserves_boss_quota() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(7);
        prepare_benchmark_scene(&mut state, &mut rng, 100);
        let bosses = state
            .enemies
            .iter_active()
            .filter(|(_, e)| e.kind == EnemyKind::Boss)
            .count();
        assert_eq!(bosses, BENCHMARK_BOSS_QUOTA);
        // Bosses occupy the first slots and sit in the right part of the field
        for i in 0..BENCHMARK_BOSS_QUOTA {
            let boss = &state.enemies[i];
            assert_eq!(boss.kind, EnemyKind::Boss);
            assert_eq!(boss.health, 100);
            assert!(boss.pos.x >= SCREEN_WIDTH * 0.7 - 0.01);
        }
    }

    #[test]
    fn test_small_density_caps_bosses() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(9);
        prepare_benchmark_scene(&mut state, &mut rng, 10);
        assert_eq!(state.enemies.active_count(), 3);
        assert!(state.enemies.iter_active().all(|(_, e)| e.kind == EnemyKind::Boss));
    }

    #[test]
    fn test_density_is_clamped() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(5);
        prepare_benchmark_scene(&mut state, &mut rng, 250);
        assert_eq!(state.enemies.active_count(), MAX_ENEMIES);
        prepare_benchmark_scene(&mut state, &mut rng, -20);
        assert_eq!(state.enemies.active_count(), 0);
        assert_eq!(state.bullets.active_count(), 0);
    }

    #[test]
    fn test_respawn_restores_health_in_band() {
        let mut rng = seeded_rng(11);
        let kind = EnemyKind::Medium;
        let mut enemy = Enemy::from_profile(kind, kind.benchmark_profile(), 1, Vec2::new(10.0, 10.0));
        enemy.health = 0;
        respawn_enemy_right(&mut enemy, 0.1, &mut rng);
        assert!(enemy.active);
        assert_eq!(enemy.health, 2);
        let right = SCREEN_WIDTH - enemy.size.x / 2.0;
        assert!(enemy.pos.x <= right && enemy.pos.x >= right - SCREEN_WIDTH * 0.1);
        assert!(enemy.pos.y >= enemy.size.y / 2.0 && enemy.pos.y <= SCREEN_HEIGHT - enemy.size.y);
    }
}
