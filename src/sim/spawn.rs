//! Spawning, firing and level progression
//!
//! Every spawn goes through the owning pool's first-free-slot scan; a full
//! pool silently drops the request. Explosions are the one exception: in
//! benchmark mode a full pool evicts its weakest slot instead.

use glam::Vec2;

use super::pool::Pool;
use super::rng::RandomSource;
use super::state::{Bullet, Enemy, EnemyKind, Explosion, Powerup, PowerupKind, SimulationState};
use crate::clamp_span;
use crate::consts::*;

/// Clamp a projectile lane into `[h/2, H - h]`
fn bullet_lane(y: f32) -> f32 {
    clamp_span(y, BULLET_HEIGHT / 2.0, SCREEN_HEIGHT - BULLET_HEIGHT)
}

/// Try to fire the player's gun. Returns the number of bullets spawned.
///
/// The cooldown restarts on every accepted trigger, even if the bullet pool
/// turns out to be full.
pub fn fire(state: &mut SimulationState) -> usize {
    let player = &mut state.player;
    if state.game_over || state.paused || player.fire_cooldown > 0.0 {
        return 0;
    }

    player.fire_cooldown = if player.rapid_fire {
        RAPID_FIRE_COOLDOWN
    } else {
        BULLET_COOLDOWN
    };

    let x = player.pos.x + player.size.x / 2.0;
    let Some(first) = state.bullets.spawn(Bullet::new(x, bullet_lane(player.pos.y), BULLET_SPEED)) else {
        return 0;
    };

    if !player.double_bullet {
        return 1;
    }

    let second = Bullet::new(x, bullet_lane(player.pos.y - DOUBLE_BULLET_OFFSET), BULLET_SPEED);
    match state.bullets.spawn_from(first + 1, second) {
        Some(_) => 2,
        None => 1,
    }
}

/// Fire one enemy projectile leftward from `(x, y)`. Returns false when the
/// enemy bullet pool is full.
pub fn fire_enemy_bullet(pool: &mut Pool<Bullet>, x: f32, y: f32) -> bool {
    pool.spawn(Bullet::new(x - BULLET_WIDTH, bullet_lane(y), -ENEMY_BULLET_SPEED))
        .is_some()
}

/// Spawn a regular enemy just past the right edge on a random lane
pub fn spawn_enemy(state: &mut SimulationState, kind: EnemyKind, rng: &mut dyn RandomSource) -> Option<usize> {
    // Check before drawing so a full pool leaves the random stream untouched
    state.enemies.first_free_from(0)?;

    let profile = kind.profile();
    let min_y = profile.height / 2.0;
    let max_y = SCREEN_HEIGHT - profile.height;
    let y = rng.below((max_y - min_y) as u32) as f32 + min_y;

    let mut enemy = Enemy::from_profile(kind, profile, state.level.number, Vec2::new(SCREEN_WIDTH + 20.0, y));
    enemy.phase = rng.phase();
    match kind {
        EnemyKind::Large => enemy.fire_cooldown = rng.below(3) as f32 + 1.0,
        EnemyKind::Boss => enemy.phase = 0.0,
        _ => {}
    }

    let index = state.enemies.spawn(enemy);
    log::debug!("Spawned {:?} enemy in slot {:?}", kind, index);
    index
}

/// Spawn the level boss at the right side, vertically centred
pub fn spawn_boss(state: &mut SimulationState) -> Option<usize> {
    let profile = EnemyKind::Boss.profile();
    let x = (SCREEN_WIDTH - profile.width).max(SCREEN_WIDTH / 2.0);
    let boss = Enemy::from_profile(
        EnemyKind::Boss,
        profile,
        state.level.number,
        Vec2::new(x, SCREEN_HEIGHT / 2.0),
    );
    let index = state.enemies.spawn(boss);
    if index.is_some() {
        log::info!("Level {} boss spawned", state.level.number);
    }
    index
}

/// Spawn a powerup at `(x, y)` (y clamped into the playfield)
///
/// The kind is uniform over all kinds, except that a hurt player gets a
/// 40% chance of a forced Health pickup.
pub fn spawn_powerup(state: &mut SimulationState, x: f32, y: f32, rng: &mut dyn RandomSource) -> Option<usize> {
    state.powerups.first_free_from(0)?;

    let y = clamp_span(y, POWERUP_HEIGHT / 2.0, SCREEN_HEIGHT - POWERUP_HEIGHT);
    let rolled = PowerupKind::from_index(rng.below(3));
    let kind = if state.player.lives < PLAYER_LIVES && rng.chance_percent(HEALTH_BIAS_PERCENT) {
        PowerupKind::Health
    } else {
        rolled
    };
    state.powerups.spawn(Powerup::new(x, y, kind))
}

/// Create an explosion of `size` centred near `(x, y)`, clamped inside the
/// playfield. With `evict` set, a full pool reuses the slot with the least
/// remaining life, preferring non-persistent slots.
pub fn create_explosion(pool: &mut Pool<Explosion>, evict: bool, x: f32, y: f32, size: f32) -> Option<usize> {
    let explosion = Explosion {
        pos: Vec2::new(
            clamp_span(x, size / 2.0, SCREEN_WIDTH - size / 2.0),
            clamp_span(y, size / 2.0, SCREEN_HEIGHT - size),
        ),
        size: Vec2::splat(size),
        lifespan: EXPLOSION_LIFESPAN,
        remaining: EXPLOSION_LIFESPAN,
        persistent: false,
        active: true,
    };

    if let Some(index) = pool.spawn(explosion.clone()) {
        return Some(index);
    }
    if !evict {
        return None;
    }

    let index = weakest_explosion(pool.slots())?;
    log::debug!("Explosion pool full, evicting slot {}", index);
    pool[index] = explosion;
    Some(index)
}

/// Slot with the lowest remaining life among non-persistent explosions, or
/// among all of them when every slot is persistent
fn weakest_explosion(slots: &[Explosion]) -> Option<usize> {
    let lowest = |persistent_ok: bool| {
        slots
            .iter()
            .enumerate()
            .filter(|(_, e)| persistent_ok || !e.persistent)
            .min_by(|(_, a), (_, b)| a.remaining.total_cmp(&b.remaining))
            .map(|(i, _)| i)
    };
    lowest(false).or_else(|| lowest(true))
}

/// Advance to the next level: tougher pacing, cleared field, fresh timers
pub fn next_level(state: &mut SimulationState) {
    let level = &mut state.level;
    level.number += 1;
    level.boss_spawned = false;
    level.boss_defeated = false;
    level.scroll_speed += SCROLL_SPEED_STEP;
    level.spawn_rate = (level.spawn_rate * SPAWN_RATE_FACTOR).max(MIN_SPAWN_RATE);

    state.enemies.clear();
    state.enemy_bullets.clear();

    state.enemy_spawn_timer = LEVEL_START_SPAWN_DELAY;
    state.powerup_spawn_timer = POWERUP_SPAWN_DELAY / 2.0;

    log::info!(
        "Level {} (scroll {}, spawn every {:.2}s)",
        state.level.number,
        state.level.scroll_speed,
        state.level.spawn_rate
    );
}

/// Timed spawner for regular play: enemies (or the boss once the score
/// threshold is met) and periodic powerups
pub fn run_spawner(state: &mut SimulationState, rng: &mut dyn RandomSource, dt: f32) {
    state.enemy_spawn_timer -= dt;
    if state.enemy_spawn_timer <= 0.0 {
        let boss_due = !state.level.boss_spawned && state.player.score >= state.level.boss_threshold();
        if boss_due {
            // Only a boss that actually made it into the pool gates the level
            state.level.boss_spawned = spawn_boss(state).is_some();
        } else {
            let kind = EnemyKind::from_roll(rng.below(100));
            spawn_enemy(state, kind, rng);
        }
        state.enemy_spawn_timer = state.level.spawn_rate;
    }

    state.powerup_spawn_timer -= dt;
    if state.powerup_spawn_timer <= 0.0 {
        let min_y = POWERUP_HEIGHT / 2.0;
        let max_y = SCREEN_HEIGHT - POWERUP_HEIGHT;
        let y = rng.below((max_y - min_y) as u32) as f32 + min_y;
        spawn_powerup(state, SCREEN_WIDTH, y, rng);
        state.powerup_spawn_timer = POWERUP_SPAWN_DELAY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::seeded_rng;

    #[test]
    fn test_fire_spawns_one_bullet() {
        let mut state = SimulationState::new();
        assert_eq!(fire(&mut state), 1);
        let (_, bullet) = state.bullets.iter_active().next().expect("bullet");
        assert_eq!(bullet.pos, Vec2::new(50.0 + 16.0, 160.0));
        assert_eq!(bullet.speed, BULLET_SPEED);
        assert_eq!(state.player.fire_cooldown, BULLET_COOLDOWN);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = SimulationState::new();
        assert_eq!(fire(&mut state), 1);
        assert_eq!(fire(&mut state), 0);
        assert_eq!(state.bullets.active_count(), 1);
    }

    #[test]
    fn test_rapid_fire_shortens_cooldown() {
        let mut state = SimulationState::new();
        state.player.rapid_fire = true;
        fire(&mut state);
        assert_eq!(state.player.fire_cooldown, RAPID_FIRE_COOLDOWN);
    }

    #[test]
    fn test_double_bullet_uses_next_free_slot() {
        let mut state = SimulationState::new();
        state.player.double_bullet = true;
        assert_eq!(fire(&mut state), 2);
        assert_eq!(state.bullets[0].pos.y, 160.0);
        assert_eq!(state.bullets[1].pos.y, 150.0);
    }

    #[test]
    fn test_fire_lane_is_clamped() {
        let mut state = SimulationState::new();
        state.player.pos.y = 318.0;
        fire(&mut state);
        assert_eq!(state.bullets[0].pos.y, SCREEN_HEIGHT - BULLET_HEIGHT);
    }

    #[test]
    fn test_fire_with_full_pool() {
        let mut state = SimulationState::new();
        for slot in state.bullets.slots_mut() {
            *slot = Bullet::new(0.0, 0.0, BULLET_SPEED);
        }
        assert_eq!(fire(&mut state), 0);
        assert_eq!(state.player.fire_cooldown, BULLET_COOLDOWN);
    }

    #[test]
    fn test_spawn_enemy_off_right_edge() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(3);
        let index = spawn_enemy(&mut state, EnemyKind::Large, &mut rng).expect("slot");
        let enemy = &state.enemies[index];
        assert_eq!(enemy.pos.x, SCREEN_WIDTH + 20.0);
        assert_eq!(enemy.health, 3);
        assert_eq!(enemy.score, 150);
        assert_eq!(enemy.speed, 42.0);
        assert!((1.0..=3.0).contains(&enemy.fire_cooldown));
        assert!(enemy.pos.y >= 12.0 && enemy.pos.y < SCREEN_HEIGHT - 24.0);
    }

    #[test]
    fn test_spawn_boss_stats() {
        let mut state = SimulationState::new();
        state.level.number = 2;
        let index = spawn_boss(&mut state).expect("slot");
        let boss = &state.enemies[index];
        assert_eq!(boss.kind, EnemyKind::Boss);
        assert_eq!(boss.pos, Vec2::new(SCREEN_WIDTH - 64.0, SCREEN_HEIGHT / 2.0));
        assert_eq!(boss.health, 20);
        assert_eq!(boss.score, 200);
        assert_eq!(boss.fire_cooldown, 1.0);
    }

    #[test]
    fn test_spawn_enemy_full_pool_is_dropped() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(4);
        for _ in 0..MAX_ENEMIES {
            assert!(spawn_enemy(&mut state, EnemyKind::Small, &mut rng).is_some());
        }
        assert!(spawn_enemy(&mut state, EnemyKind::Small, &mut rng).is_none());
        assert_eq!(state.enemies.active_count(), MAX_ENEMIES);
    }

    #[test]
    fn test_healthy_player_gets_any_powerup_kind() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(8);
        let mut seen = [false; 3];
        for _ in 0..60 {
            state.powerups.clear();
            let index = spawn_powerup(&mut state, 200.0, -50.0, &mut rng).expect("slot");
            let p = &state.powerups[index];
            assert_eq!(p.pos.y, POWERUP_HEIGHT / 2.0);
            seen[PowerupKind::ALL.iter().position(|k| *k == p.kind).unwrap_or(0)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_explosion_is_clamped_and_dropped_when_full() {
        let mut pool = Pool::<Explosion>::with_capacity(2);
        let index = create_explosion(&mut pool, false, -10.0, 400.0, 24.0).expect("slot");
        assert_eq!(pool[index].pos, Vec2::new(12.0, SCREEN_HEIGHT - 24.0));
        create_explosion(&mut pool, false, 100.0, 100.0, 24.0);
        assert!(create_explosion(&mut pool, false, 100.0, 100.0, 24.0).is_none());
    }

    #[test]
    fn test_explosion_eviction_prefers_transient_slots() {
        let mut pool = Pool::<Explosion>::with_capacity(3);
        for (i, remaining) in [0.1_f32, 0.4, 0.3].into_iter().enumerate() {
            pool[i] = Explosion {
                lifespan: 0.6,
                remaining,
                persistent: i == 0,
                active: true,
                ..Default::default()
            };
        }
        // Slot 0 has the least life but is persistent; slot 2 is the weakest transient
        assert_eq!(create_explosion(&mut pool, true, 100.0, 100.0, 24.0), Some(2));
        assert_eq!(pool[2].remaining, EXPLOSION_LIFESPAN);

        for slot in pool.slots_mut() {
            slot.persistent = true;
        }
        pool[1].remaining = 0.05;
        assert_eq!(create_explosion(&mut pool, true, 100.0, 100.0, 24.0), Some(1));
    }

    #[test]
    fn test_next_level_resets_and_floors() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(5);
        spawn_enemy(&mut state, EnemyKind::Small, &mut rng);
        fire_enemy_bullet(&mut state.enemy_bullets, 200.0, 100.0);
        state.level.boss_spawned = true;
        state.level.boss_defeated = true;

        next_level(&mut state);
        assert_eq!(state.level.number, 2);
        assert!(!state.level.boss_spawned && !state.level.boss_defeated);
        assert_eq!(state.level.scroll_speed, 55.0);
        assert!((state.level.spawn_rate - 1.8).abs() < 1e-5);
        assert_eq!(state.enemies.active_count(), 0);
        assert_eq!(state.enemy_bullets.active_count(), 0);
        assert_eq!(state.enemy_spawn_timer, 2.0);
        assert_eq!(state.powerup_spawn_timer, 7.5);

        next_level(&mut state);
        next_level(&mut state);
        assert_eq!(state.level.spawn_rate, MIN_SPAWN_RATE);
    }

    #[test]
    fn test_spawner_brings_boss_at_threshold() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(6);
        state.player.score = 10;
        run_spawner(&mut state, &mut rng, SIM_DT);
        assert!(state.level.boss_spawned);
        assert_eq!(
            state.enemies.iter_active().filter(|(_, e)| e.kind == EnemyKind::Boss).count(),
            1
        );
        assert_eq!(state.enemy_spawn_timer, state.level.spawn_rate);

        // Later spawns are regular enemies, never a second boss
        for _ in 0..10 {
            state.enemy_spawn_timer = 0.0;
            run_spawner(&mut state, &mut rng, SIM_DT);
        }
        assert_eq!(
            state.enemies.iter_active().filter(|(_, e)| e.kind == EnemyKind::Boss).count(),
            1
        );
    }

    #[test]
    fn test_spawner_regular_enemy_below_threshold() {
        let mut state = SimulationState::new();
        let mut rng = seeded_rng(6);
        run_spawner(&mut state, &mut rng, SIM_DT);
        assert!(!state.level.boss_spawned);
        assert_eq!(state.enemies.active_count(), 1);
        assert_eq!(state.powerups.active_count(), 1);
        assert_eq!(state.powerup_spawn_timer, POWERUP_SPAWN_DELAY);
    }
}
