//! Simulation step
//!
//! Advances the whole state by one delta time. The lifecycle policy is
//! picked once per step from the benchmark flag; nothing below this point
//! branches on the mode directly.

use super::collision::resolve_collisions;
use super::error::{SimError, validate_dt};
use super::lifecycle::{BenchmarkLifecycle, LifecyclePolicy, NormalLifecycle};
use super::pool::Pool;
use super::rng::RandomSource;
use super::spawn::{fire_enemy_bullet, next_level, run_spawner};
use super::state::{Bullet, Enemy, EnemyKind, Level, Player, SimulationState};
use crate::clamp_span;
use crate::consts::*;

/// Angular rate of the Small enemy bob (radians per second)
const SMALL_BOB_RATE: f32 = 3.0;
/// Vertical bob amplitude of Small enemies (units per second at peak)
const SMALL_BOB_SPEED: f32 = 90.0;
/// Medium enemies drift vertically at this fraction of their speed
const MEDIUM_DRIFT_FACTOR: f32 = 0.3;

/// Reset the state for a fresh game without reallocating any pool
pub fn init(state: &mut SimulationState) {
    state.player = Player::default();
    state.bullets.clear();
    state.enemies.clear();
    state.enemy_bullets.clear();
    state.powerups.clear();
    state.explosions.clear();
    state.level = Level::default();
    state.enemy_spawn_timer = 0.0;
    state.powerup_spawn_timer = 0.0;
    state.game_over = false;
    state.paused = false;
    state.benchmark = false;
    state.spawn_band = DEFAULT_SPAWN_BAND;
    state.ticks = 0;
}

/// Advance the simulation by `dt` seconds
///
/// An invalid delta is rejected before anything is touched. Paused and
/// finished games are left as they are.
pub fn step(state: &mut SimulationState, rng: &mut dyn RandomSource, dt: f32) -> Result<(), SimError> {
    let dt = validate_dt(dt)?;
    if state.game_over || state.paused {
        return Ok(());
    }

    let benchmark = BenchmarkLifecycle::new(state.effective_spawn_band());
    let policy: &dyn LifecyclePolicy = if state.benchmark {
        &benchmark
    } else {
        &NormalLifecycle
    };

    state.ticks += 1;

    update_player(&mut state.player, dt);
    update_projectiles(state, policy, rng, dt);
    update_enemies(state, policy, rng, dt);
    update_powerups(state, policy, rng, dt);
    update_explosions(state, policy, dt);
    state.level.scroll(dt);

    resolve_collisions(state, policy, rng);

    if policy.runs_spawner() {
        run_spawner(state, rng, dt);
    }

    if state.level.boss_spawned && state.level.boss_defeated {
        next_level(state);
    }

    if policy.can_end_game() && state.player.lives == 0 {
        state.game_over = true;
        log::info!(
            "Game over at level {} with score {} after {} ticks",
            state.level.number,
            state.player.score,
            state.ticks
        );
    }

    Ok(())
}

fn update_player(player: &mut Player, dt: f32) {
    player.pos += player.direction.vector() * PLAYER_SPEED * dt;
    player.clamp_to_field();

    if player.fire_cooldown > 0.0 {
        player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
    }

    if player.powerup_timer > 0.0 {
        player.powerup_timer -= dt;
        if player.powerup_timer <= 0.0 {
            player.clear_powerups();
        }
    }
}

fn update_projectiles(
    state: &mut SimulationState,
    policy: &dyn LifecyclePolicy,
    rng: &mut dyn RandomSource,
    dt: f32,
) {
    for (_, bullet) in state.bullets.iter_active_mut() {
        bullet.pos.x += bullet.speed * dt;
        policy.settle_bullet(bullet, rng);
    }
    for (_, bullet) in state.enemy_bullets.iter_active_mut() {
        bullet.pos.x += bullet.speed * dt;
        policy.settle_bullet(bullet, rng);
    }
}

fn update_enemies(state: &mut SimulationState, policy: &dyn LifecyclePolicy, rng: &mut dyn RandomSource, dt: f32) {
    let confine_boss = policy.confines_boss();

    for (_, enemy) in state.enemies.iter_active_mut() {
        enemy.pos.x -= enemy.speed * dt;

        match enemy.kind {
            EnemyKind::Small => {
                enemy.phase += SMALL_BOB_RATE * dt;
                enemy.pos.y += enemy.phase.sin() * SMALL_BOB_SPEED * dt;
            }
            EnemyKind::Medium => {
                enemy.phase -= dt;
                if enemy.phase <= 0.0 {
                    enemy.drift = if rng.below(2) == 0 { 1.0 } else { -1.0 };
                    enemy.phase = rng.below(3) as f32 + 1.0;
                }
                enemy.pos.y += enemy.drift * enemy.speed * MEDIUM_DRIFT_FACTOR * dt;
            }
            EnemyKind::Large => {
                enemy.fire_cooldown -= dt;
                // A full pool keeps the shot pending for the next step
                if enemy.fire_cooldown <= 0.0 && fire_enemy_bullet(&mut state.enemy_bullets, enemy.pos.x, enemy.pos.y) {
                    enemy.fire_cooldown = LARGE_FIRE_INTERVAL;
                }
            }
            EnemyKind::Boss => {
                enemy.phase += dt;
                enemy.pos.y = SCREEN_HEIGHT / 2.0 + enemy.phase.sin() * (SCREEN_HEIGHT / 3.0);
                enemy.fire_cooldown -= dt;
                if enemy.fire_cooldown <= 0.0 {
                    fire_boss_spread(&mut state.enemy_bullets, enemy);
                    enemy.fire_cooldown = BOSS_FIRE_INTERVAL;
                }
            }
        }

        clamp_enemy(enemy, confine_boss);
        policy.settle_enemy(enemy, rng);
    }
}

fn fire_boss_spread(pool: &mut Pool<Bullet>, boss: &Enemy) {
    for offset in [-BOSS_SPREAD, 0.0, BOSS_SPREAD] {
        fire_enemy_bullet(pool, boss.pos.x, boss.pos.y + offset);
    }
}

/// Vertical clamp for every enemy (Medium bounces off the edges) and the
/// right-half clamp for a confined boss
fn clamp_enemy(enemy: &mut Enemy, confine_boss: bool) {
    let min_y = enemy.size.y / 2.0;
    let max_y = SCREEN_HEIGHT - enemy.size.y;
    if enemy.pos.y < min_y {
        enemy.pos.y = min_y;
        if enemy.kind == EnemyKind::Medium {
            enemy.drift = 1.0;
        }
    } else if enemy.pos.y > max_y {
        enemy.pos.y = max_y;
        if enemy.kind == EnemyKind::Medium {
            enemy.drift = -1.0;
        }
    }

    if confine_boss && enemy.kind == EnemyKind::Boss {
        enemy.pos.x = clamp_span(enemy.pos.x, SCREEN_WIDTH / 2.0, SCREEN_WIDTH - enemy.size.x / 2.0);
    }
}

fn update_powerups(state: &mut SimulationState, policy: &dyn LifecyclePolicy, rng: &mut dyn RandomSource, dt: f32) {
    for (_, powerup) in state.powerups.iter_active_mut() {
        powerup.pos.x -= powerup.speed * dt;
        powerup.pos.y = clamp_span(
            powerup.pos.y,
            powerup.size.y / 2.0,
            SCREEN_HEIGHT - powerup.size.y,
        );
        policy.settle_powerup(powerup, rng);
    }
}

fn update_explosions(state: &mut SimulationState, policy: &dyn LifecyclePolicy, dt: f32) {
    for (_, explosion) in state.explosions.iter_active_mut() {
        explosion.remaining -= dt;
        if explosion.remaining <= 0.0 {
            policy.explosion_expired(explosion);
        }
    }
}
