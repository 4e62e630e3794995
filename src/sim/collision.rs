//! Collision resolution
//!
//! Runs once per step after motion. The three target grids are rebuilt
//! first, then four passes run in a fixed order: bullets against enemies,
//! enemy bullets against the player, enemies against the player, powerups
//! against the player. Touching edges never count as a hit.

use super::lifecycle::LifecyclePolicy;
use super::rng::RandomSource;
use super::spawn::{create_explosion, spawn_powerup};
use super::state::{Bullet, Enemy, EnemyKind, Powerup, PowerupKind, SimulationState};
use crate::consts::*;

/// Per-pass hit counts from one resolver run (diagnostics and tests)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub bullet_hits: u32,
    pub kills: u32,
    pub player_hits: u32,
    pub pickups: u32,
}

/// Rebuild the broad-phase grids and resolve every interaction for this step
pub fn resolve_collisions(
    state: &mut SimulationState,
    policy: &dyn LifecyclePolicy,
    rng: &mut dyn RandomSource,
) -> CollisionReport {
    // Built once per step; slots recycled during a pass keep their old cells until the next step
    let scratch = &mut state.scratch;
    scratch.enemies.rebuild(&state.enemies, Enemy::rect);
    scratch.enemy_bullets.rebuild(&state.enemy_bullets, Bullet::rect);
    scratch.powerups.rebuild(&state.powerups, Powerup::rect);

    let dropped = scratch.enemies.overflow() + scratch.enemy_bullets.overflow() + scratch.powerups.overflow();
    if dropped > 0 {
        log::debug!("Broad-phase dropped {} cell entries", dropped);
    }

    let mut report = CollisionReport::default();
    bullets_vs_enemies(state, policy, rng, &mut report);
    enemy_bullets_vs_player(state, policy, rng, &mut report);
    enemies_vs_player(state, policy, rng, &mut report);
    powerups_vs_player(state, policy, rng, &mut report);
    report
}

fn bullets_vs_enemies(
    state: &mut SimulationState,
    policy: &dyn LifecyclePolicy,
    rng: &mut dyn RandomSource,
    report: &mut CollisionReport,
) {
    for b in 0..state.bullets.capacity() {
        if !state.bullets[b].active {
            continue;
        }
        let bullet_rect = state.bullets[b].rect();

        for e in state.scratch.enemies.query(&bullet_rect).iter() {
            let enemy = &mut state.enemies[e];
            if !enemy.active || !bullet_rect.overlaps(&enemy.rect()) {
                continue;
            }

            enemy.health -= 1;
            let killed = enemy.health <= 0;
            policy.bullet_spent(&mut state.bullets[b], rng);
            report.bullet_hits += 1;

            if killed {
                enemy_killed(state, e, policy, rng);
                report.kills += 1;
            }
            // The bullet is consumed by its first hit
            break;
        }
    }
}

/// Score, explode, resolve death, then roll the drop at the last position
fn enemy_killed(state: &mut SimulationState, index: usize, policy: &dyn LifecyclePolicy, rng: &mut dyn RandomSource) {
    let enemy = &state.enemies[index];
    let (pos, width, kind, score) = (enemy.pos, enemy.size.x, enemy.kind, enemy.score);

    state.player.score = state.player.score.saturating_add(score);
    create_explosion(
        &mut state.explosions,
        policy.evicts_explosions(),
        pos.x,
        pos.y,
        width * KILL_EXPLOSION_SCALE,
    );
    if kind == EnemyKind::Boss {
        state.level.boss_defeated = true;
        log::info!("Level {} boss defeated", state.level.number);
    }

    policy.enemy_destroyed(&mut state.enemies[index], rng);

    if kind == EnemyKind::Boss || rng.chance_percent(DROP_CHANCE_PERCENT) {
        let dropped = spawn_powerup(state, pos.x, pos.y, rng);
        log::debug!("{:?} enemy dropped powerup in slot {:?}", kind, dropped);
    }
}

fn enemy_bullets_vs_player(
    state: &mut SimulationState,
    policy: &dyn LifecyclePolicy,
    rng: &mut dyn RandomSource,
    report: &mut CollisionReport,
) {
    let player_rect = state.player.rect();
    for i in state.scratch.enemy_bullets.query(&player_rect).iter() {
        let bullet = &mut state.enemy_bullets[i];
        if !bullet.active || !player_rect.overlaps(&bullet.rect()) {
            continue;
        }

        policy.bullet_spent(bullet, rng);
        policy.player_hit(&mut state.player);
        let player = &mut state.player;
        create_explosion(
            &mut state.explosions,
            policy.evicts_explosions(),
            player.pos.x,
            player.pos.y,
            player.size.x,
        );
        player.clear_powerups();
        report.player_hits += 1;
    }
}

fn enemies_vs_player(
    state: &mut SimulationState,
    policy: &dyn LifecyclePolicy,
    rng: &mut dyn RandomSource,
    report: &mut CollisionReport,
) {
    // Candidates are deduplicated, so each enemy is tested once per step
    let candidates = state.scratch.enemies.query(&state.player.rect());
    let evict = policy.evicts_explosions();

    for e in candidates.iter() {
        let player = &mut state.player;
        let enemy = &mut state.enemies[e];
        if !enemy.active || !player.rect().overlaps(&enemy.rect()) {
            continue;
        }

        policy.player_hit(player);
        create_explosion(&mut state.explosions, evict, player.pos.x, player.pos.y, player.size.x);
        create_explosion(&mut state.explosions, evict, enemy.pos.x, enemy.pos.y, enemy.size.x);

        if enemy.kind == EnemyKind::Boss {
            player.pos.x = PLAYER_START_X;
        } else {
            policy.enemy_destroyed(enemy, rng);
        }
        player.clear_powerups();
        report.player_hits += 1;
    }
}

fn powerups_vs_player(
    state: &mut SimulationState,
    policy: &dyn LifecyclePolicy,
    rng: &mut dyn RandomSource,
    report: &mut CollisionReport,
) {
    let player_rect = state.player.rect();
    for i in state.scratch.powerups.query(&player_rect).iter() {
        let powerup = &mut state.powerups[i];
        if !powerup.active || !player_rect.overlaps(&powerup.rect()) {
            continue;
        }

        let player = &mut state.player;
        match powerup.kind {
            PowerupKind::Health => {
                if player.lives < PLAYER_LIVES {
                    player.lives += 1;
                }
            }
            PowerupKind::RapidFire => {
                player.rapid_fire = true;
                player.powerup_timer = POWERUP_DURATION;
            }
            PowerupKind::DoubleBullet => {
                player.double_bullet = true;
                player.powerup_timer = POWERUP_DURATION;
            }
        }
        policy.powerup_spent(powerup, rng);
        report.pickups += 1;
    }
}
