//! Per-population update rules: enemy AI, bullets, tokens and satellites
//!
//! Removal never happens mid-iteration; culled entities are dropped with
//! `retain` after the pass.

use glam::Vec2;
use rand::Rng;

use super::collision::{beyond_margin, nearest_within, on_screen};
use super::state::{BulletOwner, EnemyKind, GameState};
use crate::direction_to;

/// Apply held movement keys (each axis independent, scaled by the speed upgrade)
pub fn move_player(state: &mut GameState, up: bool, down: bool, left: bool, right: bool) {
    let speed = state.player.speed(&state.tuning);
    let mut step = Vec2::ZERO;
    if up {
        step.y -= speed;
    }
    if down {
        step.y += speed;
    }
    if left {
        step.x -= speed;
    }
    if right {
        step.x += speed;
    }
    state.player.pos += step;
}

/// Run each enemy's variant AI, fire shooter bullets, and cull stragglers
pub fn update_enemies(state: &mut GameState) {
    let player_pos = state.player.pos;
    let tuning = &state.tuning;
    let mut shots: Vec<(Vec2, Vec2)> = Vec::new();

    for enemy in state.enemies.iter_mut() {
        let toward = direction_to(enemy.pos, player_pos);
        match &mut enemy.kind {
            EnemyKind::Chaser => {
                enemy.pos += toward * tuning.chaser_speed;
            }
            EnemyKind::Shooter { fire_cooldown } => {
                enemy.pos += toward * tuning.shooter_speed;
                *fire_cooldown = fire_cooldown.saturating_sub(1);
                if *fire_cooldown == 0 && enemy.pos.distance(player_pos) <= tuning.shooter_range {
                    let aim = direction_to(enemy.pos, player_pos);
                    shots.push((enemy.pos, aim * tuning.enemy_bullet_speed));
                    *fire_cooldown = tuning.shooter_fire_ticks;
                }
            }
            EnemyKind::Wanderer => {
                let jitter = if tuning.wanderer_jitter > 0.0 {
                    state
                        .rng
                        .random_range(-tuning.wanderer_jitter..tuning.wanderer_jitter)
                } else {
                    0.0
                };
                let heading = Vec2::from_angle(jitter).rotate(toward);
                enemy.pos += heading * tuning.wanderer_speed;
            }
            EnemyKind::Swarm { vel } => {
                enemy.pos += *vel;
            }
        }
    }

    let margin = tuning.enemy_cull_margin;
    state
        .enemies
        .retain(|enemy| !beyond_margin(enemy.pos, player_pos, margin));

    for (pos, vel) in shots {
        state.spawn_bullet(pos, vel, BulletOwner::Enemy);
    }
}

/// Move every bullet (steering homing ones) and drop those off screen
pub fn update_bullets(state: &mut GameState) {
    let player_pos = state.player.pos;
    let tuning = &state.tuning;
    let enemies = &state.enemies;

    for bullet in state.bullets.iter_mut() {
        if bullet.owner == (BulletOwner::Player { homing: true }) {
            let speed = bullet.vel.length();
            let nearest = nearest_within(
                bullet.pos,
                tuning.homing_range,
                enemies.iter().map(|e| e.pos),
            );
            if let Some((idx, _)) = nearest {
                let desired = direction_to(bullet.pos, enemies[idx].pos) * speed;
                let steered = bullet.vel.lerp(desired, tuning.homing_blend);
                if steered != Vec2::ZERO {
                    bullet.vel = steered.normalize() * speed;
                }
            }
        }
        bullet.pos += bullet.vel;
    }

    state.bullets.retain(|bullet| on_screen(bullet.pos, player_pos));
}

/// Pull nearby tokens toward the player and drop those off screen
pub fn update_tokens(state: &mut GameState) {
    let player_pos = state.player.pos;
    let radius = state.tuning.token_attract_radius;
    let pull = state.tuning.token_attract_speed;

    for token in state.tokens.iter_mut() {
        let dist = token.pos.distance(player_pos);
        if dist < radius {
            token.pos += direction_to(token.pos, player_pos) * pull.min(dist);
        }
    }

    state.tokens.retain(|token| on_screen(token.pos, player_pos));
}

/// Advance every satellite along its orbit
pub fn update_satellites(state: &mut GameState) {
    let speed = state.tuning.satellite_speed;
    for satellite in state.satellites.iter_mut() {
        satellite.advance(speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn still_state() -> GameState {
        let tuning = Tuning {
            wanderer_jitter: 0.0,
            ..Tuning::default()
        };
        GameState::with_tuning(1, tuning)
    }

    #[test]
    fn test_move_player_axes() {
        let mut state = still_state();
        move_player(&mut state, true, false, false, true);
        assert_eq!(state.player.pos, Vec2::new(2.0, -2.0));

        state.player.upgrades.speed_multiplier = 1.5;
        move_player(&mut state, false, true, false, false);
        assert_eq!(state.player.pos, Vec2::new(2.0, 1.0));

        // Opposite keys cancel
        move_player(&mut state, true, true, true, true);
        assert_eq!(state.player.pos, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_chaser_homes() {
        let mut state = still_state();
        state.spawn_enemy(Vec2::new(100.0, 0.0), EnemyKind::Chaser);
        update_enemies(&mut state);
        assert!((state.enemies[0].pos.x - 98.5).abs() < 1e-4);
        assert!(state.enemies[0].pos.y.abs() < 1e-4);
    }

    #[test]
    fn test_shooter_fires_only_in_range() {
        let mut state = still_state();
        state.spawn_enemy(Vec2::new(170.0, 0.0), EnemyKind::Shooter { fire_cooldown: 1 });
        update_enemies(&mut state);
        assert!(state.bullets.is_empty(), "out of range shooter fired");

        state.enemies[0].pos = Vec2::new(50.0, 0.0);
        update_enemies(&mut state);
        assert_eq!(state.bullets.len(), 1);
        let bullet = &state.bullets[0];
        assert_eq!(bullet.owner, BulletOwner::Enemy);
        assert!(bullet.vel.x < 0.0);
        assert!(matches!(
            state.enemies[0].kind,
            EnemyKind::Shooter { fire_cooldown } if fire_cooldown == state.tuning.shooter_fire_ticks
        ));
    }

    #[test]
    fn test_swarm_is_ballistic_and_culled() {
        let mut state = still_state();
        state.spawn_enemy(
            Vec2::new(0.0, 50.0),
            EnemyKind::Swarm {
                vel: Vec2::new(0.0, 10.0),
            },
        );
        update_enemies(&mut state);
        // Keeps its velocity even though the player is behind it
        assert_eq!(state.enemies[0].pos, Vec2::new(0.0, 60.0));

        state.enemies[0].pos = Vec2::new(0.0, 380.0);
        update_enemies(&mut state);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_bullets_cull_off_screen() {
        let mut state = still_state();
        state.spawn_bullet(
            Vec2::new(126.0, 0.0),
            Vec2::new(4.0, 0.0),
            BulletOwner::Player { homing: false },
        );
        state.spawn_bullet(Vec2::ZERO, Vec2::new(0.0, 4.0), BulletOwner::Enemy);
        update_bullets(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_homing_bends_toward_enemy() {
        let mut state = still_state();
        state.spawn_enemy(Vec2::new(40.0, 40.0), EnemyKind::Chaser);
        state.spawn_bullet(
            Vec2::ZERO,
            Vec2::new(4.0, 0.0),
            BulletOwner::Player { homing: true },
        );
        state.spawn_bullet(
            Vec2::ZERO,
            Vec2::new(4.0, 0.0),
            BulletOwner::Player { homing: false },
        );
        update_bullets(&mut state);
        let homing = &state.bullets[0];
        let straight = &state.bullets[1];
        assert!(homing.vel.y > 0.0);
        assert!((homing.vel.length() - 4.0).abs() < 1e-4);
        assert_eq!(straight.vel, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_tokens_attract_within_radius() {
        let mut state = still_state();
        state.spawn_token(Vec2::new(30.0, 0.0));
        state.spawn_token(Vec2::new(100.0, 0.0));
        update_tokens(&mut state);
        assert_eq!(state.tokens[0].pos, Vec2::new(27.0, 0.0));
        assert_eq!(state.tokens[1].pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_satellites_orbit() {
        let mut state = still_state();
        state.add_satellite();
        update_satellites(&mut state);
        assert!((state.satellites[0].angle - state.tuning.satellite_speed).abs() < 1e-6);
    }
}
