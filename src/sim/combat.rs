//! Collision resolution between bullets, enemies, satellites, tokens and the player
//!
//! Each pass marks matches in a `removed` mask and drops them with `retain`
//! afterwards, so an entity matched once is skipped for the rest of the pass
//! and removing it twice is a no-op.

use glam::Vec2;

use super::collision::{circles_touch, first_touching};
use super::progression::update_level;
use super::state::{EnemyKind, GameEvent, GameState, KillCause};

/// An enemy removed with a reward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub id: u32,
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub cause: KillCause,
}

/// Drop every entry whose mask bit is set
fn remove_marked<T>(items: &mut Vec<T>, removed: &[bool]) {
    let mut idx = 0;
    items.retain(|_| {
        let keep = !removed.get(idx).copied().unwrap_or(false);
        idx += 1;
        keep
    });
}

/// Damage the player, recording the hit. Returns the hp actually removed.
fn damage_player(state: &mut GameState, amount: i32, ranged: bool) -> i32 {
    let dealt = state.player.take_damage(amount);
    log::debug!(
        "Player hit for {} ({}) -> hp {}/{}",
        dealt,
        if ranged { "ranged" } else { "melee" },
        state.player.hp,
        state.player.max_hp
    );
    state.events.push(GameEvent::PlayerHit {
        damage: dealt,
        ranged,
    });
    dealt
}

/// Score, drop a token and log each kill, then refresh the level
pub fn award_kills(state: &mut GameState, kills: &[Kill]) {
    if kills.is_empty() {
        return;
    }
    for kill in kills {
        state.player.score += 1;
        state.spawn_token(kill.pos);
        log::debug!(
            "{} #{} killed by {:?} at ({:.1}, {:.1})",
            kill.kind.name(),
            kill.id,
            kill.cause,
            kill.pos.x,
            kill.pos.y
        );
        state.events.push(GameEvent::EnemyKilled {
            id: kill.id,
            kind: kill.kind,
            cause: kill.cause,
            pos: kill.pos,
        });
    }
    update_level(state);
}

/// Enemy touching the vulnerable player: damage, remove the enemy, start
/// invincibility. No score and no token.
pub fn resolve_melee(state: &mut GameState) {
    if state.player.is_invincible() {
        return;
    }
    let reach = state.tuning.player_size;
    let player_pos = state.player.pos;
    let Some(idx) = state
        .enemies
        .iter()
        .position(|enemy| circles_touch(enemy.pos, player_pos, reach))
    else {
        return;
    };

    let damage = state.tuning.melee_damage;
    let invincible_ticks = state.tuning.invincible_ticks;
    state.enemies.remove(idx);
    damage_player(state, damage, false);
    state.player.invincible_ticks = invincible_ticks;
    state.player.blink_ticks = 0;
}

/// Enemy bullets touching the player are consumed; damage only lands while
/// the player is vulnerable
pub fn resolve_enemy_bullets(state: &mut GameState) {
    let reach = state.tuning.player_size / 2.0 + state.tuning.bullet_size / 2.0;
    let player_pos = state.player.pos;
    let removed: Vec<bool> = state
        .bullets
        .iter()
        .map(|bullet| !bullet.is_player_owned() && circles_touch(bullet.pos, player_pos, reach))
        .collect();

    let hits = removed.iter().filter(|&&hit| hit).count();
    if hits == 0 {
        return;
    }
    remove_marked(&mut state.bullets, &removed);

    let damage = state.tuning.ranged_damage;
    for _ in 0..hits {
        if state.player.is_invincible() || state.player.is_dead() {
            break;
        }
        damage_player(state, damage, true);
    }
}

/// Advance the electric field; while discharging, damage every enemy in range
pub fn resolve_field(state: &mut GameState) {
    let charge_ticks = state.tuning.field_charge_ticks;
    let active_ticks = state.tuning.field_active_ticks;
    if !state.player.upgrades.field.advance(charge_ticks, active_ticks) {
        return;
    }

    let radius = state.tuning.field_radius;
    let damage = state.tuning.field_damage;
    let player_pos = state.player.pos;
    let mut removed = vec![false; state.enemies.len()];
    let mut kills = Vec::new();

    for (i, enemy) in state.enemies.iter_mut().enumerate() {
        if !circles_touch(enemy.pos, player_pos, radius) {
            continue;
        }
        enemy.hp -= damage;
        if enemy.hp <= 0 {
            removed[i] = true;
            kills.push(Kill {
                id: enemy.id,
                pos: enemy.pos,
                kind: enemy.kind,
                cause: KillCause::Field,
            });
        }
    }

    remove_marked(&mut state.enemies, &removed);
    award_kills(state, &kills);
}

/// Each satellite destroys at most one touching enemy per tick
pub fn resolve_satellites(state: &mut GameState) {
    if state.satellites.is_empty() || state.enemies.is_empty() {
        return;
    }
    let reach = state.tuning.satellite_radius + state.tuning.enemy_size / 2.0;
    let orbit = state.tuning.satellite_orbit;
    let player_pos = state.player.pos;
    let mut removed = vec![false; state.enemies.len()];
    let mut kills = Vec::new();

    for satellite in &state.satellites {
        let pos = satellite.position(player_pos, orbit);
        let hit = first_touching(pos, reach, state.enemies.iter().map(|e| e.pos), &removed);
        if let Some(idx) = hit {
            removed[idx] = true;
            let enemy = &state.enemies[idx];
            kills.push(Kill {
                id: enemy.id,
                pos: enemy.pos,
                kind: enemy.kind,
                cause: KillCause::Satellite,
            });
        }
    }

    remove_marked(&mut state.enemies, &removed);
    award_kills(state, &kills);
}

/// Each player bullet kills the first enemy it touches and is consumed
pub fn resolve_player_bullets(state: &mut GameState) {
    if state.bullets.is_empty() || state.enemies.is_empty() {
        return;
    }
    let reach = state.tuning.enemy_size;
    let mut bullet_removed = vec![false; state.bullets.len()];
    let mut enemy_removed = vec![false; state.enemies.len()];
    let mut kills = Vec::new();

    for (b, bullet) in state.bullets.iter().enumerate() {
        if !bullet.is_player_owned() {
            continue;
        }
        let hit = first_touching(
            bullet.pos,
            reach,
            state.enemies.iter().map(|e| e.pos),
            &enemy_removed,
        );
        if let Some(e) = hit {
            bullet_removed[b] = true;
            enemy_removed[e] = true;
            let enemy = &state.enemies[e];
            kills.push(Kill {
                id: enemy.id,
                pos: enemy.pos,
                kind: enemy.kind,
                cause: KillCause::Bullet,
            });
        }
    }

    remove_marked(&mut state.bullets, &bullet_removed);
    remove_marked(&mut state.enemies, &enemy_removed);
    award_kills(state, &kills);
}

/// Tokens overlapping the player add one experience each
pub fn collect_tokens(state: &mut GameState) {
    let reach = state.tuning.player_size;
    let player_pos = state.player.pos;
    let before = state.tokens.len();
    state
        .tokens
        .retain(|token| !circles_touch(token.pos, player_pos, reach));
    let collected = (before - state.tokens.len()) as u32;
    if collected > 0 {
        state.player.experience += collected;
        state.events.push(GameEvent::TokenCollected {
            experience: collected,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BulletOwner;

    #[test]
    fn test_melee_hits_once_and_engages_invincibility() {
        let mut state = GameState::new(1);
        state.spawn_enemy(Vec2::new(3.0, 0.0), EnemyKind::Chaser);
        state.spawn_enemy(Vec2::new(-3.0, 0.0), EnemyKind::Chaser);
        resolve_melee(&mut state);
        assert_eq!(state.player.hp, 7);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.player.invincible_ticks, 180);

        // Second overlapping enemy is ignored while invincible
        resolve_melee(&mut state);
        assert_eq!(state.player.hp, 7);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.player.score, 0);
        assert!(state.tokens.is_empty());
    }

    #[test]
    fn test_enemy_bullet_suppressed_while_invincible() {
        let mut state = GameState::new(1);
        state.player.invincible_ticks = 10;
        state.spawn_bullet(Vec2::new(1.0, 0.0), Vec2::ZERO, BulletOwner::Enemy);
        resolve_enemy_bullets(&mut state);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_enemy_bullet_clamps_hp() {
        let mut state = GameState::new(1);
        state.player.hp = 1;
        state.spawn_bullet(Vec2::ZERO, Vec2::ZERO, BulletOwner::Enemy);
        state.spawn_bullet(Vec2::ZERO, Vec2::ZERO, BulletOwner::Enemy);
        resolve_enemy_bullets(&mut state);
        assert_eq!(state.player.hp, 0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_player_bullets_ignore_player() {
        let mut state = GameState::new(1);
        state.spawn_bullet(Vec2::ZERO, Vec2::ZERO, BulletOwner::Player { homing: false });
        resolve_enemy_bullets(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.player.hp, state.player.max_hp);
    }

    #[test]
    fn test_one_kill_per_bullet() {
        let mut state = GameState::new(1);
        state.spawn_enemy(Vec2::new(50.0, 0.0), EnemyKind::Chaser);
        state.spawn_enemy(Vec2::new(52.0, 0.0), EnemyKind::Wanderer);
        state.spawn_bullet(
            Vec2::new(51.0, 0.0),
            Vec2::ZERO,
            BulletOwner::Player { homing: false },
        );
        resolve_player_bullets(&mut state);
        assert!(state.bullets.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].kind, EnemyKind::Wanderer);
        assert_eq!(state.player.score, 1);
        assert_eq!(state.tokens.len(), 1);
        assert_eq!(state.tokens[0].pos, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_kill_event_names_the_enemy() {
        let mut state = GameState::new(1);
        state.spawn_enemy(Vec2::new(80.0, 0.0), EnemyKind::Chaser);
        let target = state.spawn_enemy(
            Vec2::new(50.0, 0.0),
            EnemyKind::Shooter { fire_cooldown: 5 },
        );
        state.spawn_bullet(
            Vec2::new(50.0, 0.0),
            Vec2::ZERO,
            BulletOwner::Player { homing: false },
        );
        resolve_player_bullets(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert!(matches!(
            state.events.as_slice(),
            [GameEvent::EnemyKilled { id, .. }] if *id == target
        ));
    }

    #[test]
    fn test_two_bullets_never_share_an_enemy() {
        let mut state = GameState::new(1);
        state.spawn_enemy(Vec2::new(50.0, 0.0), EnemyKind::Chaser);
        for _ in 0..2 {
            state.spawn_bullet(
                Vec2::new(50.0, 1.0),
                Vec2::ZERO,
                BulletOwner::Player { homing: false },
            );
        }
        resolve_player_bullets(&mut state);
        assert_eq!(state.player.score, 1);
        assert_eq!(state.bullets.len(), 1, "second bullet should survive");
    }

    #[test]
    fn test_satellite_kills_award_tokens() {
        let mut state = GameState::new(1);
        state.add_satellite();
        // Satellite sits at (24, 0)
        state.spawn_enemy(Vec2::new(26.0, 0.0), EnemyKind::Chaser);
        state.spawn_enemy(Vec2::new(25.0, 1.0), EnemyKind::Chaser);
        resolve_satellites(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.player.score, 1);
        assert_eq!(state.tokens.len(), 1);
        assert!(matches!(
            state.events.last(),
            Some(GameEvent::EnemyKilled {
                cause: KillCause::Satellite,
                ..
            })
        ));
    }

    #[test]
    fn test_field_accumulates_damage() {
        let mut state = GameState::new(1);
        state.player.upgrades.field.enabled = true;
        state.player.upgrades.field.active_ticks = 5;
        state.spawn_enemy(Vec2::new(20.0, 0.0), EnemyKind::Chaser);
        state.spawn_enemy(Vec2::new(90.0, 0.0), EnemyKind::Chaser);

        resolve_field(&mut state);
        resolve_field(&mut state);
        assert_eq!(state.enemies[0].hp, 1);
        assert_eq!(state.player.score, 0);

        resolve_field(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].hp, state.tuning.enemy_hp);
        assert_eq!(state.player.score, 1);
        assert_eq!(state.tokens.len(), 1);
    }

    #[test]
    fn test_collect_tokens() {
        let mut state = GameState::new(1);
        state.spawn_token(Vec2::new(2.0, 0.0));
        state.spawn_token(Vec2::new(0.0, -7.0));
        state.spawn_token(Vec2::new(20.0, 0.0));
        collect_tokens(&mut state);
        assert_eq!(state.player.experience, 2);
        assert_eq!(state.tokens.len(), 1);
    }

    #[test]
    fn test_kills_raise_level() {
        let mut state = GameState::new(1);
        let kills: Vec<Kill> = (0..20)
            .map(|id| Kill {
                id,
                pos: Vec2::ZERO,
                kind: EnemyKind::Chaser,
                cause: KillCause::Bullet,
            })
            .collect();
        award_kills(&mut state, &kills);
        assert_eq!(state.player.score, 20);
        assert_eq!(state.player.level, 2);
        assert!(state.events.contains(&GameEvent::LevelUp { level: 2 }));
    }
}
