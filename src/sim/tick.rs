//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! frame; the host alternates `tick` and rendering and never runs them
//! concurrently.

use glam::Vec2;

use super::combat;
use super::movement;
use super::progression::{check_skill_threshold, choose_skill};
use super::spawner;
use super::state::{BulletOwner, GameEvent, GamePhase, GameState};
use crate::consts::SCREEN_CENTER;
use crate::{direction_to, world_to_screen};

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement keys, held state
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer position in screen space (aim)
    pub pointer: Option<Vec2>,
    /// Fire pressed this tick (click or key)
    pub fire: bool,
    /// Restart pressed this tick
    pub restart: bool,
    /// Skill option picked this tick (0-based)
    pub select_skill: Option<usize>,
    /// Debug: grant experience
    pub debug_exp: bool,
    /// Debug: force a ring event
    pub debug_ring: bool,
    /// Debug: force a wave event
    pub debug_wave: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Distance at which the autopilot backs away from an enemy
const IDLE_FLEE_DISTANCE: f32 = 60.0;
/// Distance at which the autopilot starts shooting
const IDLE_FIRE_DISTANCE: f32 = 150.0;

/// Advance the game state by one fixed timestep.
///
/// `state.events` is cleared first and afterwards holds only this tick's
/// events; hosts that want them drain after every call.
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Idle/demo mode - AI plays the game
    let mut input = input.clone();
    if input.idle_mode {
        apply_idle_mode(state, &mut input);
    }
    let input = &input;

    match state.phase {
        GamePhase::GameOver => {
            if input.restart {
                state.reset_game();
            }
        }
        GamePhase::SkillSelect => {
            if let Some(index) = input.select_skill {
                if choose_skill(state, index).is_some() {
                    state.phase = GamePhase::Playing;
                }
            }
        }
        GamePhase::Playing => step_playing(state, input),
    }
}

/// One Playing step in the fixed order: input, player, spawns, enemies,
/// damage, field, satellites, weapon, bullets, tokens, progression
fn step_playing(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    // Debug keys
    if input.debug_exp {
        state.player.experience += state.tuning.debug_exp_grant;
        log::info!("Debug: +{} exp", state.tuning.debug_exp_grant);
    }
    if input.debug_ring {
        spawner::spawn_ring(state);
    }
    if input.debug_wave {
        spawner::spawn_wave(state);
    }

    movement::move_player(state, input.up, input.down, input.left, input.right);
    spawner::update(state);

    movement::update_enemies(state);
    combat::resolve_melee(state);
    if state.player.is_dead() {
        enter_game_over(state);
        return;
    }

    combat::resolve_enemy_bullets(state);
    if state.player.is_dead() {
        enter_game_over(state);
        return;
    }

    tick_invincibility(state);

    combat::resolve_field(state);

    movement::update_satellites(state);
    combat::resolve_satellites(state);

    state.player.fire_cooldown = state.player.fire_cooldown.saturating_sub(1);
    if input.fire {
        fire_player_bullet(state, input.pointer);
    }

    movement::update_bullets(state);
    combat::resolve_player_bullets(state);

    movement::update_tokens(state);
    combat::collect_tokens(state);

    if check_skill_threshold(state) {
        state.phase = GamePhase::SkillSelect;
    }
}

fn tick_invincibility(state: &mut GameState) {
    let player = &mut state.player;
    if player.invincible_ticks > 0 {
        player.invincible_ticks -= 1;
        player.blink_ticks += 1;
    } else {
        player.blink_ticks = 0;
    }
}

/// Spawn a player bullet toward the pointer if the weapon is ready
fn fire_player_bullet(state: &mut GameState, pointer: Option<Vec2>) {
    if state.player.fire_cooldown > 0 {
        return;
    }
    let aim = pointer
        .and_then(|p| (p - Vec2::splat(SCREEN_CENTER)).try_normalize())
        .unwrap_or(Vec2::X);
    let origin = state.player.pos;
    let vel = aim * state.tuning.bullet_speed;
    let owner = BulletOwner::Player {
        homing: state.player.upgrades.homing,
    };
    state.spawn_bullet(origin, vel, owner);
    state.player.fire_cooldown = state.player.fire_cooldown_ticks(&state.tuning);
}

fn enter_game_over(state: &mut GameState) {
    state.player.hp = 0;
    state.phase = GamePhase::GameOver;
    log::info!(
        "Game over at tick {}: score {}, level {}, exp {}",
        state.time_ticks,
        state.player.score,
        state.player.level,
        state.player.experience
    );
    state.events.push(GameEvent::GameOver {
        score: state.player.score,
    });
}

/// Replace the input with the autopilot's choices
fn apply_idle_mode(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::GameOver => {
            input.restart = true;
            return;
        }
        GamePhase::SkillSelect => {
            if !state.skill_offer.is_empty() {
                input.select_skill = Some(0);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    let player_pos = state.player.pos;
    let nearest_enemy = state
        .enemies
        .iter()
        .map(|e| (e.pos, e.pos.distance(player_pos)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let nearest_token = state
        .tokens
        .iter()
        .map(|t| (t.pos, t.pos.distance(player_pos)))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    // Back away from close enemies, otherwise go collect experience
    let heading = match (nearest_enemy, nearest_token) {
        (Some((pos, dist)), _) if dist < IDLE_FLEE_DISTANCE => direction_to(pos, player_pos),
        (_, Some((pos, _))) => direction_to(player_pos, pos),
        _ => Vec2::ZERO,
    };
    input.up = heading.y < -0.3;
    input.down = heading.y > 0.3;
    input.left = heading.x < -0.3;
    input.right = heading.x > 0.3;

    if let Some((pos, dist)) = nearest_enemy {
        input.pointer = Some(world_to_screen(pos, player_pos));
        input.fire = dist < IDLE_FIRE_DISTANCE;
    }
}
