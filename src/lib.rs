//! Swarm Survivor - a top-down survival shooter core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, AI, combat, progression, game state)
//! - `renderer`: Draw calls against an abstract canvas supplied by the host
//! - `tuning`: Data-driven game balance
//! - `error`: Errors for the fallible edges (tuning load)

pub mod error;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{TuningError, TuningResult};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Balance values here are the defaults for [`Tuning`]; the simulation reads
/// them through the tuning table. Screen geometry is fixed.
pub mod consts {
    /// Host tick rate (one simulation step per displayed frame)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Square screen edge in pixels
    pub const SCREEN_SIZE: f32 = 256.0;
    /// Screen midpoint; the player is always drawn here
    pub const SCREEN_CENTER: f32 = SCREEN_SIZE / 2.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 8.0;
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const PLAYER_MAX_HP: i32 = 10;
    pub const PLAYER_MAX_HP_CAP: i32 = 20;
    pub const INVINCIBLE_TICKS: u32 = 180;
    pub const BLINK_PERIOD_TICKS: u32 = 4;

    /// Damage taken by the player
    pub const MELEE_DAMAGE: i32 = 3;
    pub const RANGED_DAMAGE: i32 = 2;

    /// Player weapon
    pub const FIRE_COOLDOWN_BASE: u32 = 15;
    pub const FIRE_COOLDOWN_FLOOR: u32 = 4;
    /// Experience needed to shave one tick off the fire cooldown
    pub const EXP_PER_COOLDOWN_TICK: u32 = 30;
    pub const RAPID_FIRE_STEP: u32 = 3;
    pub const BULLET_SPEED: f32 = 4.0;
    pub const BULLET_SIZE: f32 = 2.0;
    pub const HOMING_RANGE: f32 = 120.0;
    pub const HOMING_BLEND: f32 = 0.15;

    /// Enemies
    pub const ENEMY_SIZE: f32 = 8.0;
    pub const ENEMY_HP: i32 = 3;
    pub const CHASER_SPEED: f32 = 1.5;
    pub const SHOOTER_SPEED: f32 = 0.6;
    pub const SHOOTER_FIRE_TICKS: u32 = 90;
    pub const SHOOTER_RANGE: f32 = 110.0;
    pub const ENEMY_BULLET_SPEED: f32 = 2.5;
    pub const WANDERER_SPEED: f32 = 0.9;
    pub const WANDERER_JITTER: f32 = 1.2;
    pub const SWARM_SPEED: f32 = 2.2;
    /// Distance beyond the screen half-extent at which enemies are culled
    pub const ENEMY_CULL_MARGIN: f32 = 256.0;

    /// Spawner
    pub const SPAWN_RADIUS: f32 = 180.0;
    pub const SPAWN_INTERVAL_BASE: u32 = 30;
    pub const SPAWN_INTERVAL_STEP: u32 = 2;
    pub const SPAWN_INTERVAL_MIN: u32 = 10;
    pub const RING_EVENT_TICKS: u32 = 1200;
    pub const RING_SIZE: u32 = 8;
    pub const RING_RADIUS: f32 = 150.0;
    pub const WAVE_EVENT_TICKS: u32 = 1800;
    pub const WAVE_SIZE: u32 = 12;
    pub const WAVE_DISTANCE: f32 = 260.0;
    pub const WAVE_SPACING: f32 = 12.0;
    pub const WAVE_DEPTH: f32 = 24.0;
    pub const WAVE_SPREAD: f32 = 0.2;

    /// Experience tokens
    pub const TOKEN_SIZE: f32 = 2.0;
    pub const TOKEN_ATTRACT_RADIUS: f32 = 40.0;
    pub const TOKEN_ATTRACT_SPEED: f32 = 3.0;

    /// Orbiting satellites
    pub const SATELLITE_ORBIT: f32 = 24.0;
    pub const SATELLITE_SPEED: f32 = 0.08;
    pub const SATELLITE_RADIUS: f32 = 3.0;
    pub const MAX_SATELLITES: u32 = 6;

    /// Electric field
    pub const FIELD_RADIUS: f32 = 40.0;
    pub const FIELD_CHARGE_TICKS: u32 = 120;
    pub const FIELD_ACTIVE_TICKS: u32 = 20;
    pub const FIELD_DAMAGE: i32 = 1;

    /// Movement upgrade
    pub const SPEED_STEP: f32 = 0.2;
    pub const SPEED_CAP: f32 = 2.0;
    /// Max-hp upgrade
    pub const MAX_HP_STEP: i32 = 2;

    /// Experience granted by the debug key
    pub const DEBUG_EXP_GRANT: u32 = 10;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector from `from` toward `to` (zero if they coincide)
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Convert a world position to screen space with the camera centered on `camera`
#[inline]
pub fn world_to_screen(world: Vec2, camera: Vec2) -> Vec2 {
    world - camera + Vec2::splat(consts::SCREEN_CENTER)
}
