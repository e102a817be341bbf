//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call per frame)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod movement;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{beyond_margin, circles_touch, on_screen};
pub use progression::{SkillKind, level_for_score, skill_threshold, spawn_interval};
pub use state::{
    Bullet, BulletOwner, ElectricField, Enemy, EnemyKind, ExpToken, GameEvent, GamePhase,
    GameState, KillCause, Player, Satellite, SpawnEvent, Upgrades,
};
pub use tick::{TickInput, tick};
