//! Data-driven game balance
//!
//! [`Tuning`] mirrors the balance constants in [`crate::consts`]. A host may
//! load a partial JSON document at startup; missing keys keep their defaults.
//! The table is fixed for the lifetime of a [`crate::sim::GameState`].

use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{TuningError, TuningResult};

/// Balance table read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // ── Player ───────────────────────────────────────────────────────────────
    pub player_size: f32,
    pub player_speed: f32,
    pub player_max_hp: i32,
    pub player_max_hp_cap: i32,
    pub invincible_ticks: u32,
    pub blink_period_ticks: u32,
    pub melee_damage: i32,
    pub ranged_damage: i32,

    // ── Player weapon ────────────────────────────────────────────────────────
    pub fire_cooldown_base: u32,
    pub fire_cooldown_floor: u32,
    pub exp_per_cooldown_tick: u32,
    pub rapid_fire_step: u32,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    pub homing_range: f32,
    pub homing_blend: f32,

    // ── Enemies ──────────────────────────────────────────────────────────────
    pub enemy_size: f32,
    pub enemy_hp: i32,
    pub chaser_speed: f32,
    pub shooter_speed: f32,
    pub shooter_fire_ticks: u32,
    pub shooter_range: f32,
    pub enemy_bullet_speed: f32,
    pub wanderer_speed: f32,
    pub wanderer_jitter: f32,
    pub swarm_speed: f32,
    pub enemy_cull_margin: f32,

    // ── Spawner ──────────────────────────────────────────────────────────────
    pub spawn_radius: f32,
    pub spawn_interval_base: u32,
    pub spawn_interval_step: u32,
    pub spawn_interval_min: u32,
    /// Ticks between ring events (0 disables)
    pub ring_event_ticks: u32,
    pub ring_size: u32,
    pub ring_radius: f32,
    /// Ticks between wave events (0 disables)
    pub wave_event_ticks: u32,
    pub wave_size: u32,
    pub wave_distance: f32,
    pub wave_spacing: f32,
    pub wave_depth: f32,
    pub wave_spread: f32,

    // ── Experience tokens ────────────────────────────────────────────────────
    pub token_size: f32,
    pub token_attract_radius: f32,
    pub token_attract_speed: f32,

    // ── Satellites ───────────────────────────────────────────────────────────
    pub satellite_orbit: f32,
    pub satellite_speed: f32,
    pub satellite_radius: f32,
    pub max_satellites: u32,

    // ── Electric field ───────────────────────────────────────────────────────
    pub field_radius: f32,
    pub field_charge_ticks: u32,
    pub field_active_ticks: u32,
    pub field_damage: i32,

    // ── Upgrades / debug ─────────────────────────────────────────────────────
    pub speed_step: f32,
    pub speed_cap: f32,
    pub max_hp_step: i32,
    pub debug_exp_grant: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_max_hp: PLAYER_MAX_HP,
            player_max_hp_cap: PLAYER_MAX_HP_CAP,
            invincible_ticks: INVINCIBLE_TICKS,
            blink_period_ticks: BLINK_PERIOD_TICKS,
            melee_damage: MELEE_DAMAGE,
            ranged_damage: RANGED_DAMAGE,

            fire_cooldown_base: FIRE_COOLDOWN_BASE,
            fire_cooldown_floor: FIRE_COOLDOWN_FLOOR,
            exp_per_cooldown_tick: EXP_PER_COOLDOWN_TICK,
            rapid_fire_step: RAPID_FIRE_STEP,
            bullet_speed: BULLET_SPEED,
            bullet_size: BULLET_SIZE,
            homing_range: HOMING_RANGE,
            homing_blend: HOMING_BLEND,

            enemy_size: ENEMY_SIZE,
            enemy_hp: ENEMY_HP,
            chaser_speed: CHASER_SPEED,
            shooter_speed: SHOOTER_SPEED,
            shooter_fire_ticks: SHOOTER_FIRE_TICKS,
            shooter_range: SHOOTER_RANGE,
            enemy_bullet_speed: ENEMY_BULLET_SPEED,
            wanderer_speed: WANDERER_SPEED,
            wanderer_jitter: WANDERER_JITTER,
            swarm_speed: SWARM_SPEED,
            enemy_cull_margin: ENEMY_CULL_MARGIN,

            spawn_radius: SPAWN_RADIUS,
            spawn_interval_base: SPAWN_INTERVAL_BASE,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            ring_event_ticks: RING_EVENT_TICKS,
            ring_size: RING_SIZE,
            ring_radius: RING_RADIUS,
            wave_event_ticks: WAVE_EVENT_TICKS,
            wave_size: WAVE_SIZE,
            wave_distance: WAVE_DISTANCE,
            wave_spacing: WAVE_SPACING,
            wave_depth: WAVE_DEPTH,
            wave_spread: WAVE_SPREAD,

            token_size: TOKEN_SIZE,
            token_attract_radius: TOKEN_ATTRACT_RADIUS,
            token_attract_speed: TOKEN_ATTRACT_SPEED,

            satellite_orbit: SATELLITE_ORBIT,
            satellite_speed: SATELLITE_SPEED,
            satellite_radius: SATELLITE_RADIUS,
            max_satellites: MAX_SATELLITES,

            field_radius: FIELD_RADIUS,
            field_charge_ticks: FIELD_CHARGE_TICKS,
            field_active_ticks: FIELD_ACTIVE_TICKS,
            field_damage: FIELD_DAMAGE,

            speed_step: SPEED_STEP,
            speed_cap: SPEED_CAP,
            max_hp_step: MAX_HP_STEP,
            debug_exp_grant: DEBUG_EXP_GRANT,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json_str(json: &str) -> TuningResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> TuningResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> TuningResult<()> {
        let positive = [
            ("player_size", self.player_size),
            ("player_speed", self.player_speed),
            ("bullet_speed", self.bullet_speed),
            ("bullet_size", self.bullet_size),
            ("enemy_size", self.enemy_size),
            ("chaser_speed", self.chaser_speed),
            ("shooter_speed", self.shooter_speed),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("wanderer_speed", self.wanderer_speed),
            ("swarm_speed", self.swarm_speed),
            ("spawn_radius", self.spawn_radius),
            ("token_size", self.token_size),
            ("satellite_orbit", self.satellite_orbit),
            ("satellite_radius", self.satellite_radius),
            ("field_radius", self.field_radius),
            ("speed_step", self.speed_step),
            ("speed_cap", self.speed_cap),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(reject(field, value, "must be a positive finite number"));
            }
        }

        let non_negative = [
            ("homing_range", self.homing_range),
            ("shooter_range", self.shooter_range),
            ("enemy_cull_margin", self.enemy_cull_margin),
            ("ring_radius", self.ring_radius),
            ("wave_distance", self.wave_distance),
            ("wave_spacing", self.wave_spacing),
            ("token_attract_radius", self.token_attract_radius),
            ("token_attract_speed", self.token_attract_speed),
            ("satellite_speed", self.satellite_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(reject(field, value, "must be a finite number >= 0"));
            }
        }

        // Sampled as symmetric ranges; anything past a half turn is meaningless
        let angles = [
            ("wanderer_jitter", self.wanderer_jitter),
            ("wave_spread", self.wave_spread),
        ];
        for (field, value) in angles {
            if !(0.0..=PI).contains(&value) {
                return Err(reject(field, value, "must be an angle in [0, pi]"));
            }
        }
        if !(0.0..=self.wave_distance).contains(&self.wave_depth) {
            return Err(reject(
                "wave_depth",
                self.wave_depth,
                "must be in [0, wave_distance]",
            ));
        }
        if !(0.0..=1.0).contains(&self.homing_blend) {
            return Err(reject(
                "homing_blend",
                self.homing_blend,
                "must be in [0, 1]",
            ));
        }

        let at_least_one = [
            ("player_max_hp", self.player_max_hp),
            ("enemy_hp", self.enemy_hp),
            ("field_damage", self.field_damage),
            ("max_hp_step", self.max_hp_step),
        ];
        for (field, value) in at_least_one {
            if value < 1 {
                return Err(reject(field, value, "must be at least 1"));
            }
        }
        let damage = [
            ("melee_damage", self.melee_damage),
            ("ranged_damage", self.ranged_damage),
        ];
        for (field, value) in damage {
            if value < 0 {
                return Err(reject(field, value, "must not be negative"));
            }
        }

        if self.player_max_hp_cap < self.player_max_hp {
            return Err(reject(
                "player_max_hp_cap",
                self.player_max_hp_cap,
                "must not be below player_max_hp",
            ));
        }
        if self.fire_cooldown_floor > self.fire_cooldown_base {
            return Err(reject(
                "fire_cooldown_floor",
                self.fire_cooldown_floor,
                "must not exceed fire_cooldown_base",
            ));
        }
        if self.rapid_fire_step == 0 {
            return Err(reject("rapid_fire_step", 0, "must be at least 1 tick"));
        }
        if self.spawn_interval_min == 0 {
            return Err(reject("spawn_interval_min", 0, "must be at least 1 tick"));
        }
        if self.speed_cap < 1.0 {
            return Err(reject("speed_cap", self.speed_cap, "must be at least 1.0"));
        }
        Ok(())
    }
}

fn reject(
    field: &'static str,
    value: impl std::fmt::Display,
    reason: &'static str,
) -> TuningError {
    log::warn!("Rejected tuning value {} = {} ({})", field, value, reason);
    TuningError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "player_speed": 3.5, "ring_event_ticks": 0 }"#)
            .unwrap();
        assert_eq!(tuning.player_speed, 3.5);
        assert_eq!(tuning.ring_event_ticks, 0);
        assert_eq!(tuning.bullet_speed, BULLET_SPEED);
        assert_eq!(tuning.player_max_hp, PLAYER_MAX_HP);
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let err = Tuning::from_json_str(r#"{ "bullet_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "bullet_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_floor_above_base() {
        let err = Tuning::from_json_str(r#"{ "fire_cooldown_floor": 40 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "fire_cooldown_floor",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Tuning::from_json_str("{ player_speed: }").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    fn rejected_field(json: &str) -> &'static str {
        match Tuning::from_json_str(json) {
            Err(TuningError::Invalid { field, .. }) => field,
            other => panic!("expected an invalid field, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unbounded_random_ranges() {
        assert_eq!(rejected_field(r#"{ "wanderer_jitter": 3e38 }"#), "wanderer_jitter");
        assert_eq!(rejected_field(r#"{ "wanderer_jitter": -0.5 }"#), "wanderer_jitter");
        assert_eq!(rejected_field(r#"{ "wave_spread": 4.0 }"#), "wave_spread");
        assert_eq!(rejected_field(r#"{ "wave_depth": 3e38 }"#), "wave_depth");
        assert_eq!(
            rejected_field(r#"{ "wave_distance": 10.0, "wave_depth": 24.0 }"#),
            "wave_depth"
        );
        let widest = r#"{ "wanderer_jitter": 3.14, "wave_depth": 0.0 }"#;
        assert!(Tuning::from_json_str(widest).is_ok());
    }

    #[test]
    fn test_rejects_steps_that_shrink_the_player() {
        assert_eq!(rejected_field(r#"{ "max_hp_step": -20 }"#), "max_hp_step");
        assert_eq!(rejected_field(r#"{ "max_hp_step": 0 }"#), "max_hp_step");
        assert_eq!(rejected_field(r#"{ "field_damage": 0 }"#), "field_damage");
        assert_eq!(rejected_field(r#"{ "speed_step": -0.2 }"#), "speed_step");
        assert_eq!(rejected_field(r#"{ "rapid_fire_step": 0 }"#), "rapid_fire_step");
        assert_eq!(rejected_field(r#"{ "melee_damage": -3 }"#), "melee_damage");
        assert_eq!(rejected_field(r#"{ "homing_blend": 1.5 }"#), "homing_blend");
    }

    #[test]
    fn test_extreme_jitter_tuning_never_reaches_the_sim() {
        use crate::sim::{EnemyKind, GameState, TickInput, tick};
        use glam::Vec2;

        assert!(Tuning::from_json_str(r#"{ "wanderer_jitter": 3e38 }"#).is_err());

        // The widest accepted jitter still ticks
        let tuning = Tuning::from_json_str(r#"{ "wanderer_jitter": 3.14159 }"#).unwrap();
        let mut state = GameState::with_tuning(1, tuning);
        state.spawn_enemy(Vec2::new(100.0, 0.0), EnemyKind::Wanderer);
        tick(&mut state, &TickInput::default());
        assert!(state.enemies[0].pos.is_finite());
    }

    #[test]
    fn test_vitality_keeps_hp_non_negative() {
        use crate::sim::progression::{SkillKind, apply_skill};
        use crate::sim::GameState;

        let tuning = Tuning::from_json_str(r#"{ "max_hp_step": 1 }"#).unwrap();
        let mut state = GameState::with_tuning(1, tuning);
        apply_skill(&mut state, SkillKind::Vitality);
        assert_eq!(state.player.max_hp, PLAYER_MAX_HP + 1);
        assert!(state.player.hp >= 0 && state.player.hp <= state.player.max_hp);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        assert_eq!(Tuning::from_json_str(&json).unwrap(), Tuning::default());
    }
}
