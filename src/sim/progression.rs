//! Score levels, experience thresholds and the skill catalog
//!
//! Score and experience are separate counters. Score drives the level (and
//! through it the spawn rate); experience is a running total compared against
//! a rising bar, never reset when a skill is granted.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Maximum number of skills offered at once
pub const OFFER_SIZE: usize = 3;

/// `5·n² + 15·n`, shared by the level curve and the skill thresholds
#[inline]
pub fn progression_curve(n: u32) -> u32 {
    5 * n * n + 15 * n
}

/// Smallest level `L ≥ 1` such that `score < 5·L² + 15·L`
pub fn level_for_score(score: u32) -> u32 {
    let mut level = 1;
    while score >= progression_curve(level) {
        level += 1;
    }
    level
}

/// Experience needed for upgrade number `n` (1-based)
#[inline]
pub fn skill_threshold(n: u32) -> u32 {
    progression_curve(n)
}

/// Ticks between periodic spawns at the given level
pub fn spawn_interval(level: u32, tuning: &Tuning) -> u32 {
    tuning
        .spawn_interval_base
        .saturating_sub(level.saturating_mul(tuning.spawn_interval_step))
        .max(tuning.spawn_interval_min)
}

/// Passive upgrades the player can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// Add one orbiting satellite
    Satellite,
    /// Shorten the fire cooldown
    RapidFire,
    /// Restore hp to max
    Heal,
    /// Move faster
    Swift,
    /// Pulsing area-damage field
    ElectricField,
    /// Player bullets steer toward enemies
    Homing,
    /// Raise max hp
    Vitality,
}

impl SkillKind {
    /// Full catalog in offer order
    pub const ALL: [SkillKind; 7] = [
        SkillKind::Satellite,
        SkillKind::RapidFire,
        SkillKind::Heal,
        SkillKind::Swift,
        SkillKind::ElectricField,
        SkillKind::Homing,
        SkillKind::Vitality,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SkillKind::Satellite => "Satellite",
            SkillKind::RapidFire => "Rapid Fire",
            SkillKind::Heal => "Heal",
            SkillKind::Swift => "Swift",
            SkillKind::ElectricField => "Electric Field",
            SkillKind::Homing => "Homing",
            SkillKind::Vitality => "Vitality",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SkillKind::Satellite => "Orbiting shard destroys enemies",
            SkillKind::RapidFire => "Shorter fire cooldown",
            SkillKind::Heal => "Restore HP to max",
            SkillKind::Swift => "Move 20% faster",
            SkillKind::ElectricField => "Pulsing field damages nearby foes",
            SkillKind::Homing => "Bullets seek enemies",
            SkillKind::Vitality => "+2 max HP",
        }
    }

    /// Whether this skill may still be offered
    pub fn is_eligible(&self, state: &GameState) -> bool {
        let player = &state.player;
        let tuning = &state.tuning;
        match self {
            SkillKind::Satellite => (state.satellites.len() as u32) < tuning.max_satellites,
            SkillKind::RapidFire => player.fire_cooldown_base > tuning.fire_cooldown_floor,
            SkillKind::Heal => player.hp < player.max_hp,
            SkillKind::Swift => player.upgrades.speed_multiplier < tuning.speed_cap,
            SkillKind::ElectricField => !player.upgrades.field.enabled,
            SkillKind::Homing => !player.upgrades.homing,
            SkillKind::Vitality => player.max_hp < tuning.player_max_hp_cap,
        }
    }
}

/// Sample up to three distinct eligible skills
pub fn roll_offer(state: &mut GameState) -> Vec<SkillKind> {
    let eligible: Vec<SkillKind> = {
        let view: &GameState = state;
        SkillKind::ALL
            .iter()
            .copied()
            .filter(|skill| skill.is_eligible(view))
            .collect()
    };
    eligible
        .choose_multiple(&mut state.rng, OFFER_SIZE)
        .copied()
        .collect()
}

/// Apply a skill's effect once
pub fn apply_skill(state: &mut GameState, skill: SkillKind) {
    let tuning = state.tuning.clone();
    match skill {
        SkillKind::Satellite => state.add_satellite(),
        SkillKind::RapidFire => {
            let player = &mut state.player;
            player.fire_cooldown_base = player
                .fire_cooldown_base
                .saturating_sub(tuning.rapid_fire_step)
                .max(tuning.fire_cooldown_floor);
        }
        SkillKind::Heal => state.player.hp = state.player.max_hp,
        SkillKind::Swift => {
            let upgrades = &mut state.player.upgrades;
            upgrades.speed_multiplier =
                (upgrades.speed_multiplier + tuning.speed_step).min(tuning.speed_cap);
        }
        SkillKind::ElectricField => {
            state.player.upgrades.field.enabled = true;
            state.player.upgrades.field.charge = 0;
            state.player.upgrades.field.active_ticks = 0;
        }
        SkillKind::Homing => state.player.upgrades.homing = true,
        SkillKind::Vitality => {
            let player = &mut state.player;
            player.max_hp = (player.max_hp + tuning.max_hp_step).min(tuning.player_max_hp_cap);
            player.hp = (player.hp + tuning.max_hp_step).min(player.max_hp);
        }
    }
    state.skills_taken.push(skill);
}

/// Recompute the level from the score, emitting an event when it rises
pub fn update_level(state: &mut GameState) {
    let level = level_for_score(state.player.score);
    if level != state.player.level {
        log::info!("Level {} -> {} (score {})", state.player.level, level, state.player.score);
        state.player.level = level;
        state.events.push(GameEvent::LevelUp { level });
    }
}

/// Check the experience threshold; returns true if a skill offer was opened.
///
/// With nothing eligible the upgrade counter advances without pausing.
pub fn check_skill_threshold(state: &mut GameState) -> bool {
    if state.player.experience < state.next_skill_threshold() {
        return false;
    }

    let offer = roll_offer(state);
    if offer.is_empty() {
        log::info!(
            "Skill threshold {} reached with nothing eligible; skipping offer",
            state.next_skill_threshold()
        );
        state.skills_granted += 1;
        return false;
    }

    log::info!(
        "Skill offer at {} exp: {:?}",
        state.player.experience,
        offer.iter().map(SkillKind::name).collect::<Vec<_>>()
    );
    state.events.push(GameEvent::SkillOffered {
        options: offer.clone(),
    });
    state.skill_offer = offer;
    true
}

/// Apply the chosen offer entry and advance the threshold.
///
/// Returns the applied skill, or `None` if the index is not on offer.
pub fn choose_skill(state: &mut GameState, index: usize) -> Option<SkillKind> {
    let Some(&skill) = state.skill_offer.get(index) else {
        log::warn!(
            "Ignoring skill index {} (only {} on offer)",
            index,
            state.skill_offer.len()
        );
        return None;
    };

    apply_skill(state, skill);
    state.skills_granted += 1;
    state.skill_offer.clear();
    log::info!(
        "Skill chosen: {} (next threshold {})",
        skill.name(),
        state.next_skill_threshold()
    );
    state.events.push(GameEvent::SkillChosen { skill });
    Some(skill)
}
