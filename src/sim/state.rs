//! Game state and core simulation types
//!
//! The driver in `tick.rs` exclusively owns everything here. Satellites do not
//! hold a player reference; their position is derived from the player each
//! time it is needed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::progression::{self, SkillKind};
use crate::tuning::Tuning;
use crate::{polar_to_cartesian, wrap_angle};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen while the player picks one of the offered skills
    SkillSelect,
    /// Run ended; only restart is accepted
    GameOver,
}

/// Enemy variant with its per-variant mutable state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, homes on the player every tick
    Chaser,
    /// Slow, fires at the player when in range
    Shooter { fire_cooldown: u32 },
    /// Slow, heading jitters around the player direction
    Wanderer,
    /// Ballistic formation member; never re-targets
    Swarm { vel: Vec2 },
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Chaser => "chaser",
            EnemyKind::Shooter { .. } => "shooter",
            EnemyKind::Wanderer => "wanderer",
            EnemyKind::Swarm { .. } => "swarm",
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Only field damage reduces this; bullets and satellites kill outright
    pub hp: i32,
    pub kind: EnemyKind,
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    /// Homing is latched when the bullet is created
    Player { homing: bool },
    Enemy,
}

/// A bullet entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: BulletOwner,
}

impl Bullet {
    pub fn is_player_owned(&self) -> bool {
        matches!(self.owner, BulletOwner::Player { .. })
    }
}

/// An experience token dropped by a killed enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpToken {
    pub pos: Vec2,
}

/// A satellite orbiting the player
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Satellite {
    /// Orbital angle in radians, wrapped to [0, 2π)
    pub angle: f32,
}

impl Satellite {
    /// World position around the given player position
    pub fn position(&self, player_pos: Vec2, orbit: f32) -> Vec2 {
        player_pos + polar_to_cartesian(orbit, self.angle)
    }

    /// Advance along the orbit
    pub fn advance(&mut self, angular_speed: f32) {
        self.angle = wrap_angle(self.angle + angular_speed);
    }
}

/// Pulsing area-damage field around the player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectricField {
    pub enabled: bool,
    /// Ticks spent charging since the last discharge
    pub charge: u32,
    /// Remaining discharge ticks (damage is dealt while > 0)
    pub active_ticks: u32,
}

impl ElectricField {
    pub fn is_discharging(&self) -> bool {
        self.enabled && self.active_ticks > 0
    }

    /// Advance the charge/discharge cycle by one tick.
    ///
    /// Returns true if the field deals damage this tick.
    pub fn advance(&mut self, charge_ticks: u32, active_ticks: u32) -> bool {
        if !self.enabled {
            return false;
        }
        if self.active_ticks > 0 {
            self.active_ticks -= 1;
            return true;
        }
        self.charge += 1;
        if self.charge >= charge_ticks {
            self.charge = 0;
            self.active_ticks = active_ticks;
        }
        false
    }

    /// Charge fill ratio in [0, 1] for gauges; 0 when the denominator is unusable
    pub fn charge_ratio(&self, charge_ticks: u32) -> f32 {
        if !self.enabled || charge_ticks == 0 {
            return 0.0;
        }
        if self.active_ticks > 0 {
            return 1.0;
        }
        (self.charge as f32 / charge_ticks as f32).clamp(0.0, 1.0)
    }
}

/// Passive upgrades owned by the player; every flag is always present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upgrades {
    pub homing: bool,
    pub field: ElectricField,
    pub speed_multiplier: f32,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            homing: false,
            field: ElectricField::default(),
            speed_multiplier: 1.0,
        }
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Always within [0, max_hp]
    pub hp: i32,
    pub max_hp: i32,
    /// Remaining invincibility ticks (0 = vulnerable)
    pub invincible_ticks: u32,
    /// Cosmetic blink phase counter
    pub blink_ticks: u32,
    /// Ticks until the weapon can fire again
    pub fire_cooldown: u32,
    /// Cooldown duration before experience reduction; lowered by rapid fire
    pub fire_cooldown_base: u32,
    pub score: u32,
    pub experience: u32,
    pub level: u32,
    pub upgrades: Upgrades,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            hp: tuning.player_max_hp,
            max_hp: tuning.player_max_hp,
            invincible_ticks: 0,
            blink_ticks: 0,
            fire_cooldown: 0,
            fire_cooldown_base: tuning.fire_cooldown_base,
            score: 0,
            experience: 0,
            level: 1,
            upgrades: Upgrades::default(),
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Movement speed after upgrades
    pub fn speed(&self, tuning: &Tuning) -> f32 {
        tuning.player_speed * self.upgrades.speed_multiplier
    }

    /// Fire cooldown duration: the base shrinks with accumulated experience,
    /// never below the floor
    pub fn fire_cooldown_ticks(&self, tuning: &Tuning) -> u32 {
        let shaved = if tuning.exp_per_cooldown_tick == 0 {
            0
        } else {
            self.experience / tuning.exp_per_cooldown_tick
        };
        self.fire_cooldown_base
            .saturating_sub(shaved)
            .max(tuning.fire_cooldown_floor)
    }

    /// Apply damage, clamping at zero. Returns the hp actually removed.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount).clamp(0, self.max_hp);
        before - self.hp
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Health fill ratio in [0, 1]; 0 when max_hp is not positive
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    /// Whether the blink phase hides the player this frame
    pub fn blink_hidden(&self, period: u32) -> bool {
        self.is_invincible() && period > 0 && (self.blink_ticks / period) % 2 == 1
    }
}

/// How an enemy died
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KillCause {
    Bullet,
    Satellite,
    Field,
}

/// Scheduled spawn events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnEvent {
    Ring,
    Wave,
}

/// Notable things that happened during a single tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled {
        id: u32,
        kind: EnemyKind,
        cause: KillCause,
        pos: Vec2,
    },
    PlayerHit {
        damage: i32,
        ranged: bool,
    },
    TokenCollected {
        experience: u32,
    },
    LevelUp {
        level: u32,
    },
    SkillOffered {
        options: Vec<SkillKind>,
    },
    SkillChosen {
        skill: SkillKind,
    },
    EventSpawn {
        event: SpawnEvent,
        count: u32,
    },
    GameOver {
        score: u32,
    },
    Restarted,
}

/// Complete game state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance table, fixed for the lifetime of the state
    pub tuning: Tuning,
    /// The only randomness source for gameplay
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Ticks spent in Playing since the run started
    pub time_ticks: u64,
    /// Ticks since the last periodic spawn
    pub spawn_timer: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub tokens: Vec<ExpToken>,
    pub satellites: Vec<Satellite>,
    /// Upgrades applied so far; the next threshold uses this + 1
    pub skills_granted: u32,
    /// Skills chosen this run, in order
    pub skills_taken: Vec<SkillKind>,
    /// Options on offer while in SkillSelect (at most 3, distinct)
    pub skill_offer: Vec<SkillKind>,
    /// Events produced by the most recent tick.
    ///
    /// `tick` clears this before it runs, so a host that never drains it
    /// still holds at most one tick's worth.
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game state with the given seed and balance table
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Playing,
            time_ticks: 0,
            spawn_timer: 0,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            tokens: Vec::new(),
            satellites: Vec::new(),
            skills_granted: 0,
            skills_taken: Vec::new(),
            skill_offer: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Return everything to its initial values.
    ///
    /// Tuning and the RNG stream carry over; no run statistics do.
    pub fn reset_game(&mut self) {
        let player = Player::new(&self.tuning);
        self.phase = GamePhase::Playing;
        self.time_ticks = 0;
        self.spawn_timer = 0;
        self.player = player;
        self.enemies.clear();
        self.bullets.clear();
        self.tokens.clear();
        self.satellites.clear();
        self.skills_granted = 0;
        self.skills_taken.clear();
        self.skill_offer.clear();
        self.next_id = 1;
        self.events.push(GameEvent::Restarted);
        log::info!("Game reset (seed {})", self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Experience value that triggers the next skill offer
    pub fn next_skill_threshold(&self) -> u32 {
        progression::skill_threshold(self.skills_granted + 1)
    }

    /// Take the events of the most recent tick
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn spawn_enemy(&mut self, pos: Vec2, kind: EnemyKind) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy {
            id,
            pos,
            hp: self.tuning.enemy_hp,
            kind,
        });
        id
    }

    pub fn spawn_bullet(&mut self, pos: Vec2, vel: Vec2, owner: BulletOwner) {
        self.bullets.push(Bullet { pos, vel, owner });
    }

    pub fn spawn_token(&mut self, pos: Vec2) {
        self.tokens.push(ExpToken { pos });
    }

    /// Add a satellite and spread the whole set evenly around the orbit
    pub fn add_satellite(&mut self) {
        self.satellites.push(Satellite { angle: 0.0 });
        let total = self.satellites.len() as f32;
        for (i, sat) in self.satellites.iter_mut().enumerate() {
            sat.angle = std::f32::consts::TAU * i as f32 / total;
        }
    }

    /// Experience progress toward the next threshold in [0, 1]
    pub fn experience_ratio(&self) -> f32 {
        let previous = if self.skills_granted == 0 {
            0
        } else {
            progression::skill_threshold(self.skills_granted)
        };
        let next = self.next_skill_threshold();
        let span = next.saturating_sub(previous);
        if span == 0 {
            return 0.0;
        }
        let into = self.player.experience.saturating_sub(previous);
        (into as f32 / span as f32).clamp(0.0, 1.0)
    }
}
