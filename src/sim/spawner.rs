//! Enemy creation: the periodic trickle plus ring and wave events
//!
//! All positions are relative to the player at the moment of spawning. The
//! shared RNG in [`GameState`] is the only source of randomness.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{FRAC_1_SQRT_2, TAU};

use super::progression::spawn_interval;
use super::state::{EnemyKind, GameEvent, GameState, SpawnEvent};
use crate::{direction_to, polar_to_cartesian};

/// Diagonals a wave can arrive along
const WAVE_DIAGONALS: [Vec2; 4] = [
    Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
];

/// Advance the spawn timer and fire any periodic or scheduled spawns
pub fn update(state: &mut GameState) {
    state.spawn_timer += 1;
    if state.spawn_timer >= spawn_interval(state.player.level, &state.tuning) {
        spawn_random_enemy(state);
        state.spawn_timer = 0;
    }

    let ticks = state.time_ticks;
    let ring_every = state.tuning.ring_event_ticks as u64;
    if ring_every > 0 && ticks > 0 && ticks % ring_every == 0 {
        spawn_ring(state);
    }
    let wave_every = state.tuning.wave_event_ticks as u64;
    if wave_every > 0 && ticks > 0 && ticks % wave_every == 0 {
        spawn_wave(state);
    }
}

/// Pick one of the non-swarm variants uniformly
fn random_variant(state: &mut GameState) -> EnemyKind {
    match state.rng.random_range(0..3) {
        0 => EnemyKind::Chaser,
        1 => EnemyKind::Shooter {
            fire_cooldown: state.tuning.shooter_fire_ticks,
        },
        _ => EnemyKind::Wanderer,
    }
}

/// One enemy at a random angle on the spawn circle
pub fn spawn_random_enemy(state: &mut GameState) -> u32 {
    let angle = state.rng.random_range(0.0..TAU);
    let pos = state.player.pos + polar_to_cartesian(state.tuning.spawn_radius, angle);
    let kind = random_variant(state);
    let id = state.spawn_enemy(pos, kind);
    log::debug!("Spawned {} #{} at ({:.1}, {:.1})", kind.name(), id, pos.x, pos.y);
    id
}

/// Wanderers spaced evenly on a circle around the player
pub fn spawn_ring(state: &mut GameState) {
    let count = state.tuning.ring_size;
    let radius = state.tuning.ring_radius;
    if count == 0 {
        return;
    }
    let center = state.player.pos;
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32;
        state.spawn_enemy(center + polar_to_cartesian(radius, angle), EnemyKind::Wanderer);
    }
    log::info!("Ring event: {} wanderers at radius {}", count, radius);
    state.events.push(GameEvent::EventSpawn {
        event: SpawnEvent::Ring,
        count,
    });
}

/// A band of ballistic swarm enemies arriving from one diagonal.
///
/// Each member aims at the player's current position with a bounded random
/// angular spread, so the band arrives as a loose front.
pub fn spawn_wave(state: &mut GameState) {
    let count = state.tuning.wave_size;
    if count == 0 {
        return;
    }
    let tuning = state.tuning.clone();
    let diagonal = WAVE_DIAGONALS[state.rng.random_range(0..WAVE_DIAGONALS.len())];
    let lateral = diagonal.perp();
    let target = state.player.pos;
    let anchor = target + diagonal * tuning.wave_distance;
    let half_width = (count as f32 - 1.0) / 2.0;

    for i in 0..count {
        let along = (i as f32 - half_width) * tuning.wave_spacing;
        let depth = if tuning.wave_depth > 0.0 {
            state.rng.random_range(0.0..tuning.wave_depth)
        } else {
            0.0
        };
        let pos = anchor + lateral * along + diagonal * depth;

        let spread = if tuning.wave_spread > 0.0 {
            state.rng.random_range(-tuning.wave_spread..tuning.wave_spread)
        } else {
            0.0
        };
        let heading = Vec2::from_angle(spread).rotate(direction_to(pos, target));
        state.spawn_enemy(
            pos,
            EnemyKind::Swarm {
                vel: heading * tuning.swarm_speed,
            },
        );
    }
    log::info!(
        "Wave event: {} swarm enemies from ({:.2}, {:.2})",
        count,
        diagonal.x,
        diagonal.y
    );
    state.events.push(GameEvent::EventSpawn {
        event: SpawnEvent::Wave,
        count,
    });
}
