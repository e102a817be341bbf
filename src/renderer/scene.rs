//! World drawing: background, entities, field and crosshair
//!
//! Everything is drawn camera-centered: the player sits at the screen
//! midpoint and the rest of the world scrolls around it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use super::canvas::{Canvas, Color};
use super::hud;
use crate::consts::{SCREEN_CENTER, SCREEN_SIZE};
use crate::sim::collision::on_screen;
use crate::sim::{BulletOwner, EnemyKind, GamePhase, GameState};
use crate::{polar_to_cartesian, world_to_screen};

/// Spacing of the scrolling background dot grid
const GRID_SPACING: f32 = 16.0;
/// Half-length of each crosshair arm
const CROSSHAIR_SIZE: f32 = 5.0;
/// Segments used to approximate the field ring
const FIELD_RING_SEGMENTS: u32 = 24;
/// Spark bolts drawn per frame while the field discharges
const FIELD_SPARKS: u32 = 6;

pub const BACKGROUND: Color = Color::BLACK;
pub const GRID_DOT: Color = Color::NAVY;
pub const PLAYER: Color = Color::GREEN;
pub const PLAYER_BULLET: Color = Color::YELLOW;
pub const ENEMY_BULLET: Color = Color::RED;
pub const TOKEN: Color = Color::LIME;
pub const SATELLITE: Color = Color::CYAN;
pub const FIELD_RING: Color = Color::DARK_BLUE;
pub const FIELD_SPARK: Color = Color::LIGHT_BLUE;
pub const CROSSHAIR: Color = Color::WHITE;

/// Body color for each enemy variant
pub fn enemy_color(kind: &EnemyKind) -> Color {
    match kind {
        EnemyKind::Chaser => Color::RED,
        EnemyKind::Shooter { .. } => Color::ORANGE,
        EnemyKind::Wanderer => Color::PURPLE,
        EnemyKind::Swarm { .. } => Color::PINK,
    }
}

/// Draws a full frame from a read-only view of the game state.
///
/// Owns its own RNG for cosmetic effects so drawing never perturbs the
/// simulation stream.
pub struct SceneRenderer {
    spark_rng: Pcg32,
}

impl SceneRenderer {
    pub fn new(seed: u64) -> Self {
        Self {
            spark_rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draw the world, the HUD and any phase overlay.
    ///
    /// `pointer` is the mouse position in screen space, if the host has one.
    pub fn render(&mut self, state: &GameState, pointer: Option<Vec2>, canvas: &mut dyn Canvas) {
        canvas.clear(BACKGROUND);
        let camera = state.player.pos;

        draw_background(camera, canvas);
        self.draw_field(state, canvas);
        draw_tokens(state, canvas);
        draw_enemies(state, canvas);
        draw_bullets(state, canvas);
        draw_satellites(state, canvas);
        draw_player(state, canvas);
        if let Some(pointer) = pointer {
            draw_crosshair(pointer, canvas);
        }

        hud::draw_hud(state, canvas);
        match state.phase {
            GamePhase::Playing => {}
            GamePhase::SkillSelect => hud::draw_skill_select(state, canvas),
            GamePhase::GameOver => hud::draw_game_over(state, canvas),
        }
    }

    fn draw_field(&mut self, state: &GameState, canvas: &mut dyn Canvas) {
        let field = &state.player.upgrades.field;
        if !field.enabled {
            return;
        }
        let center = Vec2::splat(SCREEN_CENTER);
        let radius = state.tuning.field_radius;

        for i in 0..FIELD_RING_SEGMENTS {
            let a0 = TAU * i as f32 / FIELD_RING_SEGMENTS as f32;
            let a1 = TAU * (i + 1) as f32 / FIELD_RING_SEGMENTS as f32;
            canvas.line(
                center + polar_to_cartesian(radius, a0),
                center + polar_to_cartesian(radius, a1),
                FIELD_RING,
            );
        }

        if field.is_discharging() && radius > 0.0 {
            for _ in 0..FIELD_SPARKS {
                let angle = self.spark_rng.random_range(0.0..TAU);
                let reach = self.spark_rng.random_range(radius * 0.3..=radius);
                canvas.line(center, center + polar_to_cartesian(reach, angle), FIELD_SPARK);
            }
        }
    }
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Dot grid anchored in world space, so it scrolls as the player moves
fn draw_background(camera: Vec2, canvas: &mut dyn Canvas) {
    let offset = (Vec2::splat(SCREEN_CENTER) - camera).rem_euclid(Vec2::splat(GRID_SPACING));
    let mut y = offset.y;
    while y < SCREEN_SIZE {
        let mut x = offset.x;
        while x < SCREEN_SIZE {
            canvas.rect(Vec2::new(x, y), Vec2::ONE, GRID_DOT);
            x += GRID_SPACING;
        }
        y += GRID_SPACING;
    }
}

fn draw_player(state: &GameState, canvas: &mut dyn Canvas) {
    if state.player.blink_hidden(state.tuning.blink_period_ticks) {
        return;
    }
    canvas.circle(
        Vec2::splat(SCREEN_CENTER),
        state.tuning.player_size / 2.0,
        PLAYER,
    );
}

fn draw_enemies(state: &GameState, canvas: &mut dyn Canvas) {
    let camera = state.player.pos;
    let size = state.tuning.enemy_size;
    for enemy in state.enemies.iter().filter(|e| on_screen(e.pos, camera)) {
        let screen = world_to_screen(enemy.pos, camera);
        canvas.rect(
            screen - Vec2::splat(size / 2.0),
            Vec2::splat(size),
            enemy_color(&enemy.kind),
        );
    }
}

fn draw_bullets(state: &GameState, canvas: &mut dyn Canvas) {
    let camera = state.player.pos;
    let radius = state.tuning.bullet_size / 2.0;
    for bullet in &state.bullets {
        let color = match bullet.owner {
            BulletOwner::Player { .. } => PLAYER_BULLET,
            BulletOwner::Enemy => ENEMY_BULLET,
        };
        canvas.circle(world_to_screen(bullet.pos, camera), radius, color);
    }
}

fn draw_tokens(state: &GameState, canvas: &mut dyn Canvas) {
    let camera = state.player.pos;
    for token in &state.tokens {
        canvas.circle(
            world_to_screen(token.pos, camera),
            state.tuning.token_size,
            TOKEN,
        );
    }
}

fn draw_satellites(state: &GameState, canvas: &mut dyn Canvas) {
    let center = Vec2::splat(SCREEN_CENTER);
    for satellite in &state.satellites {
        canvas.circle(
            satellite.position(center, state.tuning.satellite_orbit),
            state.tuning.satellite_radius,
            SATELLITE,
        );
    }
}

fn draw_crosshair(pointer: Vec2, canvas: &mut dyn Canvas) {
    canvas.line(
        pointer - Vec2::new(CROSSHAIR_SIZE, 0.0),
        pointer + Vec2::new(CROSSHAIR_SIZE, 0.0),
        CROSSHAIR,
    );
    canvas.line(
        pointer - Vec2::new(0.0, CROSSHAIR_SIZE),
        pointer + Vec2::new(0.0, CROSSHAIR_SIZE),
        CROSSHAIR,
    );
}
