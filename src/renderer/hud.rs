//! HUD gauges and the SkillSelect / GameOver overlays

use glam::Vec2;

use super::canvas::{Canvas, Color};
use crate::consts::{SCREEN_CENTER, SCREEN_SIZE};
use crate::sim::GameState;

const MARGIN: f32 = 4.0;
const LINE_HEIGHT: f32 = 8.0;
const BAR_HEIGHT: f32 = 4.0;
const HP_BAR_WIDTH: f32 = 60.0;
const FIELD_BAR_WIDTH: f32 = 40.0;

pub const GAUGE_BACK: Color = Color::GRAY;
pub const HP_FILL: Color = Color::GREEN;
pub const EXP_FILL: Color = Color::YELLOW;
pub const FIELD_FILL: Color = Color::LIGHT_BLUE;
pub const TEXT: Color = Color::WHITE;
pub const HIGHLIGHT: Color = Color::YELLOW;
pub const WARNING: Color = Color::RED;
pub const PANEL: Color = Color::BLACK;

/// Horizontal bar filled left to right; a non-finite ratio draws empty
pub fn gauge(canvas: &mut dyn Canvas, origin: Vec2, size: Vec2, ratio: f32, fill: Color) {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    canvas.rect(origin, size, GAUGE_BACK);
    if ratio > 0.0 {
        canvas.rect(origin, Vec2::new(size.x * ratio, size.y), fill);
    }
}

/// Draw `text` horizontally centered on the screen at height `y`
pub fn centered_text(canvas: &mut dyn Canvas, y: f32, text: &str, color: Color) {
    let x = SCREEN_CENTER - canvas.text_width(text) / 2.0;
    canvas.text(Vec2::new(x, y), text, color);
}

pub fn draw_hud(state: &GameState, canvas: &mut dyn Canvas) {
    let player = &state.player;

    gauge(
        canvas,
        Vec2::splat(MARGIN),
        Vec2::new(HP_BAR_WIDTH, BAR_HEIGHT),
        player.hp_ratio(),
        HP_FILL,
    );
    canvas.text(
        Vec2::new(MARGIN + HP_BAR_WIDTH + MARGIN, MARGIN - 1.0),
        &format!("HP {}/{}", player.hp, player.max_hp),
        TEXT,
    );

    let score = format!("SCORE {}", player.score);
    let score_x = SCREEN_SIZE - MARGIN - canvas.text_width(&score);
    canvas.text(Vec2::new(score_x, MARGIN), &score, TEXT);
    let level = format!("LV {}", player.level);
    let level_x = SCREEN_SIZE - MARGIN - canvas.text_width(&level);
    canvas.text(Vec2::new(level_x, MARGIN + LINE_HEIGHT), &level, TEXT);

    if player.upgrades.field.enabled {
        gauge(
            canvas,
            Vec2::new(MARGIN, MARGIN + LINE_HEIGHT),
            Vec2::new(FIELD_BAR_WIDTH, BAR_HEIGHT),
            player
                .upgrades
                .field
                .charge_ratio(state.tuning.field_charge_ticks),
            FIELD_FILL,
        );
    }

    let coords = format!("X: {}, Y: {}", player.pos.x as i32, player.pos.y as i32);
    canvas.text(
        Vec2::new(MARGIN, SCREEN_SIZE - MARGIN - BAR_HEIGHT - LINE_HEIGHT),
        &coords,
        TEXT,
    );

    // Experience toward the next skill, full width along the bottom edge
    gauge(
        canvas,
        Vec2::new(0.0, SCREEN_SIZE - BAR_HEIGHT),
        Vec2::new(SCREEN_SIZE, BAR_HEIGHT),
        state.experience_ratio(),
        EXP_FILL,
    );
}

pub fn draw_skill_select(state: &GameState, canvas: &mut dyn Canvas) {
    let rows = state.skill_offer.len() as f32;
    let height = LINE_HEIGHT * (rows * 2.0 + 3.0);
    let top = SCREEN_CENTER - height / 2.0;
    canvas.rect(
        Vec2::new(MARGIN * 4.0, top),
        Vec2::new(SCREEN_SIZE - MARGIN * 8.0, height),
        PANEL,
    );

    centered_text(canvas, top + LINE_HEIGHT, "LEVEL UP! CHOOSE A SKILL", HIGHLIGHT);
    for (i, skill) in state.skill_offer.iter().enumerate() {
        let y = top + LINE_HEIGHT * (i as f32 * 2.0 + 3.0);
        let line = format!("{}: {} - {}", i + 1, skill.name(), skill.description());
        canvas.text(Vec2::new(MARGIN * 6.0, y), &line, TEXT);
    }
}

pub fn draw_game_over(state: &GameState, canvas: &mut dyn Canvas) {
    centered_text(canvas, SCREEN_CENTER - LINE_HEIGHT * 2.0, "GAME OVER", WARNING);
    centered_text(
        canvas,
        SCREEN_CENTER,
        &format!("SCORE {}", state.player.score),
        TEXT,
    );
    centered_text(
        canvas,
        SCREEN_CENTER + LINE_HEIGHT * 2.0,
        "Press 'R' to restart",
        TEXT,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::canvas::{CommandBuffer, DrawCommand};
    use crate::sim::{GamePhase, SkillKind};

    fn rects(buf: &CommandBuffer) -> Vec<(Vec2, Vec2, Color)> {
        buf.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Rect {
                    origin,
                    size,
                    color,
                } => Some((*origin, *size, *color)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_gauge_fill() {
        let mut buf = CommandBuffer::new();
        gauge(&mut buf, Vec2::ZERO, Vec2::new(10.0, 2.0), 0.5, HP_FILL);
        let drawn = rects(&buf);
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[1], (Vec2::ZERO, Vec2::new(5.0, 2.0), HP_FILL));
    }

    #[test]
    fn test_gauge_rejects_bad_ratio() {
        let mut buf = CommandBuffer::new();
        gauge(&mut buf, Vec2::ZERO, Vec2::ONE, f32::NAN, HP_FILL);
        gauge(&mut buf, Vec2::ZERO, Vec2::ONE, -3.0, HP_FILL);
        assert!(rects(&buf).iter().all(|(_, _, c)| *c == GAUGE_BACK));
    }

    #[test]
    fn test_zero_denominator_gauges_draw_empty() {
        let mut state = GameState::new(1);
        state.player.max_hp = 0;
        state.player.upgrades.field.enabled = true;
        state.tuning.field_charge_ticks = 0;

        let mut buf = CommandBuffer::new();
        draw_hud(&state, &mut buf);
        for (origin, size, color) in rects(&buf) {
            assert!(origin.is_finite() && size.is_finite());
            assert_ne!(color, HP_FILL);
            assert_ne!(color, FIELD_FILL);
        }
    }

    #[test]
    fn test_hud_text() {
        let mut state = GameState::new(1);
        state.player.pos = glam::Vec2::new(12.7, -40.2);
        state.player.score = 42;
        let mut buf = CommandBuffer::new();
        draw_hud(&state, &mut buf);
        assert!(buf.contains_text("SCORE 42"));
        assert!(buf.contains_text("LV 1"));
        assert!(buf.contains_text("X: 12, Y: -40"));
        assert!(buf.contains_text("HP 10/10"));
    }

    #[test]
    fn test_skill_select_lists_offer() {
        let mut state = GameState::new(1);
        state.phase = GamePhase::SkillSelect;
        state.skill_offer = vec![SkillKind::Homing, SkillKind::Swift];
        let mut buf = CommandBuffer::new();
        draw_skill_select(&state, &mut buf);
        assert!(buf.contains_text("1: Homing - Bullets seek enemies"));
        assert!(buf.contains_text("2: Swift"));
        assert!(!buf.contains_text("3:"));
    }

    #[test]
    fn test_game_over_is_centered() {
        let mut state = GameState::new(1);
        state.player.score = 7;
        let mut buf = CommandBuffer::new();
        draw_game_over(&state, &mut buf);

        let title = buf.commands.iter().find_map(|cmd| match cmd {
            DrawCommand::Text { pos, text, .. } if text == "GAME OVER" => Some(*pos),
            _ => None,
        });
        // 9 glyphs at 4 px
        assert_eq!(title, Some(Vec2::new(SCREEN_CENTER - 18.0, SCREEN_CENTER - 16.0)));
        assert!(buf.contains_text("Press 'R' to restart"));
        assert!(buf.contains_text("SCORE 7"));
    }
}
