//! Abstract drawing surface
//!
//! The host runtime owns pixels and fonts; the game only issues primitive
//! draw calls against a [`Canvas`]. [`CommandBuffer`] records those calls so
//! frames can be inspected in tests or dumped as JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Indexed palette color (16 entries, host decides the actual RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8);

impl Color {
    pub const BLACK: Color = Color(0);
    pub const NAVY: Color = Color(1);
    pub const PURPLE: Color = Color(2);
    pub const GREEN: Color = Color(3);
    pub const BROWN: Color = Color(4);
    pub const DARK_BLUE: Color = Color(5);
    pub const LIGHT_BLUE: Color = Color(6);
    pub const WHITE: Color = Color(7);
    pub const RED: Color = Color(8);
    pub const ORANGE: Color = Color(9);
    pub const YELLOW: Color = Color(10);
    pub const LIME: Color = Color(11);
    pub const CYAN: Color = Color(12);
    pub const GRAY: Color = Color(13);
    pub const PINK: Color = Color(14);
    pub const PEACH: Color = Color(15);
}

/// Glyph advance used when the host does not measure text
pub const DEFAULT_GLYPH_WIDTH: f32 = 4.0;

/// Primitive draw operations the game needs from the host
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    fn circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Filled rectangle with its top-left corner at `origin`
    fn rect(&mut self, origin: Vec2, size: Vec2, color: Color);

    fn line(&mut self, from: Vec2, to: Vec2, color: Color);

    fn text(&mut self, pos: Vec2, text: &str, color: Color);

    /// Rendered width of a string in pixels
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * DEFAULT_GLYPH_WIDTH
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    Text {
        pos: Vec2,
        text: String,
        color: Color,
    },
}

/// Canvas that records every call in order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame, keeping the allocation
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All recorded text strings, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

impl Canvas for CommandBuffer {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear { color });
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect {
            origin,
            size,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut buf = CommandBuffer::new();
        buf.clear(Color::BLACK);
        buf.circle(Vec2::new(1.0, 2.0), 3.0, Color::RED);
        buf.text(Vec2::ZERO, "hi", Color::WHITE);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.commands[0], DrawCommand::Clear { color: Color::BLACK });
        assert!(buf.contains_text("hi"));

        buf.reset();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_default_text_width() {
        let buf = CommandBuffer::new();
        assert_eq!(buf.text_width("GAME OVER"), 36.0);
        assert_eq!(buf.text_width(""), 0.0);
    }

    #[test]
    fn test_commands_serialize_tagged() {
        let cmd = DrawCommand::Line {
            from: Vec2::ZERO,
            to: Vec2::ONE,
            color: Color::CYAN,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"op\":\"line\""));
        let back: DrawCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}
