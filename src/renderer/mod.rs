//! Frame drawing against an abstract canvas
//!
//! The host supplies the pixels; this module decides what goes where.

pub mod canvas;
pub mod hud;
pub mod scene;

pub use canvas::{Canvas, Color, CommandBuffer, DrawCommand};
pub use scene::SceneRenderer;
