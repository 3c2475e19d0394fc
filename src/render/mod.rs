//! Draw commands for the canvas games
//!
//! Games never paint. Each frame is a flat list of primitives in canvas
//! pixels, painted in order by whatever surface the host owns.

mod scenes;

pub use scenes::{CHECKERS_CELL, checkers_frame, runner_frame, shooter_frame, slingshot_frame};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Rect;

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);

    /// Opaque color from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 255,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// CSS color string for a 2D canvas context
    pub fn css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                self.a as f32 / 255.0
            )
        }
    }
}

/// One painting primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear(Color),
    Rect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        width: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    /// Text anchored at its baseline center
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
    },
}

/// Everything needed to paint one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Rect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeRect { rect, color, width });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            width,
        });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.into(),
            size,
            color,
        });
    }

    /// Full-surface message used when a game cannot run
    pub fn unavailable(width: f32, height: f32, message: &str) -> Self {
        let mut frame = Self::new(width, height);
        frame.clear(Color::hex(0x1f2937));
        frame.text(
            Vec2::new(width / 2.0, height / 2.0),
            message,
            16.0,
            Color::hex(0x9ca3af),
        );
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_colors() {
        assert_eq!(Color::hex(0x4caf50).css(), "#4caf50");
        assert_eq!(Color::BLACK.with_alpha(0).css(), "rgba(0, 0, 0, 0.000)");
    }

    #[test]
    fn test_unavailable_frame_has_message() {
        let frame = Frame::unavailable(300.0, 200.0, "unavailable");
        assert!(matches!(frame.commands[0], DrawCommand::Clear(_)));
        assert!(frame.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "unavailable"
        )));
    }
}
