//! Paper-box buttons for the pointer-driven menus.

use crate::context;
use crate::sprite::Sprite;
use crate::text::{draw_text_centered, text_height};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

#[derive(Debug, Clone)]
pub struct ButtonStyle {
    pub fill: Color,
    pub hover_fill: Color,
    pub border: Color,
    pub text_color: Color,
    pub text_scale: u32,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        ButtonStyle {
            fill: context::PAPER,
            hover_fill: context::PAPER_HOVER,
            border: context::INK,
            text_color: context::INK,
            text_scale: 2,
        }
    }
}

/// A labeled box the pointer can hover and click. Large character buttons
/// carry a portrait above the label; plain buttons center the label.
pub struct Button {
    pub rect: Rect,
    label: String,
    style: ButtonStyle,
}

impl Button {
    pub fn new(rect: Rect, label: &str) -> Self {
        Button {
            rect,
            label: label.to_string(),
            style: ButtonStyle::default(),
        }
    }

    #[allow(dead_code)] // Reserved for non-paper themed screens
    pub fn with_style(rect: Rect, label: &str, style: ButtonStyle) -> Self {
        Button {
            rect,
            label: label.to_string(),
            style,
        }
    }

    /// Pointer hit-test in logical screen coordinates.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rect.contains_point((x, y))
    }

    pub fn render(
        &self,
        canvas: &mut Canvas<Window>,
        hovered: bool,
        portrait: Option<&Sprite>,
    ) -> Result<(), String> {
        let fill = if hovered {
            self.style.hover_fill
        } else {
            self.style.fill
        };
        canvas.set_draw_color(fill);
        canvas.fill_rect(self.rect)?;

        // Double border reads as a card outline
        canvas.set_draw_color(self.style.border);
        canvas.draw_rect(self.rect)?;
        canvas.draw_rect(Rect::new(
            self.rect.x() + 2,
            self.rect.y() + 2,
            self.rect.width() - 4,
            self.rect.height() - 4,
        ))?;

        let center_x = self.rect.x() + self.rect.width() as i32 / 2;
        let label_height = text_height(self.style.text_scale) as i32;

        if let Some(portrait) = portrait {
            let portrait_x = center_x - portrait.width as i32 / 2;
            let portrait_y = self.rect.y() + 12;
            portrait.render(canvas, portrait_x, portrait_y)?;

            draw_text_centered(
                canvas,
                &self.label,
                center_x,
                self.rect.y() + self.rect.height() as i32 - label_height - 12,
                self.style.text_color,
                self.style.text_scale,
            )
        } else {
            draw_text_centered(
                canvas,
                &self.label,
                center_x,
                self.rect.y() + (self.rect.height() as i32 - label_height) / 2,
                self.style.text_color,
                self.style.text_scale,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_respects_bounds() {
        let button = Button::new(Rect::new(100, 50, 200, 80), "PLAY");

        assert!(button.contains(100, 50));
        assert!(button.contains(250, 100));
        assert!(!button.contains(99, 50));
        assert!(!button.contains(150, 131));
    }
}
