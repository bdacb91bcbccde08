//! End-of-game overlay.
//!
//! Every mini-game's terminal states (won, lost) darken the screen and
//! show a big verdict plus the two exits: restart in place, or return to
//! the hub.

use crate::text::draw_text_centered;
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;

#[derive(Debug, Clone)]
pub struct BannerStyle {
    /// Overlay darkness (0-255, higher = darker)
    pub overlay_alpha: u8,
    pub instruction_color: Color,
    pub title_scale: u32,
}

impl Default for BannerStyle {
    fn default() -> Self {
        BannerStyle {
            overlay_alpha: 180,
            instruction_color: Color::RGB(235, 230, 215),
            title_scale: 5,
        }
    }
}

pub struct OutcomeBanner {
    style: BannerStyle,
}

impl OutcomeBanner {
    pub fn new() -> Self {
        OutcomeBanner {
            style: BannerStyle::default(),
        }
    }

    /// Draws the overlay with a verdict and two instruction lines.
    pub fn render(
        &self,
        canvas: &mut Canvas<Window>,
        title: &str,
        title_color: Color,
        restart_line: &str,
        return_line: &str,
    ) -> Result<(), String> {
        canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
        canvas.set_draw_color(Color::RGBA(0, 0, 0, self.style.overlay_alpha));
        canvas.fill_rect(None)?;
        canvas.set_blend_mode(sdl2::render::BlendMode::None);

        let (screen_width, screen_height) = canvas.logical_size();
        let center_x = (screen_width / 2) as i32;
        let center_y = (screen_height / 2) as i32;

        draw_text_centered(
            canvas,
            title,
            center_x,
            center_y - 50,
            title_color,
            self.style.title_scale,
        )?;
        draw_text_centered(
            canvas,
            restart_line,
            center_x,
            center_y + 30,
            self.style.instruction_color,
            2,
        )?;
        draw_text_centered(
            canvas,
            return_line,
            center_x,
            center_y + 60,
            self.style.instruction_color,
            2,
        )
    }
}

impl Default for OutcomeBanner {
    fn default() -> Self {
        Self::new()
    }
}
