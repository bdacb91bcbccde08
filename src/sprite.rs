use crate::collision::PixelMask;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture};
use sdl2::video::Window;

/// A drawable image that always has *something* to show.
///
/// Either a real texture (with the alpha mask read from its pixels) or a
/// flat-colored placeholder of the same target size. Mini-games never need
/// to know which one they got.
pub struct Sprite<'a> {
    texture: Option<Texture<'a>>,
    pub width: u32,
    pub height: u32,
    fallback_color: Color,
    mask: PixelMask,
}

impl<'a> Sprite<'a> {
    pub fn textured(texture: Texture<'a>, width: u32, height: u32, mask: PixelMask) -> Self {
        Sprite {
            texture: Some(texture),
            width,
            height,
            fallback_color: Color::RGB(255, 0, 255),
            mask,
        }
    }

    /// Flat-colored stand-in for a missing or undecodable image. Collides
    /// by its full box.
    pub fn placeholder(color: Color, width: u32, height: u32) -> Self {
        Sprite {
            texture: None,
            width,
            height,
            fallback_color: color,
            mask: PixelMask::filled(width, height),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.texture.is_none()
    }

    pub fn mask(&self) -> &PixelMask {
        &self.mask
    }

    /// Replaces the collision mask, e.g. with a reduced hit region.
    pub fn set_mask(&mut self, mask: PixelMask) {
        self.mask = mask;
    }

    pub fn render(&self, canvas: &mut Canvas<Window>, x: i32, y: i32) -> Result<(), String> {
        self.render_to(canvas, Rect::new(x, y, self.width, self.height))
    }

    pub fn render_to(&self, canvas: &mut Canvas<Window>, dest: Rect) -> Result<(), String> {
        match &self.texture {
            Some(texture) => canvas.copy(texture, None, Some(dest)).map_err(|e| e.to_string()),
            None => {
                canvas.set_draw_color(self.fallback_color);
                canvas.fill_rect(dest)
            }
        }
    }
}
