//! Asset loading with a load-or-placeholder policy.
//!
//! Every image is requested by convention (`assets/faces/face_<id>.png`,
//! `assets/backgrounds/<name>.png`, `assets/sprites/<name>.png`) together
//! with its expected on-screen size. Any failure, file absent or decode
//! error alike, yields a flat-colored placeholder of that size instead of
//! an error. A missing asset must never take a mini-game down.

use crate::collision::PixelMask;
use crate::sprite::Sprite;
use log::warn;
use sdl2::image::LoadSurface;
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::TextureCreator;
use sdl2::surface::Surface;
use sdl2::video::WindowContext;

pub fn face_path(character_id: &str) -> String {
    format!("assets/faces/face_{}.png", character_id)
}

pub fn background_path(name: &str) -> String {
    format!("assets/backgrounds/{}.png", name)
}

pub fn sprite_path(name: &str) -> String {
    format!("assets/sprites/{}.png", name)
}

/// Loads an image scaled to `target_height`, preserving aspect ratio.
///
/// On failure, returns a `target_height` square placeholder in
/// `fallback_color`.
pub fn load_sprite<'a>(
    texture_creator: &'a TextureCreator<WindowContext>,
    path: &str,
    target_height: u32,
    fallback_color: Color,
) -> Sprite<'a> {
    match load_scaled(texture_creator, path, None, target_height) {
        Ok(sprite) => sprite,
        Err(e) => {
            warn!("using placeholder for {}: {}", path, e);
            Sprite::placeholder(fallback_color, target_height, target_height)
        }
    }
}

/// Loads an image stretched to exactly `width` x `height` (backgrounds).
pub fn load_sprite_sized<'a>(
    texture_creator: &'a TextureCreator<WindowContext>,
    path: &str,
    width: u32,
    height: u32,
    fallback_color: Color,
) -> Sprite<'a> {
    match load_scaled(texture_creator, path, Some(width), height) {
        Ok(sprite) => sprite,
        Err(e) => {
            warn!("using placeholder for {}: {}", path, e);
            Sprite::placeholder(fallback_color, width, height)
        }
    }
}

fn load_scaled<'a>(
    texture_creator: &'a TextureCreator<WindowContext>,
    path: &str,
    target_width: Option<u32>,
    target_height: u32,
) -> Result<Sprite<'a>, String> {
    let loaded = Surface::from_file(path)?;
    let source = loaded.convert_format(PixelFormatEnum::RGBA32)?;

    let width = target_width.unwrap_or_else(|| {
        // Preserve aspect ratio against the requested height
        let aspect = source.width() as f32 / source.height() as f32;
        ((target_height as f32 * aspect) as u32).max(1)
    });

    let mut scaled = Surface::new(width, target_height, PixelFormatEnum::RGBA32)?;
    source.blit_scaled(None, &mut scaled, None)?;

    let mask = mask_from_surface(&scaled);
    let texture = texture_creator
        .create_texture_from_surface(&scaled)
        .map_err(|e| e.to_string())?;

    Ok(Sprite::textured(texture, width, target_height, mask))
}

/// Reads the alpha channel of an RGBA32 surface into a collision mask.
fn mask_from_surface(surface: &Surface) -> PixelMask {
    let width = surface.width();
    let height = surface.height();
    let pitch = surface.pitch() as usize;

    surface.with_lock(|pixels: &[u8]| {
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for y in 0..height as usize {
            let row = &pixels[y * pitch..];
            for x in 0..width as usize {
                alpha.push(row[x * 4 + 3]);
            }
        }
        PixelMask::from_alpha(width, height, &alpha)
    })
}
