use sdl2::pixels::Color;

// Shared palette, paper-and-ink theme
pub const PAPER: Color = Color::RGB(250, 245, 230);
pub const PAPER_HOVER: Color = Color::RGB(255, 250, 240);
pub const INK: Color = Color::RGB(20, 20, 40);
pub const SKY: Color = Color::RGB(135, 206, 235);
pub const GROUND_BLUE: Color = Color::RGB(40, 65, 95);
pub const GOLD: Color = Color::RGB(255, 215, 0);
pub const GATE_RED: Color = Color::RGB(200, 50, 50);
pub const TUMBLER_RED: Color = Color::RGB(220, 20, 60);

/// Immutable screen context shared by every screen and mini-game.
///
/// Screen size and the ground band are decided once in `main` and passed
/// by reference everywhere, instead of living in module-level globals.
#[derive(Debug, Clone, Copy)]
pub struct GameContext {
    pub width: u32,
    pub height: u32,
    /// Top edge of the ground band used by the runner and the menus.
    pub ground_y: i32,
}

impl GameContext {
    pub fn new(width: u32, height: u32) -> Self {
        let ground_height = (height as f32 * 0.05) as u32;
        GameContext {
            width,
            height,
            ground_y: (height - ground_height) as i32,
        }
    }
}

/// A playable character. The id doubles as the portrait file name
/// (`assets/faces/face_<id>.png`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub id: &'static str,
    pub label: &'static str,
}

pub const ROSTER: [Character; 2] = [
    Character {
        id: "aki",
        label: "PLAY AS AKI",
    },
    Character {
        id: "yuki",
        label: "PLAY AS YUKI",
    },
];
