//! ASCII level loading for the platformer.
//!
//! A level is a fixed grid of characters, parsed row by row exactly once at
//! mini-game entry. Each recognized character spawns one thing at its tile:
//!
//! - `#` solid wall block
//! - `=` platform whose collision box is only the top quarter of the tile
//!   (the player passes through it from below and from the sides)
//! - `P` player spawn
//! - `E` patrolling enemy; its left/right patrol bounds are the contiguous
//!   span of non-solid tiles around it on its row, computed here
//! - `o` collectible
//! - `G` goal
//!
//! Blank and unrecognized characters are skipped. The parsed set is
//! immutable during play; restarting re-parses.

use crate::entity::{Entity, EntityKind};
use sdl2::rect::Rect;

pub const TILE_SIZE: u32 = 32;

/// Height of the collision box a `=` platform exposes at its top edge.
pub const PLATFORM_TOP: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolidKind {
    /// Full block, collides on every side.
    Block,
    /// Thin top surface only; reachable by falling onto it.
    Platform,
}

#[derive(Debug, Clone)]
pub struct Solid {
    pub rect: Rect,
    pub kind: SolidKind,
}

/// An enemy spawn with its precomputed patrol range (pixel x of the left
/// edge at each end of the walkable span).
#[derive(Debug, Clone)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    pub min_x: f32,
    pub max_x: f32,
}

pub struct Level {
    pub solids: Vec<Solid>,
    pub player_spawn: (f32, f32),
    pub enemies: Vec<EnemySpawn>,
    pub collectibles: Vec<Entity>,
    pub goal: Option<Rect>,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Level {
    /// Parses the grid. Rows may have different lengths; short rows read as
    /// blank. A level without a `P` is a programmer error.
    pub fn parse(rows: &[&str]) -> Level {
        let grid: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        let cols = grid.iter().map(|r| r.len()).max().unwrap_or(0);

        let mut solids = Vec::new();
        let mut player_spawn = None;
        let mut enemies = Vec::new();
        let mut collectibles = Vec::new();
        let mut goal = None;

        for (row, line) in grid.iter().enumerate() {
            for (col, &c) in line.iter().enumerate() {
                let px = (col as u32 * TILE_SIZE) as i32;
                let py = (row as u32 * TILE_SIZE) as i32;
                match c {
                    '#' => solids.push(Solid {
                        rect: Rect::new(px, py, TILE_SIZE, TILE_SIZE),
                        kind: SolidKind::Block,
                    }),
                    '=' => solids.push(Solid {
                        rect: Rect::new(px, py, TILE_SIZE, PLATFORM_TOP),
                        kind: SolidKind::Platform,
                    }),
                    'P' => player_spawn = Some((px as f32, py as f32)),
                    'E' => {
                        let (min_col, max_col) = walkable_span(line, col);
                        enemies.push(EnemySpawn {
                            x: px as f32,
                            y: py as f32,
                            min_x: (min_col as u32 * TILE_SIZE) as f32,
                            max_x: (max_col as u32 * TILE_SIZE) as f32,
                        });
                    }
                    'o' => collectibles.push(Entity::new(
                        EntityKind::Collectible,
                        px as f32 + 8.0,
                        py as f32 + 8.0,
                        TILE_SIZE - 16,
                        TILE_SIZE - 16,
                    )),
                    'G' => goal = Some(Rect::new(px, py, TILE_SIZE, TILE_SIZE)),
                    _ => {}
                }
            }
        }

        let player_spawn = player_spawn.expect("level has no player spawn");

        Level {
            solids,
            player_spawn,
            enemies,
            collectibles,
            goal,
            pixel_width: cols as u32 * TILE_SIZE,
            pixel_height: grid.len() as u32 * TILE_SIZE,
        }
    }
}

/// Left/right bounds (inclusive columns) of the contiguous run of
/// non-solid tiles around `col` on this row.
fn walkable_span(line: &[char], col: usize) -> (usize, usize) {
    let is_solid = |c: char| c == '#' || c == '=';

    let mut min_col = col;
    while min_col > 0 && !is_solid(line[min_col - 1]) {
        min_col -= 1;
    }
    let mut max_col = col;
    while max_col + 1 < line.len() && !is_solid(line[max_col + 1]) {
        max_col += 1;
    }
    (min_col, max_col)
}

/// The built-in level. One screen tall, several screens wide.
pub const LEVEL: &[&str] = &[
    "                                                            ",
    "                                                            ",
    "                                                           G",
    "                  o                 o              ====  ###",
    "          ====   ===      o       ====                      ",
    "                         ===             o     o            ",
    "   P            o                 ##    ===   ===     E     ",
    "  ###    o     ===        E      ####                 ##    ",
    "         ==           #######   ######                      ",
    "############   ##############################   ############",
    "############   ##############################   ############",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spawns_one_entity_per_character() {
        let level = Level::parse(&[
            "P o G", //
            "#=#=#",
        ]);

        assert_eq!(level.player_spawn, (0.0, 0.0));
        assert_eq!(level.collectibles.len(), 1);
        assert_eq!(level.collectibles[0].kind, EntityKind::Collectible);
        assert!(level.goal.is_some());
        assert_eq!(level.solids.len(), 5);

        let blocks = level
            .solids
            .iter()
            .filter(|s| s.kind == SolidKind::Block)
            .count();
        assert_eq!(blocks, 3);
    }

    #[test]
    fn test_unknown_characters_are_skipped() {
        let level = Level::parse(&["P  x?.  ", "########"]);
        assert!(level.collectibles.is_empty());
        assert!(level.enemies.is_empty());
        assert_eq!(level.solids.len(), 8);
    }

    #[test]
    fn test_platform_collision_box_is_top_band_only() {
        let level = Level::parse(&["P =", "###"]);
        let platform = level
            .solids
            .iter()
            .find(|s| s.kind == SolidKind::Platform)
            .unwrap();
        assert_eq!(platform.rect.height(), PLATFORM_TOP);
        assert_eq!(platform.rect.y(), 0);
    }

    #[test]
    fn test_enemy_patrol_bounds_follow_walkable_span() {
        // Enemy in an open pocket bounded by walls at columns 1 and 7
        let level = Level::parse(&["#  E   #", "########"]);
        assert_eq!(level.enemies.len(), 1);
        let enemy = &level.enemies[0];
        assert_eq!(enemy.min_x, TILE_SIZE as f32);
        assert_eq!(enemy.max_x, (6 * TILE_SIZE) as f32);
    }

    #[test]
    fn test_enemy_at_row_edge_clamps_to_grid() {
        let level = Level::parse(&["E  P", "####"]);
        let enemy = &level.enemies[0];
        assert_eq!(enemy.min_x, 0.0);
        assert_eq!(enemy.max_x, (3 * TILE_SIZE) as f32);
    }

    #[test]
    fn test_pixel_dimensions_use_longest_row() {
        let level = Level::parse(&["P", "#####"]);
        assert_eq!(level.pixel_width, 5 * TILE_SIZE);
        assert_eq!(level.pixel_height, 2 * TILE_SIZE);
    }

    #[test]
    fn test_builtin_level_parses() {
        let level = Level::parse(LEVEL);
        assert!(!level.solids.is_empty());
        assert!(level.goal.is_some());
        assert!(!level.enemies.is_empty());
        assert!(!level.collectibles.is_empty());
        assert_eq!(level.pixel_height, 11 * TILE_SIZE);
    }
}
