//! Word-search puzzle.
//!
//! Drag from a start cell to an end cell; the selection is accepted only if
//! it forms a straight horizontal, vertical, or exact diagonal line. The
//! traversed letters are matched against the remaining target words,
//! forward and reversed. Found cells stay marked; finding every word wins.
//!
//! The puzzle itself comes from `assets/config/wordsearch.json` when
//! present, otherwise the built-in one is used.

use crate::assets;
use crate::audio::AudioPlayer;
use crate::context::{self, Character, GameContext};
use crate::gui::OutcomeBanner;
use crate::minigames::MiniGameExit;
use crate::text::{draw_text, draw_text_centered};
use log::warn;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;
use serde::Deserialize;
use std::time::Duration;

const CELL_SIZE: u32 = 36;
const GRID_X: i32 = 40;
const GRID_Y: i32 = 48;

/// Puzzle definition, loadable from JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct PuzzleConfig {
    pub rows: Vec<String>,
    pub words: Vec<String>,
}

impl PuzzleConfig {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PuzzleConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// The built-in puzzle used when no config file is present.
    pub fn builtin() -> Self {
        PuzzleConfig {
            rows: vec![
                "SAKURAT".to_string(),
                "UNINJAO".to_string(),
                "SEZXQPK".to_string(),
                "HREBLMY".to_string(),
                "ITNDFGO".to_string(),
                "CVWHJKL".to_string(),
                "MPQRSTU".to_string(),
            ],
            words: vec![
                "SAKURA".to_string(),
                "NINJA".to_string(),
                "SUSHI".to_string(),
                "TOKYO".to_string(),
                "ZEN".to_string(),
            ],
        }
    }

    fn is_usable(&self) -> bool {
        !self.rows.is_empty() && !self.words.is_empty()
    }
}

pub struct WordSearchGame {
    grid: Vec<Vec<char>>,
    pub rows: usize,
    pub cols: usize,
    all_words: Vec<String>,
    remaining: Vec<String>,
    pub found_words: Vec<String>,
    found_cells: Vec<Vec<bool>>,
    drag_start: Option<(usize, usize)>,
}

impl WordSearchGame {
    pub fn new(config: &PuzzleConfig) -> Self {
        let grid: Vec<Vec<char>> = config
            .rows
            .iter()
            .map(|r| r.to_uppercase().chars().collect())
            .collect();
        let rows = grid.len();
        let cols = grid.iter().map(|r| r.len()).max().unwrap_or(0);
        let all_words: Vec<String> = config.words.iter().map(|w| w.to_uppercase()).collect();

        WordSearchGame {
            grid,
            rows,
            cols,
            remaining: all_words.clone(),
            all_words,
            found_words: Vec::new(),
            found_cells: vec![vec![false; cols]; rows],
            drag_start: None,
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.all_words.clone();
        self.found_words.clear();
        for row in &mut self.found_cells {
            row.fill(false);
        }
        self.drag_start = None;
    }

    pub fn letter(&self, row: usize, col: usize) -> char {
        *self
            .grid
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&' ')
    }

    pub fn is_found(&self, row: usize, col: usize) -> bool {
        self.found_cells[row][col]
    }

    pub fn remaining_words(&self) -> &[String] {
        &self.remaining
    }

    pub fn is_won(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn drag_origin(&self) -> Option<(usize, usize)> {
        self.drag_start
    }

    pub fn begin_drag(&mut self, cell: (usize, usize)) {
        self.drag_start = Some(cell);
    }

    /// Drops the drag without evaluating it (pointer left the grid).
    pub fn cancel_drag(&mut self) {
        self.drag_start = None;
    }

    /// Finishes the drag. Returns the word that was found, if the selection
    /// was a straight line spelling a remaining word (in either direction).
    pub fn end_drag(&mut self, cell: (usize, usize)) -> Option<String> {
        let start = self.drag_start.take()?;
        let cells = selection_line(start, cell)?;

        let word: String = cells.iter().map(|&(r, c)| self.letter(r, c)).collect();
        let reversed: String = word.chars().rev().collect();

        let position = self
            .remaining
            .iter()
            .position(|w| *w == word || *w == reversed)?;

        let found = self.remaining.remove(position);
        self.found_words.push(found.clone());
        for (r, c) in cells {
            self.found_cells[r][c] = true;
        }
        Some(found)
    }
}

/// The cells traversed from `start` to `end`, inclusive, if the delta is a
/// straight horizontal, vertical, or exact diagonal line. A zero delta is a
/// single-cell selection.
pub fn selection_line(
    start: (usize, usize),
    end: (usize, usize),
) -> Option<Vec<(usize, usize)>> {
    let dr = end.0 as i32 - start.0 as i32;
    let dc = end.1 as i32 - start.1 as i32;

    if dr != 0 && dc != 0 && dr.abs() != dc.abs() {
        return None;
    }

    let steps = dr.abs().max(dc.abs());
    let step_r = dr.signum();
    let step_c = dc.signum();

    Some(
        (0..=steps)
            .map(|i| {
                (
                    (start.0 as i32 + i * step_r) as usize,
                    (start.1 as i32 + i * step_c) as usize,
                )
            })
            .collect(),
    )
}

fn cell_at(x: i32, y: i32, rows: usize, cols: usize) -> Option<(usize, usize)> {
    let col = (x - GRID_X).div_euclid(CELL_SIZE as i32);
    let row = (y - GRID_Y).div_euclid(CELL_SIZE as i32);
    if row < 0 || col < 0 || row >= rows as i32 || col >= cols as i32 {
        return None;
    }
    Some((row as usize, col as usize))
}

pub fn run(
    canvas: &mut Canvas<Window>,
    event_pump: &mut EventPump,
    texture_creator: &TextureCreator<WindowContext>,
    audio: &mut AudioPlayer,
    ctx: &GameContext,
    _character: &Character,
) -> Result<MiniGameExit, String> {
    let background = assets::load_sprite_sized(
        texture_creator,
        &assets::background_path("library"),
        ctx.width,
        ctx.height,
        Color::RGB(52, 44, 38),
    );

    let config = match PuzzleConfig::load_from_file("assets/config/wordsearch.json") {
        Ok(config) if config.is_usable() => config,
        Ok(_) => {
            warn!("wordsearch config is empty, using built-in puzzle");
            PuzzleConfig::builtin()
        }
        Err(e) => {
            warn!("no wordsearch config ({}), using built-in puzzle", e);
            PuzzleConfig::builtin()
        }
    };
    let mut game = WordSearchGame::new(&config);
    let banner = OutcomeBanner::new();
    let mut pointer = (0, 0);
    audio.play_music("wordsearch");

    loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => {
                    audio.stop_music();
                    return Ok(MiniGameExit::Quit);
                }
                Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    audio.stop_music();
                    return Ok(MiniGameExit::ReturnToHub);
                }
                Event::KeyDown {
                    keycode: Some(Keycode::Space),
                    ..
                } if game.is_won() => game.reset(),
                Event::MouseMotion { x, y, .. } => pointer = (x, y),
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    if let Some(cell) = cell_at(x, y, game.rows, game.cols) {
                        game.begin_drag(cell);
                    }
                }
                Event::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    if let Some(cell) = cell_at(x, y, game.rows, game.cols) {
                        if game.end_drag(cell).is_some() {
                            audio.play_sound("found");
                        }
                    } else {
                        game.cancel_drag();
                    }
                }
                _ => {}
            }
        }

        background.render(canvas, 0, 0)?;
        draw_text_centered(
            canvas,
            "FIND THE HIDDEN WORDS",
            ctx.width as i32 / 2,
            14,
            context::PAPER,
            2,
        )?;

        // Cells currently under the drag, for highlighting
        let live_selection: Vec<(usize, usize)> = match (
            game.drag_origin(),
            cell_at(pointer.0, pointer.1, game.rows, game.cols),
        ) {
            (Some(start), Some(end)) => selection_line(start, end).unwrap_or_default(),
            _ => Vec::new(),
        };

        for row in 0..game.rows {
            for col in 0..game.cols {
                let rect = Rect::new(
                    GRID_X + col as i32 * CELL_SIZE as i32,
                    GRID_Y + row as i32 * CELL_SIZE as i32,
                    CELL_SIZE - 2,
                    CELL_SIZE - 2,
                );

                let fill = if game.is_found(row, col) {
                    context::GOLD
                } else if live_selection.contains(&(row, col)) {
                    context::PAPER_HOVER
                } else {
                    context::PAPER
                };
                canvas.set_draw_color(fill);
                canvas.fill_rect(rect)?;
                canvas.set_draw_color(context::INK);
                canvas.draw_rect(rect)?;

                let letter = game.letter(row, col);
                draw_text_centered(
                    canvas,
                    &letter.to_string(),
                    rect.x() + rect.width() as i32 / 2,
                    rect.y() + 10,
                    context::INK,
                    2,
                )?;
            }
        }

        // Remaining word list down the right side
        let list_x = GRID_X + (game.cols as u32 * CELL_SIZE) as i32 + 40;
        draw_text(canvas, "WORDS", list_x, GRID_Y, context::GOLD, 2)?;
        for (i, word) in game.remaining_words().iter().enumerate() {
            draw_text(
                canvas,
                word,
                list_x,
                GRID_Y + 30 + i as i32 * 22,
                context::PAPER,
                2,
            )?;
        }
        for (i, word) in game.found_words.iter().enumerate() {
            let y = GRID_Y + 30 + (game.remaining_words().len() + i) as i32 * 22;
            draw_text(canvas, word, list_x, y, Color::RGB(120, 120, 110), 2)?;
        }

        if game.is_won() {
            banner.render(
                canvas,
                "ALL WORDS FOUND!",
                context::GOLD,
                "SPACE FOR A FRESH GRID",
                "ESC FOR THE HUB",
            )?;
        }

        canvas.present();
        std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PuzzleConfig {
        PuzzleConfig {
            rows: vec![
                "HELLO".to_string(),
                "AXQJZ".to_string(),
                "WORLD".to_string(),
                "KPQRS".to_string(),
                "STAMP".to_string(),
            ],
            words: vec!["HELLO".to_string(), "WORLD".to_string(), "HAWKS".to_string()],
        }
    }

    #[test]
    fn test_selection_must_be_a_straight_line() {
        assert!(selection_line((0, 0), (0, 4)).is_some()); // horizontal
        assert!(selection_line((0, 0), (4, 0)).is_some()); // vertical
        assert!(selection_line((0, 0), (3, 3)).is_some()); // diagonal
        assert!(selection_line((4, 4), (1, 1)).is_some()); // reverse diagonal
        assert!(selection_line((0, 0), (1, 3)).is_none()); // crooked
        assert!(selection_line((2, 1), (0, 2)).is_none());
    }

    #[test]
    fn test_zero_delta_is_a_single_cell_selection() {
        let cells = selection_line((2, 3), (2, 3)).unwrap();
        assert_eq!(cells, vec![(2, 3)]);
    }

    #[test]
    fn test_horizontal_drag_finds_word_and_marks_cells() {
        let mut game = WordSearchGame::new(&test_config());

        game.begin_drag((0, 0));
        let found = game.end_drag((0, 4));

        assert_eq!(found.as_deref(), Some("HELLO"));
        assert_eq!(game.found_words, vec!["HELLO".to_string()]);
        for col in 0..5 {
            assert!(game.is_found(0, col));
        }
        assert_eq!(
            game.found_cells.iter().flatten().filter(|&&f| f).count(),
            5
        );
    }

    #[test]
    fn test_reversed_drag_matches_word() {
        let mut game = WordSearchGame::new(&test_config());

        // Drag right-to-left across WORLD
        game.begin_drag((2, 4));
        assert_eq!(game.end_drag((2, 0)).as_deref(), Some("WORLD"));
    }

    #[test]
    fn test_vertical_word_down_first_column() {
        let mut game = WordSearchGame::new(&test_config());

        game.begin_drag((0, 0));
        assert_eq!(game.end_drag((4, 0)).as_deref(), Some("HAWKS"));
    }

    #[test]
    fn test_word_is_found_at_most_once() {
        let mut game = WordSearchGame::new(&test_config());

        game.begin_drag((0, 0));
        assert!(game.end_drag((0, 4)).is_some());

        // Same word again, forward and reversed: no double count
        game.begin_drag((0, 0));
        assert!(game.end_drag((0, 4)).is_none());
        game.begin_drag((0, 4));
        assert!(game.end_drag((0, 0)).is_none());

        assert_eq!(game.found_words.len(), 1);
    }

    #[test]
    fn test_crooked_or_unmatched_drags_mark_nothing() {
        let mut game = WordSearchGame::new(&test_config());

        game.begin_drag((0, 0));
        assert!(game.end_drag((1, 3)).is_none());

        game.begin_drag((1, 0));
        assert!(game.end_drag((1, 4)).is_none());

        assert!(game.found_words.is_empty());
        assert_eq!(game.found_cells.iter().flatten().filter(|&&f| f).count(), 0);
    }

    #[test]
    fn test_all_words_found_wins_and_reset_clears() {
        let mut game = WordSearchGame::new(&test_config());

        game.begin_drag((0, 0));
        game.end_drag((0, 4));
        game.begin_drag((2, 0));
        game.end_drag((2, 4));
        game.begin_drag((0, 0));
        game.end_drag((4, 0));

        assert!(game.is_won());

        game.reset();
        assert!(!game.is_won());
        assert_eq!(game.remaining_words().len(), 3);
        assert!(game.found_words.is_empty());
        assert!(!game.is_found(0, 0));
    }

    #[test]
    fn test_builtin_puzzle_words_are_all_placed() {
        let mut game = WordSearchGame::new(&PuzzleConfig::builtin());

        game.begin_drag((0, 0));
        assert!(game.end_drag((0, 5)).is_some()); // SAKURA
        game.begin_drag((1, 1));
        assert!(game.end_drag((1, 5)).is_some()); // NINJA
        game.begin_drag((0, 0));
        assert!(game.end_drag((4, 0)).is_some()); // SUSHI
        game.begin_drag((0, 6));
        assert!(game.end_drag((4, 6)).is_some()); // TOKYO
        game.begin_drag((2, 2));
        assert!(game.end_drag((4, 2)).is_some()); // ZEN
        assert!(game.is_won());
    }
}
