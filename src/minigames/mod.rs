//! The five mini-games.
//!
//! Each mini-game is a self-contained screen: a plain state struct with
//! `update`/input methods (unit-testable, no SDL types beyond `Rect`), and
//! a `run` function that owns the frame loop and rendering. Terminal states
//! always offer the same two exits: Space restarts in place via `reset()`,
//! Escape returns to the hub.

pub mod platformer;
pub mod rhythm;
pub mod runner;
pub mod tapping;
pub mod wordsearch;

/// Why a mini-game's loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiniGameExit {
    /// Escape or an in-game "back" action: back to the hub.
    ReturnToHub,
    /// Window close: quit the whole program.
    Quit,
}
