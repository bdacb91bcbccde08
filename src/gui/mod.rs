//! Screen-Space GUI Components
//!
//! Pointer-driven paper-styled buttons for the menus, and the outcome
//! overlay every mini-game shows in its terminal states. All rendering is
//! procedural (SDL2 primitives + the bitmap font), so the GUI itself has
//! no assets that could go missing.

pub mod button;
pub mod outcome;

pub use button::{Button, ButtonStyle};
pub use outcome::OutcomeBanner;
