//! Engine for Tetroku, a block-placement puzzle on a square board.
//!
//! Pieces (tetrominoes and a few extra polyominoes) are dealt into a hand of
//! three and placed anywhere they fit. Completed rows and columns are
//! cleared, and every cleared cell scores by how long it sat on the board.
//!
//! - [`core`] - shapes, the shape catalog and the board
//! - [`engine`] - bag, clearing, scoring, sessions and the presenter-driving
//!   controller

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reason a placement request was declined.
///
/// A declined request never changes the session.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum PlacementError {
    #[display("the game is over")]
    GameOver,
    #[display("a placement is still being processed")]
    Processing,
    #[display("no piece at hand index {index}")]
    NoPieceAtIndex { index: usize },
    #[display("piece does not fit at ({x}, {y})")]
    InvalidPlacement { x: i32, y: i32 },
    #[display("no line clear is pending")]
    NoPendingClear,
}
