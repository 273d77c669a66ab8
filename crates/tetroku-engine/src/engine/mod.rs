//! Game rules and state management.
//!
//! This module builds the rules of play on top of the static structures in
//! [`core`](crate::core):
//!
//! - [`PieceBag`] - shuffled multiset dealing randomly rotated pieces
//! - [`PieceSeed`] - seed for deterministic dealing and prefill
//! - [`LineClear`] - full row/column detection, scoring and removal
//! - [`ScoringRule`] - scoring clock and age-to-points buckets
//! - [`GameConfig`] - tunable game parameters
//! - [`GameSession`] - two-phase placement state machine
//! - [`GameStats`] - score, turn and round counters
//! - [`Game`] - controller that keeps a [`Presenter`] in sync with a session
//!
//! # Turn Flow
//!
//! 1. The player picks a hand piece and a target origin
//! 2. The board validates the placement; the piece is stamped with the
//!    current clock value
//! 3. Full rows and columns are detected; the frontend may animate them
//! 4. Every distinct cell of the full lines is scored by its age and cleared
//! 5. An empty hand is refilled from the bag, starting a new round
//! 6. The game ends when no hand piece fits anywhere
//!
//! # Example
//!
//! ```
//! use tetroku_engine::{GameConfig, GameSession, PlacementError};
//!
//! let mut session = GameSession::new(GameConfig::default()).unwrap();
//!
//! // Pieces may not hang off the board.
//! assert_eq!(
//!     session.place_piece(-1, 0, 0),
//!     Err(PlacementError::InvalidPlacement { x: -1, y: 0 })
//! );
//!
//! // Greedy player: first piece that fits, at its first legal origin.
//! for _ in 0..20 {
//!     let placement = session.hand().iter().enumerate().find_map(|(index, piece)| {
//!         let (x, y) = session.board().legal_origins(piece.shape()).next()?;
//!         Some((x, y, index))
//!     });
//!     let Some((x, y, index)) = placement else { break };
//!     session.place_and_settle(x, y, index).unwrap();
//! }
//! assert!(session.stats().turn_count() > 0);
//! ```

pub use self::{
    config::*, game::*, game_session::*, game_stats::*, line_clear::*, piece_bag::*,
    presenter::*, scoring::*,
};

mod config;
mod game;
mod game_session;
mod game_stats;
mod line_clear;
mod piece_bag;
mod presenter;
mod scoring;
