use serde::{Deserialize, Serialize};

use crate::core::{
    board::{MAX_BOARD_SIZE, MIN_BOARD_SIZE},
    shape::ShapeCatalog,
};

use super::{piece_bag::DEFAULT_BAG_COPIES, scoring::ScoringRule};

/// Maximum number of pieces a hand can hold.
pub const MAX_HAND_SIZE: usize = 3;

/// Default board edge length.
pub const DEFAULT_BOARD_SIZE: usize = 7;

/// Default number of cells prefilled at game start.
pub const DEFAULT_PREFILL_CELLS: usize = 5;

/// Random draws allowed while prefilling before giving up.
pub const PREFILL_MAX_ATTEMPTS: usize = 100;

#[derive(
    Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum GameConfigError {
    #[display("board size {size} out of range ({MIN_BOARD_SIZE}..={MAX_BOARD_SIZE})")]
    BoardSize { size: usize },
    #[display("hand size {size} out of range (1..={MAX_HAND_SIZE})")]
    HandSize { size: usize },
    #[display("cannot prefill {cells} cells on a {size}x{size} board")]
    TooManyPrefilled { cells: usize, size: usize },
    #[display("bag must hold at least one copy of each shape")]
    ZeroBagCopies,
    #[display("shape catalog must not be empty")]
    EmptyCatalog,
}

/// Tunable parameters of a game.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes:
///
/// ```
/// use tetroku_engine::{GameConfig, ScoringClock};
///
/// let config: GameConfig = serde_json::from_str(r#"{
///     "board_size": 9,
///     "scoring": {
///         "clock": "turn",
///         "thresholds": [
///             { "min_age": 0, "points": 0 },
///             { "min_age": 15, "points": 20 }
///         ]
///     }
/// }"#).unwrap();
///
/// assert_eq!(config.board_size, 9);
/// assert_eq!(config.hand_size, 3);
/// assert_eq!(config.scoring.clock(), ScoringClock::Turn);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub board_size: usize,
    pub hand_size: usize,
    pub prefill_cells: usize,
    pub bag_copies: usize,
    pub scoring: ScoringRule,
    pub catalog: ShapeCatalog,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            hand_size: MAX_HAND_SIZE,
            prefill_cells: DEFAULT_PREFILL_CELLS,
            bag_copies: DEFAULT_BAG_COPIES,
            scoring: ScoringRule::default(),
            catalog: ShapeCatalog::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameConfigError> {
        let size = self.board_size;
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(GameConfigError::BoardSize { size });
        }
        if !(1..=MAX_HAND_SIZE).contains(&self.hand_size) {
            return Err(GameConfigError::HandSize {
                size: self.hand_size,
            });
        }
        if self.prefill_cells >= size * size {
            return Err(GameConfigError::TooManyPrefilled {
                cells: self.prefill_cells,
                size,
            });
        }
        if self.bag_copies == 0 {
            return Err(GameConfigError::ZeroBagCopies);
        }
        if self.catalog.is_empty() {
            return Err(GameConfigError::EmptyCatalog);
        }
        Ok(())
    }
}
