use std::time::Duration;

use arrayvec::ArrayVec;
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    PlacementError,
    core::{
        board::{Board, Cell},
        shape::Piece,
    },
};

use super::{
    config::{GameConfig, GameConfigError, MAX_HAND_SIZE, PREFILL_MAX_ATTEMPTS},
    game_stats::GameStats,
    line_clear::{ClearOutcome, LineClear},
    piece_bag::{PieceBag, PieceSeed},
};

/// Lifecycle phase of a [`GameSession`].
///
/// ```text
/// Active --place_piece(valid)--> Processing --complete_clear / no lines-->
///     (refill hand if empty) --> GameOver | Active
/// ```
///
/// `GameOver` is terminal until [`GameSession::restart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum GamePhase {
    /// Accepting placements.
    Active,
    /// A placement is in flight; new placements are rejected.
    Processing,
    /// No hand piece fits anywhere.
    GameOver,
}

/// What happened after a placement fully settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Lines cleared by the placement, if any.
    pub clear: Option<ClearOutcome>,
    /// Whether the hand was empty and got refilled.
    pub refilled: bool,
    /// Whether the game ended.
    pub game_over: bool,
}

/// Result of an accepted [`GameSession::place_piece`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum PlacementOutcome {
    /// No lines were completed; the turn is over.
    Settled(TurnOutcome),
    /// Lines were completed. The session stays in [`GamePhase::Processing`]
    /// until [`GameSession::complete_clear`] is called.
    ClearPending(LineClear),
}

/// Side-effect-free projection of a hypothetical placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementPreview {
    /// Board cells the piece would cover; may lie off the board.
    pub cells: Vec<(i32, i32)>,
    pub is_valid: bool,
    /// Rows that would become full. Empty when the placement is invalid.
    pub clearing_rows: Vec<usize>,
    /// Columns that would become full. Empty when the placement is invalid.
    pub clearing_cols: Vec<usize>,
}

impl PlacementPreview {
    #[must_use]
    pub fn covers(&self, x: usize, y: usize) -> bool {
        self.cells
            .iter()
            .any(|&(cx, cy)| usize::try_from(cx) == Ok(x) && usize::try_from(cy) == Ok(y))
    }

    #[must_use]
    pub fn is_clearing(&self, x: usize, y: usize) -> bool {
        self.clearing_rows.contains(&y) || self.clearing_cols.contains(&x)
    }
}

/// A single game: board, hand, bag, counters and phase.
///
/// The session is presentation-free. A placement that completes lines is
/// split in two so a frontend can animate the clear in between:
///
/// 1. [`Self::place_piece`] commits the piece and reports the full lines
/// 2. [`Self::complete_clear`] scores and clears them, refills the hand and
///    checks for game over
///
/// [`Self::place_and_settle`] does both at once.
///
/// # Example
///
/// ```
/// use tetroku_engine::{GameConfig, GameSession, PieceSeed};
///
/// let mut session =
///     GameSession::with_seed(GameConfig::default(), PieceSeed::from_u128(7)).unwrap();
/// assert_eq!(session.hand().len(), 3);
/// assert_eq!(session.stats().round_count(), 1);
///
/// let piece = session.hand()[0];
/// let (x, y) = session.board().legal_origins(piece.shape()).next().unwrap();
/// let outcome = session.place_and_settle(x, y, 0).unwrap();
///
/// assert!(!outcome.game_over);
/// assert_eq!(session.stats().turn_count(), 1);
/// assert_eq!(session.hand().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    seed: PieceSeed,
    rng: Pcg32,
    bag: PieceBag,
    board: Board,
    hand: ArrayVec<Piece, MAX_HAND_SIZE>,
    stats: GameStats,
    phase: GamePhase,
    pending_clear: Option<LineClear>,
    elapsed: Duration,
}

impl GameSession {
    /// Starts a game with a random seed.
    pub fn new(config: GameConfig) -> Result<Self, GameConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Starts a game whose prefill and piece sequence are fixed by `seed`.
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Result<Self, GameConfigError> {
        config.validate()?;
        let mut rng = seed.rng();
        let bag = PieceBag::with_seed(config.catalog.clone(), config.bag_copies, rng.random());
        let mut this = Self {
            board: Board::new(config.board_size),
            config,
            seed,
            rng,
            bag,
            hand: ArrayVec::new(),
            stats: GameStats::new(),
            phase: GamePhase::Active,
            pending_clear: None,
            elapsed: Duration::ZERO,
        };
        this.start();
        Ok(this)
    }

    /// Resets board, hand, counters and elapsed time and starts a new game.
    ///
    /// The random state carries over, so a restarted game deals different
    /// pieces than the previous one.
    pub fn restart(&mut self) {
        self.bag.refill();
        self.start();
    }

    fn start(&mut self) {
        self.board = Board::new(self.config.board_size);
        let prefilled = self.board.prefill_random(
            &mut self.rng,
            self.config.prefill_cells,
            PREFILL_MAX_ATTEMPTS,
        );
        if prefilled < self.config.prefill_cells {
            tracing::debug!(
                prefilled,
                requested = self.config.prefill_cells,
                "prefill gave up early"
            );
        }
        self.hand.clear();
        self.stats = GameStats::new();
        self.pending_clear = None;
        self.elapsed = Duration::ZERO;
        self.phase = GamePhase::Active;
        self.refill_hand();
        if self.check_game_over() {
            self.enter_game_over();
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn hand(&self) -> &[Piece] {
        &self.hand
    }

    #[must_use]
    pub fn bag(&self) -> &PieceBag {
        &self.bag
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Lines waiting for [`Self::complete_clear`].
    #[must_use]
    pub fn pending_clear(&self) -> Option<&LineClear> {
        self.pending_clear.as_ref()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Current value of the configured scoring clock.
    #[must_use]
    pub fn clock(&self) -> u32 {
        self.stats.clock_value(self.config.scoring.clock())
    }

    /// Advances the elapsed-time clock. Has no effect once the game is over.
    pub fn tick(&mut self, dt: Duration) {
        if !self.phase.is_game_over() {
            self.elapsed += dt;
        }
    }

    /// Places hand piece `hand_index` with its top-left corner at `(x, y)`.
    ///
    /// Rejected placements leave the session untouched.
    pub fn place_piece(
        &mut self,
        x: i32,
        y: i32,
        hand_index: usize,
    ) -> Result<PlacementOutcome, PlacementError> {
        match self.phase {
            GamePhase::Active => {}
            GamePhase::Processing => return Err(PlacementError::Processing),
            GamePhase::GameOver => return Err(PlacementError::GameOver),
        }
        let piece = *self
            .hand
            .get(hand_index)
            .ok_or(PlacementError::NoPieceAtIndex { index: hand_index })?;
        if !self.board.validate_placement(x, y, piece.shape()) {
            return Err(PlacementError::InvalidPlacement { x, y });
        }

        self.phase = GamePhase::Processing;
        self.stats.complete_turn();
        let clock = self.clock();
        self.board.fill_shape(x, y, piece.shape(), Cell::Placed, clock);
        self.hand.remove(hand_index);
        tracing::trace!(kind = %piece.kind(), x, y, clock, "piece placed");

        let lines = LineClear::detect(&self.board);
        if lines.is_empty() {
            return Ok(PlacementOutcome::Settled(self.settle(None)));
        }
        tracing::debug!(rows = ?lines.rows(), cols = ?lines.cols(), "lines completed");
        self.pending_clear = Some(lines.clone());
        Ok(PlacementOutcome::ClearPending(lines))
    }

    /// Scores and clears the lines reported by the last placement, then
    /// finishes the turn.
    pub fn complete_clear(&mut self) -> Result<TurnOutcome, PlacementError> {
        let lines = self
            .pending_clear
            .take()
            .ok_or(PlacementError::NoPendingClear)?;
        let clock = self.clock();
        let outcome = lines.resolve(&mut self.board, clock, &self.config.scoring);
        self.stats.record_clear(&outcome);
        tracing::debug!(
            lines = outcome.lines.line_count(),
            cells = outcome.cleared_cells,
            points = outcome.points,
            score = self.stats.score(),
            "lines cleared"
        );
        Ok(self.settle(Some(outcome)))
    }

    /// [`Self::place_piece`] followed by [`Self::complete_clear`] when needed.
    pub fn place_and_settle(
        &mut self,
        x: i32,
        y: i32,
        hand_index: usize,
    ) -> Result<TurnOutcome, PlacementError> {
        match self.place_piece(x, y, hand_index)? {
            PlacementOutcome::Settled(outcome) => Ok(outcome),
            PlacementOutcome::ClearPending(_) => self.complete_clear(),
        }
    }

    /// Projects placing hand piece `hand_index` at `(x, y)`.
    ///
    /// Returns `None` unless the session is active, or when the index holds
    /// no piece.
    #[must_use]
    pub fn preview_placement(&self, x: i32, y: i32, hand_index: usize) -> Option<PlacementPreview> {
        if !self.phase.is_active() {
            return None;
        }
        let piece = self.hand.get(hand_index)?;
        let shape = piece.shape();
        let cells: Vec<_> = Board::placement_cells(x, y, shape).collect();
        let is_valid = self.board.validate_placement(x, y, shape);

        let (mut clearing_rows, mut clearing_cols) = (vec![], vec![]);
        if is_valid {
            let size = self.board.size();
            let added: Vec<_> = cells
                .iter()
                .filter_map(|&(cx, cy)| self.board.cell_at(cx, cy))
                .collect();
            clearing_rows = (0..size)
                .filter(|&row| {
                    let new = added.iter().filter(|&&(_, cy)| cy == row).count();
                    self.board.row_fill_count(row) + new == size
                })
                .collect();
            clearing_cols = (0..size)
                .filter(|&col| {
                    let new = added.iter().filter(|&&(cx, _)| cx == col).count();
                    self.board.col_fill_count(col) + new == size
                })
                .collect();
        }

        Some(PlacementPreview {
            cells,
            is_valid,
            clearing_rows,
            clearing_cols,
        })
    }

    /// Whether no piece left in the hand fits anywhere on the board.
    ///
    /// An empty hand is never game over; it is about to be refilled.
    #[must_use]
    pub fn check_game_over(&self) -> bool {
        !self.hand.is_empty()
            && self
                .hand
                .iter()
                .all(|piece| !self.board.fits_anywhere(piece.shape()))
    }

    fn refill_hand(&mut self) {
        while self.hand.len() < self.config.hand_size {
            self.hand.push(self.bag.draw());
        }
        self.stats.start_round();
    }

    fn settle(&mut self, clear: Option<ClearOutcome>) -> TurnOutcome {
        let refilled = self.hand.is_empty();
        if refilled {
            self.refill_hand();
        }
        let game_over = self.check_game_over();
        if game_over {
            self.enter_game_over();
        } else {
            self.phase = GamePhase::Active;
        }
        TurnOutcome {
            clear,
            refilled,
            game_over,
        }
    }

    fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        tracing::info!(
            score = self.stats.score(),
            turns = self.stats.turn_count(),
            rounds = self.stats.round_count(),
            elapsed = ?self.elapsed,
            "game over"
        );
    }
}

#[cfg(test)]
impl GameSession {
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn hand_mut(&mut self) -> &mut ArrayVec<Piece, MAX_HAND_SIZE> {
        &mut self.hand
    }
}
