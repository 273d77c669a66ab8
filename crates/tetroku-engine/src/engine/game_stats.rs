use serde::Serialize;

use super::{line_clear::ClearOutcome, scoring::ScoringClock};

/// Counters tracked over a game: score, turns, rounds and clears.
///
/// - **Score**: sum of points from every resolved clear; never decreases
/// - **Turns**: successful placements
/// - **Rounds**: hand refills (the refill at game start makes it `1`)
/// - **Clear statistics**: lines, distinct cells and clear events
///
/// # Example
///
/// ```
/// use tetroku_engine::{GameStats, ScoringClock};
///
/// let mut stats = GameStats::new();
/// stats.start_round();
/// stats.complete_turn();
/// stats.complete_turn();
///
/// assert_eq!(stats.round_count(), 1);
/// assert_eq!(stats.turn_count(), 2);
/// assert_eq!(stats.clock_value(ScoringClock::Turn), 2);
/// assert_eq!(stats.clock_value(ScoringClock::Round), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    turn_count: u32,
    round_count: u32,
    cleared_lines: usize,
    cleared_cells: usize,
    clear_events: usize,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            turn_count: 0,
            round_count: 0,
            cleared_lines: 0,
            cleared_cells: 0,
            clear_events: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn turn_count(&self) -> u32 {
        self.turn_count
    }

    #[must_use]
    pub const fn round_count(&self) -> u32 {
        self.round_count
    }

    /// Total rows plus columns cleared.
    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub const fn cleared_cells(&self) -> usize {
        self.cleared_cells
    }

    /// Number of placements that cleared at least one line.
    #[must_use]
    pub const fn clear_events(&self) -> usize {
        self.clear_events
    }

    /// Current value of the counter selected by `clock`.
    #[must_use]
    pub const fn clock_value(&self, clock: ScoringClock) -> u32 {
        match clock {
            ScoringClock::Turn => self.turn_count,
            ScoringClock::Round => self.round_count,
        }
    }

    pub const fn complete_turn(&mut self) {
        self.turn_count += 1;
    }

    pub const fn start_round(&mut self) {
        self.round_count += 1;
    }

    pub fn record_clear(&mut self, outcome: &ClearOutcome) {
        self.score = self.score.saturating_add(outcome.points);
        self.cleared_lines += outcome.lines.line_count();
        self.cleared_cells += outcome.cleared_cells;
        self.clear_events += 1;
    }
}
