use serde::Serialize;

use crate::core::board::Board;

use super::scoring::ScoringRule;

/// Full rows and columns found on a board.
///
/// A row and a column may both be full at once; their shared cell belongs to
/// both lines but is cleared and scored only once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineClear {
    rows: Vec<usize>,
    cols: Vec<usize>,
}

/// Result of resolving a [`LineClear`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Lines that were cleared.
    pub lines: LineClear,
    /// Number of distinct cells removed.
    pub cleared_cells: usize,
    /// Points awarded for this clear.
    pub points: u64,
}

impl LineClear {
    /// Scans every row and column of `board` for full lines.
    #[must_use]
    pub fn detect(board: &Board) -> Self {
        Self {
            rows: board.full_rows(),
            cols: board.full_cols(),
        }
    }

    #[must_use]
    pub fn new(rows: Vec<usize>, cols: Vec<usize>) -> Self {
        Self { rows, cols }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    #[must_use]
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Total number of full lines (rows plus columns).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    #[must_use]
    pub fn contains_cell(&self, x: usize, y: usize) -> bool {
        self.rows.contains(&y) || self.cols.contains(&x)
    }

    /// Distinct `(x, y)` cells covered by the lines on a `size`×`size` board.
    ///
    /// Row cells come first; column cells already covered by a full row are
    /// skipped.
    pub fn cells(&self, size: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let row_cells = self
            .rows
            .iter()
            .flat_map(move |&y| (0..size).map(move |x| (x, y)));
        let col_cells = self.cols.iter().flat_map(move |&x| {
            (0..size)
                .filter(move |y| !self.rows.contains(y))
                .map(move |y| (x, y))
        });
        row_cells.chain(col_cells)
    }

    /// Points for clearing these lines at clock value `clock`.
    ///
    /// Each distinct cell earns `rule.points_for_age(clock - age)`.
    #[must_use]
    pub fn score(&self, board: &Board, clock: u32, rule: &ScoringRule) -> u64 {
        self.cells(board.size())
            .map(|(x, y)| {
                let age = clock.saturating_sub(board.age(x, y));
                u64::from(rule.points_for_age(age))
            })
            .sum()
    }

    /// Scores the lines, then empties every cell of every listed row and column.
    pub fn resolve(self, board: &mut Board, clock: u32, rule: &ScoringRule) -> ClearOutcome {
        let points = self.score(board, clock, rule);
        let cleared_cells = self.cells(board.size()).count();
        for &y in &self.rows {
            board.clear_row(y);
        }
        for &x in &self.cols {
            board.clear_col(x);
        }
        ClearOutcome {
            lines: self,
            cleared_cells,
            points,
        }
    }
}
