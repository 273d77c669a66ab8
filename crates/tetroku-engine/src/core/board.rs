use rand::Rng;

use super::shape::Shape;

/// Smallest supported board size.
pub const MIN_BOARD_SIZE: usize = 4;
/// Largest supported board size.
pub const MAX_BOARD_SIZE: usize = 16;

/// Occupancy of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
#[repr(u8)]
pub enum Cell {
    /// Nothing here.
    #[default]
    Empty = 0,
    /// Placed by the player.
    Placed = 1,
    /// Seeded at game start.
    Prefilled = 2,
}

impl Cell {
    #[must_use]
    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }

    /// Numeric occupancy code (`0` empty, `1` placed, `2` prefilled).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Square grid of cells with a placement age for every occupied cell.
///
/// Coordinates are `(x, y)` with `x` the column and `y` the row, both in
/// `0..size`. Placement origins are signed so callers can probe positions
/// hanging off the top or left edge; such placements simply fail validation.
///
/// The age of a cell is the clock value at which it was occupied. It is
/// meaningful only where the cell is occupied; empty and prefilled cells
/// carry age `0`.
///
/// # Example
///
/// ```
/// use tetroku_engine::{Board, Cell, Shape};
///
/// let mut board = Board::new(7);
/// let bar = Shape::from_matrix([[1, 1, 1, 1]]);
///
/// assert!(board.validate_placement(3, 0, &bar));
/// assert!(!board.validate_placement(4, 0, &bar));
///
/// board.fill_shape(3, 0, &bar, Cell::Placed, 1);
/// assert_eq!(board.cell(6, 0), Cell::Placed);
/// assert!(!board.validate_placement(0, 0, &bar));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    ages: Vec<u32>,
}

impl Board {
    /// Creates an empty `size`×`size` board.
    ///
    /// # Panics
    ///
    /// Panics if `size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(
            (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size),
            "board size {size} out of range"
        );
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
            ages: vec![0; size * size],
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(x < self.size && y < self.size, "cell ({x}, {y}) out of board");
        y * self.size + x
    }

    /// Converts a signed coordinate into a board cell, if it lies on the board.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.size)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.size)?;
        Some((x, y))
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    #[must_use]
    pub fn age(&self, x: usize, y: usize) -> u32 {
        self.ages[self.index(x, y)]
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_occupied()
    }

    /// Overwrites a single cell.
    ///
    /// Empty cells always get age `0`, whatever `age` says.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell, age: u32) {
        let i = self.index(x, y);
        self.cells[i] = cell;
        self.ages[i] = if cell.is_empty() { 0 } else { age };
    }

    /// Iterates over rows of cells, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }

    /// Iterates over rows of ages, top to bottom.
    pub fn age_rows(&self) -> impl Iterator<Item = &[u32]> {
        self.ages.chunks(self.size)
    }

    /// Absolute coordinates covered by `shape` placed at `(origin_x, origin_y)`.
    ///
    /// Coordinates may lie off the board.
    pub fn placement_cells(
        origin_x: i32,
        origin_y: i32,
        shape: &Shape,
    ) -> impl Iterator<Item = (i32, i32)> + '_ {
        shape.occupied_positions().map(move |(dx, dy)| {
            // Shapes never exceed MAX_SHAPE_DIM so the offsets always fit.
            let dx = i32::try_from(dx).unwrap_or(i32::MAX);
            let dy = i32::try_from(dy).unwrap_or(i32::MAX);
            (origin_x.saturating_add(dx), origin_y.saturating_add(dy))
        })
    }

    /// Checks whether `shape` fits at `(origin_x, origin_y)`.
    ///
    /// Every present shape cell must land inside the board on an empty cell.
    /// This never mutates the board.
    #[must_use]
    pub fn validate_placement(&self, origin_x: i32, origin_y: i32, shape: &Shape) -> bool {
        Self::placement_cells(origin_x, origin_y, shape).all(|(x, y)| {
            self.cell_at(x, y)
                .is_some_and(|(x, y)| !self.is_occupied(x, y))
        })
    }

    /// Returns whether `shape` fits anywhere with its origin on the board.
    #[must_use]
    pub fn fits_anywhere(&self, shape: &Shape) -> bool {
        self.legal_origins(shape).next().is_some()
    }

    /// Iterates over every origin in `[0, size)²` where `shape` fits.
    pub fn legal_origins<'a>(&'a self, shape: &'a Shape) -> impl Iterator<Item = (i32, i32)> + 'a {
        let size = i32::try_from(self.size).unwrap_or(i32::MAX);
        (0..size)
            .flat_map(move |y| (0..size).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.validate_placement(x, y, shape))
    }

    /// Writes `shape` onto the board with the given occupancy and age.
    ///
    /// Callers validate first; cells that fall off the board are skipped.
    pub fn fill_shape(
        &mut self,
        origin_x: i32,
        origin_y: i32,
        shape: &Shape,
        cell: Cell,
        age: u32,
    ) {
        for (x, y) in Self::placement_cells(origin_x, origin_y, shape) {
            if let Some((x, y)) = self.cell_at(x, y) {
                self.set_cell(x, y, cell, age);
            }
        }
    }

    /// Number of occupied cells in row `y`.
    #[must_use]
    pub fn row_fill_count(&self, y: usize) -> usize {
        (0..self.size).filter(|&x| self.is_occupied(x, y)).count()
    }

    /// Number of occupied cells in column `x`.
    #[must_use]
    pub fn col_fill_count(&self, x: usize) -> usize {
        (0..self.size).filter(|&y| self.is_occupied(x, y)).count()
    }

    #[must_use]
    pub fn is_row_full(&self, y: usize) -> bool {
        (0..self.size).all(|x| self.is_occupied(x, y))
    }

    #[must_use]
    pub fn is_col_full(&self, x: usize) -> bool {
        (0..self.size).all(|y| self.is_occupied(x, y))
    }

    /// Indices of every fully occupied row, ascending.
    #[must_use]
    pub fn full_rows(&self) -> Vec<usize> {
        (0..self.size).filter(|&y| self.is_row_full(y)).collect()
    }

    /// Indices of every fully occupied column, ascending.
    #[must_use]
    pub fn full_cols(&self) -> Vec<usize> {
        (0..self.size).filter(|&x| self.is_col_full(x)).collect()
    }

    /// Empties every cell of row `y`.
    pub fn clear_row(&mut self, y: usize) {
        for x in 0..self.size {
            self.set_cell(x, y, Cell::Empty, 0);
        }
    }

    /// Empties every cell of column `x`.
    pub fn clear_col(&mut self, x: usize) {
        for y in 0..self.size {
            self.set_cell(x, y, Cell::Empty, 0);
        }
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_occupied()).count()
    }

    /// Scatters up to `count` prefilled single cells at random empty positions.
    ///
    /// Gives up after `max_attempts` draws and returns how many were placed.
    pub fn prefill_random<R>(&mut self, rng: &mut R, count: usize, max_attempts: usize) -> usize
    where
        R: Rng + ?Sized,
    {
        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < max_attempts {
            let x = rng.random_range(0..self.size);
            let y = rng.random_range(0..self.size);
            if !self.is_occupied(x, y) {
                self.set_cell(x, y, Cell::Prefilled, 0);
                placed += 1;
            }
            attempts += 1;
        }
        placed
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::ShapeKind;

    fn board_from_rows(rows: &[&str]) -> Board {
        let mut board = Board::new(rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '#' => board.set_cell(x, y, Cell::Placed, 1),
                    '+' => board.set_cell(x, y, Cell::Prefilled, 0),
                    _ => {}
                }
            }
        }
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(7);
        assert_eq!(board.size(), 7);
        assert_eq!(board.occupied_count(), 0);
        assert!(board.rows().all(|row| row.iter().all(|c| c.is_empty())));
        assert!(board.age_rows().all(|row| row.iter().all(|&a| a == 0)));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_board_size_too_small() {
        let _ = Board::new(2);
    }

    #[test]
    fn test_cell_codes() {
        assert_eq!(Cell::Empty.code(), 0);
        assert_eq!(Cell::Placed.code(), 1);
        assert_eq!(Cell::Prefilled.code(), 2);
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let board = Board::new(7);
        let bar = ShapeKind::I.base_shape();
        assert!(board.validate_placement(0, 0, &bar));
        assert!(board.validate_placement(3, 6, &bar));
        assert!(!board.validate_placement(4, 0, &bar));
        assert!(!board.validate_placement(-1, 0, &bar));
        assert!(!board.validate_placement(0, -1, &bar));
        assert!(!board.validate_placement(0, 7, &bar));
        assert!(!board.validate_placement(i32::MAX, 0, &bar));
    }

    #[test]
    fn test_validate_only_checks_filled_cells() {
        // Empty cells of the bounding box may sit on occupied board cells.
        let board = board_from_rows(&["#...", "....", "....", "...."]);
        let l = ShapeKind::L.base_shape(); // "..#\n###"
        let j = ShapeKind::J.base_shape(); // "#..\n###"
        assert!(board.validate_placement(0, 0, &l));
        assert!(!board.validate_placement(0, 0, &j));
        assert!(board.validate_placement(1, 0, &j));
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let board = board_from_rows(&["....", ".+..", "....", "...."]);
        let o = ShapeKind::O.base_shape();
        assert!(!board.validate_placement(0, 0, &o));
        assert!(!board.validate_placement(1, 1, &o));
        assert!(board.validate_placement(2, 0, &o));
        assert!(board.validate_placement(2, 2, &o));
    }

    #[test]
    fn test_validate_is_pure() {
        let board = board_from_rows(&["#...", "....", "....", "...+"]);
        let before = board.clone();
        for y in -2..6 {
            for x in -2..6 {
                let _ = board.validate_placement(x, y, &ShapeKind::T.base_shape());
            }
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_fill_shape_stamps_age() {
        let mut board = Board::new(5);
        let t = ShapeKind::T.base_shape();
        board.fill_shape(1, 2, &t, Cell::Placed, 9);
        assert_eq!(board.cell(2, 2), Cell::Placed);
        assert_eq!(board.age(2, 2), 9);
        for x in 1..4 {
            assert_eq!(board.cell(x, 3), Cell::Placed);
            assert_eq!(board.age(x, 3), 9);
        }
        assert_eq!(board.cell(1, 2), Cell::Empty);
        assert_eq!(board.age(1, 2), 0);
        assert_eq!(board.occupied_count(), 4);
    }

    #[test]
    fn test_fill_counts_and_full_lines() {
        let board = board_from_rows(&["####", "#..#", "####", "#..#"]);
        assert_eq!(board.row_fill_count(0), 4);
        assert_eq!(board.row_fill_count(1), 2);
        assert_eq!(board.col_fill_count(0), 4);
        assert_eq!(board.col_fill_count(1), 2);
        assert_eq!(board.full_rows(), vec![0, 2]);
        assert_eq!(board.full_cols(), vec![0, 3]);
    }

    #[test]
    fn test_clear_row_and_col() {
        let mut board = board_from_rows(&["####", "#..#", "#..#", "#..#"]);
        board.clear_row(0);
        board.clear_col(0);
        assert_eq!(board.row_fill_count(0), 0);
        assert_eq!(board.col_fill_count(0), 0);
        assert_eq!(board.occupied_count(), 3);
        assert!((0..4).all(|x| board.age(x, 0) == 0));
    }

    #[test]
    fn test_set_cell_empty_resets_age() {
        let mut board = Board::new(4);
        board.set_cell(1, 1, Cell::Placed, 5);
        board.set_cell(1, 1, Cell::Empty, 5);
        assert_eq!(board.age(1, 1), 0);
    }

    #[test]
    fn test_legal_origins() {
        let board = board_from_rows(&["####", "####", "####", "###."]);
        let one = ShapeKind::One.base_shape();
        assert_eq!(board.legal_origins(&one).collect::<Vec<_>>(), vec![(3, 3)]);
        assert!(board.fits_anywhere(&one));
        assert!(!board.fits_anywhere(&ShapeKind::Two.base_shape()));
    }

    #[test]
    fn test_prefill_random() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut board = Board::new(7);
        let placed = board.prefill_random(&mut rng, 5, 100);
        assert_eq!(placed, 5);
        assert_eq!(board.occupied_count(), 5);
        for row in board.rows() {
            for cell in row {
                assert!(matches!(cell, Cell::Empty | Cell::Prefilled));
            }
        }
        assert!(board.age_rows().flatten().all(|&age| age == 0));
    }

    #[test]
    fn test_prefill_gives_up_when_full() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut board = Board::new(4);
        let placed = board.prefill_random(&mut rng, 20, 100);
        assert!(placed <= 16);
        assert_eq!(board.occupied_count(), placed);
    }
}
