use tetroku_engine::{Board, Shape};

/// Neighbourhood (in cells) searched when the centred origin is illegal.
pub const SNAP_RADIUS: i32 = 2;

/// Origin that centres `shape` on board cell `(x, y)`.
#[must_use]
pub fn centred_origin(shape: &Shape, x: i32, y: i32) -> (i32, i32) {
    let half = |n: usize| i32::try_from(n / 2).unwrap_or(0);
    (x - half(shape.cols()), y - half(shape.rows()))
}

/// Legal origin for `shape` closest to the one centred on `cell`.
///
/// The centred origin wins when it is legal. Otherwise every board cell
/// within [`SNAP_RADIUS`] of `cell` is tried and the one nearest by
/// Euclidean distance wins; ties go to the first cell in row-major order.
#[must_use]
pub fn snap_origin(board: &Board, shape: &Shape, cell: (i32, i32)) -> Option<(i32, i32)> {
    let (x, y) = cell;
    let direct = centred_origin(shape, x, y);
    if board.validate_placement(direct.0, direct.1, shape) {
        return Some(direct);
    }

    let mut best: Option<((i32, i32), i32)> = None;
    for dy in -SNAP_RADIUS..=SNAP_RADIUS {
        for dx in -SNAP_RADIUS..=SNAP_RADIUS {
            if (dx, dy) == (0, 0) || board.cell_at(x + dx, y + dy).is_none() {
                continue;
            }
            let origin = centred_origin(shape, x + dx, y + dy);
            if !board.validate_placement(origin.0, origin.1, shape) {
                continue;
            }
            // Squared distance orders the same as Euclidean distance.
            let dist = dx * dx + dy * dy;
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((origin, dist));
            }
        }
    }
    best.map(|(origin, _)| origin)
}

/// Keyboard cursor over the board plus the last legal origin it produced.
///
/// When the cursor moves somewhere the selected piece cannot be placed
/// near, the previous target sticks.
#[derive(Debug, Clone)]
pub struct PlacementCursor {
    cell: (i32, i32),
    size: i32,
    last_valid: Option<(i32, i32)>,
}

impl PlacementCursor {
    /// Cursor in the middle of a `size`×`size` board.
    #[must_use]
    pub fn new(size: usize) -> Self {
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        Self {
            cell: (size / 2, size / 2),
            size,
            last_valid: None,
        }
    }

    #[must_use]
    pub fn cell(&self) -> (i32, i32) {
        self.cell
    }

    /// Moves the cursor, staying on the board.
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let clamp = |v: i32| v.clamp(0, self.size - 1);
        self.cell = (clamp(self.cell.0 + dx), clamp(self.cell.1 + dy));
    }

    /// Forgets the sticky target, e.g. when another piece is picked.
    pub fn reset(&mut self) {
        self.last_valid = None;
    }

    /// Origin to place `shape` at for the current cursor position.
    pub fn target(&mut self, board: &Board, shape: &Shape) -> Option<(i32, i32)> {
        if let Some(origin) = snap_origin(board, shape, self.cell) {
            self.last_valid = Some(origin);
        }
        self.last_valid
    }
}
