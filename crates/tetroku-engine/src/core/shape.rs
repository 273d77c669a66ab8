use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest number of rows or columns any shape may span.
pub const MAX_SHAPE_DIM: usize = 4;

/// Polyomino shape stored as a small binary matrix.
///
/// Each row is a bitmask where bit `c` is set when the cell at column `c` is
/// present. Shapes are immutable values; rotations return new shapes.
///
/// # Example
///
/// ```
/// use tetroku_engine::Shape;
///
/// let l = Shape::from_matrix([[0, 0, 1], [1, 1, 1]]);
/// let rotated = l.rotated_right();
///
/// assert_eq!((rotated.rows(), rotated.cols()), (3, 2));
/// assert_eq!(rotated.to_string(), "#.\n#.\n##");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    mask: [u8; MAX_SHAPE_DIM],
}

impl Shape {
    /// Builds a shape from a `0`/`1` matrix.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is empty, larger than [`MAX_SHAPE_DIM`] in either
    /// direction, or contains values other than `0` and `1`.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_matrix<const R: usize, const C: usize>(matrix: [[u8; C]; R]) -> Self {
        assert!(R > 0 && R <= MAX_SHAPE_DIM);
        assert!(C > 0 && C <= MAX_SHAPE_DIM);
        let mut mask = [0; MAX_SHAPE_DIM];
        let mut r = 0;
        while r < R {
            let mut c = 0;
            while c < C {
                assert!(matrix[r][c] <= 1, "shape cells must be 0 or 1");
                if matrix[r][c] == 1 {
                    mask[r] |= 1 << c;
                }
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: R as u8,
            cols: C as u8,
            mask,
        }
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows as usize
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Returns whether the cell at `(row, col)` is present.
    ///
    /// Cells outside the matrix are reported as absent.
    #[must_use]
    pub const fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && (self.mask[row] & (1 << col)) != 0
    }

    /// Number of present cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        let mut count = 0;
        let mut r = 0;
        while r < MAX_SHAPE_DIM {
            count += self.mask[r].count_ones() as usize;
            r += 1;
        }
        count
    }

    /// Returns the 90° clockwise rotation.
    ///
    /// Dimensions swap, and `out[c][rows - 1 - r] = in[r][c]`.
    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        let rows = self.rows();
        let mut mask = [0; MAX_SHAPE_DIM];
        let mut r = 0;
        while r < rows {
            let mut c = 0;
            while c < self.cols() {
                if self.is_filled(r, c) {
                    mask[c] |= 1 << (rows - 1 - r);
                }
                c += 1;
            }
            r += 1;
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            mask,
        }
    }

    /// Applies [`Self::rotated_right`] `turns` times (modulo 4).
    #[must_use]
    pub const fn rotated(&self, turns: u8) -> Self {
        let mut shape = *self;
        let mut i = 0;
        while i < turns % 4 {
            shape = shape.rotated_right();
            i += 1;
        }
        shape
    }

    /// Returns `(col, row)` offsets of the present cells in row-major order.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows()).flat_map(move |r| {
            (0..self.cols()).filter_map(move |c| self.is_filled(r, c).then_some((c, r)))
        })
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({}x{}; ", self.rows, self.cols)?;
        for r in 0..self.rows() {
            if r > 0 {
                f.write_str("/")?;
            }
            for c in 0..self.cols() {
                f.write_str(if self.is_filled(r, c) { "1" } else { "0" })?;
            }
        }
        f.write_str(")")
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows() {
            if r > 0 {
                f.write_str("\n")?;
            }
            for c in 0..self.cols() {
                f.write_str(if self.is_filled(r, c) { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}

/// Identifier of a catalog shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum ShapeKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
    /// Single cell.
    #[serde(rename = "ONE")]
    One,
    /// Domino.
    #[serde(rename = "TWO")]
    Two,
    /// Straight tromino.
    #[serde(rename = "THREE")]
    Three,
    /// 2×3 block.
    #[serde(rename = "RECT2x3")]
    Rect2x3,
    /// 3×3 block.
    #[serde(rename = "NINE")]
    Nine,
}

impl ShapeKind {
    /// Number of shape kinds.
    pub const LEN: usize = 12;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::T,
        Self::Z,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Rect2x3,
        Self::Nine,
    ];

    pub const TETROMINOES: [Self; 7] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::T,
        Self::Z,
    ];

    /// Canonical (unrotated) shape of this kind.
    #[must_use]
    pub const fn base_shape(self) -> Shape {
        BASE_SHAPES[self as usize]
    }

    /// Returns the name used in configuration files.
    ///
    /// ```
    /// use tetroku_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::T.name(), "T");
    /// assert_eq!(ShapeKind::Rect2x3.name(), "RECT2x3");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I => "I",
            Self::J => "J",
            Self::L => "L",
            Self::O => "O",
            Self::S => "S",
            Self::T => "T",
            Self::Z => "Z",
            Self::One => "ONE",
            Self::Two => "TWO",
            Self::Three => "THREE",
            Self::Rect2x3 => "RECT2x3",
            Self::Nine => "NINE",
        }
    }

    /// Parses a name produced by [`Self::name`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const BASE_SHAPES: [Shape; ShapeKind::LEN] = [
    // I
    Shape::from_matrix([[1, 1, 1, 1]]),
    // J
    Shape::from_matrix([[1, 0, 0], [1, 1, 1]]),
    // L
    Shape::from_matrix([[0, 0, 1], [1, 1, 1]]),
    // O
    Shape::from_matrix([[1, 1], [1, 1]]),
    // S
    Shape::from_matrix([[0, 1, 1], [1, 1, 0]]),
    // T
    Shape::from_matrix([[0, 1, 0], [1, 1, 1]]),
    // Z
    Shape::from_matrix([[1, 1, 0], [0, 1, 1]]),
    // ONE
    Shape::from_matrix([[1]]),
    // TWO
    Shape::from_matrix([[1, 1]]),
    // THREE
    Shape::from_matrix([[1, 1, 1]]),
    // RECT2x3
    Shape::from_matrix([[1, 1, 1], [1, 1, 1]]),
    // NINE
    Shape::from_matrix([[1, 1, 1], [1, 1, 1], [1, 1, 1]]),
];

/// A shape dealt from the bag, remembering which catalog entry it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: ShapeKind,
    shape: Shape,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: ShapeKind, shape: Shape) -> Self {
        Self { kind, shape }
    }

    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }
}

/// Read-only set of shapes the bag deals from.
///
/// Serialized as the list of shape names, e.g. `["I", "O", "ONE"]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Vec<ShapeKind>", into = "Vec<ShapeKind>")]
pub struct ShapeCatalog {
    kinds: Vec<ShapeKind>,
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<Vec<ShapeKind>> for ShapeCatalog {
    fn from(kinds: Vec<ShapeKind>) -> Self {
        Self::from_kinds(kinds)
    }
}

impl From<ShapeCatalog> for Vec<ShapeKind> {
    fn from(catalog: ShapeCatalog) -> Self {
        catalog.kinds
    }
}

impl ShapeCatalog {
    /// All twelve shapes: tetrominoes plus the small and block shapes.
    #[must_use]
    pub fn standard() -> Self {
        Self::from_kinds(ShapeKind::ALL)
    }

    /// The seven classic tetrominoes only.
    #[must_use]
    pub fn tetrominoes() -> Self {
        Self::from_kinds(ShapeKind::TETROMINOES)
    }

    /// Builds a catalog from the given kinds, dropping duplicates while
    /// keeping the first occurrence order.
    #[must_use]
    pub fn from_kinds(kinds: impl IntoIterator<Item = ShapeKind>) -> Self {
        let mut unique = Vec::new();
        for kind in kinds {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }
        Self { kinds: unique }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ShapeKind> + '_ {
        self.kinds.iter().copied()
    }

    #[must_use]
    pub fn contains(&self, kind: ShapeKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Looks up the base shape of `kind`, or `None` if the catalog omits it.
    #[must_use]
    pub fn get(&self, kind: ShapeKind) -> Option<Shape> {
        self.contains(kind).then(|| kind.base_shape())
    }

    /// Largest row or column span among the catalog's shapes, in any rotation.
    #[must_use]
    pub fn max_extent(&self) -> usize {
        self.kinds()
            .map(|kind| {
                let shape = kind.base_shape();
                usize::max(shape.rows(), shape.cols())
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_matrix_dimensions() {
        let shape = Shape::from_matrix([[1, 1, 1, 1]]);
        assert_eq!(shape.rows(), 1);
        assert_eq!(shape.cols(), 4);
        assert_eq!(shape.cell_count(), 4);
        assert!(shape.is_filled(0, 3));
        assert!(!shape.is_filled(1, 0));
        assert!(!shape.is_filled(0, 4));
    }

    #[test]
    fn test_rotation_formula() {
        // out[c][rows - 1 - r] = in[r][c]
        let shape = ShapeKind::J.base_shape();
        let rotated = shape.rotated_right();
        assert_eq!((rotated.rows(), rotated.cols()), (shape.cols(), shape.rows()));
        for r in 0..shape.rows() {
            for c in 0..shape.cols() {
                assert_eq!(
                    rotated.is_filled(c, shape.rows() - 1 - r),
                    shape.is_filled(r, c),
                    "mismatch at ({r}, {c})"
                );
            }
        }
    }

    #[test]
    fn test_rotation_examples() {
        let t = ShapeKind::T.base_shape();
        assert_eq!(t.to_string(), ".#.\n###");
        assert_eq!(t.rotated_right().to_string(), "#.\n##\n#.");
        assert_eq!(t.rotated(2).to_string(), "###\n.#.");
        assert_eq!(t.rotated(3).to_string(), ".#\n##\n.#");

        let i = ShapeKind::I.base_shape();
        assert_eq!(i.rotated_right().to_string(), "#\n#\n#\n#");
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in ShapeKind::ALL {
            let shape = kind.base_shape();
            assert_eq!(shape.rotated(4), shape, "{kind}");
            assert_eq!(
                shape.rotated_right().rotated_right().rotated_right().rotated_right(),
                shape,
                "{kind}"
            );
        }
    }

    #[test]
    fn test_rotation_preserves_cell_count() {
        for kind in ShapeKind::ALL {
            let shape = kind.base_shape();
            for turns in 0..4 {
                assert_eq!(shape.rotated(turns).cell_count(), shape.cell_count());
            }
        }
    }

    #[test]
    fn test_occupied_positions_row_major() {
        let s = ShapeKind::S.base_shape();
        let positions: Vec<_> = s.occupied_positions().collect();
        assert_eq!(positions, vec![(1, 0), (2, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ShapeKind::from_name("X"), None);
        assert_eq!(ShapeKind::from_name("rect2x3"), None);
    }

    #[test]
    fn test_kind_serde_uses_names() {
        let json = serde_json::to_string(&ShapeKind::Rect2x3).unwrap();
        assert_eq!(json, "\"RECT2x3\"");
        let kind: ShapeKind = serde_json::from_str("\"NINE\"").unwrap();
        assert_eq!(kind, ShapeKind::Nine);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = ShapeCatalog::tetrominoes();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.get(ShapeKind::O), Some(ShapeKind::O.base_shape()));
        assert_eq!(catalog.get(ShapeKind::Nine), None);
        assert_eq!(catalog.max_extent(), 4);
    }

    #[test]
    fn test_catalog_deduplicates() {
        let catalog =
            ShapeCatalog::from_kinds([ShapeKind::One, ShapeKind::Two, ShapeKind::One]);
        assert_eq!(
            catalog.kinds().collect::<Vec<_>>(),
            vec![ShapeKind::One, ShapeKind::Two]
        );
    }

    #[test]
    fn test_catalog_serde() {
        let catalog: ShapeCatalog = serde_json::from_str(r#"["ONE", "T", "NINE"]"#).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains(ShapeKind::T));
        assert_eq!(catalog.max_extent(), 3);
        assert_eq!(
            serde_json::to_string(&catalog).unwrap(),
            r#"["ONE","T","NINE"]"#
        );
    }
}
