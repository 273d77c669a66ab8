use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::shape::{Piece, ShapeCatalog, ShapeKind};

/// Shape dealt when a drawn identifier is missing from the catalog.
const FALLBACK_KIND: ShapeKind = ShapeKind::T;

/// Default number of copies of each catalog shape per bag.
pub const DEFAULT_BAG_COPIES: usize = 2;

/// Shuffled multiset dispenser for hand pieces.
///
/// # Bag System
///
/// 1. The bag is filled with `copies` identifiers of every catalog shape
/// 2. The bag is shuffled (Fisher–Yates)
/// 3. Identifiers are drawn one at a time
/// 4. When the bag runs out, the next draw refills and reshuffles it first
///
/// Each drawn shape is rotated by a uniformly random number of quarter turns.
///
/// # Example
///
/// ```
/// use tetroku_engine::{PieceBag, ShapeCatalog};
///
/// let mut bag = PieceBag::new(ShapeCatalog::tetrominoes(), 2);
/// assert_eq!(bag.remaining(), 14);
///
/// let piece = bag.draw();
/// assert!(ShapeCatalog::tetrominoes().contains(piece.kind()));
/// assert_eq!(bag.remaining(), 13);
/// ```
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg32,
    catalog: ShapeCatalog,
    copies: usize,
    bag: Vec<ShapeKind>,
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed, serialized as 32 hex characters. Two bags (or sessions)
/// built from the same seed deal the same pieces in the same rotations.
///
/// # Example
///
/// ```
/// use rand::Rng as _;
/// use tetroku_engine::{PieceBag, PieceSeed, ShapeCatalog};
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceBag::with_seed(ShapeCatalog::standard(), 2, seed);
/// let mut b = PieceBag::with_seed(ShapeCatalog::standard(), 2, seed);
/// assert_eq!(a.draw(), b.draw());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    pub(crate) fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{:032x}", self.as_u128()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed: expected 32 hex characters, got {input:?}")]
pub struct ParseSeedError {
    #[error(not(source))]
    input: String,
}

impl std::str::FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self::from_u128(num))
    }
}

impl std::fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", self.as_u128())
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceBag {
    /// Creates a bag with a random seed, filled and shuffled.
    ///
    /// For deterministic dealing, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new(catalog: ShapeCatalog, copies: usize) -> Self {
        Self::with_seed(catalog, copies, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed.
    #[must_use]
    pub fn with_seed(catalog: ShapeCatalog, copies: usize, seed: PieceSeed) -> Self {
        let mut this = Self {
            rng: seed.rng(),
            bag: Vec::with_capacity(catalog.len() * copies),
            catalog,
            copies,
        };
        this.refill();
        this
    }

    #[must_use]
    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    /// Number of identifiers left before the next refill.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Identifiers still in the bag, next to be drawn first.
    pub fn upcoming(&self) -> impl Iterator<Item = ShapeKind> + '_ {
        self.bag.iter().rev().copied()
    }

    /// Resets the bag to `copies` of every catalog shape and shuffles it.
    pub fn refill(&mut self) {
        self.bag.clear();
        for _ in 0..self.copies {
            self.bag.extend(self.catalog.kinds());
        }
        self.bag.shuffle(&mut self.rng);
    }

    /// Draws the next piece, refilling the bag first if it is empty.
    ///
    /// The piece is rotated by 0–3 random quarter turns.
    pub fn draw(&mut self) -> Piece {
        if self.bag.is_empty() {
            self.refill();
        }
        let kind = self.bag.pop().unwrap_or(FALLBACK_KIND);
        let (kind, shape) = match self.catalog.get(kind) {
            Some(shape) => (kind, shape),
            None => {
                tracing::warn!(%kind, "drawn shape missing from catalog, dealing fallback");
                (FALLBACK_KIND, FALLBACK_KIND.base_shape())
            }
        };
        let turns = self.rng.random_range(0..4);
        Piece::new(kind, shape.rotated(turns))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn seed() -> PieceSeed {
        PieceSeed::from_bytes([
            0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
            0x77, 0x88,
        ])
    }

    #[test]
    fn test_new_bag_holds_two_of_each() {
        let bag = PieceBag::with_seed(ShapeCatalog::standard(), 2, seed());
        assert_eq!(bag.remaining(), 24);
        let mut counts = HashMap::new();
        for kind in bag.upcoming() {
            *counts.entry(kind).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), ShapeKind::LEN);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_fourteen_draws_empty_the_bag() {
        let mut bag = PieceBag::with_seed(ShapeCatalog::tetrominoes(), 2, seed());
        let mut counts = HashMap::new();
        for _ in 0..14 {
            *counts.entry(bag.draw().kind()).or_insert(0) += 1;
        }
        assert_eq!(bag.remaining(), 0);
        assert_eq!(counts.len(), 7);
        assert!(counts.values().all(|&n| n == 2));

        // The 15th draw reshuffles a fresh bag before dealing.
        let piece = bag.draw();
        assert!(ShapeCatalog::tetrominoes().contains(piece.kind()));
        assert_eq!(bag.remaining(), 13);
    }

    #[test]
    fn test_drawn_piece_is_a_rotation_of_its_kind() {
        let mut bag = PieceBag::with_seed(ShapeCatalog::standard(), 2, seed());
        for _ in 0..100 {
            let piece = bag.draw();
            let base = piece.kind().base_shape();
            assert!(
                (0..4).any(|turns| base.rotated(turns) == *piece.shape()),
                "{:?} is not a rotation of {}",
                piece.shape(),
                piece.kind()
            );
        }
    }

    #[test]
    fn test_rotations_vary() {
        let mut bag = PieceBag::with_seed(ShapeCatalog::from_kinds([ShapeKind::I]), 2, seed());
        let mut vertical = 0;
        let mut horizontal = 0;
        for _ in 0..200 {
            if bag.draw().shape().rows() == 4 {
                vertical += 1;
            } else {
                horizontal += 1;
            }
        }
        assert!(vertical > 0 && horizontal > 0);
    }

    #[test]
    fn test_single_copy_bag() {
        let mut bag = PieceBag::with_seed(ShapeCatalog::tetrominoes(), 1, seed());
        assert_eq!(bag.remaining(), 7);
        let mut kinds: Vec<_> = (0..7).map(|_| bag.draw().kind()).collect();
        kinds.sort();
        assert_eq!(kinds, ShapeKind::TETROMINOES.to_vec());
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut bag1 = PieceBag::with_seed(ShapeCatalog::standard(), 2, seed());
        let mut bag2 = PieceBag::with_seed(ShapeCatalog::standard(), 2, seed());
        for _ in 0..50 {
            assert_eq!(bag1.draw(), bag2.draw());
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
            assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_parse_accepts_uppercase() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.as_u128(), 0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
        }

        #[test]
        fn test_parse_errors() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
            ] {
                let err = input.parse::<PieceSeed>().unwrap_err();
                assert!(err.to_string().contains("invalid seed"), "{input}: {err}");
                let json = format!("\"{input}\"");
                assert!(serde_json::from_str::<PieceSeed>(&json).is_err());
            }
        }
    }
}
