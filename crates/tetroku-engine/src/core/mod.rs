//! Static data structures: shapes, the shape catalog and the board.

pub use self::{board::*, shape::*};

pub(crate) mod board;
pub(crate) mod shape;
