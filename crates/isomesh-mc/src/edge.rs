//! Cell corner and edge layout.
//!
//! ```text
//!        4 ________ 5          y
//!        /|       /|           |
//!     7 /_|_____6/ |           |____ x
//!       | |______|_|          /
//!       | /0     | / 1       z
//!       |/_______|/
//!      3          2
//! ```
//!
//! Corner `i` of the cell at cell index `(cx, cy, cz)` samples voxel
//! `(cx - 1, cy - 1, cz - 1) + CORNERS[i]`, so border cells straddle the volume
//! faces. Swapping y and z relative to the usual textbook drawing is what makes
//! the triangle table wind outward toward values `<= threshold`.

use crate::constants::{CORNER_COUNT, EDGE_COUNT};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// Returns the `[0..3)` index of this axis.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit step along this axis.
    #[inline]
    pub fn delta(self) -> [i32; 3] {
        match self {
            Axis::X => [1, 0, 0],
            Axis::Y => [0, 1, 0],
            Axis::Z => [0, 0, 1],
        }
    }
}

/// Local `(dx, dy, dz)` offset of each cell corner.
pub const CORNERS: [[i32; 3]; CORNER_COUNT] = [
    [0, 0, 0],
    [1, 0, 0],
    [1, 0, 1],
    [0, 0, 1],
    [0, 1, 0],
    [1, 1, 0],
    [1, 1, 1],
    [0, 1, 1],
];

/// One of the 12 cell edges, oriented from its lower to its upper corner along `axis`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Edge {
    pub lo: usize,
    pub hi: usize,
    pub axis: Axis,
}

impl Edge {
    /// Offset of the lower corner; doubles as the cache column/layer offset
    /// (`dx`, `dy` select the column, `dz` selects current vs next layer).
    #[inline]
    pub fn origin(self) -> [i32; 3] {
        CORNERS[self.lo]
    }
}

const fn edge(lo: usize, hi: usize, axis: Axis) -> Edge {
    Edge { lo, hi, axis }
}

pub const EDGES: [Edge; EDGE_COUNT] = [
    edge(0, 1, Axis::X),
    edge(1, 2, Axis::Z),
    edge(3, 2, Axis::X),
    edge(0, 3, Axis::Z),
    edge(4, 5, Axis::X),
    edge(5, 6, Axis::Z),
    edge(7, 6, Axis::X),
    edge(4, 7, Axis::Z),
    edge(0, 4, Axis::Y),
    edge(1, 5, Axis::Y),
    edge(2, 6, Axis::Y),
    edge(3, 7, Axis::Y),
];
