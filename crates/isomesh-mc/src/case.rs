use isomesh_volume::{Sample, Volume};

use crate::constants::CORNER_COUNT;
use crate::edge::CORNERS;
use crate::tables::{EDGE_TABLE, triangles};

/// Corner samples of one cell; `None` marks a corner outside the volume.
pub type Corners<T> = [Option<T>; CORNER_COUNT];

/// Topology of one cell: the 8-bit case id and its 12-bit active-edge mask.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CellCase {
    pub id: u8,
    pub edges: u16,
}

impl CellCase {
    #[inline]
    pub fn is_empty(self) -> bool {
        self.edges == 0
    }

    #[inline]
    pub fn edge_active(self, edge: usize) -> bool {
        (self.edges >> edge) & 1 == 1
    }

    /// Edge triples to emit, in table order.
    #[inline]
    pub fn triangles(self) -> impl Iterator<Item = [usize; 3]> {
        triangles(self.id)
    }
}

/// Samples the 8 corners of cell `(cx, cy, cz)`. Cell indices run over
/// `0..=dim`, so corners may fall one voxel outside the volume on any side.
#[inline]
pub fn sample_corners<T: Sample>(vol: &Volume<'_, T>, cx: usize, cy: usize, cz: usize) -> Corners<T> {
    let (bx, by, bz) = (cx as isize - 1, cy as isize - 1, cz as isize - 1);
    let mut out = [None; CORNER_COUNT];
    for (slot, [dx, dy, dz]) in out.iter_mut().zip(CORNERS) {
        *slot = vol.get(bx + dx as isize, by + dy as isize, bz + dz as isize);
    }
    out
}

/// Bit `i` is set iff corner `i` lies in the volume and exceeds `threshold`.
#[inline]
pub fn classify<T: Sample>(corners: &Corners<T>, threshold: T) -> CellCase {
    let mut id = 0u8;
    for (i, c) in corners.iter().enumerate() {
        if matches!(c, Some(v) if *v > threshold) {
            id |= 1 << i;
        }
    }
    CellCase {
        id,
        edges: EDGE_TABLE[id as usize],
    }
}
