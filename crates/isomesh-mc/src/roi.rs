use std::ops::Range;

use isomesh_volume::{Dims, VoxelBox};

/// Half-open cell-index ranges to scan. Cell indices span `0..=dim` per axis;
/// cell `c` covers voxels `c - 1` and `c`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CellRange {
    pub x: Range<usize>,
    pub y: Range<usize>,
    pub z: Range<usize>,
}

impl CellRange {
    /// Every cell of the grid, border cells included.
    pub fn full(dims: Dims) -> Self {
        Self {
            x: 0..dims.w + 1,
            y: 0..dims.h + 1,
            z: 0..dims.d + 1,
        }
    }

    /// No cells at all.
    pub const fn empty() -> Self {
        Self {
            x: 0..0,
            y: 0..0,
            z: 0..0,
        }
    }

    /// Cells touching the voxel box plus a one-cell margin:
    /// `[max(0, min), min(max + 2, dim + 1))` per axis. A box that misses the
    /// cell grid on any axis scans nothing.
    pub fn for_roi(dims: Dims, roi: Option<&VoxelBox>) -> Self {
        let Some(roi) = roi else {
            return Self::full(dims);
        };
        let roi = roi.ordered();
        let n = dims.to_array();
        let axis = |k: usize| {
            let start = roi.min[k].max(0);
            let end = roi.max[k].saturating_add(2).min(n[k] as i64 + 1);
            (start < end).then(|| start as usize..end as usize)
        };
        match (axis(0), axis(1), axis(2)) {
            (Some(x), Some(y), Some(z)) => Self { x, y, z },
            _ => Self::empty(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    #[inline]
    pub fn slices(&self) -> usize {
        self.z.len()
    }

    /// Inclusive voxel window the scanned cells read from; `None` when no
    /// scanned cell touches a voxel.
    pub fn voxel_window(&self, dims: Dims) -> Option<([usize; 3], [usize; 3])> {
        if self.is_empty() {
            return None;
        }
        let n = dims.to_array();
        let ranges = [&self.x, &self.y, &self.z];
        let mut lo = [0; 3];
        let mut hi = [0; 3];
        for k in 0..3 {
            lo[k] = ranges[k].start.saturating_sub(1);
            hi[k] = (ranges[k].end - 1).min(n[k] - 1);
            if lo[k] > hi[k] {
                return None;
            }
        }
        Some((lo, hi))
    }

    /// Splits the z range into at most `parts` contiguous, non-empty pieces.
    pub fn split_z(&self, parts: usize) -> Vec<CellRange> {
        let len = self.z.len();
        let parts = parts.clamp(1, len.max(1));
        let base = len / parts;
        let extra = len % parts;
        let mut out = Vec::with_capacity(parts);
        let mut start = self.z.start;
        for i in 0..parts {
            let n = base + usize::from(i < extra);
            out.push(CellRange {
                x: self.x.clone(),
                y: self.y.clone(),
                z: start..start + n,
            });
            start += n;
        }
        out
    }
}
