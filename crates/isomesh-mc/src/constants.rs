//! Shared constants for isomesh-mc.

pub(crate) const CASE_COUNT: usize = 256; // 2^8 corner sign patterns
pub(crate) const TRI_ROW_LEN: usize = 16; // 5 triples + terminator
pub(crate) const EDGE_COUNT: usize = 12;
pub(crate) const CORNER_COUNT: usize = 8;
pub(crate) const MAX_TRIANGLES_PER_CELL: usize = 5;

/// Empty edge-vertex slot.
pub(crate) const UNASSIGNED: u32 = u32::MAX;

/// Voxel centres sit half a voxel in from the sample index.
pub(crate) const VOXEL_CENTER_OFFSET: f64 = 0.5;

// Slices between progress log lines
pub(crate) const PROGRESS_LOG_INTERVAL: usize = 50;
