//! Marching-cubes isosurface extraction over borrowed scalar volumes.
//!
//! Vertices are shared between neighbouring cells through a two-layer edge
//! cache, so output meshes are indexed with no duplicate crossings.
#![forbid(unsafe_code)]

mod constants;

pub mod cache;
pub mod case;
pub mod edge;
pub mod extract;
pub mod interp;
pub mod mesh;
pub mod roi;
pub mod slab;
pub mod tables;

pub use extract::{Extraction, SliceProgress, Status, extract, extract_with_progress};
pub use isomesh_volume::{Dims, Pitch, Sample, Volume, VolumeError, VoxelBox};
pub use mesh::IsoMesh;
pub use slab::extract_slabs;

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    #[error("mesh exceeds {} vertices; indices no longer fit in u32", u32::MAX)]
    VertexIndexOverflow,
}
