//! Parallel extraction over contiguous z-slabs.
//!
//! Each slab runs its own [`Marcher`] with a private cache. Adjacent slabs
//! share one plane of X/Y edges: the earlier slab materialises them in its
//! final `Next` layer and the later slab again in its first `Current` layer.
//! Merging maps the later copies onto the earlier ones, which reproduces the
//! serial vertex and triangle order exactly.

use isomesh_volume::{Sample, Volume, VoxelBox};
use rayon::prelude::*;

use crate::ExtractError;
use crate::cache::{Layer, Slot};
use crate::constants::UNASSIGNED;
use crate::edge::Axis;
use crate::extract::{Marcher, extract};
use crate::mesh::IsoMesh;
use crate::roi::CellRange;

struct SlabOut {
    mesh: IsoMesh,
    /// `Current` plane right after the first slice.
    first: Vec<Slot>,
    /// `Next` plane after the last slice.
    last: Vec<Slot>,
}

fn march_slab<T: Sample>(
    vol: &Volume<'_, T>,
    threshold: T,
    range: &CellRange,
) -> Result<SlabOut, ExtractError> {
    let mut marcher = Marcher::new(vol, threshold, range);
    let mut first = None;
    for cz in range.z.clone() {
        marcher.march_slice(cz)?;
        if first.is_none() {
            first = Some(marcher.cache().plane(Layer::Current).to_vec());
        }
    }
    let last = marcher.cache().plane(Layer::Next).to_vec();
    Ok(SlabOut {
        mesh: marcher.finish(),
        first: first.unwrap_or_default(),
        last,
    })
}

/// Same result as [`extract`], computed as up to `slabs` independent z-slabs
/// on the current rayon pool.
pub fn extract_slabs<T: Sample>(
    vol: &Volume<'_, T>,
    threshold: T,
    roi: Option<&VoxelBox>,
    slabs: usize,
) -> Result<IsoMesh, ExtractError> {
    let range = CellRange::for_roi(vol.dims(), roi);
    let parts = range.split_z(slabs);
    if parts.len() <= 1 {
        return extract(vol, threshold, roi);
    }

    let outs = parts
        .par_iter()
        .map(|part| march_slab(vol, threshold, part))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!(target: "isomesh", "{} slabs done, merging", outs.len());
    merge(outs)
}

fn merge(outs: Vec<SlabOut>) -> Result<IsoMesh, ExtractError> {
    let vertices = outs.iter().map(|o| o.mesh.vertex_count()).sum();
    let triangles = outs.iter().map(|o| o.mesh.triangle_count()).sum();
    let mut merged = IsoMesh::with_capacity(vertices, triangles);
    // Previous slab's last plane, in merged index space.
    let mut seam: Option<Vec<Slot>> = None;

    for out in outs {
        let mut remap = vec![UNASSIGNED; out.mesh.vertex_count()];
        if let Some(prev) = &seam {
            for (a, b) in prev.iter().zip(&out.first) {
                for axis in [Axis::X, Axis::Y] {
                    let (pa, pb) = (a[axis.index()], b[axis.index()]);
                    if pa != UNASSIGNED && pb != UNASSIGNED {
                        remap[pb as usize] = pa;
                    }
                }
            }
        }
        for (ix, v) in out.mesh.vertices.iter().enumerate() {
            if remap[ix] == UNASSIGNED {
                remap[ix] = merged.push_vertex(*v)?;
            }
        }
        for tri in &out.mesh.triangles {
            merged.push_triangle(tri.map(|i| remap[i as usize]));
        }
        seam = Some(
            out.last
                .iter()
                .map(|slot| slot.map(|i| if i == UNASSIGNED { i } else { remap[i as usize] }))
                .collect(),
        );
    }
    Ok(merged)
}
