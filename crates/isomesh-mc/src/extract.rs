use std::ops::ControlFlow;
use std::time::Instant;

use isomesh_volume::{Sample, Volume, VoxelBox};

use crate::ExtractError;
use crate::cache::{EdgeCache, Layer};
use crate::case::{Corners, classify, sample_corners};
use crate::constants::{EDGE_COUNT, PROGRESS_LOG_INTERVAL, UNASSIGNED};
use crate::edge::{EDGES, Edge};
use crate::interp::{edge_fraction, edge_position};
use crate::mesh::IsoMesh;
use crate::roi::CellRange;

/// Reported after each finished z-slice.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SliceProgress {
    /// Cell z index of the slice just finished.
    pub slice: usize,
    pub done: usize,
    pub total: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Complete,
    /// Stopped between slices; the mesh holds every slice before that point.
    Cancelled { slices_done: usize },
}

#[derive(Clone, Debug)]
pub struct Extraction {
    pub mesh: IsoMesh,
    pub status: Status,
}

impl Extraction {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }
}

/// Extracts the `threshold` isosurface of `vol`, optionally restricted to `roi`.
pub fn extract<T: Sample>(
    vol: &Volume<'_, T>,
    threshold: T,
    roi: Option<&VoxelBox>,
) -> Result<IsoMesh, ExtractError> {
    extract_with_progress(vol, threshold, roi, |_| ControlFlow::Continue(())).map(|x| x.mesh)
}

/// Like [`extract`], calling `progress` after every z-slice. Returning
/// `ControlFlow::Break` stops before the next slice and yields the partial mesh.
pub fn extract_with_progress<T, F>(
    vol: &Volume<'_, T>,
    threshold: T,
    roi: Option<&VoxelBox>,
    mut progress: F,
) -> Result<Extraction, ExtractError>
where
    T: Sample,
    F: FnMut(SliceProgress) -> ControlFlow<()>,
{
    let t0 = Instant::now();
    let range = CellRange::for_roi(vol.dims(), roi);
    if range.is_empty() {
        log::debug!(target: "isomesh", "roi {:?} misses the volume; nothing to scan", roi);
        return Ok(Extraction {
            mesh: IsoMesh::default(),
            status: Status::Complete,
        });
    }
    let total = range.slices();
    let mut marcher = Marcher::new(vol, threshold, &range);
    let mut status = Status::Complete;

    for (done, cz) in range.z.clone().enumerate().map(|(i, cz)| (i + 1, cz)) {
        marcher.march_slice(cz)?;
        if done % PROGRESS_LOG_INTERVAL == 0 {
            log::debug!(target: "isomesh", "{}/{} slices done", done, total);
        }
        let step = SliceProgress {
            slice: cz,
            done,
            total,
        };
        // A break after the last slice changes nothing.
        if progress(step).is_break() && done < total {
            status = Status::Cancelled { slices_done: done };
            break;
        }
    }

    let mesh = marcher.finish();
    match status {
        Status::Complete => log::debug!(
            target: "isomesh",
            "mesh size vtx: {} tris: {} ({} ms)",
            mesh.vertex_count(),
            mesh.triangle_count(),
            t0.elapsed().as_millis()
        ),
        Status::Cancelled { slices_done } => log::warn!(
            target: "isomesh",
            "extraction cancelled after {}/{} slices (vtx: {} tris: {})",
            slices_done,
            total,
            mesh.vertex_count(),
            mesh.triangle_count()
        ),
    }
    Ok(Extraction { mesh, status })
}

/// Single pass over a contiguous run of z-slices with its own cache pair.
pub(crate) struct Marcher<'v, 'a, T> {
    vol: &'v Volume<'a, T>,
    threshold: T,
    range: &'v CellRange,
    cache: EdgeCache,
    mesh: IsoMesh,
}

impl<'v, 'a, T: Sample> Marcher<'v, 'a, T> {
    pub(crate) fn new(vol: &'v Volume<'a, T>, threshold: T, range: &'v CellRange) -> Self {
        // Inside-voxel count is a cheap proxy for surface size.
        let estimate = range
            .voxel_window(vol.dims())
            .map_or(0, |(lo, hi)| vol.count_above(threshold, lo, hi));
        Self {
            vol,
            threshold,
            range,
            cache: EdgeCache::new(vol.dims()),
            mesh: IsoMesh::with_capacity(estimate, estimate),
        }
    }

    #[inline]
    pub(crate) fn cache(&self) -> &EdgeCache {
        &self.cache
    }

    pub(crate) fn finish(self) -> IsoMesh {
        self.mesh
    }

    /// Rolls the cache forward and polygonises every cell of slice `cz`.
    pub(crate) fn march_slice(&mut self, cz: usize) -> Result<(), ExtractError> {
        self.cache.advance();
        for cy in self.range.y.clone() {
            for cx in self.range.x.clone() {
                self.march_cell(cx, cy, cz)?;
            }
        }
        Ok(())
    }

    #[inline]
    fn march_cell(&mut self, cx: usize, cy: usize, cz: usize) -> Result<(), ExtractError> {
        let corners = sample_corners(self.vol, cx, cy, cz);
        let case = classify(&corners, self.threshold);
        if case.is_empty() {
            return Ok(());
        }
        let mut ids = [UNASSIGNED; EDGE_COUNT];
        for (i, edge) in EDGES.iter().enumerate() {
            if case.edge_active(i) {
                ids[i] = self.resolve_edge(cx, cy, cz, *edge, &corners)?;
            }
        }
        for [a, b, c] in case.triangles() {
            self.mesh.push_triangle([ids[a], ids[b], ids[c]]);
        }
        Ok(())
    }

    fn resolve_edge(
        &mut self,
        cx: usize,
        cy: usize,
        cz: usize,
        edge: Edge,
        corners: &Corners<T>,
    ) -> Result<u32, ExtractError> {
        let [dx, dy, dz] = edge.origin();
        let threshold = self.threshold;
        let pitch = self.vol.pitch();
        let mesh = &mut self.mesh;
        self.cache.resolve(
            Layer::from_dz(dz),
            cx + dx as usize,
            cy + dy as usize,
            edge.axis,
            || {
                let t = edge_fraction(corners[edge.lo], corners[edge.hi], threshold);
                let voxel = [
                    cx as isize - 1 + dx as isize,
                    cy as isize - 1 + dy as isize,
                    cz as isize - 1 + dz as isize,
                ];
                mesh.push_vertex(edge_position(voxel, edge.axis, t, pitch))
            },
        )
    }
}
