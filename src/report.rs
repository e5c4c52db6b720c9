use std::error::Error;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use isomesh_geom::Aabb;
use isomesh_mc::{
    Dims, ExtractError, IsoMesh, Pitch, Sample, SliceProgress, Status, Volume, VoxelBox,
    extract_slabs, extract_with_progress,
};
use rayon::ThreadPoolBuilder;

use crate::config::{ExtractCfg, SampleKind, Scene};
use crate::field;

#[derive(Clone, Debug)]
pub struct Report {
    pub vertices: usize,
    pub triangles: usize,
    pub bounds: Aabb,
    pub area: f64,
    pub open_edges: usize,
    pub non_manifold_edges: usize,
    pub status: Status,
    pub sample_time: Duration,
    pub extract_time: Duration,
}

impl Report {
    fn new(mesh: &IsoMesh, status: Status, sample_time: Duration, extract_time: Duration) -> Self {
        let (open_edges, non_manifold_edges) = mesh.edge_usage();
        Self {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            bounds: mesh.bounds(),
            area: mesh.surface_area(),
            open_edges,
            non_manifold_edges,
            status,
            sample_time,
            extract_time,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.triangles > 0 && self.open_edges == 0 && self.non_manifold_edges == 0
    }

    pub fn log(&self) {
        log::info!(
            "mesh: {} vertices, {} triangles ({:.1} ms sampling, {:.1} ms extraction)",
            self.vertices,
            self.triangles,
            self.sample_time.as_secs_f64() * 1000.0,
            self.extract_time.as_secs_f64() * 1000.0
        );
        if self.triangles == 0 {
            log::info!("no surface at this threshold");
            return;
        }
        let b = self.bounds;
        let size = b.extent();
        log::info!(
            "bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3}), size {:.3} x {:.3} x {:.3}, area {:.3}",
            b.min.x,
            b.min.y,
            b.min.z,
            b.max.x,
            b.max.y,
            b.max.z,
            size.x,
            size.y,
            size.z,
            self.area
        );
        if self.is_closed() {
            log::info!("surface is closed");
        } else {
            log::info!(
                "surface is open: {} boundary edges, {} non-manifold edges",
                self.open_edges,
                self.non_manifold_edges
            );
        }
        if let Status::Cancelled { slices_done } = self.status {
            log::warn!("time budget hit; mesh covers the first {} slices only", slices_done);
        }
    }
}

/// Samples the scene's field, extracts its isosurface and summarises the mesh.
pub fn run(scene: &Scene) -> Result<Report, Box<dyn Error>> {
    let [w, h, d] = scene.volume.dims;
    let dims = Dims::new(w, h, d);
    let pitch = Pitch::from(scene.volume.pitch);
    let roi = scene.extract.roi.map(|r| VoxelBox::new(r.min, r.max));

    let t0 = Instant::now();
    let values = field::sample(&scene.field, dims, pitch)?;
    let sample_time = t0.elapsed();
    log::debug!(
        "sampled {:?} field over {}x{}x{} voxels",
        scene.field.kind,
        w,
        h,
        d
    );

    let t1 = Instant::now();
    let budget = scene.extract.budget_ms.map(Duration::from_millis);
    let stop = |_: SliceProgress| over_budget(budget, t1.elapsed());
    let (mesh, status) = match scene.volume.sample {
        SampleKind::F32 => {
            let vol = Volume::new(&values, dims, pitch)?;
            extract_volume(&vol, scene.extract.threshold, roi.as_ref(), &scene.extract, &stop)?
        }
        SampleKind::U8 => {
            let range = scene.volume.quantize_range;
            let bytes = field::quantize_all(&values, range);
            let vol = Volume::new(&bytes, dims, pitch)?;
            let threshold = field::quantize(scene.extract.threshold, range);
            extract_volume(&vol, threshold, roi.as_ref(), &scene.extract, &stop)?
        }
    };
    Ok(Report::new(&mesh, status, sample_time, t1.elapsed()))
}

#[inline]
fn over_budget(budget: Option<Duration>, elapsed: Duration) -> bool {
    budget.is_some_and(|b| elapsed > b)
}

/// Runs the configured extractor. `stop` is polled after each slice of a
/// serial run; slab runs always complete.
fn extract_volume<T, F>(
    vol: &Volume<'_, T>,
    threshold: T,
    roi: Option<&VoxelBox>,
    cfg: &ExtractCfg,
    stop: &F,
) -> Result<(IsoMesh, Status), Box<dyn Error>>
where
    T: Sample,
    F: Fn(SliceProgress) -> bool + Sync,
{
    let job = || -> Result<(IsoMesh, Status), ExtractError> {
        if cfg.slabs > 1 {
            return Ok((extract_slabs(vol, threshold, roi, cfg.slabs)?, Status::Complete));
        }
        let out = extract_with_progress(vol, threshold, roi, |p| {
            if stop(p) { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
        })?;
        Ok((out.mesh, out.status))
    };

    if cfg.threads == 0 {
        return Ok(job()?);
    }
    let pool = ThreadPoolBuilder::new()
        .num_threads(cfg.threads)
        .thread_name(|i| format!("isomesh-slab-{i}"))
        .build()?;
    Ok(pool.install(job)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoiCfg;

    fn small_scene() -> Scene {
        let mut scene = Scene::default();
        scene.volume.dims = [20, 20, 20];
        scene.field.radius = 6.0;
        scene
    }

    #[test]
    fn sphere_scene_is_closed() {
        let report = run(&small_scene()).unwrap();
        assert!(report.triangles > 0);
        assert!(report.is_closed());
        assert_eq!(report.status, Status::Complete);
        // the shape is centred in a 20-unit box
        let c = report.bounds.center();
        assert!((c.x - 10.0).abs() < 1e-3 && (c.y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn slab_and_pool_paths_agree_with_serial() {
        let serial = run(&small_scene()).unwrap();
        let mut scene = small_scene();
        scene.extract.slabs = 4;
        scene.extract.threads = 2;
        let parallel = run(&scene).unwrap();
        assert_eq!(parallel.vertices, serial.vertices);
        assert_eq!(parallel.triangles, serial.triangles);
        assert_eq!(parallel.area, serial.area);
    }

    #[test]
    fn quantized_scene_still_meshes() {
        let mut scene = small_scene();
        scene.volume.sample = SampleKind::U8;
        let report = run(&scene).unwrap();
        assert!(report.is_closed());
    }

    #[test]
    fn roi_restricts_the_surface() {
        let full = run(&small_scene()).unwrap();
        let mut scene = small_scene();
        scene.extract.roi = Some(RoiCfg {
            min: [0, 0, 0],
            max: [9, 19, 19],
        });
        let half = run(&scene).unwrap();
        assert!(half.triangles > 0 && half.triangles < full.triangles);
        assert!(!half.is_closed());
    }

    #[test]
    fn stop_request_cancels_between_slices() {
        let scene = small_scene();
        let dims = Dims::cube(20);
        let values = field::sample(&scene.field, dims, Pitch::UNIT).unwrap();
        let vol = Volume::new(&values, dims, Pitch::UNIT).unwrap();

        let (mesh, status) =
            extract_volume(&vol, 0.0, None, &scene.extract, &|p: SliceProgress| p.done >= 12)
                .unwrap();
        assert_eq!(status, Status::Cancelled { slices_done: 12 });
        let (full, _) =
            extract_volume(&vol, 0.0, None, &scene.extract, &|_: SliceProgress| false).unwrap();
        assert!(mesh.triangle_count() > 0 && mesh.triangle_count() < full.triangle_count());

        // Slab runs ignore the stop request.
        let mut cfg = scene.extract.clone();
        cfg.slabs = 3;
        let (slabbed, status) =
            extract_volume(&vol, 0.0, None, &cfg, &|_: SliceProgress| true).unwrap();
        assert_eq!(status, Status::Complete);
        assert_eq!(slabbed, full);
    }

    #[test]
    fn budget_trips_only_once_exceeded() {
        let ms = Duration::from_millis;
        assert!(!over_budget(None, ms(10_000)));
        assert!(!over_budget(Some(ms(5)), ms(5)));
        assert!(over_budget(Some(ms(5)), ms(6)));
        assert!(over_budget(Some(ms(0)), Duration::from_nanos(1)));
    }

    #[test]
    fn huge_dims_are_rejected_before_sampling() {
        let mut scene = small_scene();
        scene.volume.dims = [usize::MAX / 4; 3];
        let err = run(&scene).unwrap_err();
        assert!(err.to_string().contains("overflow"), "{err}");
    }

    #[test]
    fn bad_pitch_is_reported() {
        let mut scene = small_scene();
        scene.volume.pitch = [1.0, -1.0, 1.0];
        assert!(run(&scene).is_err());
    }
}
