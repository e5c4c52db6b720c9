//! Synthetic scalar fields. Values are positive inside the shape, so the
//! default threshold of `0.0` extracts its boundary.

use std::error::Error;

use fastnoise_lite::{FastNoiseLite, NoiseType};
use isomesh_mc::{Dims, Pitch};

use crate::config::{FieldCfg, FieldKind};

/// Samples `cfg` at every voxel centre, x fastest, with the shape centred in the
/// volume. Fails on invalid dimensions or when the buffer cannot be allocated.
pub fn sample(cfg: &FieldCfg, dims: Dims, pitch: Pitch) -> Result<Vec<f32>, Box<dyn Error>> {
    let count = dims.sample_count()?;
    let mut out = Vec::new();
    out.try_reserve_exact(count)?;

    let noise = (cfg.kind == FieldKind::Noise).then(|| {
        let mut n = FastNoiseLite::with_seed(cfg.seed);
        n.set_noise_type(Some(NoiseType::OpenSimplex2));
        n.set_frequency(Some(cfg.frequency));
        n
    });
    let p = pitch.to_array();
    let center = [
        dims.w as f32 * p[0] * 0.5,
        dims.h as f32 * p[1] * 0.5,
        dims.d as f32 * p[2] * 0.5,
    ];

    for z in 0..dims.d {
        for y in 0..dims.h {
            for x in 0..dims.w {
                let q = [
                    (x as f32 + 0.5) * p[0] - center[0],
                    (y as f32 + 0.5) * p[1] - center[1],
                    (z as f32 + 0.5) * p[2] - center[2],
                ];
                out.push(eval(cfg, noise.as_ref(), q));
            }
        }
    }
    Ok(out)
}

fn eval(cfg: &FieldCfg, noise: Option<&FastNoiseLite>, [x, y, z]: [f32; 3]) -> f32 {
    match cfg.kind {
        FieldKind::Sphere => cfg.radius - (x * x + y * y + z * z).sqrt(),
        FieldKind::Torus => {
            // ring in the xz plane
            let ring = (x * x + z * z).sqrt() - cfg.radius;
            cfg.minor_radius - (ring * ring + y * y).sqrt()
        }
        FieldKind::Gyroid => {
            let k = std::f32::consts::TAU / cfg.period.max(f32::EPSILON);
            let (x, y, z) = (x * k, y * k, z * k);
            x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos()
        }
        FieldKind::Noise => {
            let base = cfg.radius - (x * x + y * y + z * z).sqrt();
            let n = noise.map_or(0.0, |n| n.get_noise_3d(x, y, z));
            base + cfg.amplitude * n
        }
    }
}

/// Maps `v` from `[-range, range]` onto `0..=255`; `0.0` lands on 128.
#[inline]
pub fn quantize(v: f32, range: f32) -> u8 {
    let range = if range > 0.0 { range } else { 1.0 };
    ((v / range) * 127.5 + 127.5).round().clamp(0.0, 255.0) as u8
}

pub fn quantize_all(values: &[f32], range: f32) -> Vec<u8> {
    values.iter().map(|v| quantize(*v, range)).collect()
}
