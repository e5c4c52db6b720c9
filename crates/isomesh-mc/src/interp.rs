use isomesh_geom::Vec3;
use isomesh_volume::{Pitch, Sample};

use crate::constants::VOXEL_CENTER_OFFSET;
use crate::edge::Axis;

/// Fraction along an active edge, measured from its lower endpoint, where the
/// field crosses `threshold`. Always finite and within `[0, 1]`.
///
/// An endpoint outside the volume pins the crossing to the other endpoint; a
/// zero or non-finite denominator falls back to the midpoint.
#[inline]
pub fn edge_fraction<T: Sample>(lo: Option<T>, hi: Option<T>, threshold: T) -> f64 {
    match (lo, hi) {
        (Some(a), Some(b)) => {
            let (a, b, iso) = (a.to_f64(), b.to_f64(), threshold.to_f64());
            let t = (iso - a) / (b - a);
            if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 }
        }
        (None, Some(_)) => 1.0,
        (Some(_), None) => 0.0,
        (None, None) => 0.5,
    }
}

/// World position of the crossing `t` voxels from `voxel` along `axis`.
/// Voxel `i` has its centre at `(i + 0.5) * pitch`.
#[inline]
pub fn edge_position(voxel: [isize; 3], axis: Axis, t: f64, pitch: Pitch) -> Vec3 {
    let p = pitch.to_array();
    let mut out = [0.0f32; 3];
    for k in 0..3 {
        let along = if k == axis.index() { t } else { 0.0 };
        out[k] = ((voxel[k] as f64 + VOXEL_CENTER_OFFSET + along) * p[k] as f64) as f32;
    }
    Vec3::from(out)
}
