//! Scalar volume view and its static shape (dimensions, pitch, voxel boxes).
#![forbid(unsafe_code)]

mod error;
mod sample;

pub use error::VolumeError;
pub use sample::Sample;

/// Voxel resolution along x, y and z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dims {
    pub w: usize,
    pub h: usize,
    pub d: usize,
}

impl Dims {
    #[inline]
    pub const fn new(w: usize, h: usize, d: usize) -> Self {
        Self { w, h, d }
    }

    #[inline]
    pub const fn cube(n: usize) -> Self {
        Self { w: n, h: n, d: n }
    }

    #[inline]
    pub const fn to_array(self) -> [usize; 3] {
        [self.w, self.h, self.d]
    }

    /// `w * h * d`, or `None` on overflow.
    #[inline]
    pub fn voxel_count(self) -> Option<usize> {
        self.w.checked_mul(self.h)?.checked_mul(self.d)
    }

    /// Validated buffer length for these dimensions: every axis is at least
    /// 1 and cell coordinates (up to `dim + 1`) stay addressable as `isize`.
    pub fn sample_count(self) -> Result<usize, VolumeError> {
        if self.w == 0 || self.h == 0 || self.d == 0 {
            return Err(VolumeError::ZeroDimension {
                dims: self.to_array(),
            });
        }
        let fits = |n: usize| n < (isize::MAX as usize) / 2;
        self.voxel_count()
            .filter(|_| fits(self.w) && fits(self.h) && fits(self.d))
            .ok_or(VolumeError::DimensionOverflow {
                dims: self.to_array(),
            })
    }

    #[inline]
    pub const fn plane(self) -> usize {
        self.w * self.h
    }
}

/// Physical spacing between adjacent voxels on each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pitch {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Pitch {
    fn default() -> Self {
        Self::UNIT
    }
}

impl Pitch {
    pub const UNIT: Pitch = Pitch {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.to_array().iter().all(|p| p.is_finite() && *p > 0.0)
    }
}

impl From<[f32; 3]> for Pitch {
    fn from(p: [f32; 3]) -> Self {
        Pitch::new(p[0], p[1], p[2])
    }
}

/// Inclusive voxel-index box. Bounds may lie partly or wholly outside the
/// volume; the extractor clamps its scan range, not the box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelBox {
    pub min: [i64; 3],
    pub max: [i64; 3],
}

impl VoxelBox {
    #[inline]
    pub const fn new(min: [i64; 3], max: [i64; 3]) -> Self {
        Self { min, max }
    }

    /// Box covering every voxel of `dims`.
    pub fn full(dims: Dims) -> Self {
        let last = |n: usize| n as i64 - 1;
        Self {
            min: [0, 0, 0],
            max: [last(dims.w), last(dims.h), last(dims.d)],
        }
    }

    /// Same box with swapped corners reordered, so `min <= max` per axis.
    pub fn ordered(&self) -> Self {
        let mut out = *self;
        for axis in 0..3 {
            out.min[axis] = self.min[axis].min(self.max[axis]);
            out.max[axis] = self.min[axis].max(self.max[axis]);
        }
        out
    }
}

/// Borrowed, validated scalar volume laid out x-fastest, then y, then z.
#[derive(Clone, Copy, Debug)]
pub struct Volume<'a, T> {
    data: &'a [T],
    dims: Dims,
    pitch: Pitch,
}

impl<'a, T: Sample> Volume<'a, T> {
    /// Validates the static shape. Nothing is read from `data` here.
    pub fn new(data: &'a [T], dims: Dims, pitch: Pitch) -> Result<Self, VolumeError> {
        let expected = dims.sample_count()?;
        if !pitch.is_valid() {
            return Err(VolumeError::InvalidPitch {
                pitch: pitch.to_array(),
            });
        }
        if data.len() != expected {
            return Err(VolumeError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, dims, pitch })
    }

    #[inline]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    #[inline]
    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.dims.w + z * self.dims.plane()
    }

    /// Reads an in-range voxel. Panics on out-of-range coordinates like slice indexing.
    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> T {
        self.data[self.idx(x, y, z)]
    }

    #[inline]
    pub fn contains(&self, x: isize, y: isize, z: isize) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.dims.w
            && (y as usize) < self.dims.h
            && (z as usize) < self.dims.d
    }

    /// Bounds-checked read; `None` for coordinates outside the volume.
    #[inline]
    pub fn get(&self, x: isize, y: isize, z: isize) -> Option<T> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some(self.get_local(x as usize, y as usize, z as usize))
    }

    /// Number of voxels inside the inclusive window whose value exceeds
    /// `threshold`. A window with `lo > hi` on any axis counts nothing.
    pub fn count_above(&self, threshold: T, lo: [usize; 3], hi: [usize; 3]) -> usize {
        if (0..3).any(|k| lo[k] > hi[k]) {
            return 0;
        }
        let mut n = 0;
        for z in lo[2]..=hi[2] {
            for y in lo[1]..=hi[1] {
                let row = self.idx(lo[0], y, z);
                let len = hi[0] - lo[0] + 1;
                n += self.data[row..row + len]
                    .iter()
                    .filter(|v| **v > threshold)
                    .count();
            }
        }
        n
    }
}
