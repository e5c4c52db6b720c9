use thiserror::Error;

/// Reasons a volume description is rejected before any extraction runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VolumeError {
    #[error("volume dimensions must be at least 1 on every axis, got {dims:?}")]
    ZeroDimension { dims: [usize; 3] },

    #[error("volume dimensions {dims:?} overflow the addressable sample count")]
    DimensionOverflow { dims: [usize; 3] },

    #[error("pitch must be finite and positive on every axis, got {pitch:?}")]
    InvalidPitch { pitch: [f32; 3] },

    #[error("sample buffer holds {actual} values but dimensions require {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}
