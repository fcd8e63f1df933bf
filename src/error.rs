use thiserror::Error;

/// Errors that can occur while configuring or running a reconstruction.
#[derive(Debug, Error)]
pub enum FbpError {
    #[error("detector size must be non-zero")]
    ZeroDetectorSize,

    #[error("volume size must be non-zero")]
    ZeroVolumeSize,

    #[error("maximum view count must be non-zero")]
    ZeroMaxViews,

    #[error("`{name}` must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("projection {index} is {found:?}, expected [{expected}, {expected}]")]
    ImageShape { index: usize, expected: usize, found: [usize; 2] },

    #[error("projection set holds {found}x{found} images, configuration expects {expected}x{expected}")]
    DetectorMismatch { expected: usize, found: usize },

    #[error("cone-beam geometry requires a [cone] table")]
    MissingConeParameters,

    #[error("{images} projections but {poses} poses")]
    MissingPose { images: usize, poses: usize },

    #[error("projection set is full ({max} views)")]
    SetFull { max: usize },

    #[error("projection pixel ({row}, {col}) is not finite")]
    NonFinitePixel { row: usize, col: usize },

    #[error("raw projection stack of {len} values is not a whole number of {d}x{d} images")]
    RaggedStack { len: usize, d: usize },

    #[error("volume data has {found} voxels, expected {expected}")]
    VolumeSize { expected: usize, found: usize },

    #[error("reconstruction cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, FbpError>;
