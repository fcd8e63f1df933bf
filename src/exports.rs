pub use units::{Angle, Length};
pub use units::todo::{Intensityf32, Lengthf32, Ratiof32};

pub use crate::error::{FbpError, Result};
pub use crate::cancel::CancelToken;
pub use crate::fov::FOV;
pub use crate::volume::Volume;
pub use crate::projection::{Pose, ProjectionImage, ProjectionSet, View};
pub use crate::filter::{FilterKind, FilteredProjection, FrequencyFilter};
pub use crate::backprojector::{ConeParameters, BackprojectionStats};
pub use crate::reconstruct::{reconstruct, Geometry, Reconstructed, Reconstruction};
pub use crate::index::{BoxDim_u, Index1_u, Index3_u};
