pub mod raw;
pub mod nrrd;

use std::path::Path;

use crate::error::{FbpError, Result};
use crate::projection::{Pose, ProjectionImage};

/// Split a raw stack of `D × D` images (view-major, row-major within a view)
/// into projections. Poses are assigned at `n × angle_step`.
pub fn read_projection_stack(path: &Path, d: usize, angle_step: units::Angle) -> Result<Vec<(ProjectionImage, Pose)>> {
    let values: Vec<f32> = raw::read(path)?.collect::<std::io::Result<_>>()?;
    let pixels = d * d;
    if d == 0 || values.len() % pixels != 0 {
        return Err(FbpError::RaggedStack { len: values.len(), d });
    }
    values
        .chunks_exact(pixels)
        .enumerate()
        .map(|(n, chunk)| {
            let image = ProjectionImage::from_shape_vec(d, chunk.to_vec())?;
            Ok((image, Pose::Angle(angle_step * n as f32)))
        })
        .collect()
}

/// Write projections as one raw stack, in acquisition order
pub fn write_projection_stack<'a>(images: impl Iterator<Item = &'a ProjectionImage>, path: &Path) -> Result<()> {
    raw::write(images.flat_map(|image| image.pixels().iter().copied()), path)?;
    Ok(())
}
