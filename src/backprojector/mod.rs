//! Smearing filtered projections back across the volume.
//!
//! Every `(voxel, view)` pair is mapped to one detector pixel, whose value is
//! accumulated into the voxel. The two geometries differ only in that mapping,
//! which is what the [`Backprojector`] trait abstracts.

pub use parallel::ParallelBeam;
pub use cone::{ConeBeam, ConeParameters};

pub mod parallel;
pub mod cone;

use rayon::prelude::*;

use units::{radian_, Angle};
use units::todo::Lengthf32;

use crate::{
    cancel::CancelToken,
    error::{FbpError, Result},
    filter::FilteredProjection,
    fov::FOV,
    volume::Volume,
};

/// Abstract interface for the voxel → detector mapping of a beam geometry
pub trait Backprojector: Sync {
    /// Side of the square detector, in pixels
    fn detector_size(&self) -> usize;

    /// Detector pixel seen by the voxel at `voxel` (centred coordinates, in
    /// voxel units) for a view at the given angle.
    fn detector_pixel(&self, voxel: [Lengthf32; 3], view: ViewTrig) -> Sample;

    /// Every contribution is divided by this
    fn divisor(&self, n_views: usize) -> f32;
}

/// Trigonometry of one view's angle, computed once per view
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTrig {
    pub cos: f32,
    pub sin: f32,
}

impl ViewTrig {
    pub fn new(angle: Angle) -> Self {
        let (sin, cos) = radian_(angle).sin_cos();
        Self { cos, sin }
    }
}

/// Outcome of mapping one voxel onto the detector for one view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sample {
    Pixel { row: usize, col: usize },
    /// Projected outside the detector: contributes nothing
    Outside,
    /// Voxel at or behind a point source: contributes nothing
    Singular,
}

impl Sample {
    #[inline]
    pub fn checked(row: i64, col: i64, d: usize) -> Self {
        let d = d as i64;
        if (0..d).contains(&row) && (0..d).contains(&col) {
            Sample::Pixel { row: row as usize, col: col as usize }
        } else {
            Sample::Outside
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BackprojectionStats {
    /// Number of `(voxel, view)` pairs skipped because the voxel was at or
    /// behind the source
    pub singular: usize,
}

/// Accumulate all filtered views into a fresh zero volume.
///
/// The volume is split into z-slabs, each owned by one rayon task which walks
/// through every view, so no two tasks ever write the same voxel. The
/// accumulation order within a voxel is always the view order, which makes
/// the result independent of scheduling.
pub fn backproject<B: Backprojector>(
    beam    : &B,
    fov     : FOV,
    filtered: &[FilteredProjection],
    angles  : &[Angle],
    cancel  : &CancelToken,
) -> Result<(Volume, BackprojectionStats)> {
    let d = beam.detector_size();
    if fov.n == 0 { return Err(FbpError::ZeroVolumeSize) }
    if filtered.len() != angles.len() {
        return Err(FbpError::MissingPose { images: filtered.len(), poses: angles.len() });
    }
    if let Some(bad) = filtered.iter().find(|f| f.side() != d) {
        return Err(FbpError::DetectorMismatch { expected: d, found: bad.side() });
    }

    let n = fov.n;
    let views: Vec<(&[f32], ViewTrig)> = filtered.iter()
        .map(FilteredProjection::pixels)
        .zip(angles.iter().copied().map(ViewTrig::new))
        .collect();
    let divisor = beam.divisor(views.len());

    let mut data = Volume::zeros_buffer(fov);
    let singular = data
        .par_chunks_mut(fov.slab_len())
        .enumerate()
        .map(|(z, slab)| -> Result<usize> {
            let mut singular = 0;
            for &(pixels, trig) in &views {
                if cancel.is_cancelled() { return Err(FbpError::Cancelled) }
                for y in 0..n {
                    let row_of_slab = &mut slab[y * n..(y + 1) * n];
                    for (x, voxel) in row_of_slab.iter_mut().enumerate() {
                        match beam.detector_pixel(fov.centred([x, y, z]), trig) {
                            Sample::Pixel { row, col } => *voxel += pixels[row * d + col] / divisor,
                            Sample::Outside  => {},
                            Sample::Singular => singular += 1,
                        }
                    }
                }
            }
            Ok(singular)
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))?;

    if singular > 0 {
        tracing::warn!("Skipped {singular} voxel/view pairs at or behind the source");
    }
    Ok((Volume { fov, data }, BackprojectionStats { singular }))
}
