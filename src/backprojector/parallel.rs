use units::todo::Lengthf32;

use super::{Backprojector, Sample, ViewTrig};

/// Parallel rays (source at infinity), rotating about the vertical axis.
///
/// One detector pixel spans one voxel, so the detector column is the voxel's
/// rotated in-plane coordinate and the row is its height, untouched by the
/// rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelBeam {
    d: usize,
}

impl ParallelBeam {
    pub fn new(d: usize) -> Self { Self { d } }
}

impl Backprojector for ParallelBeam {

    fn detector_size(&self) -> usize { self.d }

    #[inline]
    fn detector_pixel(&self, [lx, ly, lz]: [Lengthf32; 3], ViewTrig { cos, sin }: ViewTrig) -> Sample {
        let half = (self.d / 2) as i64;
        let col = (lx * cos + lz * sin).round() as i64 + half;
        let row = ly as i64 + half;
        Sample::checked(row, col, self.d)
    }

    /// Keeps the accumulated values independent of detector resolution and
    /// view count
    fn divisor(&self, n_views: usize) -> f32 { (self.d * self.d * n_views) as f32 }
}
