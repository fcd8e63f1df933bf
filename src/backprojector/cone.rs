use units::{mm_, Length};
use units::todo::Lengthf32;

use crate::error::{FbpError, Result};
use crate::fov::FOV;

use super::{Backprojector, Sample, ViewTrig};

/// Physical layout of a point source and flat detector rotating about the
/// vertical axis through the isocentre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeParameters {
    /// Full width of the square detector
    pub detector_width: Length,
    /// Source to isocentre
    pub source_distance: Length,
    /// Source to detector plane
    pub detector_distance: Length,
}

/// Point source at a finite distance: magnification grows towards the source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConeBeam {
    d: usize,
    voxel_size: Lengthf32,
    source_distance: Lengthf32,
    detector_distance: Lengthf32,
    /// Detector pixels per unit length on the detector plane
    pixels_per_length: f32,
}

impl ConeBeam {
    pub fn new(d: usize, fov: FOV, params: ConeParameters) -> Result<Self> {
        let ConeParameters { detector_width, source_distance, detector_distance } = params;
        let positive = |name, value: Length| {
            let value = mm_(value);
            if value > 0.0 && value.is_finite() { Ok(value) }
            else { Err(FbpError::NonPositive { name, value }) }
        };
        let voxel_size        = positive("voxel_size"       , fov.voxel_size)?;
        let detector_width    = positive("detector_width"   , detector_width)?;
        let source_distance   = positive("source_distance"  , source_distance)?;
        let detector_distance = positive("detector_distance", detector_distance)?;
        if d == 0 { return Err(FbpError::ZeroDetectorSize) }
        Ok(Self {
            d,
            voxel_size,
            source_distance,
            detector_distance,
            pixels_per_length: d as f32 / detector_width,
        })
    }
}

impl Backprojector for ConeBeam {

    fn detector_size(&self) -> usize { self.d }

    #[inline]
    fn detector_pixel(&self, [lx, ly, lz]: [Lengthf32; 3], ViewTrig { cos, sin }: ViewTrig) -> Sample {
        // In-plane coordinates: `t` across the detector, `s` towards it
        let t = (lx * cos + lz * sin) * self.voxel_size;
        let s = (lz * cos - lx * sin) * self.voxel_size;
        let depth = self.source_distance + s;
        if depth <= 0.0 { return Sample::Singular }
        let magnification = self.detector_distance / depth;
        let p = magnification * t;
        let q = magnification * ly * self.voxel_size;
        let half = (self.d / 2) as i64;
        let col = (p * self.pixels_per_length).round() as i64 + half;
        let row = (q * self.pixels_per_length).round() as i64 + half;
        Sample::checked(row, col, self.d)
    }

    /// Raw accumulation: only the view count is divided out
    fn divisor(&self, n_views: usize) -> f32 { n_views as f32 }
}
