//! The complete filtered-backprojection pipeline:
//! filter every view, backproject them all, normalize.

use std::time::Instant;

use units::Angle;

use crate::{
    backprojector::{backproject, Backprojector, BackprojectionStats, ConeBeam, ConeParameters, ParallelBeam},
    cancel::CancelToken,
    error::{FbpError, Result},
    filter::{FilterKind, FrequencyFilter},
    fov::FOV,
    normalize::Range,
    projection::ProjectionSet,
    volume::Volume,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    Parallel,
    Cone(ConeParameters),
}

/// Everything that stays fixed for the duration of one reconstruction run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reconstruction {
    /// Side of the square detector, in pixels
    pub detector: usize,
    pub fov: FOV,
    pub geometry: Geometry,
    pub filter: FilterKind,
}

/// Result of a run: the normalized volume plus what was learnt on the way
#[derive(Clone, Debug)]
pub struct Reconstructed {
    pub volume: Volume,
    /// Extrema of the raw accumulation, before normalization
    pub raw_range: Option<Range>,
    pub stats: BackprojectionStats,
}

impl Reconstruction {

    pub fn parallel(detector: usize, volume: usize) -> Self {
        Self { detector, fov: FOV::unit(volume), geometry: Geometry::Parallel, filter: FilterKind::default() }
    }

    pub fn cone(detector: usize, fov: FOV, params: ConeParameters) -> Self {
        Self { detector, fov, geometry: Geometry::Cone(params), filter: FilterKind::default() }
    }

    pub fn with_filter(self, filter: FilterKind) -> Self { Self { filter, ..self } }

    /// Configuration errors, found before any computation starts
    pub fn validate(&self) -> Result<()> {
        if self.detector == 0 { return Err(FbpError::ZeroDetectorSize) }
        if self.fov.n     == 0 { return Err(FbpError::ZeroVolumeSize)   }
        if let Geometry::Cone(params) = self.geometry {
            ConeBeam::new(self.detector, self.fov, params)?;
        }
        Ok(())
    }

    pub fn run(&self, set: &ProjectionSet) -> Result<Volume> {
        Ok(self.run_with_cancel(set, &CancelToken::new())?.volume)
    }

    pub fn run_with_cancel(&self, set: &ProjectionSet, cancel: &CancelToken) -> Result<Reconstructed> {
        self.validate()?;
        match self.geometry {
            Geometry::Parallel => self.run_beam(&ParallelBeam::new(self.detector), set, cancel),
            Geometry::Cone(params) => {
                let beam = ConeBeam::new(self.detector, self.fov, params)?;
                self.run_beam(&beam, set, cancel)
            },
        }
    }

    /// Filter and backproject without normalizing
    pub fn accumulate(&self, set: &ProjectionSet) -> Result<(Volume, BackprojectionStats)> {
        self.validate()?;
        let cancel = CancelToken::new();
        match self.geometry {
            Geometry::Parallel => self.accumulate_beam(&ParallelBeam::new(self.detector), set, &cancel),
            Geometry::Cone(params) => {
                let beam = ConeBeam::new(self.detector, self.fov, params)?;
                self.accumulate_beam(&beam, set, &cancel)
            },
        }
    }

    fn run_beam<B: Backprojector>(&self, beam: &B, set: &ProjectionSet, cancel: &CancelToken) -> Result<Reconstructed> {
        let start = Instant::now();
        let (mut volume, stats) = self.accumulate_beam(beam, set, cancel)?;
        let raw_range = volume.normalize();
        tracing::info!(
            views = set.count(),
            detector = self.detector,
            voxels = self.fov.n,
            ms = start.elapsed().as_millis() as u64,
            "Reconstruction finished"
        );
        Ok(Reconstructed { volume, raw_range, stats })
    }

    fn accumulate_beam<B: Backprojector>(&self, beam: &B, set: &ProjectionSet, cancel: &CancelToken) -> Result<(Volume, BackprojectionStats)> {
        if set.detector_size() != self.detector {
            return Err(FbpError::DetectorMismatch { expected: self.detector, found: set.detector_size() });
        }
        if set.is_empty() {
            tracing::warn!("No views to reconstruct from");
        }

        let now = Instant::now();
        let filtered = FrequencyFilter::new(self.filter, self.detector).apply_all(set)?;
        tracing::debug!(filter = ?self.filter, ms = now.elapsed().as_millis() as u64, "Filtered views");
        if cancel.is_cancelled() { return Err(FbpError::Cancelled) }

        let now = Instant::now();
        let angles: Vec<Angle> = set.iter().map(|view| view.pose.angle()).collect();
        let result = backproject(beam, self.fov, &filtered, &angles, cancel)?;
        tracing::debug!(ms = now.elapsed().as_millis() as u64, "Backprojected views");
        Ok(result)
    }
}

/// Reconstruct a normalized volume from a complete set of views
pub fn reconstruct(set: &ProjectionSet, recon: &Reconstruction) -> Result<Volume> {
    recon.run(set)
}
