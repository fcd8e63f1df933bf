//! Synthetic objects and a simulated scanner, standing in for a real
//! acquisition when testing or demonstrating reconstructions.

use nalgebra::Vector3;
use ndarray::Array2;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;

use units::{mm_, Angle, Length};
use units::todo::{Intensityf32, Lengthf32};

use crate::{
    backprojector::ConeParameters,
    error::{FbpError, Result},
    fov::FOV,
    projection::{Pose, ProjectionImage},
    reconstruct::{Geometry, Reconstruction},
    volume::Volume,
};

type Vec3 = Vector3<Lengthf32>;

/// Spherical shell of uniform density centred on the isocentre
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HollowSphere {
    pub inner: Length,
    pub outer: Length,
    pub value: Intensityf32,
}

impl HollowSphere {

    /// The classic test object: radii `V/8` and `3V/8`, density 0.7
    pub fn reference(fov: FOV) -> Self {
        let side = fov.full_width();
        Self { inner: side * 0.125, outer: side * 0.375, value: 0.7 }
    }

    /// Density at a point relative to the isocentre
    pub fn density(&self, [x, y, z]: [Length; 3]) -> Intensityf32 {
        let r = (mm_(x).powi(2) + mm_(y).powi(2) + mm_(z).powi(2)).sqrt();
        if mm_(self.inner) <= r && r <= mm_(self.outer) { self.value } else { 0.0 }
    }

    /// Integral of the density along the whole line through `origin` in
    /// direction `dir` (need not be normalized). Lengths in mm.
    pub fn line_integral(&self, origin: Vec3, dir: Vec3) -> Intensityf32 {
        let dir = dir.normalize();
        // Point of closest approach to the centre
        let closest = origin - dir * origin.dot(&dir);
        let miss2 = closest.norm_squared();
        let chord = |radius: Length| {
            let r = mm_(radius);
            2.0 * (r * r - miss2).max(0.0).sqrt()
        };
        self.value * (chord(self.outer) - chord(self.inner))
    }

    /// Sample the density at every voxel position
    pub fn voxelize(&self, fov: FOV) -> Volume {
        let data = (0..fov.n_voxels())
            .into_par_iter()
            .map(|i| self.density(fov.voxel_position1(i)))
            .collect();
        Volume { fov, data }
    }
}

/// Simulated acquisition of a phantom with the same geometry the
/// reconstruction will assume.
pub struct Scanner {
    phantom: HollowSphere,
    recon: Reconstruction,
    noise: Option<(Normal<Intensityf32>, StdRng)>,
}

impl Scanner {

    pub fn new(phantom: HollowSphere, recon: Reconstruction) -> Self {
        Self { phantom, recon, noise: None }
    }

    /// Add zero-mean Gaussian noise of standard deviation `sigma` to every
    /// pixel. Seeded, so scans are reproducible.
    pub fn with_noise(self, sigma: Intensityf32, seed: u64) -> Result<Self> {
        let normal = Normal::new(0.0, sigma)
            .map_err(|_| FbpError::NonPositive { name: "noise", value: sigma })?;
        Ok(Self { noise: Some((normal, StdRng::seed_from_u64(seed))), ..self })
    }

    /// One view at the given angle. Pixel values are line integrals divided
    /// by the width of the FOV, which keeps them within `[0, 1]` for any
    /// object fitting inside it.
    pub fn project(&mut self, angle: Angle) -> ProjectionImage {
        let d = self.recon.detector;
        let fov = self.recon.fov;
        let scale = 1.0 / mm_(fov.full_width());
        let (sin, cos) = units::radian_(angle).sin_cos();
        // (t, s) in the rotating frame → (x, z)
        let rotate = |t: Lengthf32, y: Lengthf32, s: Lengthf32| Vec3::new(t * cos - s * sin, y, t * sin + s * cos);
        let half = (d / 2) as Lengthf32;
        let phantom = self.phantom;

        let mut pixels = match self.recon.geometry {
            Geometry::Parallel => {
                let pitch = mm_(fov.voxel_size);
                let dir = rotate(0.0, 0.0, 1.0);
                Array2::from_shape_fn((d, d), |(row, col)| {
                    let origin = rotate((col as Lengthf32 - half) * pitch, (row as Lengthf32 - half) * pitch, 0.0);
                    phantom.line_integral(origin, dir) * scale
                })
            },
            Geometry::Cone(ConeParameters { detector_width, source_distance, detector_distance }) => {
                let pitch = mm_(detector_width) / d as Lengthf32;
                let (sd, dd) = (mm_(source_distance), mm_(detector_distance));
                let source = rotate(0.0, 0.0, -sd);
                Array2::from_shape_fn((d, d), |(row, col)| {
                    let target = rotate((col as Lengthf32 - half) * pitch, (row as Lengthf32 - half) * pitch, dd - sd);
                    // Anchored at the detector end: the source may be very far away
                    phantom.line_integral(target, target - source) * scale
                })
            },
        };

        if let Some((normal, rng)) = &mut self.noise {
            pixels.mapv_inplace(|v| (v + normal.sample(rng)).clamp(0.0, 1.0));
        }
        // Square and non-empty by construction
        ProjectionImage::new(pixels).unwrap_or_else(|_| ProjectionImage::filled(d, 0.0))
    }

    /// Views at `0, step, 2 step, ...`, taken one after the other
    pub fn scan(mut self, step: Angle, n_views: usize) -> impl Iterator<Item = (ProjectionImage, Pose)> {
        (0..n_views).map(move |n| {
            let angle = step * n as f32;
            (self.project(angle), Pose::Angle(angle))
        })
    }
}

/// Physical size of the reference phantom's shell, for reporting
pub fn describe(phantom: &HollowSphere) -> String {
    format!("hollow sphere, radii {:.2} mm .. {:.2} mm, density {}",
            mm_(phantom.inner), mm_(phantom.outer), phantom.value)
}
