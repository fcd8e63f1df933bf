//! Frequency-domain filtering of projections prior to backprojection.

pub mod fft;

pub use fft::{Fft2d, RustFft2d, Spectrum};

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use rustfft::num_complex::Complex;
use serde::Deserialize;

use units::todo::{Intensityf32, Ratiof32};

use crate::error::{FbpError, Result};
use crate::projection::{ProjectionImage, ProjectionSet};

/// Which weighting to apply to the spectrum of each projection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Hard circular low-pass in unshifted FFT index space
    #[default]
    Cutoff,
    /// |f| along detector columns
    Ramp,
    /// Ramp rolled off with a Hann window
    Hann,
    /// Leave projections untouched (plain backprojection)
    None,
}

/// A projection after filtering: same shape as its source image.
#[derive(Clone, Debug, PartialEq)]
pub struct FilteredProjection(Array2<Intensityf32>);

impl FilteredProjection {
    pub fn side(&self) -> usize { self.0.nrows() }

    pub fn view(&self) -> ArrayView2<Intensityf32> { self.0.view() }

    /// Row-major pixels: `(row, col)` lives at `row * side + col`
    pub fn pixels(&self) -> &[Intensityf32] {
        self.0.as_slice().expect("FilteredProjection is always in standard layout")
    }

    pub fn filled(d: usize, value: Intensityf32) -> Self { Self(Array2::from_elem((d, d), value)) }
}

pub struct FrequencyFilter<F = RustFft2d> {
    kind: FilterKind,
    fft: F,
    weights: Array2<Ratiof32>,
}

impl FrequencyFilter<RustFft2d> {
    pub fn new(kind: FilterKind, d: usize) -> Self { Self::with_fft(kind, RustFft2d::new(d)) }
}

impl<F: Fft2d> FrequencyFilter<F> {

    pub fn with_fft(kind: FilterKind, fft: F) -> Self {
        let d = fft.side();
        let weights = match kind {
            FilterKind::Cutoff => circular_cutoff(d),
            FilterKind::Ramp   => ramp(d, |_| 1.0),
            FilterKind::Hann   => ramp(d, hann),
            FilterKind::None   => Array2::ones((d, d)),
        };
        Self { kind, fft, weights }
    }

    pub fn kind(&self) -> FilterKind { self.kind }

    pub fn side(&self) -> usize { self.fft.side() }

    /// The multiplicative weight applied to each unshifted frequency bin
    pub fn weights(&self) -> ArrayView2<Ratiof32> { self.weights.view() }

    pub fn apply(&self, image: &ProjectionImage) -> Result<FilteredProjection> {
        let d = self.side();
        if image.side() != d {
            return Err(FbpError::DetectorMismatch { expected: d, found: image.side() });
        }
        if self.kind == FilterKind::None {
            return Ok(FilteredProjection(image.view().to_owned()));
        }
        let mut spectrum: Spectrum = image.view().mapv(|v| Complex::new(v, 0.0));
        self.fft.forward(&mut spectrum);
        spectrum.zip_mut_with(&self.weights, |c, &w| *c *= w);
        self.fft.inverse(&mut spectrum);
        Ok(FilteredProjection(spectrum.mapv(|c| c.re)))
    }

    /// Filter every view of the set; views are independent, so run them in
    /// parallel.
    pub fn apply_all(&self, set: &ProjectionSet) -> Result<Vec<FilteredProjection>> {
        set.views()
            .par_iter()
            .map(|view| self.apply(&view.image))
            .collect()
    }
}

/// Zero every bin `(i, j)` with `i, j < d/2` lying at or beyond `d/4` from the
/// origin, together with its mirrors at `d-i` and `d-j`. The mirror of index 0
/// would be `d`, which does not exist, and the Nyquist row and column (`d/2`)
/// are never touched.
pub fn circular_cutoff(d: usize) -> Array2<Ratiof32> {
    let mut weights = Array2::ones((d, d));
    let radius = d as f32 / 4.0;
    for i in 0..d / 2 {
        for j in 0..d / 2 {
            if (((i * i + j * j) as f32).sqrt()) < radius { continue }
            for (r, c) in [(i, j), (d - i, j), (i, d - j), (d - i, d - j)] {
                if r < d && c < d { weights[(r, c)] = 0.0 }
            }
        }
    }
    weights
}

/// Ramp along the column (detector-lateral) frequency, scaled to 1 at
/// Nyquist and shaped by `window`, which sees the frequency as a fraction of
/// Nyquist.
fn ramp(d: usize, window: impl Fn(Ratiof32) -> Ratiof32) -> Array2<Ratiof32> {
    let nyquist = (d as f32 / 2.0).max(1.0);
    Array2::from_shape_fn((d, d), |(_, j)| {
        let k = j.min(d - j) as f32 / nyquist;
        k * window(k)
    })
}

fn hann(k: Ratiof32) -> Ratiof32 { 0.5 * (1.0 + (std::f32::consts::PI * k).cos()) }
