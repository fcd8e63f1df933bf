//! Two-dimensional DFT capability used by the frequency filters.

use std::sync::Arc;

use ndarray::Array2;
use rustfft::{Fft, FftPlanner, num_complex::Complex};

pub type Spectrum = Array2<Complex<f32>>;

/// Square 2-D discrete Fourier transform.
///
/// Output is in the usual unshifted layout, with the DC term at `(0, 0)`.
/// `inverse` is normalized, so that `inverse(forward(x)) == x`.
pub trait Fft2d: Send + Sync {
    fn side(&self) -> usize;
    fn forward(&self, data: &mut Spectrum);
    fn inverse(&self, data: &mut Spectrum);
}

/// `Fft2d` on top of `rustfft`, with plans made once per detector size.
#[derive(Clone)]
pub struct RustFft2d {
    n: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl RustFft2d {
    pub fn new(n: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);
        Self { n, forward, inverse }
    }
}

impl std::fmt::Debug for RustFft2d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustFft2d").field("n", &self.n).finish()
    }
}

impl Fft2d for RustFft2d {
    fn side(&self) -> usize { self.n }

    fn forward(&self, data: &mut Spectrum) { rows_then_columns(&*self.forward, data) }

    fn inverse(&self, data: &mut Spectrum) {
        rows_then_columns(&*self.inverse, data);
        let scale = 1.0 / (self.n * self.n) as f32;
        data.mapv_inplace(|c| c * scale);
    }
}

/// Separable 2-D transform: 1-D transforms along every row, then along every
/// column (done as rows of the transpose).
fn rows_then_columns(fft: &dyn Fft<f32>, data: &mut Spectrum) {
    let mut rows = data.as_standard_layout().into_owned();
    transform_rows(fft, &mut rows);
    let mut columns = rows.reversed_axes().as_standard_layout().into_owned();
    transform_rows(fft, &mut columns);
    *data = columns.reversed_axes().as_standard_layout().into_owned();
}

fn transform_rows(fft: &dyn Fft<f32>, data: &mut Spectrum) {
    // rustfft processes every length-n chunk of the buffer
    if let Some(buffer) = data.as_slice_mut() {
        fft.process(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    fn spectrum_of(n: usize, f: impl Fn(usize, usize) -> f32) -> Spectrum {
        Array2::from_shape_fn((n, n), |(r, c)| Complex::new(f(r, c), 0.0))
    }

    #[test]
    fn constant_image_has_only_dc() {
        let n = 8;
        let mut s = spectrum_of(n, |_, _| 0.5);
        RustFft2d::new(n).forward(&mut s);
        assert_float_eq!(s[(0, 0)].re, 0.5 * (n * n) as f32, rmax <= 1e-6);
        for ((r, c), v) in s.indexed_iter() {
            if (r, c) != (0, 0) { assert!(v.norm() < 1e-4, "({r},{c}) = {v}") }
        }
    }

    #[test]
    fn pure_column_frequency_lands_in_row_zero() {
        let n = 16;
        let k = 3;
        let mut s = spectrum_of(n, |_, c| (std::f32::consts::TAU * (k * c) as f32 / n as f32).cos());
        RustFft2d::new(n).forward(&mut s);
        let half = (n * n) as f32 / 2.0;
        assert_float_eq!(s[(0, k    )].re, half, abs <= 1e-3);
        assert_float_eq!(s[(0, n - k)].re, half, abs <= 1e-3);
        assert!(s[(k, 0)].norm() < 1e-3);
    }

    #[test]
    fn inverse_undoes_forward() {
        let n = 12;
        let original = spectrum_of(n, |r, c| ((r * 7 + c * 3) % 5) as f32 / 4.0);
        let mut s = original.clone();
        let fft = RustFft2d::new(n);
        fft.forward(&mut s);
        fft.inverse(&mut s);
        for (a, b) in original.iter().zip(s.iter()) {
            assert_float_eq!(a.re, b.re, abs <= 1e-5);
            assert!(b.im.abs() < 1e-5);
        }
    }
}
