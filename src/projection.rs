//! Acquired projection images and the poses at which they were taken.

use nalgebra::Matrix4;
use ndarray::{Array2, ArrayView2};

use units::{radian, Angle};
use units::todo::Intensityf32;

use crate::error::{FbpError, Result};

/// Square `D × D` grid of detector intensities, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionImage(Array2<Intensityf32>);

impl ProjectionImage {

    pub fn new(pixels: Array2<Intensityf32>) -> Result<Self> {
        let [rows, cols] = [pixels.nrows(), pixels.ncols()];
        if rows != cols {
            return Err(FbpError::ImageShape { index: 0, expected: rows.max(cols), found: [rows, cols] });
        }
        if rows == 0 { return Err(FbpError::ZeroDetectorSize) }
        if let Some(((row, col), _)) = pixels.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(FbpError::NonFinitePixel { row, col });
        }
        // `pixels()` hands out a contiguous row-major slice
        let pixels = if pixels.is_standard_layout() { pixels }
                     else { pixels.as_standard_layout().into_owned() };
        Ok(Self(pixels))
    }

    pub fn from_shape_vec(d: usize, data: Vec<Intensityf32>) -> Result<Self> {
        let len = data.len();
        let pixels = Array2::from_shape_vec((d, d), data)
            .map_err(|_| FbpError::RaggedStack { len, d })?;
        Self::new(pixels)
    }

    pub fn filled(d: usize, value: Intensityf32) -> Self {
        Self(Array2::from_elem((d, d), value))
    }

    pub fn side(&self) -> usize { self.0.nrows() }

    pub fn view(&self) -> ArrayView2<Intensityf32> { self.0.view() }

    pub fn pixels(&self) -> &[Intensityf32] {
        self.0.as_slice().expect("ProjectionImage is always in standard layout")
    }
}

/// Where the source/detector pair was when a view was captured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pose {
    /// Rotation about the vertical (y) axis
    Angle(Angle),
    /// Full camera transform; only its rotation about y is used
    Transform(Matrix4<f32>),
}

impl Pose {
    pub fn angle(&self) -> Angle {
        match self {
            Pose::Angle(a) => *a,
            // R_y(θ) has cos θ at (0,0) and sin θ at (0,2)
            Pose::Transform(m) => radian(m[(0, 2)].atan2(m[(0, 0)])),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub image: ProjectionImage,
    pub pose: Pose,
}

/// Views in acquisition order, which is also angular order.
#[derive(Clone, Debug)]
pub struct ProjectionSet {
    detector: usize,
    max_views: usize,
    angle_step: Angle,
    views: Vec<View>,
}

impl ProjectionSet {

    pub fn new(detector: usize, max_views: usize, angle_step: Angle) -> Self {
        Self { detector, max_views, angle_step, views: Vec::with_capacity(max_views) }
    }

    /// Collect views from an acquisition, stopping silently once `max_views`
    /// have been taken.
    pub fn from_views(
        detector: usize,
        max_views: usize,
        angle_step: Angle,
        views: impl IntoIterator<Item = (ProjectionImage, Pose)>,
    ) -> Result<Self> {
        let mut set = Self::new(detector, max_views, angle_step);
        let mut dropped = 0_usize;
        for (image, pose) in views {
            match set.append(image, pose) {
                Ok(_) => {},
                Err(FbpError::SetFull { .. }) => dropped += 1,
                Err(e) => return Err(e),
            }
        }
        if dropped > 0 {
            tracing::warn!("Ignored {dropped} views beyond the maximum of {max_views}");
        }
        Ok(set)
    }

    /// Add a view at an explicit pose. Returns the new view count.
    ///
    /// Once `max_views` is reached the set is left unchanged and `SetFull` is
    /// returned.
    pub fn append(&mut self, image: ProjectionImage, pose: Pose) -> Result<usize> {
        if self.is_full() {
            return Err(FbpError::SetFull { max: self.max_views });
        }
        let side = image.side();
        if side != self.detector {
            return Err(FbpError::ImageShape { index: self.count(), expected: self.detector, found: [side, side] });
        }
        self.views.push(View { image, pose });
        Ok(self.count())
    }

    /// Add a view at the next acquisition angle, `count() × angle_step`
    pub fn append_view(&mut self, image: ProjectionImage) -> Result<usize> {
        let pose = Pose::Angle(self.next_angle());
        self.append(image, pose)
    }

    pub fn next_angle(&self) -> Angle { self.angle_step * self.count() as f32 }

    pub fn count(&self) -> usize { self.views.len() }

    pub fn is_empty(&self) -> bool { self.views.is_empty() }

    pub fn is_full(&self) -> bool { self.count() >= self.max_views }

    pub fn max_views(&self) -> usize { self.max_views }

    pub fn detector_size(&self) -> usize { self.detector }

    pub fn angle_step(&self) -> Angle { self.angle_step }

    /// Panics if `i >= count()`
    pub fn get(&self, i: usize) -> &View {
        assert!(i < self.count(), "view index {i} out of range 0..{}", self.count());
        &self.views[i]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, View> { self.views.iter() }

    pub fn views(&self) -> &[View] { &self.views }
}

impl std::ops::Index<usize> for ProjectionSet {
    type Output = View;
    fn index(&self, i: usize) -> &View { self.get(i) }
}
