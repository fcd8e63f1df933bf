/// The size and granularity of the cubic Field of View (FOV) in which volumes
/// are reconstructed

use units::{mm, mm_, Length};
use units::todo::Lengthf32;
use crate::index::{BoxDim_u, Index1_u, Index3_u, index1_to_3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FOV {
    /// Number of voxels along each side
    pub n: usize,
    /// Physical side length of one voxel
    pub voxel_size: Length,
}

impl FOV {

    pub fn new(n: usize, voxel_size: Length) -> Self { Self { n, voxel_size } }

    /// FOV whose voxels are one unit wide: the parallel-beam convention
    pub fn unit(n: usize) -> Self { Self::new(n, mm(1.0)) }

    pub fn dims(&self) -> BoxDim_u { [self.n; 3] }

    pub fn n_voxels(&self) -> usize { self.n * self.n * self.n }

    /// Number of voxels in one z-slab
    pub fn slab_len(&self) -> usize { self.n * self.n }

    pub fn full_width(&self) -> Length { self.voxel_size * self.n as f32 }

    /// Voxel coordinates relative to the centre of rotation, in voxel units.
    ///
    /// The centre is at index `n/2` (integer division), so for even `n` the
    /// offsets run over `[-n/2, n/2)`.
    #[inline]
    pub fn centred(&self, [x, y, z]: Index3_u) -> [Lengthf32; 3] {
        let half = (self.n / 2) as Lengthf32;
        [x as Lengthf32 - half,
         y as Lengthf32 - half,
         z as Lengthf32 - half]
    }

    /// Physical position of the voxel with given 3D index, relative to the
    /// centre of rotation
    pub fn voxel_position(&self, i: Index3_u) -> [Length; 3] {
        let s = mm_(self.voxel_size);
        self.centred(i).map(|c| mm(c * s))
    }

    pub fn voxel_position1(&self, i: Index1_u) -> [Length; 3] {
        self.voxel_position(index1_to_3(i, self.dims()))
    }

}
