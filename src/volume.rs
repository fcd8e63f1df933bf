use std::path::Path;

use units::todo::Intensityf32;

use crate::error::{FbpError, Result};
use crate::fov::FOV;
use crate::index::{index3_to_1, Index1_u, Index3_u};
use crate::io;

pub type VolumeData = Vec<Intensityf32>;

/// Dense cubic grid of voxel values, x fastest, z slowest.
#[derive(Clone, Debug)]
pub struct Volume {
    pub fov: FOV,
    pub data: VolumeData,
}

impl Volume {

    pub fn new(fov: FOV, data: VolumeData) -> Result<Self> {
        let expected = fov.n_voxels();
        if data.len() != expected {
            return Err(FbpError::VolumeSize { expected, found: data.len() });
        }
        Ok(Self { fov, data })
    }

    pub fn zeros(fov: FOV) -> Self {
        Self { data: Self::zeros_buffer(fov), fov }
    }

    /// A new empty data store with matching size
    pub fn zeros_buffer(fov: FOV) -> VolumeData { vec![0.0; fov.n_voxels()] }

    pub fn side(&self) -> usize { self.fov.n }

    pub fn from_raw_file(path: &Path, fov: FOV) -> Result<Self> {
        let data = io::raw::read(path)?.collect::<std::io::Result<_>>()?;
        Self::new(fov, data)
    }

    /// Write voxel values as raw little-endian `f32`s, plus a detached NRRD
    /// header next to them.
    pub fn write_to_raw_file(&self, path: &Path) -> Result<()> {
        io::raw::write(self.data.iter().copied(), path)?;
        io::nrrd::write_header(&path.with_extension("nhdr"), path, self.fov)?;
        Ok(())
    }

    /// Iterate over z-slabs: each is a contiguous `n × n` run of voxels.
    /// An empty volume has no slabs.
    pub fn slabs(&self) -> impl Iterator<Item = &[Intensityf32]> {
        // `chunks` panics on 0; with no data the size is irrelevant
        self.data.chunks(self.fov.slab_len().max(1))
    }
}

impl core::ops::IndexMut<Index1_u> for Volume {
    #[inline]
    fn index_mut(&mut self, i: Index1_u) -> &mut Self::Output { &mut self.data[i] }
}

impl core::ops::Index<Index1_u> for Volume {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i: Index1_u) -> &Self::Output { &self.data[i] }
}

impl core::ops::IndexMut<Index3_u> for Volume {
    fn index_mut(&mut self, i3: Index3_u) -> &mut Self::Output {
        let i1 = index3_to_1(i3, self.fov.dims());
        &mut self.data[i1]
    }
}

impl core::ops::Index<Index3_u> for Volume {
    type Output = Intensityf32;
    fn index(&self, i3: Index3_u) -> &Self::Output {
        let i1 = index3_to_1(i3, self.fov.dims());
        &self.data[i1]
    }
}
