//! Rescaling of raw accumulations into `[0, 1]`.

use rayon::prelude::*;

use units::todo::Intensityf32;

use crate::volume::Volume;

/// Global extrema of a volume's values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: Intensityf32,
    pub max: Intensityf32,
}

impl Range {
    pub fn is_degenerate(&self) -> bool { !(self.max > self.min) }
}

/// Parallel two-phase reduction: each rayon job finds its local extrema,
/// which are then combined. `None` for an empty volume.
pub fn range(data: &[Intensityf32]) -> Option<Range> {
    data.par_iter()
        .fold(|| None, |acc: Option<Range>, &v| Some(match acc {
            None => Range { min: v, max: v },
            Some(Range { min, max }) => Range { min: min.min(v), max: max.max(v) },
        }))
        .reduce(|| None, |a, b| match (a, b) {
            (Some(a), Some(b)) => Some(Range { min: a.min.min(b.min), max: a.max.max(b.max) }),
            (a, None) => a,
            (None, b) => b,
        })
}

impl Volume {

    /// Map every voxel through `v' = (v - min) / (max - min)`, with `min` and
    /// `max` taken over the whole volume.
    ///
    /// When all voxels are equal (including a volume reconstructed from no
    /// views at all) every voxel becomes 0. Returns the range found before
    /// rescaling.
    pub fn normalize(&mut self) -> Option<Range> {
        let found = range(&self.data)?;
        let Range { min, max } = found;
        if found.is_degenerate() {
            tracing::warn!("Degenerate volume (min = max = {min}): all voxels set to 0");
            self.data.par_iter_mut().for_each(|v| *v = 0.0);
        } else {
            let span = max - min;
            self.data.par_iter_mut().for_each(|v| *v = ((*v - min) / span).clamp(0.0, 1.0));
        }
        Some(found)
    }
}
