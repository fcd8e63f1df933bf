/// Units which are simply type aliases for `f32` rather than having an
/// implementation as a `uom` `Quantity`.
///
/// These appear in the hot loops of filtering and backprojection, where the
/// values are dimensionless detector intensities or lengths already expressed
/// in voxel units, so we use plain `f32`s, but still want some clues in the
/// source as to what they represent.

pub type Lengthf32    = f32;
pub type Ratiof32     = f32;
pub type Intensityf32 = f32;
