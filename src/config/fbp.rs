//! Configuration file parser for FBP reconstructions

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

use units::{mm_, radian_, Angle, Length};

use crate::{
    backprojector::ConeParameters,
    error::{FbpError, Result},
    filter::FilterKind,
    fov::FOV,
    reconstruct::Reconstruction,
};

/// Quantities are written with their units, as TOML strings: `"1.5 mm"`
fn deserialize_uom<'d, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    String::deserialize(deserializer)?
        .parse::<T>()
        .map_err(de::Error::custom)
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Side of the square detector, in pixels
    pub detector_pixels: usize,

    /// Side of the cubic output volume, in voxels
    pub volume_voxels: usize,

    /// Rotation between consecutive views
    #[serde(deserialize_with = "deserialize_uom")]
    pub angle_step: Angle,

    /// Views beyond this many are ignored
    pub max_views: usize,

    #[serde(default)]
    pub geometry: GeometryKind,

    #[serde(default)]
    pub filter: FilterKind,

    /// Size of the rayon thread pool. All cores if absent.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Required when `geometry = "cone"`
    pub cone: Option<Cone>,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    #[default]
    Parallel,
    Cone,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Cone {
    #[serde(deserialize_with = "deserialize_uom")]
    pub voxel_size: Length,
    #[serde(deserialize_with = "deserialize_uom")]
    pub detector_width: Length,
    #[serde(deserialize_with = "deserialize_uom")]
    pub source_distance: Length,
    #[serde(default = "unit_length")]
    #[serde(deserialize_with = "deserialize_uom")]
    pub detector_distance: Length,
}

fn unit_length() -> Length { units::mm(1.0) }

impl Config {

    /// Catch every configuration error before any work is done
    pub fn validate(&self) -> Result<()> {
        if self.max_views == 0 { return Err(FbpError::ZeroMaxViews) }
        let step = radian_(self.angle_step);
        if !(step > 0.0 && step.is_finite()) {
            return Err(FbpError::NonPositive { name: "angle_step", value: step });
        }
        if let Some(0) = self.threads {
            return Err(FbpError::NonPositive { name: "threads", value: 0.0 });
        }
        self.reconstruction_unchecked()?.validate()
    }

    /// The runtime parameters described by this configuration
    pub fn reconstruction(&self) -> Result<Reconstruction> {
        self.validate()?;
        self.reconstruction_unchecked()
    }

    fn reconstruction_unchecked(&self) -> Result<Reconstruction> {
        let (d, v) = (self.detector_pixels, self.volume_voxels);
        let recon = match self.geometry {
            GeometryKind::Parallel => Reconstruction::parallel(d, v),
            GeometryKind::Cone => {
                let cone = self.cone.ok_or(FbpError::MissingConeParameters)?;
                let params = ConeParameters {
                    detector_width   : cone.detector_width,
                    source_distance  : cone.source_distance,
                    detector_distance: cone.detector_distance,
                };
                Reconstruction::cone(d, FOV::new(v, cone.voxel_size), params)
            },
        };
        Ok(recon.with_filter(self.filter))
    }

    /// One-line summary for logs
    pub fn describe(&self) -> String {
        let mut s = format!(
            "{:?} beam, D = {}, V = {}, {} views every {}°, {:?} filter",
            self.geometry, self.detector_pixels, self.volume_voxels,
            self.max_views, units::degree_(self.angle_step), self.filter,
        );
        if let (GeometryKind::Cone, Some(c)) = (self.geometry, self.cone) {
            s += &format!(", source at {} mm, detector at {} mm",
                          mm_(c.source_distance), mm_(c.detector_distance));
        }
        s
    }
}

pub fn read_config_file(path: impl AsRef<Path>) -> Result<Config> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(toml::from_str(&text)?)
}
