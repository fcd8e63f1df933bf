//! Filtered backprojection: reconstruct a 3D density volume from 2D
//! projections taken around a vertical rotation axis, in parallel-beam or
//! cone-beam geometry.

mod exports;
pub use exports::*;

pub mod error;
pub mod cancel;
pub mod index;
pub mod fov;
pub mod volume;
pub mod projection;
pub mod filter;
pub mod backprojector;
pub mod normalize;
pub mod reconstruct;
pub mod config;
pub mod phantom;
pub mod io;
pub mod utils;
