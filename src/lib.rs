//! Taylor factors of fcc and bcc crystals in uniaxial tension.
//!
//! Slip systems ([`slip`]) are rotated into the sample frame
//! ([`orientation`], [`schmid`]) and the minimal total shear reproducing a
//! unit strain is found by linear programming ([`taylor`], [`simplex`]).
//! [`sampler`] repeats this over uniformly random orientations.

pub mod config;
pub mod error;
pub mod orientation;
pub mod sampler;
pub mod schmid;
pub mod simplex;
pub mod slip;
pub mod stats;
pub mod taylor;
pub mod utils;

pub use error::{LpError, Result, TaylorError};
pub use orientation::{EulerAngles, Orientation};
pub use sampler::{PolycrystalDistribution, PolycrystalSampler};
pub use schmid::ConstraintSystem;
pub use slip::{CrystalFamily, SlipSystem, SlipSystemCatalog, TemperatureRegime};
pub use taylor::{ShearSolution, TaylorResult, TaylorSolver};
