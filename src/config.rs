// config.rs - Run parameters for polycrystal simulations

use crate::error::{Result, TaylorError};
use crate::schmid::unit_axis;
use crate::slip::{CrystalFamily, SlipSystemCatalog, TemperatureRegime};
use nalgebra::Vector3;

/// Run-time configuration (single source of truth).
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub family: CrystalFamily,
    pub regime: TemperatureRegime,
    pub samples: usize,
    pub seed: u64,
    /// Tension axis in the sample frame.
    pub loading_axis: Vector3<f64>,
    pub histogram_bins: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            family: CrystalFamily::Fcc,
            regime: TemperatureRegime::Room,
            samples: 5_000,
            seed: 42,
            loading_axis: Vector3::x(),
            histogram_bins: 30,
        }
    }
}

impl RunConfig {
    /// Reject anything that would make the run meaningless before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            return Err(TaylorError::config("sample count must be positive"));
        }
        if self.histogram_bins == 0 {
            return Err(TaylorError::config("histogram needs at least one bin"));
        }
        unit_axis(&self.loading_axis)?;
        Ok(())
    }

    pub fn catalog(&self) -> Result<SlipSystemCatalog> {
        SlipSystemCatalog::generate(self.family, self.regime)
    }
}

/// Signed sample count as typed by a user; zero and negatives are errors.
pub fn sample_count(n: i64) -> Result<usize> {
    usize::try_from(n)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| TaylorError::config(format!("sample count must be positive, got {n}")))
}

/// Parse `"1,1,0"` into an (unnormalized) axis.
pub fn parse_axis(s: &str) -> Result<Vector3<f64>> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| TaylorError::config(format!("invalid loading axis '{s}': {e}")))?;
    match parts.as_slice() {
        &[x, y, z] => {
            let axis = Vector3::new(x, y, z);
            unit_axis(&axis)?;
            Ok(axis)
        }
        _ => Err(TaylorError::config(format!("loading axis needs three components, got '{s}'"))),
    }
}
