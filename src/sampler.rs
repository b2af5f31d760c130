// sampler.rs - Monte Carlo Taylor factors over uniformly random orientations

use crate::error::{Result, TaylorError};
use crate::orientation::Orientation;
use crate::schmid::{unit_axis, ConstraintSystem};
use crate::simplex::{DenseSimplex, LpBackend};
use crate::slip::SlipSystemCatalog;
use crate::stats::{Histogram, Summary};
use crate::taylor::{TaylorResult, TaylorSolver};
use crate::utils::rng::sample_rng;
use nalgebra::Vector3;
use rand::Rng;
use rayon::prelude::*;
use tracing::{info, warn};

/// One solved orientation.
#[derive(Debug, Clone)]
pub struct Sample {
    pub index: usize,
    pub orientation: Orientation,
    pub result: TaylorResult,
}

/// An orientation left out of the statistics, with the reason.
#[derive(Debug, Clone)]
pub struct SampleFailure {
    pub index: usize,
    pub orientation: Orientation,
    pub error: TaylorError,
}

/// Taylor factors of a sampled polycrystal, in sample-index order.
#[derive(Debug, Clone)]
pub struct PolycrystalDistribution {
    pub requested: usize,
    pub samples: Vec<Sample>,
    pub excluded: Vec<SampleFailure>,
}

impl PolycrystalDistribution {
    fn from_outcomes(requested: usize, outcomes: Vec<std::result::Result<Sample, SampleFailure>>) -> Self {
        let mut samples = Vec::with_capacity(outcomes.len());
        let mut excluded = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(sample) => samples.push(sample),
                Err(failure) => excluded.push(failure),
            }
        }
        Self { requested, samples, excluded }
    }

    pub fn taylor_factors(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.result.taylor_factor).collect()
    }

    /// Statistics over the solved samples; `None` if every sample failed.
    pub fn summary(&self) -> Option<Summary> {
        Summary::from_values(&self.taylor_factors())
    }

    pub fn histogram(&self, bins: usize) -> Result<Histogram> {
        Histogram::auto(&self.taylor_factors(), bins)
    }

    pub fn n_excluded(&self) -> usize {
        self.excluded.len()
    }

    /// Samples whose optimal slip combination is not unique.
    pub fn n_degenerate(&self) -> usize {
        self.samples.iter().filter(|s| s.result.degenerate).count()
    }
}

/// Drives Taylor solves for a fixed catalog and loading axis.
///
/// Samples whose constraint matrix is rank deficient or whose LP fails are
/// skipped (never retried) and reported in
/// [`PolycrystalDistribution::excluded`].
#[derive(Debug, Clone)]
pub struct PolycrystalSampler<'a, B: LpBackend = DenseSimplex> {
    catalog: &'a SlipSystemCatalog,
    loading_axis: Vector3<f64>,
    solver: TaylorSolver<B>,
}

impl<'a> PolycrystalSampler<'a, DenseSimplex> {
    pub fn new(catalog: &'a SlipSystemCatalog, loading_axis: Vector3<f64>) -> Result<Self> {
        Self::with_backend(catalog, loading_axis, DenseSimplex::default())
    }
}

impl<'a, B: LpBackend> PolycrystalSampler<'a, B> {
    pub fn with_backend(catalog: &'a SlipSystemCatalog, loading_axis: Vector3<f64>, backend: B) -> Result<Self> {
        Ok(Self {
            catalog,
            loading_axis: unit_axis(&loading_axis)?,
            solver: TaylorSolver::with_backend(backend),
        })
    }

    pub fn catalog(&self) -> &SlipSystemCatalog {
        self.catalog
    }

    pub fn loading_axis(&self) -> &Vector3<f64> {
        &self.loading_axis
    }

    /// Single-crystal mode: Taylor factor of one given orientation.
    pub fn single(&self, orientation: &Orientation) -> Result<TaylorResult> {
        let system = ConstraintSystem::build(self.catalog, orientation, &self.loading_axis)?;
        self.solver.solve(&system)
    }

    fn evaluate(&self, index: usize, orientation: Orientation) -> std::result::Result<Sample, SampleFailure> {
        match self.single(&orientation) {
            Ok(result) => Ok(Sample { index, orientation, result }),
            Err(error) => {
                warn!(index, euler = %orientation.euler(), %error, "sample excluded");
                Err(SampleFailure { index, orientation, error })
            }
        }
    }

    /// Sequential run drawing all `n` orientations from `rng`.
    pub fn simulate(&self, n: usize, rng: &mut impl Rng) -> Result<PolycrystalDistribution> {
        check_sample_count(n)?;
        let outcomes: Vec<_> = (0..n)
            .map(|index| {
                let orientation = Orientation::random(&mut *rng);
                self.evaluate(index, orientation)
            })
            .collect();
        Ok(self.finish(n, outcomes))
    }

    /// Parallel run; sample `i` draws from its own stream derived from
    /// `(seed, i)`, so the result does not depend on the thread count.
    pub fn simulate_parallel(&self, n: usize, seed: u64) -> Result<PolycrystalDistribution> {
        self.simulate_parallel_with(n, seed, |_| {})
    }

    /// As [`Self::simulate_parallel`], calling `on_sample` after every solve.
    pub fn simulate_parallel_with<F>(&self, n: usize, seed: u64, on_sample: F) -> Result<PolycrystalDistribution>
    where
        F: Fn(usize) + Sync,
    {
        check_sample_count(n)?;
        let outcomes: Vec<_> = (0..n)
            .into_par_iter()
            .map(|index| {
                let mut rng = sample_rng(seed, index);
                let orientation = Orientation::random(&mut rng);
                let outcome = self.evaluate(index, orientation);
                on_sample(index);
                outcome
            })
            .collect();
        Ok(self.finish(n, outcomes))
    }

    fn finish(&self, n: usize, outcomes: Vec<std::result::Result<Sample, SampleFailure>>) -> PolycrystalDistribution {
        let dist = PolycrystalDistribution::from_outcomes(n, outcomes);
        info!(
            catalog = self.catalog.name(),
            requested = n,
            solved = dist.samples.len(),
            excluded = dist.n_excluded(),
            "polycrystal run finished"
        );
        dist
    }
}

fn check_sample_count(n: usize) -> Result<()> {
    if n == 0 {
        return Err(TaylorError::config("sample count must be positive"));
    }
    Ok(())
}
