// taylor.rs - Minimal-shear (Taylor) solve for one orientation

use crate::error::{LpError, Result};
use crate::schmid::ConstraintSystem;
use crate::simplex::{DenseSimplex, LinearProgram, LpBackend};
use crate::slip::SlipSystemCatalog;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Largest accepted |A γ - target| component.
pub const RESIDUAL_TOL: f64 = 1e-6;

/// Shears below this magnitude count as inactive.
pub const ACTIVE_TOL: f64 = 1e-9;

/// Signed shear activity per slip system, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShearSolution {
    pub shears: DVector<f64>,
}

impl ShearSolution {
    /// γ⁺ part of the split, max(γ, 0).
    pub fn positive(&self) -> DVector<f64> {
        self.shears.map(|g| g.max(0.0))
    }

    /// γ⁻ part of the split, max(-γ, 0).
    pub fn negative(&self) -> DVector<f64> {
        self.shears.map(|g| (-g).max(0.0))
    }

    /// Σ |γₛ|.
    pub fn total(&self) -> f64 {
        self.shears.iter().map(|g| g.abs()).sum()
    }

    /// Indices of systems that carry slip.
    pub fn active_systems(&self) -> Vec<usize> {
        self.shears
            .iter()
            .enumerate()
            .filter(|(_, g)| g.abs() > ACTIVE_TOL)
            .map(|(i, _)| i)
            .collect()
    }

    /// One row per slip system, for tabular display.
    pub fn rows(&self, catalog: &SlipSystemCatalog) -> Vec<ShearRow> {
        catalog
            .iter()
            .zip(self.shears.iter())
            .enumerate()
            .map(|(index, (system, &shear))| ShearRow { index, system: system.label(), shear })
            .collect()
    }
}

/// A labelled entry of the shear table.
#[derive(Debug, Clone, PartialEq)]
pub struct ShearRow {
    pub index: usize,
    pub system: String,
    pub shear: f64,
}

impl ShearRow {
    pub fn format_row(&self) -> String {
        let marker = if self.shear.abs() > ACTIVE_TOL { "*" } else { " " };
        format!("{:>3} {:<24} {:>12.6} {}", self.index, self.system, self.shear, marker)
    }
}

/// Taylor factor of one orientation with the shears that realize it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaylorResult {
    /// M = Σ |γₛ| / ε with ε = 1.
    pub taylor_factor: f64,
    pub shear: ShearSolution,
    /// Other optimal slip combinations exist; M is still unique.
    pub degenerate: bool,
    /// max |A γ - target|.
    pub residual: f64,
}

impl TaylorResult {
    pub fn n_active(&self) -> usize {
        self.shear.active_systems().len()
    }
}

/// Solves min Σ|γₛ| subject to Σ γₛ Pₛ = ε through a pluggable LP backend.
#[derive(Debug, Clone, Default)]
pub struct TaylorSolver<B: LpBackend = DenseSimplex> {
    backend: B,
}

impl TaylorSolver<DenseSimplex> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: LpBackend> TaylorSolver<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The split program: min Σ(γ⁺ + γ⁻) s.t. A(γ⁺ - γ⁻) = target, γ± ≥ 0.
    /// Columns are `[γ⁺₀..γ⁺ₖ, γ⁻₀..γ⁻ₖ]`.
    pub fn linear_program(system: &ConstraintSystem) -> LinearProgram {
        let (rows, k) = system.matrix.shape();
        let mut constraints = DMatrix::zeros(rows, 2 * k);
        constraints.columns_mut(0, k).copy_from(&system.matrix);
        constraints.columns_mut(k, k).copy_from(&(-&system.matrix));
        LinearProgram::new(DVector::from_element(2 * k, 1.0), constraints, system.target.clone())
    }

    pub fn solve(&self, system: &ConstraintSystem) -> Result<TaylorResult> {
        let k = system.n_systems();
        let lp = Self::linear_program(system);
        let solution = self.backend.minimize(&lp)?;

        let shears = DVector::from_fn(k, |s, _| solution.x[s] - solution.x[k + s]);
        let residual = system.residual(&shears);
        if !residual.is_finite() || residual > RESIDUAL_TOL {
            return Err(LpError::Unstable { residual }.into());
        }

        let shear = ShearSolution { shears };
        let taylor_factor = shear.total();
        debug!(
            taylor_factor,
            active = shear.active_systems().len(),
            pivots = solution.pivots,
            backend = self.backend.name(),
            "solved slip activities"
        );

        Ok(TaylorResult {
            taylor_factor,
            shear,
            degenerate: solution.alternative_optima,
            residual,
        })
    }
}
