// schmid.rs - Schmid tensors and the slip-to-strain constraint system

use crate::error::{Result, TaylorError};
use crate::orientation::Orientation;
use crate::slip::{SlipSystem, SlipSystemCatalog};
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use std::cmp::Ordering;

/// Independent components of a symmetric traceless tensor.
pub const DEVIATORIC_DIM: usize = 5;

/// Relative singular-value cutoff used for the rank test.
const RANK_TOL: f64 = 1e-9;

/// `[T11, T22, T23, T13, T12]`; T33 follows from the zero trace.
pub fn deviatoric_components(t: &Matrix3<f64>) -> [f64; DEVIATORIC_DIM] {
    [t[(0, 0)], t[(1, 1)], t[(1, 2)], t[(0, 2)], t[(0, 1)]]
}

/// P = sym(b ⊗ n) of one slip system, in the sample frame.
pub fn schmid_tensor(system: &SlipSystem, orientation: &Orientation) -> Matrix3<f64> {
    let n = orientation.to_sample(&system.normal);
    let b = orientation.to_sample(&system.slip);
    (b * n.transpose() + n * b.transpose()) * 0.5
}

/// Unit uniaxial tension along `axis` with volume conservation:
/// ε = 3/2 a⊗a - 1/2 I, so the axial strain is exactly 1.
pub fn uniaxial_strain(axis: &Vector3<f64>) -> Result<Matrix3<f64>> {
    let a = unit_axis(axis)?;
    Ok(a * a.transpose() * 1.5 - Matrix3::identity() * 0.5)
}

pub(crate) fn unit_axis(axis: &Vector3<f64>) -> Result<Vector3<f64>> {
    let len = axis.norm();
    if !len.is_finite() || len < 1e-12 {
        return Err(TaylorError::config(format!(
            "loading axis must be a finite non-zero vector, got [{}, {}, {}]",
            axis.x, axis.y, axis.z
        )));
    }
    Ok(axis / len)
}

/// Numerical rank from the singular values, relative to the largest one.
pub fn rank(m: &DMatrix<f64>) -> usize {
    if m.is_empty() {
        return 0;
    }
    let sv = m.clone().svd(false, false).singular_values;
    let smax = sv.max();
    if !(smax > 0.0) {
        return 0;
    }
    sv.iter().filter(|&&s| s > RANK_TOL * smax).count()
}

/// Linear map from slip activities to deviatoric strain, plus the strain to hit.
#[derive(Debug, Clone)]
pub struct ConstraintSystem {
    /// 5 × |catalog|, column s holds the deviatoric components of Pₛ.
    pub matrix: DMatrix<f64>,
    /// Deviatoric components of the imposed unit strain.
    pub target: DVector<f64>,
    pub orientation: Orientation,
}

impl ConstraintSystem {
    /// Rotate every slip system into the sample frame and assemble `A`.
    ///
    /// Fails with [`TaylorError::Geometry`] if the Schmid tensors do not
    /// span the five-dimensional deviatoric space.
    pub fn build(
        catalog: &SlipSystemCatalog,
        orientation: &Orientation,
        loading_axis: &Vector3<f64>,
    ) -> Result<Self> {
        let strain = uniaxial_strain(loading_axis)?;

        let mut matrix = DMatrix::zeros(DEVIATORIC_DIM, catalog.len());
        for (s, system) in catalog.iter().enumerate() {
            let p = deviatoric_components(&schmid_tensor(system, orientation));
            for (row, value) in p.iter().enumerate() {
                matrix[(row, s)] = *value;
            }
        }

        let r = rank(&matrix);
        if r < DEVIATORIC_DIM {
            return Err(TaylorError::Geometry { rank: r });
        }

        let target = DVector::from_row_slice(&deviatoric_components(&strain));
        Ok(Self { matrix, target, orientation: *orientation })
    }

    #[inline(always)]
    pub fn n_systems(&self) -> usize {
        self.matrix.ncols()
    }

    /// max |A γ - target|.
    pub fn residual(&self, shears: &DVector<f64>) -> f64 {
        (&self.matrix * shears - &self.target).amax()
    }
}

/// Schmid factor of one system for a given loading axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchmidFactor {
    /// Index into the catalog.
    pub index: usize,
    /// m = (a·n)(a·b); sign gives the slip sense.
    pub factor: f64,
}

/// Schmid factors of every system, ranked by decreasing |m|.
pub fn schmid_factors(
    catalog: &SlipSystemCatalog,
    orientation: &Orientation,
    loading_axis: &Vector3<f64>,
) -> Result<Vec<SchmidFactor>> {
    let a = unit_axis(loading_axis)?;
    let mut factors: Vec<SchmidFactor> = catalog
        .iter()
        .enumerate()
        .map(|(index, system)| {
            let n = orientation.to_sample(&system.normal);
            let b = orientation.to_sample(&system.slip);
            SchmidFactor { index, factor: a.dot(&n) * a.dot(&b) }
        })
        .collect();

    factors.sort_by(|x, y| {
        y.factor
            .abs()
            .partial_cmp(&x.factor.abs())
            .unwrap_or(Ordering::Equal)
            .then(x.index.cmp(&y.index))
    });
    Ok(factors)
}
