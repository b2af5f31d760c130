// simplex.rs - Dense two-phase simplex for small equality-form linear programs

use crate::error::LpError;
use nalgebra::{DMatrix, DVector};

/// minimize cᵀx subject to A x = b, x ≥ 0.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    pub costs: DVector<f64>,
    pub constraints: DMatrix<f64>,
    pub rhs: DVector<f64>,
}

impl LinearProgram {
    pub fn new(costs: DVector<f64>, constraints: DMatrix<f64>, rhs: DVector<f64>) -> Self {
        assert_eq!(costs.len(), constraints.ncols(), "one cost per column");
        assert_eq!(rhs.len(), constraints.nrows(), "one right-hand side per row");
        Self { costs, constraints, rhs }
    }

    #[inline(always)]
    pub fn n_vars(&self) -> usize {
        self.constraints.ncols()
    }

    #[inline(always)]
    pub fn n_constraints(&self) -> usize {
        self.constraints.nrows()
    }
}

/// An optimal basic feasible solution.
#[derive(Debug, Clone)]
pub struct LpSolution {
    pub x: DVector<f64>,
    pub objective: f64,
    /// Basic variable of each constraint row. Indices ≥ `n_vars` are
    /// artificial variables left on redundant rows.
    pub basis: Vec<usize>,
    /// Some non-basic column has zero reduced cost, so other optimal
    /// vertices exist.
    pub alternative_optima: bool,
    pub pivots: usize,
}

/// Anything that can solve a [`LinearProgram`] to optimality.
pub trait LpBackend: Send + Sync {
    fn minimize(&self, lp: &LinearProgram) -> Result<LpSolution, LpError>;

    fn name(&self) -> &'static str;
}

/// Two-phase tableau simplex with Bland's rule.
///
/// Entering column: lowest index with negative reduced cost. Leaving row:
/// minimum ratio, ties to the lowest basic-variable index. The returned
/// vertex is therefore a deterministic function of the column order, and
/// degenerate problems cannot cycle.
#[derive(Debug, Clone, Copy)]
pub struct DenseSimplex {
    /// Pivot and optimality tolerance.
    pub tolerance: f64,
    /// Hard cap on pivots; `None` picks one from the problem size.
    pub max_pivots: Option<usize>,
}

impl Default for DenseSimplex {
    fn default() -> Self {
        Self { tolerance: 1e-9, max_pivots: None }
    }
}

impl LpBackend for DenseSimplex {
    fn minimize(&self, lp: &LinearProgram) -> Result<LpSolution, LpError> {
        let (m, n) = (lp.n_constraints(), lp.n_vars());
        let tol = self.tolerance;
        let limit = self.max_pivots.unwrap_or(50 * (n + m) + 1000);

        let mut tab = Tableau::phase_one(lp);
        tab.run(n + m, tol, limit)?;

        let infeasibility = -tab.t[(m, tab.rhs)];
        let scale = lp.rhs.iter().map(|v| v.abs()).sum::<f64>().max(1.0);
        if infeasibility > 1e-7 * scale {
            return Err(LpError::Infeasible);
        }

        tab.drive_out_artificials(n, tol);
        tab.load_costs(&lp.costs);
        tab.run(n, tol, limit)?;

        let mut x = DVector::zeros(n);
        let mut is_basic = vec![false; n];
        for (row, &var) in tab.basis.iter().enumerate() {
            if var < n {
                x[var] = tab.t[(row, tab.rhs)].max(0.0);
                is_basic[var] = true;
            }
        }

        let alternative_optima = (0..n).any(|j| !is_basic[j] && tab.t[(m, j)].abs() <= tol);
        let objective = lp.costs.dot(&x);

        Ok(LpSolution { x, objective, basis: tab.basis, alternative_optima, pivots: tab.pivots })
    }

    fn name(&self) -> &'static str {
        "dense-simplex"
    }
}

/// Rows 0..m are constraints, row m holds reduced costs and -z in the rhs column.
struct Tableau {
    t: DMatrix<f64>,
    basis: Vec<usize>,
    m: usize,
    rhs: usize,
    pivots: usize,
}

impl Tableau {
    /// Constraints with one artificial per row and the phase-1 objective Σ artificials.
    fn phase_one(lp: &LinearProgram) -> Self {
        let (m, n) = (lp.n_constraints(), lp.n_vars());
        let rhs = n + m;
        let mut t = DMatrix::zeros(m + 1, n + m + 1);

        for i in 0..m {
            let sign = if lp.rhs[i] < 0.0 { -1.0 } else { 1.0 };
            for j in 0..n {
                t[(i, j)] = sign * lp.constraints[(i, j)];
            }
            t[(i, n + i)] = 1.0;
            t[(i, rhs)] = sign * lp.rhs[i];
        }

        for j in (0..n).chain(std::iter::once(rhs)) {
            let column_sum: f64 = (0..m).map(|i| t[(i, j)]).sum();
            t[(m, j)] = -column_sum;
        }

        Self { t, basis: (n..n + m).collect(), m, rhs, pivots: 0 }
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let p = self.t[(row, col)];
        let ncols = self.t.ncols();
        for j in 0..ncols {
            self.t[(row, j)] /= p;
        }
        for i in 0..=self.m {
            if i == row {
                continue;
            }
            let f = self.t[(i, col)];
            if f == 0.0 {
                continue;
            }
            for j in 0..ncols {
                let v = self.t[(row, j)];
                self.t[(i, j)] -= f * v;
            }
        }
        self.basis[row] = col;
        self.pivots += 1;
    }

    /// Pivot until no column below `allowed` has a negative reduced cost.
    fn run(&mut self, allowed: usize, tol: f64, limit: usize) -> Result<(), LpError> {
        loop {
            let Some(q) = (0..allowed).find(|&j| self.t[(self.m, j)] < -tol) else {
                return Ok(());
            };

            let mut leave: Option<(usize, f64)> = None;
            for i in 0..self.m {
                let a = self.t[(i, q)];
                if a <= tol {
                    continue;
                }
                let ratio = self.t[(i, self.rhs)].max(0.0) / a;
                leave = match leave {
                    None => Some((i, ratio)),
                    Some((r, best)) => {
                        if ratio < best - tol || (ratio <= best + tol && self.basis[i] < self.basis[r]) {
                            Some((i, ratio))
                        } else {
                            Some((r, best))
                        }
                    }
                };
            }

            let Some((r, _)) = leave else {
                return Err(LpError::Unbounded);
            };
            if self.pivots >= limit {
                return Err(LpError::IterationLimit(self.pivots));
            }
            self.pivot(r, q);
        }
    }

    /// Replace zero-level artificials in the basis by original columns.
    /// Rows with no usable column are redundant and stay inert.
    fn drive_out_artificials(&mut self, n: usize, tol: f64) {
        for row in 0..self.m {
            if self.basis[row] < n {
                continue;
            }
            let mut best: Option<(usize, f64)> = None;
            for j in 0..n {
                let a = self.t[(row, j)].abs();
                if a > tol && best.map_or(true, |(_, b)| a > b) {
                    best = Some((j, a));
                }
            }
            if let Some((col, _)) = best {
                self.t[(row, self.rhs)] = 0.0;
                self.pivot(row, col);
            }
        }
    }

    /// Phase-2 reduced costs d_j = c_j - c_Bᵀ B⁻¹ A_j; artificials cost nothing.
    fn load_costs(&mut self, costs: &DVector<f64>) {
        let n = costs.len();
        let ncols = self.t.ncols();
        for j in 0..ncols {
            let c_j = if j < n { costs[j] } else { 0.0 };
            let basic: f64 = (0..self.m)
                .map(|i| {
                    let var = self.basis[i];
                    let c_b = if var < n { costs[var] } else { 0.0 };
                    c_b * self.t[(i, j)]
                })
                .sum();
            // The rhs column has c_j = 0 and ends up holding -z.
            self.t[(self.m, j)] = c_j - basic;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redundant_row_is_tolerated() {
        // x0 + x1 = 1 stated twice.
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let lp = LinearProgram::new(DVector::from_vec(vec![2.0, 1.0]), a, DVector::from_vec(vec![1.0, 1.0]));
        let sol = DenseSimplex::default().minimize(&lp).unwrap();
        assert!((sol.objective - 1.0).abs() < 1e-12);
        assert!((sol.x[1] - 1.0).abs() < 1e-12);
    }
}
