//! Error types for Taylor factor computations.

use thiserror::Error;

/// Result type alias using [`TaylorError`].
pub type Result<T> = std::result::Result<T, TaylorError>;

/// Failures of the linear-programming backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LpError {
    /// No non-negative point satisfies the equality constraints.
    #[error("linear program is infeasible")]
    Infeasible,

    /// The objective decreases without bound.
    #[error("linear program is unbounded")]
    Unbounded,

    /// Pivoting did not terminate.
    #[error("simplex did not terminate after {0} pivots")]
    IterationLimit(usize),

    /// The returned vertex does not reproduce the target strain.
    #[error("numerically unstable solution (residual: {residual:.2e})")]
    Unstable { residual: f64 },
}

/// Errors that can occur while building or solving Taylor problems.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaylorError {
    /// Invalid run parameters. Raised before any sampling starts.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The Schmid tensors do not span the deviatoric strain space.
    #[error("constraint matrix has rank {rank} < 5")]
    Geometry { rank: usize },

    /// The slip-activity linear program could not be solved.
    #[error("solver error: {0}")]
    Solver(#[from] LpError),
}

impl TaylorError {
    /// Shorthand for a [`TaylorError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        TaylorError::Configuration(msg.into())
    }

    /// Whether the error concerns a single sample rather than the whole run.
    pub fn is_per_sample(&self) -> bool {
        !matches!(self, TaylorError::Configuration(_))
    }
}
