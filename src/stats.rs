// stats.rs - Summary statistics, histograms and goodness-of-fit for sampled Taylor factors

use crate::error::{Result, TaylorError};
use std::f64::consts::PI;

/// Order-independent summary of a set of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std_dev: f64,
    /// Standard error of the mean.
    pub std_error: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Two-pass mean/variance; `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = if values.len() > 1 {
            values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        let std_dev = variance.sqrt();

        Some(Self {
            count: values.len(),
            mean,
            std_dev,
            std_error: std_dev / n.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }

    pub fn format_row(&self, name: &str) -> String {
        format!(
            "{:<16} {:>8} {:>10.4} ± {:>8.4} {:>10.4} {:>10.4} {:>10.4}",
            name, self.count, self.mean, self.std_error, self.std_dev, self.min, self.max
        )
    }
}

/// Fixed-width histogram over `[lo, hi]`; the upper edge belongs to the last bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
    /// Values that fell outside the range.
    pub outside: u64,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize, lo: f64, hi: f64) -> Result<Self> {
        if bins == 0 {
            return Err(TaylorError::config("histogram needs at least one bin"));
        }
        if !(lo.is_finite() && hi.is_finite() && hi > lo) {
            return Err(TaylorError::config(format!("invalid histogram range [{lo}, {hi}]")));
        }

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0u64; bins];
        let mut outside = 0;
        for &v in values {
            if !(lo..=hi).contains(&v) {
                outside += 1;
                continue;
            }
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }

        Ok(Self { edges, counts, outside })
    }

    /// Histogram spanning the data range.
    pub fn auto(values: &[f64], bins: usize) -> Result<Self> {
        let summary = Summary::from_values(values)
            .ok_or_else(|| TaylorError::config("cannot histogram an empty sample"))?;
        let (lo, hi) = if summary.max > summary.min {
            (summary.min, summary.max)
        } else {
            (summary.min - 0.5, summary.max + 0.5)
        };
        Self::new(values, bins, lo, hi)
    }

    #[inline(always)]
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Probability density of bin `i` (integrates to 1 over the range).
    pub fn density(&self, i: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let width = self.edges[i + 1] - self.edges[i];
        self.counts[i] as f64 / (total as f64 * width)
    }

    /// Text rendering, one line per bin.
    pub fn render(&self, bar_width: usize) -> Vec<String> {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let len = (c as f64 / peak as f64 * bar_width as f64).round() as usize;
                format!("[{:>7.4}, {:>7.4}) {:>7} {}", self.edges[i], self.edges[i + 1], c, "#".repeat(len))
            })
            .collect()
    }
}

/// Pearson chi-squared test of binned counts against expected counts.
pub struct ChiSquaredTest {
    chi2: f64,
    dof: usize,
    p_value: f64,
}

impl ChiSquaredTest {
    /// `dof = bins - 1` since the total count is fixed.
    pub fn new(observed: &[f64], expected: &[f64]) -> Self {
        assert_eq!(observed.len(), expected.len());

        let chi2: f64 = observed
            .iter()
            .zip(expected.iter())
            .map(|(&obs, &exp)| if exp > 0.0 { (obs - exp).powi(2) / exp } else { 0.0 })
            .sum();

        let dof = observed.len().saturating_sub(1);
        let p_value = chi2_p_value(chi2, dof);

        Self { chi2, dof, p_value }
    }

    pub fn chi2(&self) -> f64 { self.chi2 }
    pub fn dof(&self) -> usize { self.dof }
    pub fn p_value(&self) -> f64 { self.p_value }
    pub fn chi2_per_dof(&self) -> f64 {
        if self.dof > 0 { self.chi2 / self.dof as f64 } else { 0.0 }
    }
}

/// P(X² ≥ chi2) for `dof` degrees of freedom.
fn chi2_p_value(chi2: f64, dof: usize) -> f64 {
    if dof == 0 {
        return 1.0;
    }
    gamma_q(dof as f64 / 2.0, chi2 / 2.0)
}

/// Regularized upper incomplete gamma function Q(a, x).
fn gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    let prefactor = (-x + a * x.ln() - ln_gamma(a)).exp();

    if x < a + 1.0 {
        // Series for P(a, x)
        let mut sum = 1.0 / a;
        let mut term = 1.0 / a;
        for n in 1..500 {
            term *= x / (a + n as f64);
            sum += term;
            if term.abs() < 1e-15 * sum.abs() {
                break;
            }
        }
        (1.0 - sum * prefactor).clamp(0.0, 1.0)
    } else {
        // Lentz continued fraction for Q(a, x)
        const TINY: f64 = 1e-300;
        let mut b = x + 1.0 - a;
        let mut c = 1.0 / TINY;
        let mut d = 1.0 / b;
        let mut h = d;
        for i in 1..500 {
            let an = -(i as f64) * (i as f64 - a);
            b += 2.0;
            d = an * d + b;
            if d.abs() < TINY {
                d = TINY;
            }
            c = b + an / c;
            if c.abs() < TINY {
                c = TINY;
            }
            d = 1.0 / d;
            let delta = d * c;
            h *= delta;
            if (delta - 1.0).abs() < 1e-15 {
                break;
            }
        }
        (prefactor * h).clamp(0.0, 1.0)
    }
}

/// Log gamma function approximation
fn ln_gamma(x: f64) -> f64 {
    // Stirling's approximation
    if x > 20.0 {
        let inv_x = 1.0 / x;
        let inv_x2 = inv_x * inv_x;
        x * x.ln() - x + 0.5 * (2.0 * PI / x).ln()
            + inv_x / 12.0 - inv_x2 * inv_x / 360.0 + inv_x2 * inv_x2 * inv_x / 1260.0
    } else {
        // Shift up with Γ(z+1) = z Γ(z)
        let mut z = x;
        let mut result = 0.0;
        while z <= 20.0 {
            result -= z.ln();
            z += 1.0;
        }
        result + ln_gamma(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ln_gamma_matches_factorials() {
        // Γ(6) = 120, Γ(0.5) = √π
        assert!((ln_gamma(6.0) - 120f64.ln()).abs() < 1e-9);
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-9);
    }

    #[test]
    fn chi2_p_value_known_points() {
        // dof = 2: Q = exp(-x/2)
        assert!((chi2_p_value(4.0, 2) - (-2.0f64).exp()).abs() < 1e-9);
        // dof = 10, median ≈ 9.342
        assert!((chi2_p_value(9.341818, 10) - 0.5).abs() < 1e-4);
    }
}
