// orientation.rs - Crystal orientations: Bunge Euler angles and uniform SO(3) sampling

use crate::error::{Result, TaylorError};
use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::{PI, TAU};
use std::fmt;

/// Bunge (Z-X-Z) Euler angles in radians, normalized to
/// φ1, φ2 ∈ [0, 2π) and Φ ∈ [0, π].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub phi1: f64,
    pub phi: f64,
    pub phi2: f64,
}

impl EulerAngles {
    /// Normalize arbitrary finite angles into the fundamental Bunge ranges.
    pub fn normalized(phi1: f64, phi: f64, phi2: f64) -> Result<Self> {
        if !(phi1.is_finite() && phi.is_finite() && phi2.is_finite()) {
            return Err(TaylorError::config(format!(
                "Euler angles must be finite, got ({phi1}, {phi}, {phi2})"
            )));
        }

        let mut phi1 = wrap(phi1);
        let mut phi = wrap(phi);
        let mut phi2 = wrap(phi2);

        // Rx(Φ) = Rz(π) Rx(2π - Φ) Rz(π)
        if phi > PI {
            phi = TAU - phi;
            phi1 = wrap(phi1 + PI);
            phi2 = wrap(phi2 + PI);
        }

        Ok(Self { phi1, phi, phi2 })
    }

    /// (φ1, Φ, φ2) in degrees.
    pub fn degrees(&self) -> [f64; 3] {
        [self.phi1.to_degrees(), self.phi.to_degrees(), self.phi2.to_degrees()]
    }
}

impl fmt::Display for EulerAngles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.degrees();
        write!(f, "({a:.2}°, {b:.2}°, {c:.2}°)")
    }
}

/// Reduce into [0, 2π); `rem_euclid` can round tiny negatives up to 2π.
fn wrap(angle: f64) -> f64 {
    let r = angle.rem_euclid(TAU);
    if r >= TAU { 0.0 } else { r }
}

/// A proper rotation taking crystal-frame vectors into the sample frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    rotation: Rotation3<f64>,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

impl Orientation {
    /// Crystal axes aligned with the sample axes.
    pub fn identity() -> Self {
        Self { rotation: Rotation3::identity() }
    }

    /// R = Rz(φ1) · Rx(Φ) · Rz(φ2), the transpose of the Bunge g-matrix.
    pub fn from_euler(phi1: f64, phi: f64, phi2: f64) -> Result<Self> {
        let e = EulerAngles::normalized(phi1, phi, phi2)?;
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), e.phi1)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), e.phi)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), e.phi2);
        Ok(Self { rotation })
    }

    pub fn from_euler_degrees(phi1: f64, phi: f64, phi2: f64) -> Result<Self> {
        Self::from_euler(phi1.to_radians(), phi.to_radians(), phi2.to_radians())
    }

    /// Wrap an explicit matrix, rejecting anything that is not a proper rotation.
    pub fn from_matrix(m: Matrix3<f64>) -> Result<Self> {
        let orthogonality = (m.transpose() * m - Matrix3::identity()).abs().max();
        let det = m.determinant();
        if !orthogonality.is_finite() || orthogonality > 1e-9 || (det - 1.0).abs() > 1e-9 {
            return Err(TaylorError::config(format!(
                "matrix is not a proper rotation (|RᵀR - I| = {orthogonality:.2e}, det = {det:.6})"
            )));
        }
        Ok(Self { rotation: Rotation3::from_matrix_unchecked(m) })
    }

    /// Uniform draw over SO(3): a normalized 4-D Gaussian is a uniform unit
    /// quaternion. Uniform Euler angles would not be.
    pub fn random(rng: &mut impl Rng) -> Self {
        loop {
            let w: f64 = rng.sample(StandardNormal);
            let i: f64 = rng.sample(StandardNormal);
            let j: f64 = rng.sample(StandardNormal);
            let k: f64 = rng.sample(StandardNormal);
            let q = Quaternion::new(w, i, j, k);
            if q.norm() < 1e-12 {
                continue;
            }
            let unit = UnitQuaternion::from_quaternion(q);
            return Self { rotation: unit.to_rotation_matrix() };
        }
    }

    pub fn rotation(&self) -> &Rotation3<f64> {
        &self.rotation
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        self.rotation.matrix()
    }

    /// Express a crystal-frame vector in the sample frame.
    #[inline(always)]
    pub fn to_sample(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * v
    }

    /// Rotation angle ω ∈ [0, π].
    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }

    /// Bunge angles that rebuild this rotation via [`Orientation::from_euler`].
    pub fn euler(&self) -> EulerAngles {
        let m = self.rotation.matrix();
        let cos_phi = m[(2, 2)].clamp(-1.0, 1.0);
        let phi = cos_phi.acos();

        let (phi1, phi2) = if (1.0 - cos_phi * cos_phi).sqrt() > 1e-8 {
            (m[(0, 2)].atan2(-m[(1, 2)]), m[(2, 0)].atan2(m[(2, 1)]))
        } else {
            // Gimbal lock: only φ1 ± φ2 is defined, put it all in φ1.
            (m[(1, 0)].atan2(m[(0, 0)]), 0.0)
        };

        EulerAngles {
            phi1: wrap(phi1),
            phi,
            phi2: wrap(phi2),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.euler(), f)
    }
}
