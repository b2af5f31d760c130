// slip.rs - Slip-system enumeration for cubic crystals

use crate::error::{Result, TaylorError};
use nalgebra::Vector3;
use std::fmt;
use std::str::FromStr;

const ORTHOGONALITY_TOL: f64 = 1e-9;

/// Cubic crystal family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrystalFamily {
    Fcc,
    Bcc,
}

/// Temperature regime; selects the extra bcc pencil-glide families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemperatureRegime {
    #[default]
    Room,
    Elevated,
}

impl FromStr for CrystalFamily {
    type Err = TaylorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcc" => Ok(CrystalFamily::Fcc),
            "bcc" => Ok(CrystalFamily::Bcc),
            other => Err(TaylorError::config(format!("unknown crystal family '{other}'"))),
        }
    }
}

impl FromStr for TemperatureRegime {
    type Err = TaylorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "room" | "rt" => Ok(TemperatureRegime::Room),
            "elevated" | "high" | "ht" => Ok(TemperatureRegime::Elevated),
            other => Err(TaylorError::config(format!("unknown temperature regime '{other}'"))),
        }
    }
}

impl fmt::Display for CrystalFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrystalFamily::Fcc => write!(f, "fcc"),
            CrystalFamily::Bcc => write!(f, "bcc"),
        }
    }
}

impl fmt::Display for TemperatureRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureRegime::Room => write!(f, "room"),
            TemperatureRegime::Elevated => write!(f, "elevated"),
        }
    }
}

/// A (plane normal, slip direction) pair in the crystal frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SlipSystem {
    /// Miller indices of the slip plane, when known.
    pub plane: Option<[i32; 3]>,
    /// Miller indices of the slip direction, when known.
    pub direction: Option<[i32; 3]>,
    /// Unit plane normal.
    pub normal: Vector3<f64>,
    /// Unit slip direction, orthogonal to `normal`.
    pub slip: Vector3<f64>,
}

impl SlipSystem {
    /// Build a system from arbitrary (non-normalized) vectors.
    pub fn new(normal: Vector3<f64>, slip: Vector3<f64>) -> Result<Self> {
        let (n_len, b_len) = (normal.norm(), slip.norm());
        if !(n_len.is_finite() && b_len.is_finite()) || n_len == 0.0 || b_len == 0.0 {
            return Err(TaylorError::config("slip system vectors must be finite and non-zero"));
        }
        let normal = normal / n_len;
        let slip = slip / b_len;
        let dot = normal.dot(&slip);
        if dot.abs() > ORTHOGONALITY_TOL {
            return Err(TaylorError::config(format!(
                "slip direction is not in the slip plane (n·b = {dot:.3e})"
            )));
        }
        Ok(Self { plane: None, direction: None, normal, slip })
    }

    /// Build a system from integer Miller indices.
    pub fn from_miller(plane: [i32; 3], direction: [i32; 3]) -> Result<Self> {
        let mut system = Self::new(to_vector(plane), to_vector(direction))?;
        system.plane = Some(plane);
        system.direction = Some(direction);
        Ok(system)
    }

    /// Same physical system up to the sign of either vector.
    pub fn is_equivalent(&self, other: &SlipSystem) -> bool {
        let same_axis = |a: &Vector3<f64>, b: &Vector3<f64>| (a.dot(b).abs() - 1.0).abs() < ORTHOGONALITY_TOL;
        same_axis(&self.normal, &other.normal) && same_axis(&self.slip, &other.slip)
    }

    /// `(h k l)[u v w]` label, or the rounded unit vectors for custom systems.
    pub fn label(&self) -> String {
        match (self.plane, self.direction) {
            (Some(p), Some(d)) => format!("({} {} {})[{} {} {}]", p[0], p[1], p[2], d[0], d[1], d[2]),
            _ => format!(
                "({:.3} {:.3} {:.3})[{:.3} {:.3} {:.3}]",
                self.normal.x, self.normal.y, self.normal.z, self.slip.x, self.slip.y, self.slip.z
            ),
        }
    }
}

impl fmt::Display for SlipSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Immutable set of slip systems for one crystal configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SlipSystemCatalog {
    name: String,
    systems: Vec<SlipSystem>,
}

impl SlipSystemCatalog {
    /// Enumerate the admissible slip systems of a crystal family.
    ///
    /// fcc: {111}<110> (12). bcc: {110}<111> (12), plus {112}<111> (12)
    /// and {123}<111> (24) at elevated temperature. The regime is ignored
    /// for fcc.
    pub fn generate(family: CrystalFamily, regime: TemperatureRegime) -> Result<Self> {
        let families: &[([i32; 3], [i32; 3])] = match (family, regime) {
            (CrystalFamily::Fcc, _) => &[([1, 1, 1], [1, 1, 0])],
            (CrystalFamily::Bcc, TemperatureRegime::Room) => &[([1, 1, 0], [1, 1, 1])],
            (CrystalFamily::Bcc, TemperatureRegime::Elevated) => &[
                ([1, 1, 0], [1, 1, 1]),
                ([1, 1, 2], [1, 1, 1]),
                ([1, 2, 3], [1, 1, 1]),
            ],
        };

        let mut systems = Vec::new();
        for &(plane_template, direction_template) in families {
            let directions = variants(direction_template);
            for plane in variants(plane_template) {
                for &direction in &directions {
                    if dot(plane, direction) != 0 {
                        continue;
                    }
                    // Templates may be scalar multiples of each other.
                    let candidate = SlipSystem::from_miller(plane, direction)?;
                    if !systems.iter().any(|s: &SlipSystem| s.is_equivalent(&candidate)) {
                        systems.push(candidate);
                    }
                }
            }
        }

        Ok(Self { name: format!("{family}-{regime}"), systems })
    }

    /// Parse string keys (e.g. `"bcc"`, `"elevated"`) and generate.
    pub fn from_keys(family: &str, regime: &str) -> Result<Self> {
        let family: CrystalFamily = family.parse()?;
        let regime: TemperatureRegime = regime.parse()?;
        Self::generate(family, regime)
    }

    /// Catalog from an explicit list of systems.
    pub fn custom(name: impl Into<String>, systems: Vec<SlipSystem>) -> Result<Self> {
        if systems.is_empty() {
            return Err(TaylorError::config("custom catalog needs at least one slip system"));
        }
        for (i, a) in systems.iter().enumerate() {
            if systems[..i].iter().any(|b| b.is_equivalent(a)) {
                return Err(TaylorError::config(format!("slip system {} duplicated", a.label())));
            }
        }
        Ok(Self { name: name.into(), systems })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn systems(&self) -> &[SlipSystem] {
        &self.systems
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlipSystem> + '_ {
        self.systems.iter()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

fn to_vector(v: [i32; 3]) -> Vector3<f64> {
    Vector3::new(v[0] as f64, v[1] as f64, v[2] as f64)
}

fn dot(a: [i32; 3], b: [i32; 3]) -> i32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Flip the sign so the first non-zero component is positive.
fn canonical(v: [i32; 3]) -> [i32; 3] {
    match v.iter().find(|&&c| c != 0) {
        Some(&c) if c < 0 => [-v[0], -v[1], -v[2]],
        _ => v,
    }
}

/// All distinct sign/permutation variants of a Miller-index template, one per ±pair.
fn variants(template: [i32; 3]) -> Vec<[i32; 3]> {
    const PERMUTATIONS: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    let mut out: Vec<[i32; 3]> = Vec::new();
    for p in PERMUTATIONS {
        for signs in 0..8u8 {
            let mut v = [0; 3];
            for k in 0..3 {
                let sign = if signs & (1 << k) != 0 { -1 } else { 1 };
                v[k] = sign * template[p[k]];
            }
            let v = canonical(v);
            if !out.contains(&v) {
                out.push(v);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_counts_match_family_multiplicity() {
        assert_eq!(variants([1, 1, 1]).len(), 4);
        assert_eq!(variants([1, 1, 0]).len(), 6);
        assert_eq!(variants([1, 1, 2]).len(), 12);
        assert_eq!(variants([1, 2, 3]).len(), 24);
    }

    #[test]
    fn canonical_makes_leading_component_positive() {
        assert_eq!(canonical([0, -1, 1]), [0, 1, -1]);
        assert_eq!(canonical([1, -1, 0]), [1, -1, 0]);
    }
}
