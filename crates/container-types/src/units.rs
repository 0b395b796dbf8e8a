use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// Base selection tolerance in working units at scale 1.0.
pub const BASE_EPSILON: f64 = 1e-5;

/// Accepted `scale` values, millimetres to kernel units.
pub const SCALE_RANGE: (f64, f64) = (1e-6, 1e6);

/// Accepted `base_epsilon` values, in millimetres.
pub const BASE_EPSILON_RANGE: (f64, f64) = (1e-12, 0.1);

/// Working unit scale and the comparison tolerance derived from it.
///
/// Parameters are given in millimetres. `scale` converts them to kernel
/// units (1.0 = millimetres, 0.1 = centimetres). All float comparisons in
/// geometric selection use `epsilon()`; nothing else carries its own literal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitScale {
    pub scale: f64,
    pub base_epsilon: f64,
}

impl UnitScale {
    pub const MILLIMETRES: Self = Self {
        scale: 1.0,
        base_epsilon: BASE_EPSILON,
    };

    pub const CENTIMETRES: Self = Self {
        scale: 0.1,
        base_epsilon: BASE_EPSILON,
    };

    /// Convert a length in millimetres to kernel units.
    pub fn mm(&self, value: f64) -> f64 {
        value * self.scale
    }

    /// Absolute comparison tolerance, `base_epsilon × scale`.
    pub fn epsilon(&self) -> f64 {
        self.base_epsilon * self.scale
    }

    /// Reject factors outside [`SCALE_RANGE`] and [`BASE_EPSILON_RANGE`].
    pub fn validate(&self) -> Result<(), GeometryError> {
        let checks = [
            ("scale", self.scale, SCALE_RANGE),
            ("base_epsilon", self.base_epsilon, BASE_EPSILON_RANGE),
        ];
        for (name, value, (lo, hi)) in checks {
            if !(lo..=hi).contains(&value) {
                return Err(GeometryError::invalid(
                    name,
                    format!("{value} must lie within [{lo:e}, {hi:e}]"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::MILLIMETRES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_scales_with_units() {
        assert!((UnitScale::MILLIMETRES.epsilon() - 1e-5).abs() < 1e-18);
        assert!((UnitScale::CENTIMETRES.epsilon() - 1e-6).abs() < 1e-18);
    }

    #[test]
    fn test_presets_validate() {
        assert!(UnitScale::MILLIMETRES.validate().is_ok());
        assert!(UnitScale::CENTIMETRES.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_factors_rejected() {
        let bad = [
            (-1.0, BASE_EPSILON, "scale"),
            (0.0, BASE_EPSILON, "scale"),
            (f64::NAN, BASE_EPSILON, "scale"),
            (f64::INFINITY, BASE_EPSILON, "scale"),
            (1.0, 0.0, "base_epsilon"),
            (1.0, -1e-5, "base_epsilon"),
            (1e300, BASE_EPSILON, "scale"),
            (1.0, 1.0, "base_epsilon"),
        ];
        for (scale, base_epsilon, field) in bad {
            let err = UnitScale { scale, base_epsilon }.validate().unwrap_err();
            assert!(
                matches!(&err, GeometryError::InvalidParameter { name, .. } if name == field),
                "{scale}/{base_epsilon}: {err}"
            );
        }
    }


    #[test]
    fn test_mm_conversion() {
        assert!((UnitScale::CENTIMETRES.mm(42.0) - 4.2).abs() < 1e-12);
    }
}
