//! Unit conversion utilities
//!
//! Maps physical panel units (inches, millimeters) to and from the internal
//! compute space, a pixel grid at a reference resolution. The resolution is
//! always passed in by the caller; see [`crate::constants::DEFAULT_REFERENCE_DPI`]
//! for the usual value.
//!
//! Also handles fractional inch parsing for user-entered dimensions.

use crate::constants::MM_PER_INCH;
use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical unit of a panel or an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelUnits {
    /// Imperial inches
    Inches,
    /// Millimeters
    Mm,
}

impl Default for PanelUnits {
    fn default() -> Self {
        Self::Inches
    }
}

impl PanelUnits {
    /// Length of one unit in inches
    pub fn inches_per_unit(self) -> f64 {
        match self {
            Self::Inches => 1.0,
            Self::Mm => 1.0 / MM_PER_INCH,
        }
    }

    /// Suffix used on dimension annotations (`"` for inches, `mm` otherwise)
    pub fn dimension_suffix(self) -> &'static str {
        match self {
            Self::Inches => "\"",
            Self::Mm => "mm",
        }
    }

    /// Short label used in file names and reports
    pub fn label(self) -> &'static str {
        match self {
            Self::Inches => "inches",
            Self::Mm => "mm",
        }
    }
}

impl fmt::Display for PanelUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PanelUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inches" | "inch" | "in" | "\"" | "imperial" => Ok(Self::Inches),
            "mm" | "millimeters" | "millimetres" | "metric" => Ok(Self::Mm),
            _ => Err(format!("Unknown unit: {}", s)),
        }
    }
}

/// Convert a physical length into compute units (pixels at `reference_dpi`).
///
/// `inches * dpi`, or `mm / 25.4 * dpi`.
pub fn to_compute_units(value: f64, unit: PanelUnits, reference_dpi: f64) -> f64 {
    match unit {
        PanelUnits::Inches => value * reference_dpi,
        PanelUnits::Mm => value / MM_PER_INCH * reference_dpi,
    }
}

/// Exact inverse of [`to_compute_units`].
pub fn from_compute_units(value: f64, unit: PanelUnits, reference_dpi: f64) -> f64 {
    match unit {
        PanelUnits::Inches => value / reference_dpi,
        PanelUnits::Mm => value / reference_dpi * MM_PER_INCH,
    }
}

/// Convert a length between physical units
pub fn convert_length(value: f64, from: PanelUnits, to: PanelUnits) -> f64 {
    match (from, to) {
        (PanelUnits::Inches, PanelUnits::Mm) => value * MM_PER_INCH,
        (PanelUnits::Mm, PanelUnits::Inches) => value / MM_PER_INCH,
        _ => value,
    }
}

/// Format a length for annotations, e.g. `24.00"` or `609.60mm`
pub fn format_dimension(value: f64, unit: PanelUnits) -> String {
    format!("{:.2}{}", value, unit.dimension_suffix())
}

/// Parse a user-entered length in the given unit.
///
/// Inches accept mixed fractions such as `23 1/2` or `3/4`.
pub fn parse_length(input: &str, unit: PanelUnits) -> Result<f64, GenerationError> {
    let input = input.trim();
    let invalid = |reason: &str| GenerationError::InvalidLength {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if input.is_empty() {
        return Err(invalid("empty value"));
    }

    if unit == PanelUnits::Mm || !input.contains('/') {
        return input.parse::<f64>().map_err(|e| invalid(&e.to_string()));
    }

    let mut total = 0.0;
    let mut sign = 1.0;
    for (i, part) in input.split_whitespace().enumerate() {
        let part = if i == 0 {
            match part.strip_prefix('-') {
                Some(rest) => {
                    sign = -1.0;
                    rest
                }
                None => part,
            }
        } else {
            part
        };

        if part.contains('/') {
            let frac: Vec<&str> = part.split('/').collect();
            if frac.len() != 2 {
                return Err(invalid("invalid fraction format"));
            }
            let num = frac[0]
                .parse::<f64>()
                .map_err(|_| invalid("invalid numerator"))?;
            let den = frac[1]
                .parse::<f64>()
                .map_err(|_| invalid("invalid denominator"))?;
            if den == 0.0 {
                return Err(invalid("division by zero"));
            }
            total += num / den;
        } else {
            total += part
                .parse::<f64>()
                .map_err(|_| invalid("invalid number part"))?;
        }
    }

    Ok(sign * total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_inches_to_compute_units() {
        assert_eq!(to_compute_units(24.0, PanelUnits::Inches, 300.0), 7200.0);
        assert_eq!(from_compute_units(7200.0, PanelUnits::Inches, 300.0), 24.0);
    }

    #[test]
    fn test_mm_to_compute_units() {
        let px = to_compute_units(25.4, PanelUnits::Mm, 300.0);
        assert!((px - 300.0).abs() < 1e-9);
        let back = from_compute_units(px, PanelUnits::Mm, 300.0);
        assert!((back - 25.4).abs() < 1e-9);
    }

    #[test]
    fn test_convert_length() {
        assert_eq!(convert_length(1.0, PanelUnits::Inches, PanelUnits::Mm), 25.4);
        assert_eq!(convert_length(25.4, PanelUnits::Mm, PanelUnits::Inches), 1.0);
        assert_eq!(convert_length(3.0, PanelUnits::Mm, PanelUnits::Mm), 3.0);
    }

    #[test]
    fn test_units_serde_names() {
        assert_eq!(
            serde_json::to_string(&PanelUnits::Inches).unwrap(),
            "\"inches\""
        );
        let mm: PanelUnits = serde_json::from_str("\"mm\"").unwrap();
        assert_eq!(mm, PanelUnits::Mm);
    }

    #[test]
    fn test_units_from_str() {
        assert_eq!("in".parse::<PanelUnits>().unwrap(), PanelUnits::Inches);
        assert_eq!(" MM ".parse::<PanelUnits>().unwrap(), PanelUnits::Mm);
        assert!("furlong".parse::<PanelUnits>().is_err());
    }

    #[test]
    fn test_dimension_format() {
        assert_eq!(format_dimension(24.0, PanelUnits::Inches), "24.00\"");
        assert_eq!(format_dimension(609.6, PanelUnits::Mm), "609.60mm");
    }

    #[test]
    fn test_parse_fractional_inches() {
        assert_eq!(parse_length("23 1/2", PanelUnits::Inches).unwrap(), 23.5);
        assert_eq!(parse_length("3/4", PanelUnits::Inches).unwrap(), 0.75);
        assert_eq!(parse_length("-1 1/4", PanelUnits::Inches).unwrap(), -1.25);
        assert_eq!(parse_length(" 12.5 ", PanelUnits::Mm).unwrap(), 12.5);
    }

    #[test]
    fn test_parse_invalid_lengths() {
        assert!(parse_length("", PanelUnits::Inches).is_err());
        assert!(parse_length("abc", PanelUnits::Mm).is_err());
        assert!(parse_length("1/0", PanelUnits::Inches).is_err());
        assert!(parse_length("1/2/3", PanelUnits::Inches).is_err());
    }

    proptest! {
        #[test]
        fn prop_round_trip_inches(v in 1e-6f64..1e6, dpi in 1.0f64..2400.0) {
            let px = to_compute_units(v, PanelUnits::Inches, dpi);
            let back = from_compute_units(px, PanelUnits::Inches, dpi);
            prop_assert!(((back - v) / v).abs() < 1e-9);
        }

        #[test]
        fn prop_round_trip_mm(v in 1e-6f64..1e6, dpi in 1.0f64..2400.0) {
            let px = to_compute_units(v, PanelUnits::Mm, dpi);
            let back = from_compute_units(px, PanelUnits::Mm, dpi);
            prop_assert!(((back - v) / v).abs() < 1e-9);
        }
    }
}
