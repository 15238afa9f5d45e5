use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::Type;
use thiserror::Error;

/// Number of stored units in one loyalty point.
const UNITS_PER_POINT: i64 = 100;

//--------------------------------------       Points        ---------------------------------------------------------
/// A loyalty points amount, held as a fixed-point number of hundredths of a point.
///
/// The accrual service and the user API speak in decimal numbers (`500`, `729.98`). Internally the value is an
/// integer so that sums over many orders never drift. On the wire it (de)serializes as a JSON number.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[sqlx(transparent)]
pub struct Points(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as loyalty points: {0}")]
pub struct PointsConversionError(String);

impl Points {
    /// Creates an amount from a raw count of hundredths of a point.
    pub fn from_hundredths(value: i64) -> Self {
        Self(value)
    }

    pub fn from_points(points: i64) -> Self {
        Self(points * UNITS_PER_POINT)
    }

    /// The raw number of hundredths of a point.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts a decimal amount, rounding to the nearest hundredth.
    pub fn try_from_f64(value: f64) -> Result<Self, PointsConversionError> {
        let scaled = (value * UNITS_PER_POINT as f64).round();
        if !scaled.is_finite() || scaled > i64::MAX as f64 || scaled < i64::MIN as f64 {
            return Err(PointsConversionError(format!("{value} is out of range")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(scaled as i64))
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / UNITS_PER_POINT as f64
    }
}

impl Display for Points {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = UNITS_PER_POINT.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / units, abs % units)
    }
}

impl FromStr for Points {
    type Err = PointsConversionError;

    /// Parses a decimal string with at most two fractional digits, e.g. `"500"`, `"729.98"` or `"-0.5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PointsConversionError(format!("'{s}' is not a valid points amount"));
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || frac.len() > 2 || !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole = whole.parse::<i64>().map_err(|_| invalid())?;
        let frac = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac.parse::<i64>().map_err(|_| invalid())?,
        };
        let value = whole.checked_mul(UNITS_PER_POINT).and_then(|w| w.checked_add(frac)).ok_or_else(invalid)?;
        Ok(Self(if negative { -value } else { value }))
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::try_from_f64(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Points::from_points(500).to_string(), "500.00");
        assert_eq!(Points::from_hundredths(72_998).to_string(), "729.98");
        assert_eq!(Points::from_hundredths(-5).to_string(), "-0.05");
        assert_eq!(Points::default().to_string(), "0.00");
    }

    #[test]
    fn parse_decimal_strings() {
        assert_eq!("500".parse::<Points>().unwrap(), Points::from_points(500));
        assert_eq!("729.98".parse::<Points>().unwrap(), Points::from_hundredths(72_998));
        assert_eq!("0.5".parse::<Points>().unwrap(), Points::from_hundredths(50));
        assert_eq!("-1.25".parse::<Points>().unwrap(), Points::from_hundredths(-125));
        assert!("1.234".parse::<Points>().is_err());
        assert!("abc".parse::<Points>().is_err());
        assert!(".5".parse::<Points>().is_err());
        assert!("".parse::<Points>().is_err());
    }

    #[test]
    fn json_numbers() {
        let p: Points = serde_json::from_str("729.98").unwrap();
        assert_eq!(p, Points::from_hundredths(72_998));
        let p: Points = serde_json::from_str("500").unwrap();
        assert_eq!(p, Points::from_points(500));
        assert_eq!(serde_json::to_string(&Points::from_points(500)).unwrap(), "500.0");
        assert!(serde_json::from_str::<Points>("\"500\"").is_err());
    }

    #[test]
    fn out_of_range_floats_are_rejected() {
        assert!(Points::try_from_f64(f64::NAN).is_err());
        assert!(Points::try_from_f64(f64::INFINITY).is_err());
        assert!(Points::try_from_f64(1e30).is_err());
    }
}
