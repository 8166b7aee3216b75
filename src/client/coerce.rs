//! Lenient numeric fields.
//!
//! Some upstream APIs publish the same counter as `42` in one record and
//! `"42"` in the next. These helpers accept either form and resolve it to an
//! integer right at deserialization, so loosely typed values never leave the
//! provider that decoded them.

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;

/// A JSON value that should hold an integer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn into_i64(self) -> Result<i64, String> {
        match self {
            Self::Integer(n) => Ok(n),
            Self::Unsigned(n) => {
                i64::try_from(n).map_err(|_| format!("integer {n} is out of range"))
            }
            Self::Float(f) => float_to_i64(f),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid numeric string {s:?}: {e}")),
        }
    }

    fn into_u64(self) -> Result<u64, String> {
        match self {
            Self::Unsigned(n) => Ok(n),
            Self::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("invalid numeric string {s:?}: {e}")),
            other => {
                let n = other.into_i64()?;
                u64::try_from(n).map_err(|_| format!("expected a non-negative integer, got {n}"))
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn float_to_i64(f: f64) -> Result<i64, String> {
    // Upstream counters are sometimes floats like `1234.0`; the fraction is dropped.
    if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Ok(f.trunc() as i64)
    } else {
        Err(format!("number {f} is not a representable integer"))
    }
}

/// Deserialize a signed integer from a JSON number or numeric string
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Numeric::deserialize(deserializer)?
        .into_i64()
        .map_err(D::Error::custom)
}

/// Deserialize a non-negative integer from a JSON number or numeric string
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Numeric::deserialize(deserializer)?
        .into_u64()
        .map_err(D::Error::custom)
}
