use std::fmt;

use ggufmeta_reader::GgufValue;
use serde::{Deserialize, Serialize};

/// A numeric metadata field in whatever representation the file used.
///
/// Integers keep all 64 bits; `f32` values are widened to `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl Number {
    /// Convert any numeric [`GgufValue`]; `None` for bools, strings, arrays.
    pub fn from_value(value: &GgufValue) -> Option<Self> {
        match *value {
            GgufValue::F32(v) => Some(Self::Float(v.into())),
            GgufValue::F64(v) => Some(Self::Float(v)),
            _ => match value.as_u64() {
                Some(v) => Some(Self::Unsigned(v)),
                None => value.as_i64().map(Self::Signed),
            },
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        match self {
            Self::Unsigned(v) => Some(v),
            Self::Signed(v) => u64::try_from(v).ok(),
            Self::Float(_) => None,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            Self::Unsigned(v) => i64::try_from(v).ok(),
            Self::Signed(v) => Some(v),
            Self::Float(_) => None,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Unsigned(v) => v as f64,
            Self::Signed(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    pub fn is_nan(self) -> bool {
        matches!(self, Self::Float(v) if v.is_nan())
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Signed(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        Self::Unsigned(v)
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Self::Signed(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_normalize_to_unsigned_when_non_negative() {
        assert_eq!(Number::from_value(&GgufValue::I32(32)), Some(Number::Unsigned(32)));
        assert_eq!(Number::from_value(&GgufValue::I8(-3)), Some(Number::Signed(-3)));
        assert_eq!(Number::from_value(&GgufValue::U64(u64::MAX)), Some(Number::Unsigned(u64::MAX)));
    }

    #[test]
    fn floats_widen() {
        let n = Number::from_value(&GgufValue::F32(1e-6)).unwrap();
        assert_eq!(n, Number::Float(f64::from(1e-6f32)));
        assert_eq!(n.as_u64(), None);
    }

    #[test]
    fn non_numeric_values_are_none() {
        assert_eq!(Number::from_value(&GgufValue::Bool(true)), None);
        assert_eq!(Number::from_value(&GgufValue::String("1".into())), None);
    }

    #[test]
    fn json_round_trip_keeps_variant() {
        for n in [Number::Unsigned(u64::MAX), Number::Signed(-7), Number::Float(0.25)] {
            let json = serde_json::to_value(n).unwrap();
            assert_eq!(serde_json::from_value::<Number>(json).unwrap(), n);
        }
    }

    #[test]
    fn only_nan_is_nan() {
        assert!(!Number::Float(f64::INFINITY).is_nan());
        assert!(!Number::Unsigned(0).is_nan());
        assert!(Number::Float(f64::NAN).is_nan());
    }
}
