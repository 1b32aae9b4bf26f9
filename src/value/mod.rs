//! Field values and numeric classification.

use std::fmt;

use serde::{Serialize, Serializer};

/// Largest magnitude below which every integer is exactly representable.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A classified field value.
///
/// # Example
///
/// ```
/// use csvrows::Value;
///
/// assert_eq!(Value::classify("42".to_string(), true), Value::Number(42.0));
/// assert_eq!(Value::classify("042".to_string(), true), Value::from("042"));
/// assert_eq!(Value::classify("42".to_string(), false), Value::from("42"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A field matching the numeric grammar.
    Number(f64),
    /// Any other field, verbatim.
    String(String),
}

impl Value {
    /// Classifies a raw field.
    ///
    /// With `classify_numbers` set, a field that matches [`is_numeric`] becomes
    /// a [`Value::Number`]; everything else is kept as a string untouched.
    /// Digit runs too long for an `f64` overflow to infinity and stay strings.
    pub fn classify(field: String, classify_numbers: bool) -> Self {
        if classify_numbers && is_numeric(&field) {
            match field.parse::<f64>() {
                Ok(n) if n.is_finite() => return Value::Number(n),
                _ => {}
            }
        }
        Value::String(field)
    }

    /// Returns the number, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::String(_) => None,
        }
    }

    /// Returns the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Number(_) => None,
            Value::String(s) => Some(s),
        }
    }

    /// Returns `true` for [`Value::Number`].
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Integral values print as `1`, not `1.0`
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Returns `true` if `s` matches `-?(0|[1-9][0-9]*)(\.[0-9]+)?`.
///
/// No whitespace, exponent, `+` sign, thousands separator, leading zero,
/// bare `.5` or trailing `5.` is accepted.
///
/// # Example
///
/// ```
/// use csvrows::is_numeric;
///
/// assert!(is_numeric("0"));
/// assert!(is_numeric("-0.5"));
/// assert!(!is_numeric("0123"));
/// assert!(!is_numeric("1e3"));
/// ```
pub fn is_numeric(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if bytes.first() == Some(&b'-') {
        i += 1;
    }

    // Integer part
    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            i += 1;
            while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return false,
    }

    // Fraction
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let digits_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == digits_start {
            return false;
        }
    }

    i == bytes.len()
}
