use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A flat field map as the document store holds it.
///
/// This is also the payload shape hook callbacks see, before normalization.
pub type Document = BTreeMap<String, FieldValue>;

/// A single stored cell.
///
/// Stores that only keep strings (Redis hashes) hand back `Text`; the
/// normalizer turns known integer fields back into `Int`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// Lenient integer reading used for stored counters and timestamps.
    ///
    /// Text is read like a base-10 `parseInt`: leading whitespace and an
    /// optional sign, then digits up to the first non-digit. Values with no
    /// leading digits read as 0. Booleans read as 0/1.
    pub fn to_int_lenient(&self) -> i64 {
        match self {
            FieldValue::Int(n) => *n,
            FieldValue::Bool(b) => i64::from(*b),
            FieldValue::Text(s) => parse_int_prefix(s).unwrap_or(0),
        }
    }
}

fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        let d = i64::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(d);
    }
    Some(if negative { -value } else { value })
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(i64::from(n))
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Int(i64::from(n))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}
