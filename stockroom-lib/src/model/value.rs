//! Value enum for dynamic cell values

use std::cmp::Ordering;
use std::fmt;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Group key used for cells with no value.
pub const MISSING_GROUP_KEY: &str = "\u{2014}";

/// A dynamic value that a table cell can hold.
///
/// Filtering, grouping and CSV export all operate on the string coercion
/// of a value (its [`Display`](fmt::Display) output), so `Int(0)` and
/// `String("0")` are indistinguishable to them. Sorting uses
/// [`Value::compare`], which does look at the variant.
///
/// # Example
///
/// ```
/// use stockroom_lib::model::Value;
///
/// let name = Value::from("Widget");
/// let count = Value::from(12i64);
/// let active = Value::from(true);
///
/// assert_eq!(count.to_string(), "12");
/// assert_eq!(active.to_string(), "true");
/// assert_eq!(Value::Null.to_string(), "");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// Arbitrary precision decimal (prices).
    Decimal(Decimal),
    /// String value.
    String(String),
    /// Date and time.
    DateTime(DateTime<Utc>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Key this value groups under.
    ///
    /// Null collapses into a single em-dash bucket; everything else groups
    /// by its string coercion.
    pub fn group_key(&self) -> String {
        match self {
            Value::Null => MISSING_GROUP_KEY.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether the global search looks at this value. Only text, numbers
    /// and date-times are searched; flags and empty cells are not.
    pub fn is_searchable(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(_))
    }

    /// Case-insensitive substring test against an already lowercased needle.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        if self.is_null() {
            return needle.is_empty();
        }
        self.to_string().to_lowercase().contains(needle)
    }

    /// Compares two values for ascending sort order.
    ///
    /// Numbers compare numerically across the numeric variants, strings
    /// case-insensitively in natural order (digit runs by numeric value, so
    /// `BIN-2` sorts before `BIN-10`; ties broken by exact comparison), booleans
    /// `false < true`, date-times chronologically. Null sorts after every
    /// non-null value. Values of unrelated variants compare by variant rank.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => {
                let (la, lb) = (a.to_lowercase(), b.to_lowercase());
                natural_cmp(&la, &lb)
                    .then_with(|| la.cmp(&lb))
                    .then_with(|| a.cmp(b))
            }
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Decimal(v) => v.to_f64(),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) | Value::Float(_) | Value::Decimal(_) => 1,
            Value::DateTime(_) => 2,
            Value::String(_) => 3,
            Value::Null => 4,
        }
    }
}

/// Compares strings chunk by chunk, where a chunk is a run of digits or a
/// run of anything else. Two digit runs compare by numeric value; any other
/// pair compares as text.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks(a);
    let mut right = Chunks(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (is_digits(x), is_digits(y)) {
                    (true, true) => digits_cmp(x, y),
                    _ => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

fn is_digits(chunk: &str) -> bool {
    chunk.starts_with(|c: char| c.is_ascii_digit())
}

/// Numeric comparison of two digit runs of any length.
fn digits_cmp(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Splits a string into alternating digit and non-digit runs.
struct Chunks<'a>(&'a str);

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.0.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .0
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.0.len());
        let (chunk, rest) = self.0.split_at(end);
        self.0 = rest;
        Some(chunk)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::DateTime(v) => f.write_str(&v.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_coercion() {
        assert_eq!(Value::Int(0).to_string(), "0");
        assert_eq!(Value::from("0").to_string(), "0");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Float(4.5).to_string(), "4.5");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_group_key() {
        assert_eq!(Value::Null.group_key(), "\u{2014}");
        assert_eq!(Value::Int(0).group_key(), Value::from("0").group_key());
    }

    #[test]
    fn test_contains_lowercase() {
        assert!(Value::from("Widget").contains_lowercase("widg"));
        assert!(!Value::from("Gadget").contains_lowercase("widg"));
        assert!(Value::Int(1001).contains_lowercase("100"));
        assert!(!Value::Null.contains_lowercase("a"));
    }

    #[test]
    fn test_compare_numbers_across_variants() {
        assert_eq!(Value::Int(2).compare(&Value::Float(1.5)), Ordering::Greater);
        assert_eq!(
            Value::Decimal(Decimal::new(1999, 2)).compare(&Value::Int(20)),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_strings_case_insensitive() {
        assert_eq!(
            Value::from("apple").compare(&Value::from("Banana")),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_strings_natural_order() {
        let mut codes: Vec<Value> = ["BIN-10", "bin-2", "BIN-1", "BIN-02b", "BIN"]
            .into_iter()
            .map(Value::from)
            .collect();
        codes.sort_by(|a, b| a.compare(b));
        let sorted: Vec<String> = codes.iter().map(|v| v.to_string()).collect();
        assert_eq!(sorted, vec!["BIN", "BIN-1", "bin-2", "BIN-02b", "BIN-10"]);

        assert_eq!(
            Value::from("Part 2").compare(&Value::from("Part 10")),
            Ordering::Less
        );
        assert_eq!(
            Value::from("Lot 007").compare(&Value::from("lot 7")),
            Ordering::Less
        );
    }

    #[test]
    fn test_searchable_kinds() {
        assert!(Value::from("x").is_searchable());
        assert!(Value::Int(1).is_searchable());
        assert!(!Value::Bool(true).is_searchable());
        assert!(!Value::Null.is_searchable());
    }

    #[test]
    fn test_null_sorts_last() {
        assert_eq!(Value::Null.compare(&Value::Int(1)), Ordering::Greater);
        assert_eq!(Value::from("z").compare(&Value::Null), Ordering::Less);
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
