//! Pair values.
//!
//! A pair's value is a string unless the scanner ran with type inference, in
//! which case bare `true`/`false` become [`Value::Bool`] and bare numerals
//! become [`Value::Number`]. Quoted tokens always stay strings.
//!
//! ## Coercion
//!
//! Independently of how a value was parsed, the typed accessors read it as a
//! boolean, float, integer or numeric vector:
//!
//! ```rust
//! use vdf_tree::Value;
//!
//! assert!(Value::from("on").as_bool());
//! assert!(!Value::from("off").as_bool());
//! assert_eq!(Value::from("1.5").as_float().unwrap(), 1.5);
//! assert_eq!(Value::from("1.5").as_int().unwrap(), 1);
//! assert_eq!(Value::from("[1 2 3]").as_vector().unwrap(), vec![1.0, 2.0, 3.0]);
//! ```

use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// The value of a [`Pair`](crate::Pair).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Number(Number),
    Bool(bool),
}

/// A numeric value produced by type inference.
///
/// Integers that fit in `i64` stay exact; everything else is a float.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::Number;
///
/// assert_eq!(Number::parse("42"), Some(Number::Integer(42)));
/// assert_eq!(Number::parse("-0.5"), Some(Number::Float(-0.5)));
/// assert_eq!(Number::parse("1e3"), Some(Number::Float(1000.0)));
/// assert_eq!(Number::parse("inf"), None);
/// assert_eq!(Number::parse("12px"), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Parses a decimal numeral: optional sign, digits with an optional
    /// fraction, optional exponent. Words such as `inf` or `NaN` are rejected,
    /// as are numerals that overflow `f64`, so `1e400` stays a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Number> {
        if !is_numeral(s) {
            return None;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Some(Number::Integer(i));
        }
        let f = s.parse::<f64>().ok()?;
        f.is_finite().then_some(Number::Float(f))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Converts to `i64`, truncating floats toward zero.
    ///
    /// Returns `None` for non-finite floats and floats outside the `i64` range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(f) => {
                let t = f.trunc();
                if t.is_finite() && t >= i64::MIN as f64 && t <= i64::MAX as f64 {
                    Some(t as i64)
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

// Finite floats always print with a fraction or exponent so they re-parse as
// floats. Non-finite ones print as `NaN`, `inf` and `-inf` and read back as
// strings.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(fl) => write!(f, "{:?}", fl),
        }
    }
}

fn is_numeral(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }

    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == b.len()
}

impl Value {
    /// Applies type inference to a bare token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vdf_tree::{Number, Value};
    ///
    /// assert_eq!(Value::infer("true"), Value::Bool(true));
    /// assert_eq!(Value::infer("123"), Value::Number(Number::Integer(123)));
    /// assert_eq!(Value::infer("TRUE"), Value::String("TRUE".to_string()));
    /// ```
    #[must_use]
    pub fn infer(token: &str) -> Value {
        match token {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => match Number::parse(token) {
                Some(n) => Value::Number(n),
                None => Value::String(token.to_string()),
            },
        }
    }

    /// Returns `true` if `s` would not stay a string under type inference.
    #[must_use]
    pub fn looks_typed(s: &str) -> bool {
        s == "true" || s == "false" || is_numeral(s)
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Returns the string content, or `None` for typed values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Reads the value as a flag.
    ///
    /// Only empty strings, `"off"`, `"false"` and `"0"` are false; numbers
    /// are false when zero.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64() != 0.0,
            Value::String(s) => !matches!(s.as_str(), "" | "off" | "false" | "0"),
        }
    }

    /// Reads the value as a float.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for booleans and strings that are not numbers.
    pub fn as_float(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(n.as_f64()),
            Value::String(s) => parse_float(s).ok_or_else(|| Error::type_mismatch("float", s)),
            Value::Bool(b) => Err(Error::type_mismatch("float", &b.to_string())),
        }
    }

    /// Reads the value as an integer; fractional values are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] for booleans, non-numeric strings and
    /// values outside the `i64` range.
    pub fn as_int(&self) -> Result<i64> {
        let found = || Error::type_mismatch("integer", &self.to_string());
        match self {
            Value::Number(n) => n.as_i64().ok_or_else(found),
            Value::String(s) => {
                let s = s.trim();
                if let Ok(i) = s.parse::<i64>() {
                    return Ok(i);
                }
                parse_float(s)
                    .and_then(|f| Number::Float(f).as_i64())
                    .ok_or_else(found)
            }
            Value::Bool(_) => Err(found()),
        }
    }

    /// Reads a `[x y z ...]` vector.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the brackets are missing or any
    /// element is not a number.
    pub fn as_vector(&self) -> Result<Vec<f64>> {
        self.as_vector_with("[", "]")
    }

    /// Reads a vector wrapped in custom delimiters. Empty delimiters accept
    /// bare space-separated numbers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vdf_tree::Value;
    ///
    /// let v = Value::from("{1.0 0.5 0.25}");
    /// assert_eq!(v.as_vector_with("{", "}").unwrap(), vec![1.0, 0.5, 0.25]);
    /// assert!(v.as_vector().is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the delimiters are missing or any
    /// element is not a number.
    pub fn as_vector_with(&self, open: &str, close: &str) -> Result<Vec<f64>> {
        let text = self.to_string();
        let mismatch = || Error::type_mismatch("vector", &text);

        let inner = text
            .trim()
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
            .ok_or_else(mismatch)?;

        inner
            .split_whitespace()
            .map(|part| parse_float(part).ok_or_else(mismatch))
            .collect()
    }
}

fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    if !is_numeral(s) {
        return None;
    }
    s.parse::<f64>().ok()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::String(String::new())
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Value::Number(Number::Float(f)) => serializer.serialize_f64(*f),
            Value::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(Number::Integer(i64::from(value)))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(Number::Integer(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(Number::Integer(i64::from(value)))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(Number::Float(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numerals() {
        for (text, expected) in [
            ("0", true),
            ("-12", true),
            ("+7", true),
            ("1.234", true),
            (".5", true),
            ("5.", true),
            ("6.02e23", true),
            ("1E-3", true),
            ("", false),
            ("-", false),
            (".", false),
            ("1e", false),
            ("1.2.3", false),
            ("0x10", false),
            ("inf", false),
            ("NaN", false),
            ("12 ", false),
        ] {
            assert_eq!(is_numeral(text), expected, "numeral check for {:?}", text);
        }
    }

    #[test]
    fn test_number_parse_overflow_falls_back_to_float() {
        assert_eq!(
            Number::parse("99999999999999999999"),
            Some(Number::Float(1e20))
        );
    }

    #[test]
    fn test_float_display_reparses_as_float() {
        for f in [2.0, 0.1, -3.5, 1e20, 1e-7] {
            let text = Number::Float(f).to_string();
            assert_eq!(Number::parse(&text), Some(Number::Float(f)), "{}", text);
        }
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(Number::parse("1e400"), None);
        assert_eq!(Number::parse("-1e400"), None);
        assert_eq!(Value::infer("1e400"), Value::from("1e400"));

        assert_eq!(Number::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Number::Float(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value::infer("inf"), Value::from("inf"));
    }

    #[test]
    fn test_infer() {
        assert_eq!(Value::infer("false"), Value::Bool(false));
        assert_eq!(Value::infer("-4"), Value::Number(Number::Integer(-4)));
        assert_eq!(Value::infer("0.25"), Value::Number(Number::Float(0.25)));
        assert_eq!(Value::infer("on"), Value::from("on"));
    }

    #[test]
    fn test_bool_truth_table() {
        for (text, expected) in [
            ("true", true),
            ("on", true),
            ("1", true),
            ("yes", true),
            ("false", false),
            ("off", false),
            ("0", false),
            ("", false),
        ] {
            assert_eq!(Value::from(text).as_bool(), expected, "as_bool({:?})", text);
        }
        assert!(!Value::from(0).as_bool());
        assert!(Value::from(2.5).as_bool());
        assert!(!Value::Bool(false).as_bool());
    }

    #[test]
    fn test_float_and_int() {
        assert_eq!(Value::from("1.234").as_float().unwrap(), 1.234);
        assert_eq!(Value::from("1.234").as_int().unwrap(), 1);
        assert_eq!(Value::from("-7").as_int().unwrap(), -7);
        assert_eq!(Value::from(3).as_float().unwrap(), 3.0);
        assert_eq!(Value::from(-2.9).as_int().unwrap(), -2);

        assert!(matches!(
            Value::from("nada").as_float(),
            Err(Error::TypeMismatch {
                expected: "float",
                ..
            })
        ));
        assert!(Value::from("nada").as_int().is_err());
        assert!(Value::Bool(true).as_float().is_err());
        assert_eq!(Value::from("nada").as_float().unwrap_or(8.0), 8.0);
        assert_eq!(Value::from("nada").as_int().unwrap_or(8), 8);
    }

    #[test]
    fn test_vectors() {
        assert_eq!(
            Value::from("[1.0 0.5 0.25]").as_vector().unwrap(),
            vec![1.0, 0.5, 0.25]
        );
        assert_eq!(
            Value::from("1.0 0.5 0.25").as_vector_with("", "").unwrap(),
            vec![1.0, 0.5, 0.25]
        );
        assert_eq!(Value::from("[ 1  2 ]").as_vector().unwrap(), vec![1.0, 2.0]);
        assert!(Value::from("nada").as_vector().is_err());
        assert!(Value::from("[1 two 3]").as_vector().is_err());
        assert!(Value::from("[1 2 3").as_vector().is_err());
        assert_eq!(
            Value::from("nada")
                .as_vector()
                .unwrap_or_else(|_| vec![1.0, 2.0]),
            vec![1.0, 2.0]
        );
    }
}
