//! Scalar stringification.
//!
//! Index leaves are keyed by the textual form of a scalar, so the
//! rendering below is part of the query contract: a filter value matches
//! only if it equals this text exactly.
//!
//! - Booleans render as `True` / `False`
//! - Integers render in plain decimal
//! - Floats render as the shortest decimal that round-trips, at single
//!   precision when the value is exactly representable there. Decimal
//!   exponents of 15 and above, or below -5, switch to `1.5E+21` /
//!   `1E-07` form. Non-finite values are `NaN`, `Infinity`, `-Infinity`
//! - Text passes through unchanged
//! - Bytes render as lowercase hex
//! - Null, arrays and maps have no scalar form

use crate::value::Value;
use std::fmt::{self, Write};

/// Exponents in `[MIN_PLAIN_EXPONENT, MAX_PLAIN_EXPONENT)` render without one.
const MIN_PLAIN_EXPONENT: i32 = -5;
const MAX_PLAIN_EXPONENT: i32 = 15;

/// Render a scalar value as its index text.
///
/// Returns `None` for values that do not produce an index entry.
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(render_bool(*b).to_string()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(f) => Some(render_float(*f)),
        Value::Text(s) => Some(s.clone()),
        Value::Bytes(b) => Some(render_hex(b)),
        Value::Null | Value::Array(_) | Value::Map(_) => None,
    }
}

/// Boolean text, invariant casing.
pub fn render_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// Float text, independent of locale.
///
/// The document model widens every float to `f64`, so a value that fits
/// `f32` exactly is rendered with `f32` digits: an `f32` field holding
/// `0.1` indexes as `0.1`, not `0.10000000149011612`.
pub fn render_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if f == 0.0 {
        // -0.0 and 0.0 index together
        "0".to_string()
    } else {
        let narrow = f as f32;
        if f64::from(narrow) == f {
            render_finite(narrow)
        } else {
            render_finite(f)
        }
    }
}

fn render_finite<F: fmt::Display + fmt::LowerExp>(f: F) -> String {
    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    if (MIN_PLAIN_EXPONENT..MAX_PLAIN_EXPONENT).contains(&exponent) {
        f.to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs())
    }
}

fn render_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_use_invariant_casing() {
        assert_eq!(render_scalar(&Value::Bool(true)).as_deref(), Some("True"));
        assert_eq!(render_scalar(&Value::Bool(false)).as_deref(), Some("False"));
    }

    #[test]
    fn integers_render_decimal() {
        assert_eq!(render_scalar(&Value::Integer(42)).as_deref(), Some("42"));
        assert_eq!(render_scalar(&Value::Integer(-7)).as_deref(), Some("-7"));
        assert_eq!(
            render_scalar(&Value::Integer(i64::MIN)).as_deref(),
            Some("-9223372036854775808")
        );
    }

    #[test]
    fn floats_render_shortest_form() {
        assert_eq!(render_float(1.5), "1.5");
        assert_eq!(render_float(42.0), "42");
        assert_eq!(render_float(-0.0), "0");
        assert_eq!(render_float(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn single_precision_values_use_single_precision_digits() {
        assert_eq!(render_float(f64::from(0.1f32)), "0.1");
        assert_eq!(render_float(f64::from(1.1f32)), "1.1");
        assert_eq!(render_float(f64::from(-2.5e-3f32)), "-0.0025");
        // not exact in f32, keeps double digits
        assert_eq!(render_float(0.1), "0.1");
        assert_eq!(render_float(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn exponent_form_outside_plain_range() {
        assert_eq!(render_float(1e21), "1E+21");
        assert_eq!(render_float(1e15), "1E+15");
        assert_eq!(render_float(-1.2345678901234568e20), "-1.2345678901234568E+20");
        assert_eq!(render_float(1e300), "1E+300");
        assert_eq!(render_float(1e-5), "1E-05");
        assert_eq!(render_float(1.5e-7), "1.5E-07");
    }

    #[test]
    fn plain_form_inside_range() {
        assert_eq!(render_float(123456789012345.0), "123456789012345");
        assert_eq!(render_float(1e10), "10000000000");
        assert_eq!(render_float(0.0001), "0.0001");
        assert_eq!(render_float(0.000123), "0.000123");
    }

    #[test]
    fn non_finite_floats() {
        assert_eq!(render_float(f64::NAN), "NaN");
        assert_eq!(render_float(f64::INFINITY), "Infinity");
        assert_eq!(render_float(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn text_passes_through() {
        let text = "Grüße, 世界 ".to_string();
        assert_eq!(render_scalar(&Value::Text(text.clone())), Some(text));
    }

    #[test]
    fn bytes_render_hex() {
        assert_eq!(
            render_scalar(&Value::Bytes(vec![0x00, 0xab, 0x10])).as_deref(),
            Some("00ab10")
        );
    }

    #[test]
    fn containers_and_null_have_no_scalar_form() {
        assert_eq!(render_scalar(&Value::Null), None);
        assert_eq!(render_scalar(&Value::Array(vec![Value::Integer(1)])), None);
        assert_eq!(render_scalar(&Value::map([("a", 1i64)])), None);
    }
}
