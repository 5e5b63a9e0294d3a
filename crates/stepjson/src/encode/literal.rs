//! Scalar JSON literal encoding: null, booleans, numbers and escaped strings.

use core::fmt::Write as _;

use thiserror::Error;

use crate::number::write_finite_f64;
use crate::value::{Number, Value};

#[derive(Debug, Error)]
pub(crate) enum LiteralError {
    #[error("Type is not supported")]
    UnsupportedType,
    #[error("Inf and NaN cannot be JSON encoded")]
    NonFiniteNumber,
}

/// Append the JSON literal for a scalar value.
///
/// Compound values never reach this point during encoding; receiving one, or
/// an `Unsupported` leaf, is reported as `UnsupportedType`.
pub(crate) fn write_scalar(out: &mut String, value: &Value) -> Result<(), LiteralError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(number) => write_number(out, number)?,
        Value::String(s) => write_string(out, s),
        _ => return Err(LiteralError::UnsupportedType),
    }
    Ok(())
}

pub(crate) fn write_number(out: &mut String, number: &Number) -> Result<(), LiteralError> {
    match number {
        Number::I64(i) => {
            let _ = write!(out, "{}", i);
        }
        Number::U64(u) => {
            let _ = write!(out, "{}", u);
        }
        Number::F64(f) if f.is_finite() => write_finite_f64(out, *f),
        Number::F64(_) => return Err(LiteralError::NonFiniteNumber),
    }
    Ok(())
}

/// Append a quoted, escaped JSON string literal.
///
/// Control characters are escaped with short forms where the grammar defines
/// them and `\u00xx` otherwise. Non-ASCII text is passed through as UTF-8.
pub(crate) fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
