//! Type resolution and value casting.
//!
//! [`resolve_type`] is the single entry point from a native type name (as
//! declared in DDL or reported by the driver) to a [`ColumnType`]. Values
//! written to a column go through [`ColumnType::cast_value`], which enforces
//! integer bounds and renders exact numerics at the column's scale.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use oxide_adapter_core::SqlValue;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{trace, warn};

use crate::error::{AdapterError, Result};
use crate::types::{ColumnType, NativeType};

/// Largest precision of `decimal` / `numeric`.
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// Largest precision of `float(n)`.
pub const MAX_FLOAT_PRECISION: u8 = 53;

/// Format timestamps are bound and read with.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Format times of day are bound and read with.
pub const TIME_FORMAT: &str = "%H:%M:%S%.f";

fn sql_type_regex() -> &'static Regex {
    static SQL_TYPE_REGEX: OnceLock<Regex> = OnceLock::new();
    SQL_TYPE_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^\s*([a-z]+(?:\s+[a-z]+)*)\s*(?:\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\))?\s*$")
            .expect("valid sql type regex")
    })
}

fn parse_type_arg(native_name: &str, arg: Option<regex::Match<'_>>) -> Result<Option<u8>> {
    arg.map(|m| {
        m.as_str().parse::<u8>().map_err(|_| AdapterError::InvalidValue {
            target: native_name.to_string(),
            message: format!("type argument {} is too large", m.as_str()),
        })
    })
    .transpose()
}

/// Resolves a native type name to a column type.
///
/// `native_name` is matched case-insensitively and may be either a bare name
/// (`numeric`) or a full type text (`numeric(10,4)`). Explicit `precision`
/// and `scale` take priority over parenthesized arguments, which take
/// priority over the type's defaults. `money` and `smallmoney` always
/// resolve to their fixed formats.
///
/// # Errors
///
/// Returns [`AdapterError::UnrecognizedType`] for names outside the numeric
/// registry, and [`AdapterError::InvalidValue`] for precision or scale the
/// engine does not accept.
pub fn resolve_type(native_name: &str, precision: Option<u8>, scale: Option<u8>) -> Result<ColumnType> {
    let captures = sql_type_regex()
        .captures(native_name)
        .ok_or_else(|| AdapterError::UnrecognizedType(native_name.trim().to_string()))?;

    let name = captures
        .get(1)
        .map(|m| {
            m.as_str()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .to_ascii_lowercase()
        })
        .unwrap_or_default();

    let native = NativeType::from_name(&name)
        .ok_or_else(|| AdapterError::UnrecognizedType(native_name.trim().to_string()))?;

    let precision = match precision {
        Some(p) => Some(p),
        None => parse_type_arg(native_name, captures.get(2))?,
    };
    let scale = match scale {
        Some(s) => Some(s),
        None => parse_type_arg(native_name, captures.get(3))?,
    };

    let resolved = ColumnType::new(native, precision, scale);
    validate(&resolved)?;
    trace!(native_name, sql_type = %resolved.sql_type(), "Resolved column type");
    Ok(resolved)
}

fn validate(column_type: &ColumnType) -> Result<()> {
    let invalid = |message: String| AdapterError::InvalidValue {
        target: column_type.native().sql_name().to_string(),
        message,
    };
    match (column_type.native(), column_type.precision(), column_type.scale()) {
        (NativeType::Decimal, Some(p), _) if p == 0 || p > MAX_DECIMAL_PRECISION => Err(invalid(
            format!("precision {p} is outside 1..={MAX_DECIMAL_PRECISION}"),
        )),
        (NativeType::Decimal, Some(p), Some(s)) if s > p => {
            Err(invalid(format!("scale {s} exceeds precision {p}")))
        }
        (NativeType::Float, Some(p), _) if p == 0 || p > MAX_FLOAT_PRECISION => Err(invalid(
            format!("precision {p} is outside 1..={MAX_FLOAT_PRECISION}"),
        )),
        _ => Ok(()),
    }
}

impl ColumnType {
    /// Casts a value for writing into a column of this type.
    ///
    /// Integers are bounds-checked (never clamped); floats and numeric text
    /// are accepted and truncated toward zero. Exact numerics are rendered as
    /// decimal text with exactly `scale` fractional digits, rounded half away
    /// from zero. `real` narrows to single precision. `NULL` passes through.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::OutOfRange`] when the value does not fit the
    /// column (integer bounds, `precision - scale` integer digits, or the
    /// currency ranges of `money` and `smallmoney`) and
    /// [`AdapterError::InvalidValue`] when it is not numeric.
    pub fn cast_value(&self, value: &SqlValue) -> Result<SqlValue> {
        if value.is_null() {
            return Ok(SqlValue::Null);
        }
        let native = self.native();
        if let Some(bounds) = native.bounds() {
            let int = self.integer_value(value)?;
            if !bounds.contains(int) {
                warn!(sql_type = native.sql_name(), value = %int, "Integer value out of range");
                return Err(self.out_of_range(int.to_string()));
            }
            return i64::try_from(int)
                .map(SqlValue::Int)
                .map_err(|_| self.out_of_range(int.to_string()));
        }
        if native.is_decimal() {
            return self.decimal_value(value).map(SqlValue::Text);
        }
        let float = self.float_value(value)?;
        if native == NativeType::Real {
            return Ok(SqlValue::Float(narrow_to_single(float)));
        }
        Ok(SqlValue::Float(float))
    }

    fn invalid(&self, message: impl Into<String>) -> AdapterError {
        AdapterError::InvalidValue {
            target: self.sql_type(),
            message: message.into(),
        }
    }

    fn out_of_range(&self, value: String) -> AdapterError {
        AdapterError::OutOfRange {
            sql_type: self.sql_type(),
            value,
        }
    }

    fn integer_value(&self, value: &SqlValue) -> Result<i128> {
        match value {
            SqlValue::Int(i) => Ok(i128::from(*i)),
            SqlValue::Bool(b) => Ok(i128::from(*b)),
            SqlValue::Float(f) => truncate_float(*f).ok_or_else(|| self.invalid(format!("{f} is not finite"))),
            SqlValue::Text(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i128>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(truncate_float))
                    .ok_or_else(|| self.invalid(format!("'{s}' is not a number")))
            }
            other => Err(self.invalid(format!("{other:?} is not a number"))),
        }
    }

    fn float_value(&self, value: &SqlValue) -> Result<f64> {
        match value {
            SqlValue::Float(f) => Ok(*f),
            SqlValue::Int(i) => Ok(int_to_float(*i)),
            SqlValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            SqlValue::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.invalid(format!("'{s}' is not a number"))),
            other => Err(self.invalid(format!("{other:?} is not a number"))),
        }
    }

    fn decimal_value(&self, value: &SqlValue) -> Result<String> {
        let text = match value {
            SqlValue::Int(i) => i.to_string(),
            SqlValue::Bool(b) => u8::from(*b).to_string(),
            SqlValue::Float(f) if f.is_finite() => f.to_string(),
            SqlValue::Text(s) => s.trim().to_string(),
            other => return Err(self.invalid(format!("{other:?} is not a number"))),
        };
        let Some(parsed) = parse_decimal(&text) else {
            // Valid numbers beyond 96-bit decimals are out of range, not malformed.
            if text.parse::<f64>().is_ok_and(f64::is_finite) {
                return Err(self.out_of_range(text));
            }
            return Err(self.invalid(format!("'{text}' is not a decimal")));
        };
        let scale = self.scale().unwrap_or(0);
        let mut rounded =
            parsed.round_dp_with_strategy(u32::from(scale), RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded.set_sign_positive(true);
        }
        if !self.fits(rounded) {
            warn!(sql_type = %self.sql_type(), value = %text, "Decimal value out of range");
            return Err(self.out_of_range(text));
        }
        Ok(format!("{rounded:.prec$}", prec = usize::from(scale)))
    }

    fn fits(&self, value: Decimal) -> bool {
        if let Some((min, max)) = self.native().money_range() {
            return value >= min && value <= max;
        }
        self.precision().is_none_or(|precision| {
            integer_digits(value) + usize::from(self.scale().unwrap_or(0)) <= usize::from(precision)
        })
    }
}

/// Parses plain (`-12.345`) and scientific (`1.5e3`) decimal text.
fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_str(text))
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Number of significant digits left of the decimal point.
fn integer_digits(value: Decimal) -> usize {
    let integer = value.abs().trunc();
    if integer.is_zero() {
        0
    } else {
        integer.normalize().to_string().len()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_float(f: f64) -> Option<i128> {
    f.is_finite().then(|| f.trunc() as i128)
}

#[allow(clippy::cast_precision_loss)]
const fn int_to_float(i: i64) -> f64 {
    i as f64
}

#[allow(clippy::cast_possible_truncation)]
fn narrow_to_single(f: f64) -> f64 {
    f64::from(f as f32)
}

/// Prepares a temporal value for binding.
///
/// Timestamps and times are sent as text: bound natively the driver
/// coerces them to `datetime2`, which breaks comparisons against `datetime`
/// and `time` columns. Other values pass through unchanged.
#[must_use]
pub fn bind_temporal(value: &SqlValue) -> SqlValue {
    match value {
        SqlValue::Timestamp(ts) => SqlValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
        SqlValue::Time(t) => SqlValue::Text(t.format(TIME_FORMAT).to_string()),
        other => other.clone(),
    }
}

/// Reads a `time` column value returned as text.
///
/// The value is anchored on 2000-01-01 so that it can be carried as a
/// timestamp by hosts without a time-of-day type.
///
/// # Errors
///
/// Returns [`AdapterError::InvalidValue`] if the text is not a time of day.
pub fn read_time(text: &str) -> Result<NaiveDateTime> {
    let invalid = || AdapterError::InvalidValue {
        target: "time".to_string(),
        message: format!("'{text}' is not a time of day"),
    };
    let time = NaiveTime::parse_from_str(text.trim(), TIME_FORMAT).map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .map(|date| date.and_time(time))
        .ok_or_else(invalid)
}
