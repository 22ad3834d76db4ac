//! Bound parameter values.
//!
//! Values travel to the execution layer alongside the statement text and are
//! never interpolated into it.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A SQL value that can be used as a bound parameter.
///
/// Deserialized untagged: JSON strings in chrono's ISO forms
/// (`2024-01-02T03:04:05`, `2024-01-02`, `08:30:00`) become temporal values,
/// any other string is text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlValue {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Date and time without zone.
    Timestamp(NaiveDateTime),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// Text value.
    Text(String),
    /// Binary value.
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Returns true for `NULL`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}
