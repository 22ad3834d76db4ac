//! Engine capacity limits.

use serde::{Deserialize, Serialize};

/// Maximum number of items in an `IN (...)` list.
pub const IN_CLAUSE_MAX: usize = 10_000;

/// Maximum number of bind parameters in one statement.
///
/// The engine accepts 2,100 parameters per request; two are reserved for
/// the driver.
pub const BIND_PARAMS_MAX: usize = 2_098;

/// Maximum number of row value expressions in one `INSERT ... VALUES`.
pub const INSERT_ROWS_MAX: usize = 1_000;

/// Capacity limits the adapter shapes statements against.
///
/// Fixed at adapter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityLimits {
    /// Maximum `IN (...)` list length.
    pub in_clause_max: usize,
    /// Maximum bind parameters per statement.
    pub bind_params_max: usize,
    /// Maximum rows per multi-row `INSERT`.
    pub insert_rows_max: usize,
}

impl Default for CapacityLimits {
    fn default() -> Self {
        Self {
            in_clause_max: IN_CLAUSE_MAX,
            bind_params_max: BIND_PARAMS_MAX,
            insert_rows_max: INSERT_ROWS_MAX,
        }
    }
}

impl CapacityLimits {
    /// Creates limits from explicit values.
    #[must_use]
    pub const fn new(in_clause_max: usize, bind_params_max: usize, insert_rows_max: usize) -> Self {
        Self {
            in_clause_max,
            bind_params_max,
            insert_rows_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine() {
        let limits = CapacityLimits::default();
        assert_eq!(limits.in_clause_max, 10_000);
        assert_eq!(limits.bind_params_max, 2_098);
        assert_eq!(limits.insert_rows_max, 1_000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let limits: CapacityLimits = serde_json::from_str(r#"{"insert_rows_max": 250}"#).unwrap();
        assert_eq!(limits, CapacityLimits::new(IN_CLAUSE_MAX, BIND_PARAMS_MAX, 250));
    }
}
