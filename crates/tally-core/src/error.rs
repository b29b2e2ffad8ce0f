//! Error types for tally-core.

use crate::datum::Key;
use thiserror::Error;

/// The host payload could not be turned into a row index.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// A per-row sequence does not line up with `data`.
    #[error("Length mismatch: '{field}' has {actual} entries but data has {expected}")]
    LengthMismatch {
        /// Offending payload field
        field: &'static str,
        /// Length of `data`
        expected: usize,
        /// Length of the offending field
        actual: usize,
    },

    /// Two rows share one key.
    #[error("Duplicate key: {0}")]
    DuplicateKey(Key),

    /// JSON decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML decoding failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

/// The widget settings are unusable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `statistic` names nothing we can compute.
    #[error("Invalid statistic specified: {0}")]
    UnknownStatistic(String),

    /// `rate_type` is neither `count_rate` nor `numeric_rate`.
    #[error("Invalid rate type specified: {0}")]
    UnknownRateType(String),

    /// A rate statistic has no way to classify rows.
    #[error(
        "Rate statistic '{0}' needs numerator/denominator flags or both 'selector' and 'numerator'"
    )]
    MissingRateClassification(&'static str),
}

/// The statistic is undefined for the current subset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatisticError {
    /// Mean/min/max of nothing.
    #[error("Cannot compute {statistic} of an empty subset")]
    EmptySubset {
        /// Statistic name
        statistic: &'static str,
    },

    /// A numeric statistic hit a value that is not a number.
    #[error("Cannot compute {statistic}: row '{key}' holds a {found}, not a number")]
    NonNumeric {
        /// Statistic name
        statistic: &'static str,
        /// Row key
        key: Key,
        /// Type name of the offending value
        found: &'static str,
    },
}

/// Any error raised by tally-core.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Malformed payload.
    #[error("Malformed payload: {0}")]
    Payload(#[from] PayloadError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Degenerate input.
    #[error("Statistic error: {0}")]
    Statistic(#[from] StatisticError),
}

impl From<serde_json::Error> for TallyError {
    fn from(e: serde_json::Error) -> Self {
        Self::Payload(PayloadError::Json(e))
    }
}

impl From<serde_yaml_ng::Error> for TallyError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Payload(PayloadError::Yaml(e))
    }
}
