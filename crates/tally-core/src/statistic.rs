//! Statistic calculation over an active subset.

use crate::datum::{Datum, DistinctKey};
use crate::error::{ConfigError, StatisticError, TallyError};
use crate::index::Row;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// The summary a widget displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKind {
    /// Number of rows
    Count,
    /// Sum of values
    Sum,
    /// Arithmetic mean of values
    Mean,
    /// Number of distinct values
    DistinctCount,
    /// Number of distinct values seen more than once
    Duplicates,
    /// Smallest value
    Min,
    /// Largest value
    Max,
    /// Percentage of denominator rows that are also numerator rows
    CountRate,
    /// Percentage of denominator weight carried by numerator rows
    NumericRate,
}

impl StatisticKind {
    /// All statistic kinds.
    pub const ALL: [Self; 9] = [
        Self::Count,
        Self::Sum,
        Self::Mean,
        Self::DistinctCount,
        Self::Duplicates,
        Self::Min,
        Self::Max,
        Self::CountRate,
        Self::NumericRate,
    ];

    /// Settings name of this statistic.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::DistinctCount => "distinct_count",
            Self::Duplicates => "duplicates",
            Self::Min => "min",
            Self::Max => "max",
            Self::CountRate => "count_rate",
            Self::NumericRate => "numeric_rate",
        }
    }

    /// Whether this is a percentage statistic.
    #[must_use]
    pub const fn is_rate(self) -> bool {
        matches!(self, Self::CountRate | Self::NumericRate)
    }

    /// Resolve a settings pair.
    ///
    /// `"rate"` is accepted as a legacy alias and resolved through
    /// `rate_type`, defaulting to `count_rate`.
    pub fn resolve(statistic: &str, rate_type: Option<&str>) -> Result<Self, ConfigError> {
        if statistic == "rate" {
            return match rate_type.unwrap_or("count_rate") {
                "count_rate" => Ok(Self::CountRate),
                "numeric_rate" => Ok(Self::NumericRate),
                other => Err(ConfigError::UnknownRateType(other.to_string())),
            };
        }
        statistic.parse()
    }
}

impl FromStr for StatisticKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownStatistic(s.to_string()))
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Record field summed by `numeric_rate` when no weight field is configured.
pub const DEFAULT_WEIGHT_FIELD: &str = "id";

/// How rows are sorted into numerator and denominator roles.
#[derive(Debug, Clone, PartialEq)]
pub enum RateClassifier {
    /// Use the per-row flags from the payload.
    Flags,
    /// Match a category against accepted values.
    Category {
        /// Record field holding the category
        selector: String,
        /// Categories that count toward the numerator
        numerator: Vec<Datum>,
        /// Categories that count toward the denominator; `None` means all rows
        denominator: Option<Vec<Datum>>,
        /// Record field holding a row's `numeric_rate` weight
        weight: String,
    },
}

impl RateClassifier {
    /// `(numerator, denominator)` roles of a row.
    #[must_use]
    pub fn roles(&self, row: &Row) -> (bool, bool) {
        match self {
            Self::Flags => (row.numerator_flag, row.denominator_flag),
            Self::Category {
                selector,
                numerator,
                denominator,
                ..
            } => {
                let category = row.value.field(selector).unwrap_or(&row.value);
                let is_member = |accepted: &[Datum]| {
                    accepted
                        .iter()
                        .any(|a| DistinctKey(a) == DistinctKey(category))
                };
                let num = is_member(numerator.as_slice());
                let den = denominator.as_deref().map_or(true, is_member);
                (num, den)
            }
        }
    }

    /// Weight of a row in a `numeric_rate` when the payload gives none.
    ///
    /// Scalars weigh their own value; records weigh their weight field.
    #[must_use]
    pub fn weight(&self, row: &Row) -> Option<f64> {
        let field = match self {
            Self::Flags => DEFAULT_WEIGHT_FIELD,
            Self::Category { weight, .. } => weight.as_str(),
        };
        match &row.value {
            Datum::Record(_) => row.value.field(field).and_then(Datum::as_number),
            value => value.as_number(),
        }
    }
}

fn numeric(row: &Row, statistic: StatisticKind) -> Result<f64, StatisticError> {
    row.value
        .as_number()
        .ok_or_else(|| StatisticError::NonNumeric {
            statistic: statistic.name(),
            key: row.key.clone(),
            found: row.value.type_name(),
        })
}

fn numbers(subset: &[&Row], statistic: StatisticKind) -> Result<Vec<f64>, StatisticError> {
    subset.iter().map(|row| numeric(row, statistic)).collect()
}

fn non_empty(subset: &[&Row], statistic: StatisticKind) -> Result<(), StatisticError> {
    if subset.is_empty() {
        Err(StatisticError::EmptySubset {
            statistic: statistic.name(),
        })
    } else {
        Ok(())
    }
}

fn distinct_count(subset: &[&Row]) -> usize {
    subset
        .iter()
        .map(|row| DistinctKey(&row.value))
        .collect::<HashSet<_>>()
        .len()
}

fn duplicate_count(subset: &[&Row]) -> usize {
    let mut seen = HashSet::new();
    let mut repeated = HashSet::new();
    for row in subset {
        let key = DistinctKey(&row.value);
        if !seen.insert(key) {
            repeated.insert(key);
        }
    }
    repeated.len()
}

fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator * 100.0 / denominator
    }
}

fn count_rate(subset: &[&Row], classifier: &RateClassifier) -> f64 {
    let (num, den) = subset
        .iter()
        .map(|row| classifier.roles(row))
        .filter(|&(_, den)| den)
        .fold((0usize, 0usize), |(n, d), (num, _)| (n + usize::from(num), d + 1));
    percentage(num as f64, den as f64)
}

fn numeric_rate(subset: &[&Row], classifier: &RateClassifier) -> f64 {
    let weight = |explicit: Option<f64>, row: &Row| {
        explicit.or_else(|| classifier.weight(row)).unwrap_or(0.0)
    };
    let (num, den) = subset
        .iter()
        .filter_map(|row| {
            let (num, den) = classifier.roles(row);
            den.then(|| {
                let n = if num {
                    weight(row.numerator_value, row)
                } else {
                    0.0
                };
                (n, weight(row.denominator_value, row))
            })
        })
        .fold((0.0, 0.0), |(n, d), (rn, rd)| (n + rn, d + rd));
    percentage(num, den)
}

/// Compute `statistic` over `subset`.
///
/// Rate statistics need a classifier; every other statistic ignores it.
pub fn compute(
    subset: &[&Row],
    statistic: StatisticKind,
    classifier: Option<&RateClassifier>,
) -> Result<f64, TallyError> {
    let value = match statistic {
        StatisticKind::Count => subset.len() as f64,
        StatisticKind::Sum => numbers(subset, statistic)?.iter().sum(),
        StatisticKind::Mean => {
            non_empty(subset, statistic)?;
            let values = numbers(subset, statistic)?;
            values.iter().sum::<f64>() / values.len() as f64
        }
        StatisticKind::DistinctCount => distinct_count(subset) as f64,
        StatisticKind::Duplicates => duplicate_count(subset) as f64,
        StatisticKind::Min => {
            non_empty(subset, statistic)?;
            numbers(subset, statistic)?
                .into_iter()
                .fold(f64::INFINITY, f64::min)
        }
        StatisticKind::Max => {
            non_empty(subset, statistic)?;
            numbers(subset, statistic)?
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max)
        }
        StatisticKind::CountRate | StatisticKind::NumericRate => {
            let classifier =
                classifier.ok_or(ConfigError::MissingRateClassification(statistic.name()))?;
            if statistic == StatisticKind::CountRate {
                count_rate(subset, classifier)
            } else {
                numeric_rate(subset, classifier)
            }
        }
    };
    Ok(value)
}
