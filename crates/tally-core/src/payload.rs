//! Host payload and widget settings.
//!
//! The host serializes its data column-wise:
//!
//! ```json
//! {
//!   "data": [1, 2, 2, 3],
//!   "key": ["a", "b", "c", "d"],
//!   "settings": { "statistic": "distinct_count", "digits": null,
//!                 "crosstalk_group": "g1" }
//! }
//! ```
//!
//! Length-one vectors may arrive unboxed as scalars; every sequence field
//! accepts either form.

use crate::datum::{Datum, Key};
use crate::error::{ConfigError, TallyError};
use crate::format::NumberFormat;
use crate::index::{RowColumns, RowIndex};
use crate::statistic::{RateClassifier, StatisticKind, DEFAULT_WEIGHT_FIELD};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(v: OneOrMany<T>) -> Self {
        match v {
            OneOrMany::Many(v) => v,
            OneOrMany::One(v) => vec![v],
        }
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    OneOrMany::deserialize(deserializer).map(Vec::from)
}

fn opt_one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<OneOrMany<T>>::deserialize(deserializer)?.map(Vec::from))
}

/// Widget settings as sent by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Statistic name
    pub statistic: String,
    /// `count_rate` or `numeric_rate` when `statistic` is `"rate"`
    pub rate_type: Option<String>,
    /// Fixed decimal places
    pub digits: Option<u8>,
    /// Thousands separator
    pub big_mark: Option<String>,
    /// Display prefix
    pub prefix: Option<String>,
    /// Display suffix
    pub suffix: Option<String>,
    /// Record field used to classify rows for rates
    pub selector: Option<String>,
    /// Categories counted in a rate's numerator
    #[serde(deserialize_with = "opt_one_or_many")]
    pub numerator: Option<Vec<Datum>>,
    /// Categories counted in a rate's denominator
    #[serde(deserialize_with = "opt_one_or_many")]
    pub denominator: Option<Vec<Datum>>,
    /// Record field summed by `numeric_rate`; defaults to `id`
    pub weight: Option<String>,
    /// Filter bus group
    pub crosstalk_group: Option<String>,
    /// Row keys, used when the payload has no top-level `key`
    #[serde(deserialize_with = "opt_one_or_many")]
    pub crosstalk_key: Option<Vec<Key>>,
}

impl Settings {
    /// Settings for one statistic with default formatting.
    #[must_use]
    pub fn new(statistic: impl Into<String>) -> Self {
        Self {
            statistic: statistic.into(),
            ..Self::default()
        }
    }

    /// Validate into fixed, typed settings.
    ///
    /// `has_flags` tells whether the payload carries per-row rate flags.
    pub fn resolve(&self, has_flags: bool) -> Result<ResolvedSettings, ConfigError> {
        let statistic = StatisticKind::resolve(&self.statistic, self.rate_type.as_deref())?;

        let classifier = if !statistic.is_rate() {
            None
        } else if has_flags {
            Some(RateClassifier::Flags)
        } else {
            match (&self.selector, &self.numerator) {
                (Some(selector), Some(numerator)) if !selector.is_empty() => {
                    Some(RateClassifier::Category {
                        selector: selector.clone(),
                        numerator: numerator.clone(),
                        denominator: self.denominator.clone(),
                        weight: self
                            .weight
                            .clone()
                            .unwrap_or_else(|| DEFAULT_WEIGHT_FIELD.to_string()),
                    })
                }
                _ => return Err(ConfigError::MissingRateClassification(statistic.name())),
            }
        };

        let format = NumberFormat {
            digits: self.digits,
            big_mark: self.big_mark.clone().filter(|m| !m.is_empty()),
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            percent: statistic.is_rate(),
        };

        Ok(ResolvedSettings {
            statistic,
            classifier,
            format,
            group: self.crosstalk_group.clone(),
        })
    }
}

/// Validated settings, fixed for the life of a widget.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    /// Statistic to compute
    pub statistic: StatisticKind,
    /// Row classification for rate statistics
    pub classifier: Option<RateClassifier>,
    /// Display formatting
    pub format: NumberFormat,
    /// Filter bus group
    pub group: Option<String>,
}

impl ResolvedSettings {
    /// Settings for a non-rate statistic with default formatting.
    #[must_use]
    pub fn plain(statistic: StatisticKind) -> Self {
        Self {
            statistic,
            classifier: statistic.is_rate().then_some(RateClassifier::Flags),
            format: NumberFormat::new().percent(statistic.is_rate()),
            group: None,
        }
    }
}

/// The initialization payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Row values
    #[serde(deserialize_with = "one_or_many")]
    pub data: Vec<Datum>,
    /// Row keys
    #[serde(default, deserialize_with = "opt_one_or_many")]
    pub key: Option<Vec<Key>>,
    /// Per-row numerator flags
    #[serde(default, deserialize_with = "opt_one_or_many")]
    pub numerator_flag: Option<Vec<bool>>,
    /// Per-row denominator flags
    #[serde(default, deserialize_with = "opt_one_or_many")]
    pub denominator_flag: Option<Vec<bool>>,
    /// Per-row numerator weights
    #[serde(default, deserialize_with = "opt_one_or_many")]
    pub numerator_value: Option<Vec<Option<f64>>>,
    /// Per-row denominator weights
    #[serde(default, deserialize_with = "opt_one_or_many")]
    pub denominator_value: Option<Vec<Option<f64>>>,
    /// Widget settings
    #[serde(default)]
    pub settings: Settings,
}

impl Payload {
    /// Parse a JSON payload.
    pub fn from_json(json: &str) -> Result<Self, TallyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a YAML payload.
    pub fn from_yaml(yaml: &str) -> Result<Self, TallyError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Payload with values and settings only.
    #[must_use]
    pub fn new(data: Vec<Datum>, settings: Settings) -> Self {
        Self {
            data,
            settings,
            ..Self::default()
        }
    }

    /// Validate settings and build the row index.
    ///
    /// Settings are checked first so a bad statistic is reported even when
    /// the data is also malformed.
    pub fn into_parts(self) -> Result<(RowIndex, ResolvedSettings), TallyError> {
        let Self {
            data,
            key,
            numerator_flag,
            denominator_flag,
            numerator_value,
            denominator_value,
            settings,
        } = self;

        let columns = RowColumns {
            data,
            keys: key.or_else(|| settings.crosstalk_key.clone()),
            numerator_flag,
            denominator_flag,
            numerator_value,
            denominator_value,
        };
        let resolved = settings.resolve(columns.has_flags())?;
        let index = RowIndex::build(columns)?;
        Ok((index, resolved))
    }
}
