//! Keyed row index built once per payload.

use crate::datum::{Datum, Key};
use crate::error::PayloadError;
use std::collections::HashMap;

/// One observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Identifier shared with the filter bus
    pub key: Key,
    /// Summarized value
    pub value: Datum,
    /// Counts toward a rate's numerator
    pub numerator_flag: bool,
    /// Counts toward a rate's denominator
    pub denominator_flag: bool,
    /// Numerator weight for value-weighted rates
    pub numerator_value: Option<f64>,
    /// Denominator weight for value-weighted rates
    pub denominator_value: Option<f64>,
}

impl Row {
    /// Create an unflagged row.
    #[must_use]
    pub fn new(key: impl Into<Key>, value: impl Into<Datum>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            numerator_flag: false,
            denominator_flag: false,
            numerator_value: None,
            denominator_value: None,
        }
    }

    /// Set the numerator flag.
    #[must_use]
    pub const fn numerator(mut self, flag: bool) -> Self {
        self.numerator_flag = flag;
        self
    }

    /// Set the denominator flag.
    #[must_use]
    pub const fn denominator(mut self, flag: bool) -> Self {
        self.denominator_flag = flag;
        self
    }

    /// Set the numerator weight.
    #[must_use]
    pub const fn numerator_value(mut self, value: f64) -> Self {
        self.numerator_value = Some(value);
        self
    }

    /// Set the denominator weight.
    #[must_use]
    pub const fn denominator_value(mut self, value: f64) -> Self {
        self.denominator_value = Some(value);
        self
    }
}

/// Column-oriented input for [`RowIndex::build`].
///
/// Every present column must have exactly `data.len()` entries.
#[derive(Debug, Clone, Default)]
pub struct RowColumns {
    /// Row values
    pub data: Vec<Datum>,
    /// Explicit keys
    pub keys: Option<Vec<Key>>,
    /// Numerator flags
    pub numerator_flag: Option<Vec<bool>>,
    /// Denominator flags
    pub denominator_flag: Option<Vec<bool>>,
    /// Numerator weights
    pub numerator_value: Option<Vec<Option<f64>>>,
    /// Denominator weights
    pub denominator_value: Option<Vec<Option<f64>>>,
}

impl RowColumns {
    /// Columns holding only values, keyed by position.
    #[must_use]
    pub fn values(data: Vec<Datum>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Attach explicit keys.
    #[must_use]
    pub fn with_keys(mut self, keys: Vec<Key>) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Whether any rate flag column is present.
    #[must_use]
    pub const fn has_flags(&self) -> bool {
        self.numerator_flag.is_some() || self.denominator_flag.is_some()
    }

    fn check_len(&self, field: &'static str, actual: Option<usize>) -> Result<(), PayloadError> {
        match actual {
            Some(actual) if actual != self.data.len() => Err(PayloadError::LengthMismatch {
                field,
                expected: self.data.len(),
                actual,
            }),
            _ => Ok(()),
        }
    }
}

/// Immutable keyed view of a dataset.
///
/// Iteration follows payload order; lookups go through a key map.
#[derive(Debug, Clone, Default)]
pub struct RowIndex {
    rows: Vec<Row>,
    positions: HashMap<Key, usize>,
}

impl RowIndex {
    /// Build the index from columns.
    ///
    /// Rejects the payload when any present column disagrees with `data` in
    /// length, or when two rows share a key.
    pub fn build(columns: RowColumns) -> Result<Self, PayloadError> {
        columns.check_len("key", columns.keys.as_ref().map(Vec::len))?;
        columns.check_len("numerator_flag", columns.numerator_flag.as_ref().map(Vec::len))?;
        columns.check_len("denominator_flag", columns.denominator_flag.as_ref().map(Vec::len))?;
        columns.check_len("numerator_value", columns.numerator_value.as_ref().map(Vec::len))?;
        columns.check_len("denominator_value", columns.denominator_value.as_ref().map(Vec::len))?;

        let RowColumns {
            data,
            keys,
            numerator_flag,
            denominator_flag,
            numerator_value,
            denominator_value,
        } = columns;

        let mut rows = Vec::with_capacity(data.len());
        let mut positions = HashMap::with_capacity(data.len());

        for (i, value) in data.into_iter().enumerate() {
            let key = keys
                .as_ref()
                .map_or_else(|| Key::positional(i), |k| k[i].clone());
            if positions.insert(key.clone(), i).is_some() {
                return Err(PayloadError::DuplicateKey(key));
            }
            rows.push(Row {
                key,
                value,
                numerator_flag: numerator_flag.as_ref().is_some_and(|f| f[i]),
                denominator_flag: denominator_flag.as_ref().is_some_and(|f| f[i]),
                numerator_value: numerator_value.as_ref().and_then(|v| v[i]),
                denominator_value: denominator_value.as_ref().and_then(|v| v[i]),
            });
        }

        log::debug!("built row index with {} rows", rows.len());
        Ok(Self { rows, positions })
    }

    /// Build an index from already-constructed rows.
    pub fn from_rows(rows: Vec<Row>) -> Result<Self, PayloadError> {
        let mut positions = HashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if positions.insert(row.key.clone(), i).is_some() {
                return Err(PayloadError::DuplicateKey(row.key.clone()));
            }
        }
        Ok(Self { rows, positions })
    }

    /// Look up a row by key.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Row> {
        self.positions.get(key).map(|&i| &self.rows[i])
    }

    /// Whether a key is indexed.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.positions.contains_key(key)
    }

    /// Rows in payload order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterate rows in payload order.
    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a RowIndex {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
