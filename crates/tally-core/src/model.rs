//! Index plus settings: everything needed to turn key sets into a display string.

use crate::error::TallyError;
use crate::index::{Row, RowIndex};
use crate::payload::{Payload, ResolvedSettings};
use crate::select::{select, KeySet};
use crate::statistic::compute;

/// A validated summary over one dataset.
#[derive(Debug, Clone)]
pub struct SummaryModel {
    index: RowIndex,
    settings: ResolvedSettings,
}

impl SummaryModel {
    /// Create a model from parts.
    #[must_use]
    pub const fn new(index: RowIndex, settings: ResolvedSettings) -> Self {
        Self { index, settings }
    }

    /// Validate a payload and build its index.
    pub fn from_payload(payload: Payload) -> Result<Self, TallyError> {
        let (index, settings) = payload.into_parts()?;
        Ok(Self::new(index, settings))
    }

    /// The row index.
    #[must_use]
    pub const fn index(&self) -> &RowIndex {
        &self.index
    }

    /// The resolved settings.
    #[must_use]
    pub const fn settings(&self) -> &ResolvedSettings {
        &self.settings
    }

    /// Active rows for the given key sets.
    #[must_use]
    pub fn subset(&self, filter: Option<&KeySet>, selection: Option<&KeySet>) -> Vec<&Row> {
        select(&self.index, filter, selection)
    }

    /// Statistic value for the given key sets.
    pub fn evaluate(
        &self,
        filter: Option<&KeySet>,
        selection: Option<&KeySet>,
    ) -> Result<f64, TallyError> {
        let subset = self.subset(filter, selection);
        compute(
            &subset,
            self.settings.statistic,
            self.settings.classifier.as_ref(),
        )
    }

    /// Formatted display string for the given key sets.
    pub fn display(
        &self,
        filter: Option<&KeySet>,
        selection: Option<&KeySet>,
    ) -> Result<String, TallyError> {
        let value = self.evaluate(filter, selection)?;
        Ok(self.settings.format.format(value))
    }
}
