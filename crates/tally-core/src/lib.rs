//! Core types for Tally summary widgets.
//!
//! This crate provides the pieces behind a live summary number:
//! - Row values and keys: [`Datum`], [`Key`]
//! - The keyed dataset: [`RowIndex`], [`Row`]
//! - Filter/selection intersection: [`KeySet`], [`select`]
//! - Statistics: [`StatisticKind`], [`compute`]
//! - Display formatting: [`NumberFormat`], [`format()`]
//! - Host payload and settings: [`Payload`], [`Settings`]
//! - The shared filter bus: [`Bus`], [`LocalBus`]
//!
//! # Example
//!
//! ```
//! use tally_core::{KeySet, Payload, SummaryModel};
//!
//! let payload = Payload::from_json(
//!     r#"{"data": [10, 20, 30], "settings": {"statistic": "mean", "digits": 1}}"#,
//! )?;
//! let model = SummaryModel::from_payload(payload)?;
//! assert_eq!(model.display(None, None)?, "20.0");
//!
//! let filter = KeySet::new(["0", "1"]);
//! assert_eq!(model.display(Some(&filter), None)?, "15.0");
//! # Ok::<(), tally_core::TallyError>(())
//! ```

pub mod bus;
mod datum;
mod error;
pub mod format;
mod index;
mod model;
mod payload;
mod select;
mod statistic;

pub use bus::{Bus, Channel, ChangeHandler, LocalBus, Subscription};
pub use datum::{Datum, DistinctKey, Key};
pub use error::{ConfigError, PayloadError, StatisticError, TallyError};
pub use format::{format, NumberFormat};
pub use index::{Row, RowColumns, RowIndex};
pub use model::SummaryModel;
pub use payload::{Payload, ResolvedSettings, Settings};
pub use select::{select, KeySet};
pub use statistic::{compute, RateClassifier, StatisticKind, DEFAULT_WEIGHT_FIELD};
