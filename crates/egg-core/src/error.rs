//! Error taxonomy for datasets and series definitions.
//!
//! Only [`DatasetError`] and [`SeriesError`] are ever returned to callers.
//! [`DataError`] is non-fatal: the offending value is coerced to zero and the
//! error is collected and logged.

use crate::{Granularity, SeriesKey};
use thiserror::Error;

/// A bucket value that could not be plotted as-is
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("bucket `{bucket}` has no value for series `{series}`")]
    MissingValue { bucket: String, series: SeriesKey },

    #[error("bucket `{bucket}` has a non-numeric value for series `{series}`")]
    NonNumeric { bucket: String, series: SeriesKey },

    #[error("bucket `{bucket}` has a negative value {value} for series `{series}`")]
    Negative {
        bucket: String,
        series: SeriesKey,
        value: f64,
    },
}

impl DataError {
    pub fn bucket(&self) -> &str {
        match self {
            Self::MissingValue { bucket, .. }
            | Self::NonNumeric { bucket, .. }
            | Self::Negative { bucket, .. } => bucket,
        }
    }

    pub fn series(&self) -> &SeriesKey {
        match self {
            Self::MissingValue { series, .. }
            | Self::NonNumeric { series, .. }
            | Self::Negative { series, .. } => series,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("series set is empty")]
    Empty,

    #[error("duplicate series key `{0}`")]
    DuplicateKey(SeriesKey),

    #[error("duplicate series order {0}")]
    DuplicateOrder(u32),
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid dataset json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{granularity} bucket {index} has neither a label nor a period")]
    MissingLabel {
        granularity: Granularity,
        index: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown granularity `{0}`")]
pub struct UnknownGranularity(pub String);
