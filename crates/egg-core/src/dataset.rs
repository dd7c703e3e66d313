//! Datasets and dataset providers
//!
//! Datasets arrive pre-aggregated as JSON documents of the form
//! `{ "daily": [record, ..], "monthly": [record, ..] }` where each record holds an
//! optional `label`, an optional ISO `period` date and one field per series key.

use crate::{Bucket, DatasetError, Granularity, SeriesKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const EGG_DEFECTS_JSON: &str = include_str!("../data/egg_defects.json");
const DEFECT_TOTALS_JSON: &str = include_str!("../data/defect_totals.json");

/// Ordered buckets for one granularity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub granularity: Granularity,
    pub buckets: Vec<Bucket>,
}

impl Dataset {
    pub fn new(granularity: Granularity, buckets: Vec<Bucket>) -> Self {
        Self {
            granularity,
            buckets,
        }
    }

    pub fn empty(granularity: Granularity) -> Self {
        Self::new(granularity, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.label.as_str())
    }

    /// True when every dated bucket follows the previous dated one
    pub fn is_chronological(&self) -> bool {
        let periods: Vec<NaiveDate> = self.buckets.iter().filter_map(|b| b.period).collect();
        periods.windows(2).all(|w| w[0] < w[1])
    }
}

// ============================================================================
// JSON LOADING
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawBucket {
    label: Option<String>,
    period: Option<NaiveDate>,
    #[serde(flatten)]
    values: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    daily: Vec<RawBucket>,
    #[serde(default)]
    monthly: Vec<RawBucket>,
}

fn convert(granularity: Granularity, raw: Vec<RawBucket>) -> Result<Dataset, DatasetError> {
    let mut buckets = Vec::with_capacity(raw.len());

    for (index, record) in raw.into_iter().enumerate() {
        let label = match (record.label, record.period) {
            (Some(label), _) => label,
            (None, Some(period)) => period.format(granularity.label_format()).to_string(),
            (None, None) => return Err(DatasetError::MissingLabel { granularity, index }),
        };

        // Non-numeric values become NaN and are flagged when the bucket is resolved.
        let values = record
            .values
            .into_iter()
            .map(|(key, value)| (SeriesKey(key), value.as_f64().unwrap_or(f64::NAN)))
            .collect();

        buckets.push(Bucket {
            label,
            period: record.period,
            values,
        });
    }

    let dataset = Dataset::new(granularity, buckets);
    if !dataset.is_chronological() {
        tracing::warn!("{} dataset is not in ascending period order", granularity);
    }

    Ok(dataset)
}

// ============================================================================
// DATASET PROVIDER
// ============================================================================

/// Supplies the ordered buckets for a granularity.
///
/// The returned `Arc` identity is what charts compare to detect a dataset change.
pub trait DatasetProvider {
    fn dataset(&self, granularity: Granularity) -> Arc<Dataset>;
}

/// Provider over two in-memory datasets
#[derive(Debug, Clone)]
pub struct StaticDatasetProvider {
    daily: Arc<Dataset>,
    monthly: Arc<Dataset>,
}

impl StaticDatasetProvider {
    pub fn new(daily: Dataset, monthly: Dataset) -> Self {
        Self {
            daily: Arc::new(daily),
            monthly: Arc::new(monthly),
        }
    }

    pub fn empty() -> Self {
        Self::new(
            Dataset::empty(Granularity::Daily),
            Dataset::empty(Granularity::Monthly),
        )
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let doc: RawDocument = serde_json::from_str(json)?;
        Ok(Self::new(
            convert(Granularity::Daily, doc.daily)?,
            convert(Granularity::Monthly, doc.monthly)?,
        ))
    }

    /// Per-category defect counts
    pub fn egg_defects() -> Self {
        Self::builtin("egg defects", EGG_DEFECTS_JSON)
    }

    /// Total defect counts
    pub fn defect_totals() -> Self {
        Self::builtin("defect totals", DEFECT_TOTALS_JSON)
    }

    fn builtin(name: &str, json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|e| {
            tracing::error!("Failed to load built-in {} dataset: {}", name, e);
            Self::empty()
        })
    }
}

impl DatasetProvider for StaticDatasetProvider {
    fn dataset(&self, granularity: Granularity) -> Arc<Dataset> {
        match granularity {
            Granularity::Daily => Arc::clone(&self.daily),
            Granularity::Monthly => Arc::clone(&self.monthly),
        }
    }
}
