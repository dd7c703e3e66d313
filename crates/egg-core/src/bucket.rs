//! Time buckets and their resolution against a [`SeriesSet`]

use crate::{DataError, SeriesKey, SeriesSet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// RAW BUCKET
// ============================================================================

/// One time-series sample (a day or a month) as supplied by a dataset provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Category name shown under the bucket ("Mon", "Jan")
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<NaiveDate>,
    pub values: BTreeMap<SeriesKey, f64>,
}

impl Bucket {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            period: None,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<SeriesKey>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn value(&self, key: &SeriesKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Aligns values with the series order, coercing unusable values to zero.
    ///
    /// Every coercion is pushed onto `issues`.
    pub fn resolve(&self, series: &SeriesSet, issues: &mut Vec<DataError>) -> ResolvedBucket {
        let values = series
            .draw_order()
            .map(|(_, def)| {
                let Some(value) = self.value(&def.key) else {
                    issues.push(DataError::MissingValue {
                        bucket: self.label.clone(),
                        series: def.key.clone(),
                    });
                    return 0.0;
                };

                if !value.is_finite() {
                    issues.push(DataError::NonNumeric {
                        bucket: self.label.clone(),
                        series: def.key.clone(),
                    });
                    0.0
                } else if value < 0.0 {
                    issues.push(DataError::Negative {
                        bucket: self.label.clone(),
                        series: def.key.clone(),
                        value,
                    });
                    0.0
                } else {
                    value
                }
            })
            .collect();

        ResolvedBucket {
            label: self.label.clone(),
            values,
        }
    }
}

// ============================================================================
// RESOLVED BUCKET
// ============================================================================

/// Bucket values indexed by series position (draw order), all finite and non-negative
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBucket {
    pub label: String,
    pub values: Vec<f64>,
}

impl ResolvedBucket {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0_f64, f64::max)
    }

    pub fn value(&self, series_index: usize) -> f64 {
        self.values.get(series_index).copied().unwrap_or(0.0)
    }

    /// Summary in legend order, for components mirroring the hovered bucket
    pub fn summarize(&self, index: usize, series: &SeriesSet) -> HoveredBucket {
        HoveredBucket {
            index,
            label: self.label.clone(),
            entries: series
                .legend_order()
                .map(|(i, def)| SummaryEntry {
                    key: def.key.clone(),
                    label: def.label.clone(),
                    color: def.color.clone(),
                    value: self.value(i),
                })
                .collect(),
        }
    }
}

/// The bucket currently under the pointer, as published to external legends
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoveredBucket {
    pub index: usize,
    pub label: String,
    pub entries: Vec<SummaryEntry>,
}

impl HoveredBucket {
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    pub key: SeriesKey,
    pub label: String,
    pub color: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn monday() -> Bucket {
        Bucket::new("Mon")
            .with_value("cracks", 300.0)
            .with_value("dirt", 188.0)
            .with_value("deformities", 150.0)
            .with_value("bloodSpots", 75.0)
            .with_value("other", 37.0)
    }

    #[test]
    fn test_resolve_aligns_with_draw_order() {
        let mut issues = Vec::new();
        let resolved = monday().resolve(&SeriesSet::egg_defects(), &mut issues);

        assert!(issues.is_empty());
        assert_eq!(resolved.values, vec![37.0, 75.0, 150.0, 188.0, 300.0]);
        assert_relative_eq!(resolved.total(), 750.0);
    }

    #[test]
    fn test_resolve_coerces_bad_values() {
        let bucket = Bucket::new("Tue")
            .with_value("cracks", f64::NAN)
            .with_value("dirt", -4.0)
            .with_value("deformities", 10.0)
            .with_value("other", 1.0);

        let mut issues = Vec::new();
        let resolved = bucket.resolve(&SeriesSet::egg_defects(), &mut issues);

        assert_eq!(resolved.values, vec![1.0, 0.0, 10.0, 0.0, 0.0]);
        assert_eq!(issues.len(), 3);
        assert!(issues.contains(&DataError::MissingValue {
            bucket: "Tue".into(),
            series: "bloodSpots".into(),
        }));
        assert!(issues.contains(&DataError::NonNumeric {
            bucket: "Tue".into(),
            series: "cracks".into(),
        }));
        assert!(matches!(
            issues.iter().find(|e| e.series().as_str() == "dirt"),
            Some(DataError::Negative { value, .. }) if *value == -4.0
        ));
    }

    #[test]
    fn test_summary_uses_legend_order() {
        let series = SeriesSet::egg_defects();
        let resolved = monday().resolve(&series, &mut Vec::new());
        let summary = resolved.summarize(0, &series);

        assert_eq!(summary.label, "Mon");
        assert_eq!(summary.entries[0].key.as_str(), "cracks");
        assert_eq!(summary.entries[0].value, 300.0);
        assert_eq!(summary.entries[4].key.as_str(), "other");
        assert_relative_eq!(summary.total(), 750.0);
    }
}
