//! Series definitions and their canonical ordering.
//!
//! A [`SeriesSet`] is resolved once per chart instance. Its order is the
//! stacking order (index 0 is drawn at the bottom); legend and tooltip order
//! is always the reverse of it.

use crate::{colors, SeriesError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Series identifier (e.g., "cracks", "bloodSpots")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesKey(pub String);

impl SeriesKey {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SeriesKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One plotted series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDefinition {
    pub key: SeriesKey,
    pub label: String,
    pub color: String,
    /// Stacking position, lowest first
    pub order: u32,
}

impl SeriesDefinition {
    pub fn new(
        key: impl Into<SeriesKey>,
        label: impl Into<String>,
        color: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            color: color.into(),
            order,
        }
    }
}

/// Validated, ordered list of series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSet {
    series: Vec<SeriesDefinition>,
}

impl SeriesSet {
    /// Sorts by `order` and rejects empty sets, repeated keys and repeated orders.
    pub fn new(mut series: Vec<SeriesDefinition>) -> Result<Self, SeriesError> {
        if series.is_empty() {
            return Err(SeriesError::Empty);
        }

        series.sort_by_key(|s| s.order);

        let mut keys = HashSet::with_capacity(series.len());
        for pair in series.windows(2) {
            if pair[0].order == pair[1].order {
                return Err(SeriesError::DuplicateOrder(pair[1].order));
            }
        }
        for def in &series {
            if !keys.insert(def.key.clone()) {
                return Err(SeriesError::DuplicateKey(def.key.clone()));
            }
        }

        Ok(Self { series })
    }

    /// The five inspection defect categories, "other" at the bottom of the stack
    pub fn egg_defects() -> Self {
        Self {
            series: vec![
                SeriesDefinition::new("other", "Other", colors::OTHER, 0),
                SeriesDefinition::new("bloodSpots", "Blood Spots", colors::BLOOD_SPOTS, 1),
                SeriesDefinition::new("deformities", "Deformities", colors::DEFORMITIES, 2),
                SeriesDefinition::new("dirt", "Dirt", colors::DIRT, 3),
                SeriesDefinition::new("cracks", "Cracks", colors::CRACKS, 4),
            ],
        }
    }

    /// Single total-defects series for the line chart
    pub fn defect_totals() -> Self {
        Self {
            series: vec![SeriesDefinition::new("defects", "Defects", colors::LINE, 0)],
        }
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SeriesDefinition> {
        self.series.get(index)
    }

    pub fn position(&self, key: &SeriesKey) -> Option<usize> {
        self.series.iter().position(|s| &s.key == key)
    }

    /// Bottom-to-top stacking order, paired with each series' index
    pub fn draw_order(&self) -> impl DoubleEndedIterator<Item = (usize, &SeriesDefinition)> {
        self.series.iter().enumerate()
    }

    /// Top-to-bottom legend/tooltip order (reverse of [`Self::draw_order`])
    pub fn legend_order(&self) -> impl Iterator<Item = (usize, &SeriesDefinition)> {
        self.draw_order().rev()
    }
}
