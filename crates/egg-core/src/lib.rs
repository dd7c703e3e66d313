//! # egg-core
//!
//! Core domain types for the egg inspection dashboard.
//! Implements Strategy pattern for count formatting.

pub mod bucket;
pub mod dataset;
pub mod error;
pub mod series;

pub use bucket::*;
pub use dataset::*;
pub use error::*;
pub use series::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for formatting defect counts
pub trait CountFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// Thousands-separated counts ("1,125", "12.5")
#[derive(Debug, Clone, Default)]
pub struct GroupedCountFormatter;

impl CountFormatter for GroupedCountFormatter {
    fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return "-".to_string();
        }

        let sign = if value < 0.0 { "-" } else { "" };
        let fixed = format!("{:.2}", value.abs());
        let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
        let frac = frac.trim_end_matches('0');

        if frac.is_empty() {
            format!("{}{}", sign, group_thousands(whole))
        } else {
            format!("{}{}.{}", sign, group_thousands(whole), frac)
        }
    }
}

/// Compact formatter for axis ticks (K, M suffixes)
#[derive(Debug, Clone, Default)]
pub struct CompactCountFormatter;

impl CountFormatter for CompactCountFormatter {
    fn format(&self, value: f64) -> String {
        let abs = value.abs();
        let sign = if value < 0.0 { "-" } else { "" };

        let (scaled, suffix) = if abs >= 1_000_000.0 {
            (abs / 1_000_000.0, "M")
        } else if abs >= 1_000.0 {
            (abs / 1_000.0, "K")
        } else {
            (abs, "")
        };

        let text = format!("{:.1}", scaled);
        let text = text.strip_suffix(".0").unwrap_or(&text);
        format!("{}{}{}", sign, text, suffix)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// GRANULARITY
// ============================================================================

/// Temporal resolution of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Monthly,
}

impl Granularity {
    /// Selector value ("daily" / "monthly")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Monthly => "Monthly",
        }
    }

    /// chrono format used to derive a bucket label from its period date
    pub fn label_format(&self) -> &'static str {
        match self {
            Self::Daily => "%a",
            Self::Monthly => "%b",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Daily, Self::Monthly]
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "monthly" => Ok(Self::Monthly),
            _ => Err(UnknownGranularity(s.to_string())),
        }
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const CRACKS: &str = "#0e5f97";
    pub const DIRT: &str = "#0e4772";
    pub const DEFORMITIES: &str = "#b0b0b0";
    pub const BLOOD_SPOTS: &str = "#fb510f";
    pub const OTHER: &str = "#ecb662";

    pub const LINE: &str = "#fb510f";
    pub const POINT: &str = "#0e5f97";
    pub const LABEL: &str = "#2563eb";

    pub const BG_PANEL: &str = "#ffffff";
    pub const GRID: &str = "#f1f5f9";
    pub const TEXT_MUTED: &str = "#6b7280";
}
