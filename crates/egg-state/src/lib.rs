//! # egg-state
//!
//! Reactive state for the egg inspection dashboard.
//! Holds the selectors shared by the overview panel and the charts, and the
//! hovered-bucket mirror charts publish for external legends.

use egg_core::{Granularity, HoveredBucket};
use leptos::prelude::*;
use std::str::FromStr;

// ============================================================================
// CHART VIEW
// ============================================================================

/// Which overview chart is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChartView {
    /// Total defects line chart
    #[default]
    Total,
    /// Per-category stacked bar chart
    Details,
}

impl ChartView {
    /// Selector value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Details => "details",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Total => "Total Defects",
            Self::Details => "Defect Types",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Total, Self::Details]
    }
}

impl FromStr for ChartView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" => Ok(Self::Total),
            "details" => Ok(Self::Details),
            _ => Err(format!("unknown chart view `{}`", s)),
        }
    }
}

// ============================================================================
// DASHBOARD STATE
// ============================================================================

/// Dashboard state with reactive signals
#[derive(Debug, Clone, Copy)]
pub struct DashboardState {
    /// Active dataset resolution
    pub granularity: RwSignal<Granularity>,
    /// Active overview chart
    pub chart_view: RwSignal<ChartView>,
    /// Bucket under the pointer in the visible chart
    pub hovered: RwSignal<Option<HoveredBucket>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            granularity: RwSignal::new(Granularity::default()),
            chart_view: RwSignal::new(ChartView::default()),
            hovered: RwSignal::new(None),
        }
    }

    /// Switches granularity; the hovered bucket belongs to the old dataset
    pub fn set_granularity(&self, granularity: Granularity) {
        if self.granularity.get_untracked() == granularity {
            return;
        }

        tracing::debug!("Granularity -> {}", granularity);
        self.hovered.set(None);
        self.granularity.set(granularity);
    }

    /// Parses a selector value, ignoring unknown ones
    pub fn select_granularity(&self, value: &str) {
        match value.parse::<Granularity>() {
            Ok(granularity) => self.set_granularity(granularity),
            Err(e) => tracing::warn!("{}", e),
        }
    }

    pub fn set_chart_view(&self, view: ChartView) {
        if self.chart_view.get_untracked() == view {
            return;
        }

        tracing::debug!("Chart view -> {}", view.as_str());
        self.hovered.set(None);
        self.chart_view.set(view);
    }

    pub fn select_chart_view(&self, value: &str) {
        match value.parse::<ChartView>() {
            Ok(view) => self.set_chart_view(view),
            Err(e) => tracing::warn!("{}", e),
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide dashboard state context to component tree
pub fn provide_dashboard_state() -> DashboardState {
    let state = DashboardState::new();
    provide_context(state);
    state
}

/// Use dashboard state from context
pub fn use_dashboard_state() -> DashboardState {
    expect_context::<DashboardState>()
}

/// Try to get dashboard state from context (returns None if not provided)
pub fn try_use_dashboard_state() -> Option<DashboardState> {
    use_context::<DashboardState>()
}
