//! # egg-charts
//!
//! Animated SVG charting engine for the egg inspection dashboard, built with Leptos.
//! Turns small pre-aggregated time-series datasets into stacked-bar and
//! line/area charts with pointer-driven tooltips.
//!
//! ## Architecture
//!
//! Uses Strategy pattern for:
//! - Scale computation (linear magnitude scale)
//! - Path generation (line, area)
//! - Hit testing (nearest point, column group)
//! - Chart variants (stacked bar, line/area)
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, scale mapping, paths
//! - `stack` - Cumulative segment offsets for stacked columns
//! - `animation` - Frame-driven reveal progress and per-element stagger
//! - `hover` - Pointer hit testing and tooltip anchoring
//! - `scene` - Drawable output produced by the renderer
//! - `chart` - Per-instance chart state and the variant strategy
//! - `runtime` - Wiring of chart state to frame, resize and measurement services
//! - `stacked_bar` / `line_area` - The two chart variants and their components

pub mod animation;
pub mod chart;
pub mod chartkit;
pub mod hover;
pub mod line_area;
pub mod runtime;
pub mod scene;
pub mod services;
pub mod stack;
pub mod stacked_bar;
pub mod view;
pub mod web;

pub use animation::*;
pub use chart::*;
pub use chartkit::*;
pub use hover::*;
pub use line_area::*;
pub use runtime::*;
pub use scene::*;
pub use services::*;
pub use stack::*;
pub use stacked_bar::*;

// Re-export colors from egg-core for convenience
pub use egg_core::colors;

use serde::{Deserialize, Serialize};

/// Chart padding configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPadding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartPadding {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    /// Stacked bar layout (room for value axis labels on the left)
    pub const fn stacked_bar() -> Self {
        Self::new(20.0, 40.0, 30.0, 40.0)
    }

    /// Line/area layout
    pub const fn line_area() -> Self {
        Self::new(20.0, 20.0, 30.0, 20.0)
    }
}

impl Default for ChartPadding {
    fn default() -> Self {
        Self::stacked_bar()
    }
}

/// Measured size of the chart's host container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// False for hidden or not-yet-laid-out containers
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Padding-adjusted plotting rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub container: ContainerSize,
    pub plot_width: f64,
    pub plot_height: f64,
    pub padding: ChartPadding,
}

impl Geometry {
    /// Zero-area geometry: nothing to draw
    pub fn zero(padding: ChartPadding) -> Self {
        Self {
            container: ContainerSize::default(),
            plot_width: 0.0,
            plot_height: 0.0,
            padding,
        }
    }

    /// Derives the plotting rectangle from a container measurement.
    ///
    /// Unmeasured containers yield [`Geometry::zero`]; containers smaller than the
    /// padding yield a non-positive plot size. Both are "nothing to draw".
    pub fn from_container(
        container: ContainerSize,
        padding: ChartPadding,
        max_plot_width: Option<f64>,
    ) -> Self {
        if !container.is_measured() {
            return Self::zero(padding);
        }

        let mut plot_width = container.width - padding.left - padding.right;
        if let Some(max) = max_plot_width {
            plot_width = plot_width.min(max);
        }

        Self {
            container,
            plot_width,
            plot_height: container.height - padding.top - padding.bottom,
            padding,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.plot_width > 0.0 && self.plot_height > 0.0
    }

    /// Container coordinates to plot-local coordinates
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.padding.left, y - self.padding.top)
    }

    /// SVG transform for the plotting area
    pub fn inner_transform(&self) -> String {
        format!("translate({}, {})", self.padding.left, self.padding.top)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.container.width, self.container.height)
    }
}
