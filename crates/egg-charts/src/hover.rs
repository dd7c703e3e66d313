//! Pointer tracking, bucket hit testing and tooltip anchoring

use crate::{Geometry, chartkit::map_index};
use serde::{Deserialize, Serialize};

/// Tooltip box size and distance kept from the pointer and container edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl TooltipConfig {
    pub const fn stacked_bar() -> Self {
        Self {
            width: 150.0,
            height: 150.0,
            margin: 10.0,
        }
    }

    pub const fn line_area() -> Self {
        Self {
            width: 120.0,
            height: 60.0,
            margin: 10.0,
        }
    }
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self::stacked_bar()
    }
}

/// Pointer position relative to the chart container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Tooltip placement in container coordinates.
///
/// `left` is the horizontal centre of the tooltip, `top` its upper edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipAnchor {
    pub left: f64,
    pub top: f64,
    /// True when the tooltip sits below the pointer
    pub flipped: bool,
}

/// Places the tooltip above the pointer, flipping below it when there is no room,
/// and clamps it horizontally inside the container.
pub fn tooltip_anchor(
    pointer: PointerPosition,
    container_width: f64,
    tooltip: &TooltipConfig,
) -> TooltipAnchor {
    let half = tooltip.width / 2.0;
    let min_left = half + tooltip.margin;
    let max_left = container_width - half - tooltip.margin;

    let left = if min_left <= max_left {
        pointer.x.clamp(min_left, max_left)
    } else {
        // Container narrower than the tooltip
        (container_width / 2.0).max(tooltip.margin)
    };

    let above = pointer.y - tooltip.height - tooltip.margin;
    let (top, flipped) = if above >= tooltip.margin {
        (above, false)
    } else {
        ((pointer.y + tooltip.margin).max(tooltip.margin), true)
    };

    TooltipAnchor { left, top, flipped }
}

// ============================================================================
// STRATEGY PATTERN: Hit Testing
// ============================================================================

/// Strategy trait resolving a plot-local X to a bucket index
pub trait HitTest: Send + Sync {
    fn resolve(&self, local_x: f64, count: usize, geometry: &Geometry) -> Option<usize>;
}

fn nearest(local_x: f64, count: usize, centre: impl Fn(usize) -> f64) -> Option<usize> {
    (0..count).min_by(|&a, &b| {
        let da = (centre(a) - local_x).abs();
        let db = (centre(b) - local_x).abs();
        da.total_cmp(&db)
    })
}

/// Nearest data point by X (line charts)
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestPoint;

impl HitTest for NearestPoint {
    fn resolve(&self, local_x: f64, count: usize, geometry: &Geometry) -> Option<usize> {
        nearest(local_x, count, |i| map_index(i, count, geometry, None))
    }
}

/// Nearest column group (stacked bar charts).
///
/// Resolves whole columns: any point over a column, whatever the segment, hits it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnGroup {
    pub bar_width: f64,
}

impl HitTest for ColumnGroup {
    fn resolve(&self, local_x: f64, count: usize, geometry: &Geometry) -> Option<usize> {
        let half = self.bar_width / 2.0;
        nearest(local_x, count, |i| {
            map_index(i, count, geometry, Some(self.bar_width)) + half
        })
    }
}

// ============================================================================
// HOVER CONTROLLER
// ============================================================================

/// Hover snapshot, replaced wholesale on every pointer move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    pub pointer_x: f64,
    pub pointer_y: f64,
    pub bucket_index: usize,
    pub tooltip_left: f64,
    pub tooltip_top: f64,
}

#[derive(Debug, Clone, Default)]
pub struct HoverController {
    tooltip: TooltipConfig,
    state: Option<HoverState>,
}

impl HoverController {
    pub fn new(tooltip: TooltipConfig) -> Self {
        Self {
            tooltip,
            state: None,
        }
    }

    pub fn state(&self) -> Option<&HoverState> {
        self.state.as_ref()
    }

    /// Resolves the bucket under the pointer.
    ///
    /// Clears the hover when nothing is drawable or the pointer is outside the
    /// plot area (the category label row below the baseline counts as inside).
    pub fn pointer_move<H: HitTest + ?Sized>(
        &mut self,
        pointer: PointerPosition,
        geometry: &Geometry,
        count: usize,
        hit_test: &H,
    ) -> Option<&HoverState> {
        if !geometry.is_drawable() || count == 0 {
            self.state = None;
            return None;
        }

        let (local_x, local_y) = geometry.to_local(pointer.x, pointer.y);
        let inside_x = (0.0..=geometry.plot_width).contains(&local_x);
        let inside_y = (0.0..=geometry.plot_height + geometry.padding.bottom).contains(&local_y);
        if !inside_x || !inside_y {
            self.state = None;
            return None;
        }

        let Some(bucket_index) = hit_test.resolve(local_x, count, geometry) else {
            self.state = None;
            return None;
        };

        let anchor = tooltip_anchor(pointer, geometry.container.width, &self.tooltip);
        self.state = Some(HoverState {
            pointer_x: pointer.x,
            pointer_y: pointer.y,
            bucket_index,
            tooltip_left: anchor.left,
            tooltip_top: anchor.top,
        });

        self.state.as_ref()
    }

    pub fn pointer_leave(&mut self) {
        self.clear();
    }

    pub fn clear(&mut self) {
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChartPadding, ContainerSize, chartkit::bar_width};
    use proptest::prelude::*;

    fn bar_geometry() -> Geometry {
        Geometry::from_container(
            ContainerSize::new(640.0, 300.0),
            ChartPadding::stacked_bar(),
            Some(600.0),
        )
    }

    #[test]
    fn test_anchor_clamps_left_edge() {
        let anchor = tooltip_anchor(
            PointerPosition::new(5.0, 200.0),
            640.0,
            &TooltipConfig::stacked_bar(),
        );

        assert_eq!(anchor.left, 85.0);
        assert_eq!(anchor.top, 40.0);
        assert!(!anchor.flipped);
    }

    #[test]
    fn test_anchor_clamps_right_edge() {
        let anchor = tooltip_anchor(
            PointerPosition::new(635.0, 200.0),
            640.0,
            &TooltipConfig::stacked_bar(),
        );

        assert_eq!(anchor.left, 640.0 - 85.0);
    }

    #[test]
    fn test_anchor_flips_below_pointer() {
        let anchor = tooltip_anchor(
            PointerPosition::new(300.0, 60.0),
            640.0,
            &TooltipConfig::stacked_bar(),
        );

        assert!(anchor.flipped);
        assert_eq!(anchor.top, 70.0);
    }

    #[test]
    fn test_anchor_centres_in_narrow_container() {
        let anchor = tooltip_anchor(
            PointerPosition::new(10.0, 200.0),
            100.0,
            &TooltipConfig::stacked_bar(),
        );

        assert_eq!(anchor.left, 50.0);
    }

    #[test]
    fn test_column_group_resolves_whole_column() {
        let geo = bar_geometry();
        let width = bar_width(geo.plot_width, 7, 0.6, 40.0);
        let hit = ColumnGroup { bar_width: width };

        // Column 1 ("Tue") spans [x, x + width]
        let x = map_index(1, 7, &geo, Some(width));
        assert_eq!(hit.resolve(x + 1.0, 7, &geo), Some(1));
        assert_eq!(hit.resolve(x + width - 1.0, 7, &geo), Some(1));
        assert_eq!(hit.resolve(0.0, 7, &geo), Some(0));
        assert_eq!(hit.resolve(geo.plot_width, 7, &geo), Some(6));
        assert_eq!(hit.resolve(10.0, 0, &geo), None);
    }

    #[test]
    fn test_nearest_point() {
        let geo = Geometry::from_container(
            ContainerSize::new(400.0, 300.0),
            ChartPadding::line_area(),
            None,
        );

        // Points sit at 0, 60, 120, ..., 360
        assert_eq!(NearestPoint.resolve(25.0, 7, &geo), Some(0));
        assert_eq!(NearestPoint.resolve(35.0, 7, &geo), Some(1));
        assert_eq!(NearestPoint.resolve(359.0, 7, &geo), Some(6));
    }

    #[test]
    fn test_controller_resolves_and_clears() {
        let geo = bar_geometry();
        let hit = ColumnGroup { bar_width: 40.0 };
        let mut hover = HoverController::new(TooltipConfig::stacked_bar());

        let state = hover
            .pointer_move(PointerPosition::new(45.0, 150.0), &geo, 7, &hit)
            .copied()
            .unwrap();
        assert_eq!(state.bucket_index, 0);
        assert_eq!(state.tooltip_left, 85.0);

        // Below the category label row
        assert!(hover.pointer_move(PointerPosition::new(45.0, 299.0), &geo, 7, &hit).is_some());
        assert!(hover.pointer_move(PointerPosition::new(45.0, 5.0), &geo, 7, &hit).is_none());
        assert!(hover.state().is_none());

        hover.pointer_move(PointerPosition::new(45.0, 150.0), &geo, 7, &hit);
        hover.pointer_leave();
        assert!(hover.state().is_none());
    }

    #[test]
    fn test_controller_ignores_undrawable_geometry() {
        let geo = Geometry::zero(ChartPadding::stacked_bar());
        let mut hover = HoverController::new(TooltipConfig::stacked_bar());

        let pointer = PointerPosition::new(10.0, 10.0);
        assert!(hover.pointer_move(pointer, &geo, 7, &NearestPoint).is_none());

        let pointer = PointerPosition::new(45.0, 150.0);
        assert!(hover.pointer_move(pointer, &bar_geometry(), 0, &NearestPoint).is_none());
    }

    #[test]
    fn test_controller_clears_outside_plot_horizontally() {
        // Plot capped at 600 px: x in [40, 640] of a 1000 px container
        let geo = Geometry::from_container(
            ContainerSize::new(1000.0, 300.0),
            ChartPadding::stacked_bar(),
            Some(600.0),
        );
        let hit = ColumnGroup { bar_width: 40.0 };
        let mut hover = HoverController::new(TooltipConfig::stacked_bar());

        assert!(hover.pointer_move(PointerPosition::new(639.0, 150.0), &geo, 7, &hit).is_some());

        // Left padding
        assert!(hover.pointer_move(PointerPosition::new(10.0, 150.0), &geo, 7, &hit).is_none());
        assert!(hover.state().is_none());

        hover.pointer_move(PointerPosition::new(100.0, 150.0), &geo, 7, &hit);
        // Right of the capped plot
        assert!(hover.pointer_move(PointerPosition::new(700.0, 150.0), &geo, 7, &hit).is_none());
        assert!(hover.state().is_none());
    }

    proptest! {
        #[test]
        fn anchor_respects_bounds(
            x in -500.0f64..2500.0,
            y in -500.0f64..2500.0,
            container in 220.0f64..2000.0,
            width in 40.0f64..180.0,
            height in 20.0f64..200.0,
            margin in 0.0f64..20.0,
        ) {
            let tooltip = TooltipConfig { width, height, margin };
            let anchor = tooltip_anchor(PointerPosition::new(x, y), container, &tooltip);

            prop_assert!(anchor.left >= margin);
            prop_assert!(anchor.left <= container - margin);
            prop_assert!(anchor.left - width / 2.0 >= margin - 1e-9);
            prop_assert!(anchor.left + width / 2.0 <= container - margin + 1e-9);
            prop_assert!(anchor.top >= margin);
        }
    }
}
