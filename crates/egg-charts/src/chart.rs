//! Per-instance chart state
//!
//! [`ChartState`] owns everything one chart needs between events: geometry,
//! the resolved dataset, animation progress and hover. Every event maps to one
//! named update method; [`ChartState::render`] is a pure read.

use crate::{
    ChartPadding, ContainerSize, Geometry,
    animation::{AnimationDriver, AnimationPhase, DEFAULT_DURATION_MS},
    colors,
    hover::{HitTest, HoverController, HoverState, PointerPosition, TooltipConfig},
    scene::{LinearGradient, Scene, Shape, TooltipOverlay},
};
use egg_core::{DataError, Dataset, Granularity, HoveredBucket, ResolvedBucket, SeriesSet};
use std::sync::Arc;

// ============================================================================
// STRATEGY PATTERN: Chart Variant
// ============================================================================

/// Everything a variant needs to compose one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub geometry: &'a Geometry,
    pub series: &'a SeriesSet,
    pub buckets: &'a [ResolvedBucket],
    pub max_magnitude: f64,
    /// Global reveal progress in `[0, 1]`
    pub progress: f64,
}

/// Strategy trait for the chart shapes (stacked bar, line/area)
pub trait ChartVariant: 'static {
    type Hit: HitTest;

    fn padding(&self) -> ChartPadding;

    fn max_plot_width(&self) -> Option<f64> {
        None
    }

    fn tooltip(&self) -> TooltipConfig;

    fn duration_ms(&self) -> f64 {
        DEFAULT_DURATION_MS
    }

    /// Scale denominator for a dataset
    fn max_magnitude(&self, buckets: &[ResolvedBucket]) -> f64;

    fn hit_test(&self, geometry: &Geometry, count: usize) -> Self::Hit;

    fn compose(&self, ctx: &RenderContext<'_>) -> Vec<Shape>;

    fn gradients(&self) -> Vec<LinearGradient> {
        Vec::new()
    }

    fn tooltip_overlay(
        &self,
        ctx: &RenderContext<'_>,
        hover: &HoverState,
        bucket: &ResolvedBucket,
    ) -> TooltipOverlay;
}

// ============================================================================
// CHART STATE
// ============================================================================

pub struct ChartState<V: ChartVariant> {
    variant: V,
    series: SeriesSet,
    granularity: Option<Granularity>,
    dataset: Option<Arc<Dataset>>,
    buckets: Vec<ResolvedBucket>,
    issues: Vec<DataError>,
    max_magnitude: f64,
    geometry: Geometry,
    animation: AnimationDriver,
    hover: HoverController,
}

impl<V: ChartVariant> ChartState<V> {
    pub fn new(variant: V, series: SeriesSet) -> Self {
        let padding = variant.padding();
        let animation = AnimationDriver::new(variant.duration_ms());
        let hover = HoverController::new(variant.tooltip());

        Self {
            variant,
            series,
            granularity: None,
            dataset: None,
            buckets: Vec::new(),
            issues: Vec::new(),
            max_magnitude: 0.0,
            geometry: Geometry::zero(padding),
            animation,
            hover,
        }
    }

    pub fn variant(&self) -> &V {
        &self.variant
    }

    pub fn series(&self) -> &SeriesSet {
        &self.series
    }

    pub fn granularity(&self) -> Option<Granularity> {
        self.granularity
    }

    pub fn dataset(&self) -> Option<&Arc<Dataset>> {
        self.dataset.as_ref()
    }

    pub fn buckets(&self) -> &[ResolvedBucket] {
        &self.buckets
    }

    /// Data problems found when the current dataset was bound
    pub fn issues(&self) -> &[DataError] {
        &self.issues
    }

    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn animation(&self) -> &AnimationDriver {
        &self.animation
    }

    pub fn progress(&self) -> f64 {
        self.animation.progress()
    }

    pub fn hover(&self) -> Option<&HoverState> {
        self.hover.state()
    }

    /// Recomputes geometry from a fresh container measurement.
    ///
    /// Hover is dropped since its anchor was computed for the old size.
    pub fn set_geometry(&mut self, container: ContainerSize) {
        self.geometry = Geometry::from_container(
            container,
            self.variant.padding(),
            self.variant.max_plot_width(),
        );

        if !self.geometry.is_drawable() {
            tracing::debug!(
                "Container {}x{} leaves no room to draw",
                container.width,
                container.height
            );
        }

        self.hover.clear();
    }

    /// Binds a dataset, returning false when it is the one already bound.
    ///
    /// A new dataset resets the reveal animation to 0 and recomputes the scale
    /// maximum from this dataset alone.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>, now: f64) -> bool {
        if self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset))
        {
            return false;
        }

        let mut issues = Vec::new();
        let buckets: Vec<ResolvedBucket> = dataset
            .buckets
            .iter()
            .map(|bucket| bucket.resolve(&self.series, &mut issues))
            .collect();

        for issue in &issues {
            tracing::warn!("{} dataset: {}", dataset.granularity, issue);
        }

        self.max_magnitude = self.variant.max_magnitude(&buckets);
        self.granularity = Some(dataset.granularity);
        self.buckets = buckets;
        self.issues = issues;
        self.dataset = Some(dataset);
        self.hover.clear();
        self.animation.restart(now);

        tracing::debug!(
            "Bound {} buckets, max magnitude {}",
            self.buckets.len(),
            self.max_magnitude
        );

        true
    }

    /// Restarts the reveal if a dataset is bound
    pub fn restart_animation(&mut self, now: f64) {
        if self.dataset.is_some() {
            self.animation.restart(now);
        }
    }

    pub fn advance_animation(&mut self, now: f64) -> AnimationPhase {
        self.animation.advance(now)
    }

    pub fn set_hover(&mut self, pointer: PointerPosition) -> Option<HoverState> {
        let count = self.buckets.len();
        let hit = self.variant.hit_test(&self.geometry, count);
        self.hover
            .pointer_move(pointer, &self.geometry, count, &hit)
            .copied()
    }

    pub fn clear_hover(&mut self) {
        self.hover.pointer_leave();
    }

    /// Stops the animation and drops hover; the last frame stays renderable
    pub fn teardown(&mut self) {
        self.animation.stop();
        self.hover.clear();
    }

    /// Summary of the hovered bucket for external legends
    pub fn hovered_bucket(&self) -> Option<HoveredBucket> {
        let index = self.hover.state()?.bucket_index;
        self.buckets
            .get(index)
            .map(|bucket| bucket.summarize(index, &self.series))
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext {
            geometry: &self.geometry,
            series: &self.series,
            buckets: &self.buckets,
            max_magnitude: self.max_magnitude,
            progress: self.animation.progress(),
        }
    }

    pub fn render(&self) -> Scene {
        if !self.geometry.is_drawable() || self.buckets.is_empty() {
            return Scene::empty(self.geometry);
        }

        let ctx = self.context();
        let tooltip = self.hover.state().and_then(|hover| {
            self.buckets
                .get(hover.bucket_index)
                .map(|bucket| self.variant.tooltip_overlay(&ctx, hover, bucket))
        });

        Scene {
            geometry: self.geometry,
            background: Some(colors::BG_PANEL.to_string()),
            gradients: self.variant.gradients(),
            shapes: self.variant.compose(&ctx),
            tooltip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stacked_bar::StackedBar;
    use egg_core::{DatasetProvider, StaticDatasetProvider};

    fn state() -> ChartState<StackedBar> {
        let mut state = ChartState::new(StackedBar::default(), SeriesSet::egg_defects());
        state.set_geometry(ContainerSize::new(640.0, 300.0));
        state
    }

    #[test]
    fn test_animation_idle_without_dataset() {
        let mut state = state();
        state.restart_animation(0.0);

        assert_eq!(state.animation().phase(), AnimationPhase::Idle);
        assert!(state.render().is_empty());
    }

    #[test]
    fn test_rebinding_same_dataset_is_noop() {
        let provider = StaticDatasetProvider::egg_defects();
        let mut state = state();

        assert!(state.set_dataset(provider.dataset(Granularity::Daily), 0.0));
        state.advance_animation(300.0);
        assert!(!state.set_dataset(provider.dataset(Granularity::Daily), 300.0));

        assert_eq!(state.animation().run(), 1);
        assert!(state.progress() > 0.0);
    }

    #[test]
    fn test_geometry_change_clears_hover() {
        let mut state = state();
        state.set_dataset(
            StaticDatasetProvider::egg_defects().dataset(Granularity::Daily),
            0.0,
        );
        assert!(state.set_hover(PointerPosition::new(60.0, 150.0)).is_some());

        state.set_geometry(ContainerSize::new(800.0, 300.0));
        assert!(state.hover().is_none());
        assert!(state.hovered_bucket().is_none());
    }

    #[test]
    fn test_teardown_stops_and_keeps_last_frame() {
        let mut state = state();
        state.set_dataset(
            StaticDatasetProvider::egg_defects().dataset(Granularity::Daily),
            0.0,
        );
        state.advance_animation(1500.0);
        state.set_hover(PointerPosition::new(60.0, 150.0));

        state.teardown();
        assert_eq!(state.animation().phase(), AnimationPhase::Idle);
        assert!(state.hover().is_none());
        assert!(!state.render().is_empty());
    }

    #[test]
    fn test_empty_dataset_draws_nothing() {
        let mut state = state();
        state.set_dataset(Arc::new(Dataset::empty(Granularity::Monthly)), 0.0);

        assert_eq!(state.max_magnitude(), 0.0);
        assert!(state.render().is_empty());
        assert!(state.set_hover(PointerPosition::new(60.0, 150.0)).is_none());
    }
}
