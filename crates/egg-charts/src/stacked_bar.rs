//! Stacked bar chart: one column per bucket, one segment per series
//!
//! Segments grow up from the baseline column by column, bottom layer first;
//! the category label under each column fades and slides in after its last
//! segment.

use crate::{
    ChartPadding, Geometry,
    animation::{DEFAULT_DURATION_MS, Stagger},
    chart::{ChartVariant, RenderContext},
    chartkit::{bar_width, map_index, max_aggregate},
    colors,
    hover::{ColumnGroup, HoverState, TooltipConfig},
    scene::{Shape, TextAnchor, TooltipOverlay, TooltipRow, value_axis},
    stack::StackAccumulator,
    view::chart_view,
};
use egg_core::{
    CountFormatter, Granularity, GroupedCountFormatter, HoveredBucket, ResolvedBucket, SeriesSet,
    StaticDatasetProvider,
};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Stacked bar chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackedBarConfig {
    pub padding: ChartPadding,
    pub max_plot_width: Option<f64>,
    /// Share of each bucket slot taken by its column
    pub bar_width_ratio: f64,
    pub max_bar_width: f64,
    /// Extra height drawn above and below each segment to hide seams
    pub seam_overlap: f64,
    pub tooltip: TooltipConfig,
    pub duration_ms: f64,
    pub stagger: Stagger,
    /// Distance category labels slide up while revealing
    pub label_slide: f64,
    pub show_value_axis: bool,
    pub axis_ticks: usize,
}

impl Default for StackedBarConfig {
    fn default() -> Self {
        Self {
            padding: ChartPadding::stacked_bar(),
            max_plot_width: Some(600.0),
            bar_width_ratio: 0.6,
            max_bar_width: 40.0,
            seam_overlap: 0.5,
            tooltip: TooltipConfig::stacked_bar(),
            duration_ms: DEFAULT_DURATION_MS,
            stagger: Stagger::default(),
            label_slide: 10.0,
            show_value_axis: true,
            axis_ticks: 5,
        }
    }
}

impl StackedBarConfig {
    /// Bars only, no value axis
    pub fn minimal() -> Self {
        Self {
            show_value_axis: false,
            ..Self::default()
        }
    }
}

/// Stacked bar variant
#[derive(Debug, Clone, Default)]
pub struct StackedBar {
    pub config: StackedBarConfig,
}

impl StackedBar {
    pub fn new(config: StackedBarConfig) -> Self {
        Self { config }
    }

    pub fn bar_width(&self, geometry: &Geometry, count: usize) -> f64 {
        bar_width(
            geometry.plot_width,
            count,
            self.config.bar_width_ratio,
            self.config.max_bar_width,
        )
    }
}

impl ChartVariant for StackedBar {
    type Hit = ColumnGroup;

    fn padding(&self) -> ChartPadding {
        self.config.padding
    }

    fn max_plot_width(&self) -> Option<f64> {
        self.config.max_plot_width
    }

    fn tooltip(&self) -> TooltipConfig {
        self.config.tooltip
    }

    fn duration_ms(&self) -> f64 {
        self.config.duration_ms
    }

    fn max_magnitude(&self, buckets: &[ResolvedBucket]) -> f64 {
        max_aggregate(buckets)
    }

    fn hit_test(&self, geometry: &Geometry, count: usize) -> ColumnGroup {
        ColumnGroup {
            bar_width: self.bar_width(geometry, count),
        }
    }

    fn compose(&self, ctx: &RenderContext<'_>) -> Vec<Shape> {
        let cfg = &self.config;
        let geo = ctx.geometry;
        let count = ctx.buckets.len();
        let layers = ctx.series.len();
        let width = self.bar_width(geo, count);
        let baseline = geo.plot_height;

        // Labels reveal as one more layer on top of each column
        let span = cfg.stagger.span(count, layers + 1);
        let stack = StackAccumulator::new(geo, ctx.max_magnitude);

        let mut shapes = if cfg.show_value_axis {
            value_axis(geo, ctx.max_magnitude, cfg.axis_ticks)
        } else {
            Vec::new()
        };

        for (i, bucket) in ctx.buckets.iter().enumerate() {
            let x = map_index(i, count, geo, Some(width));

            for segment in stack.stack(bucket) {
                let reveal = cfg.stagger.progress(
                    ctx.progress,
                    span,
                    cfg.stagger.offset(i, segment.layer),
                );
                let height = segment.height * reveal;
                let Some(series) = ctx.series.get(segment.layer) else {
                    continue;
                };
                if height <= 0.0 {
                    continue;
                }

                // Scaled about the baseline
                let top = baseline - (baseline - segment.top) * reveal;
                shapes.push(Shape::Rect {
                    x,
                    y: top - cfg.seam_overlap,
                    width,
                    height: height + 2.0 * cfg.seam_overlap,
                    fill: series.color.clone(),
                    opacity: 1.0,
                });
            }

            let label = cfg
                .stagger
                .progress(ctx.progress, span, cfg.stagger.offset(i, layers));
            shapes.push(Shape::Text {
                x: x + width / 2.0,
                y: baseline + 20.0 + cfg.label_slide * (1.0 - label),
                text: bucket.label.clone(),
                anchor: TextAnchor::Middle,
                fill: colors::LABEL.to_string(),
                font_size: 12.0,
                opacity: label,
            });
        }

        shapes
    }

    fn tooltip_overlay(
        &self,
        ctx: &RenderContext<'_>,
        hover: &HoverState,
        bucket: &ResolvedBucket,
    ) -> TooltipOverlay {
        let formatter = GroupedCountFormatter;

        TooltipOverlay {
            left: hover.tooltip_left,
            top: hover.tooltip_top,
            width: self.config.tooltip.width,
            title: bucket.label.clone(),
            rows: ctx
                .series
                .legend_order()
                .map(|(i, series)| {
                    let value = bucket.value(i);
                    TooltipRow {
                        swatch: Some(series.color.clone()),
                        label: Some(series.label.clone()),
                        value,
                        text: formatter.format(value),
                    }
                })
                .collect(),
        }
    }
}

/// Stacked bar chart component.
///
/// Defaults to the five egg defect categories over the built-in datasets.
#[component]
pub fn StackedBarChart(
    #[prop(into)] granularity: Signal<Granularity>,
    #[prop(optional)] config: Option<StackedBarConfig>,
    #[prop(optional)] series: Option<SeriesSet>,
    #[prop(optional)] provider: Option<StaticDatasetProvider>,
    #[prop(optional)] hovered: Option<RwSignal<Option<HoveredBucket>>>,
) -> impl IntoView {
    let variant = StackedBar::new(config.unwrap_or_default());
    let series = series.unwrap_or_else(SeriesSet::egg_defects);
    let provider = provider.unwrap_or_else(StaticDatasetProvider::egg_defects);

    chart_view(
        variant,
        series,
        Rc::new(provider),
        granularity,
        hovered,
        "stacked-bar-chart",
    )
}
