//! Line chart with a gradient-filled area
//!
//! The stroke is drawn on through its dash offset, the area fades in with the
//! global progress and each point pops in left-to-right.

use crate::{
    ChartPadding, Geometry,
    animation::{DEFAULT_DURATION_MS, Stagger},
    chart::{ChartVariant, RenderContext},
    chartkit::{area_path, line_path, map_index, map_magnitude, max_single, polyline_length},
    colors,
    hover::{HoverState, NearestPoint, TooltipConfig},
    scene::{
        LinearGradient, Paint, Shape, Stroke, TextAnchor, TooltipOverlay, TooltipRow, value_axis,
    },
    view::chart_view,
};
use egg_core::{
    CountFormatter, Granularity, GroupedCountFormatter, HoveredBucket, ResolvedBucket, SeriesSet,
    StaticDatasetProvider,
};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Line/area chart configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAreaConfig {
    pub padding: ChartPadding,
    pub tooltip: TooltipConfig,
    pub duration_ms: f64,
    pub stagger: Stagger,
    pub stroke_width: f64,
    pub point_radius: f64,
    pub line_color: String,
    pub point_color: String,
    pub fill_top_opacity: f64,
    pub fill_bottom_opacity: f64,
    /// Unit appended to tooltip values
    pub value_suffix: String,
    /// Must be unique per page when several line charts coexist
    pub gradient_id: String,
    pub show_value_axis: bool,
    pub axis_ticks: usize,
}

impl Default for LineAreaConfig {
    fn default() -> Self {
        Self {
            padding: ChartPadding::line_area(),
            tooltip: TooltipConfig::line_area(),
            duration_ms: DEFAULT_DURATION_MS,
            stagger: Stagger::new(1.5, 0.0),
            stroke_width: 3.0,
            point_radius: 4.0,
            line_color: colors::LINE.to_string(),
            point_color: colors::POINT.to_string(),
            fill_top_opacity: 0.1,
            fill_bottom_opacity: 0.01,
            value_suffix: "defects".to_string(),
            gradient_id: "defect-line-gradient".to_string(),
            show_value_axis: false,
            axis_ticks: 5,
        }
    }
}

/// Line/area variant over the first series of the set
#[derive(Debug, Clone, Default)]
pub struct LineArea {
    pub config: LineAreaConfig,
}

impl LineArea {
    pub fn new(config: LineAreaConfig) -> Self {
        Self { config }
    }

    /// Scale-mapped point per bucket, in bucket order
    pub fn points(&self, ctx: &RenderContext<'_>) -> Vec<(f64, f64)> {
        let count = ctx.buckets.len();
        ctx.buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| {
                (
                    map_index(i, count, ctx.geometry, None),
                    map_magnitude(bucket.value(0), ctx.max_magnitude, ctx.geometry),
                )
            })
            .collect()
    }
}

impl ChartVariant for LineArea {
    type Hit = NearestPoint;

    fn padding(&self) -> ChartPadding {
        self.config.padding
    }

    fn tooltip(&self) -> TooltipConfig {
        self.config.tooltip
    }

    fn duration_ms(&self) -> f64 {
        self.config.duration_ms
    }

    fn max_magnitude(&self, buckets: &[ResolvedBucket]) -> f64 {
        max_single(buckets)
    }

    fn hit_test(&self, _geometry: &Geometry, _count: usize) -> NearestPoint {
        NearestPoint
    }

    fn compose(&self, ctx: &RenderContext<'_>) -> Vec<Shape> {
        let cfg = &self.config;
        let geo = ctx.geometry;
        let points = self.points(ctx);
        let span = cfg.stagger.span(points.len(), 1);

        let mut shapes = if cfg.show_value_axis {
            value_axis(geo, ctx.max_magnitude, cfg.axis_ticks)
        } else {
            Vec::new()
        };

        shapes.push(Shape::Path {
            d: area_path(&points, geo.plot_height),
            fill: Paint::Gradient(cfg.gradient_id.clone()),
            stroke: None,
            opacity: ctx.progress,
        });

        let length = polyline_length(&points);
        shapes.push(Shape::Path {
            d: line_path(&points),
            fill: Paint::None,
            stroke: Some(
                Stroke::solid(&cfg.line_color, cfg.stroke_width)
                    .reveal(length, length * (1.0 - ctx.progress)),
            ),
            opacity: 1.0,
        });

        for (i, (&(x, y), bucket)) in points.iter().zip(ctx.buckets).enumerate() {
            let reveal = cfg
                .stagger
                .progress(ctx.progress, span, cfg.stagger.offset(i, 0));

            if reveal > 0.0 {
                shapes.push(Shape::Circle {
                    cx: x,
                    cy: y,
                    r: cfg.point_radius * reveal,
                    fill: cfg.point_color.clone(),
                    opacity: reveal,
                });
            }

            shapes.push(Shape::Text {
                x,
                y: geo.plot_height + 20.0,
                text: bucket.label.clone(),
                anchor: TextAnchor::Middle,
                fill: colors::TEXT_MUTED.to_string(),
                font_size: 12.0,
                opacity: reveal,
            });
        }

        shapes
    }

    fn gradients(&self) -> Vec<LinearGradient> {
        vec![LinearGradient {
            id: self.config.gradient_id.clone(),
            color: self.config.line_color.clone(),
            top_opacity: self.config.fill_top_opacity,
            bottom_opacity: self.config.fill_bottom_opacity,
        }]
    }

    fn tooltip_overlay(
        &self,
        _ctx: &RenderContext<'_>,
        hover: &HoverState,
        bucket: &ResolvedBucket,
    ) -> TooltipOverlay {
        let value = bucket.value(0);

        TooltipOverlay {
            left: hover.tooltip_left,
            top: hover.tooltip_top,
            width: self.config.tooltip.width,
            title: bucket.label.clone(),
            rows: vec![TooltipRow {
                swatch: None,
                label: None,
                value,
                text: format!(
                    "{} {}",
                    GroupedCountFormatter.format(value),
                    self.config.value_suffix
                ),
            }],
        }
    }
}

/// Total defects line chart component
#[component]
pub fn LineAreaChart(
    #[prop(into)] granularity: Signal<Granularity>,
    #[prop(optional)] config: Option<LineAreaConfig>,
    #[prop(optional)] series: Option<SeriesSet>,
    #[prop(optional)] provider: Option<StaticDatasetProvider>,
    #[prop(optional)] hovered: Option<RwSignal<Option<HoveredBucket>>>,
) -> impl IntoView {
    let variant = LineArea::new(config.unwrap_or_default());
    let series = series.unwrap_or_else(SeriesSet::defect_totals);
    let provider = provider.unwrap_or_else(StaticDatasetProvider::defect_totals);

    chart_view(
        variant,
        series,
        Rc::new(provider),
        granularity,
        hovered,
        "line-area-chart",
    )
}
