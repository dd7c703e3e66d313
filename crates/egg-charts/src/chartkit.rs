//! # chartkit
//!
//! Core chart primitives: scales, index/magnitude mapping, path builders.
//! Implements Strategy pattern for flexible scale and path behaviors.

use crate::Geometry;
use egg_core::ResolvedBucket;
use std::fmt::Write;

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    /// Generate "nice" tick values (rounded to clean numbers)
    pub fn nice_ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.domain;
        let range = max - min;

        if range == 0.0 || count == 0 {
            return vec![min];
        }

        let rough_step = range / count as f64;
        let magnitude = 10.0_f64.powf(rough_step.log10().floor());
        let residual = rough_step / magnitude;

        let nice_step = if residual <= 1.0 {
            magnitude
        } else if residual <= 2.0 {
            2.0 * magnitude
        } else if residual <= 5.0 {
            5.0 * magnitude
        } else {
            10.0 * magnitude
        };

        let nice_min = (min / nice_step).floor() * nice_step;
        let nice_max = (max / nice_step).ceil() * nice_step;

        let mut ticks = Vec::new();
        let mut tick = nice_min;

        while tick <= nice_max + nice_step * 0.5 {
            if tick >= min && tick <= max {
                ticks.push(tick);
            }
            tick += nice_step;
        }

        ticks
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (value - d_min) / (d_max - d_min);
        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        d_min + normalized * (d_max - d_min)
    }
}

// ============================================================================
// SCALE MAPPER
// ============================================================================

/// X pixel of a bucket, evenly spaced across the plot width.
///
/// Bar charts pass their `bar_width` so the last bar stays inside the plot.
/// A single bucket is centred.
pub fn map_index(index: usize, count: usize, geometry: &Geometry, bar_width: Option<f64>) -> f64 {
    let span = geometry.plot_width - bar_width.unwrap_or(0.0);

    if count <= 1 {
        return span.max(0.0) / 2.0;
    }

    index as f64 / (count - 1) as f64 * span
}

/// Magnitude scale: `0 → plot_height` (baseline), `max_magnitude → 0` (top)
pub fn magnitude_scale(max_magnitude: f64, geometry: &Geometry) -> LinearScale {
    LinearScale::new()
        .domain(0.0, scale_denominator(max_magnitude))
        .range(geometry.plot_height, 0.0)
}

/// Y pixel of a magnitude
pub fn map_magnitude(value: f64, max_magnitude: f64, geometry: &Geometry) -> f64 {
    magnitude_scale(max_magnitude, geometry).scale(value)
}

/// Pixel height of a magnitude measured up from the baseline
pub fn magnitude_height(value: f64, max_magnitude: f64, geometry: &Geometry) -> f64 {
    geometry.plot_height - map_magnitude(value, max_magnitude, geometry)
}

/// Width of one bar: a `ratio` share of the per-bucket slot, capped at `max`
pub fn bar_width(plot_width: f64, count: usize, ratio: f64, max: f64) -> f64 {
    if count == 0 || plot_width <= 0.0 {
        return 0.0;
    }

    (plot_width / count as f64 * ratio).min(max).max(0.0)
}

/// Largest bucket total (stacked charts)
pub fn max_aggregate(buckets: &[ResolvedBucket]) -> f64 {
    buckets.iter().map(ResolvedBucket::total).fold(0.0_f64, f64::max)
}

/// Largest single value (line charts)
pub fn max_single(buckets: &[ResolvedBucket]) -> f64 {
    buckets.iter().map(ResolvedBucket::max_value).fold(0.0_f64, f64::max)
}

/// Strictly positive scale denominator; degenerate maxima fall back to 1
pub fn scale_denominator(max_magnitude: f64) -> f64 {
    if max_magnitude.is_finite() && max_magnitude > 0.0 {
        max_magnitude
    } else {
        1.0
    }
}

// ============================================================================
// STRATEGY PATTERN: Path Generator Trait
// ============================================================================

/// Strategy trait for path generation
pub trait PathGenerator: Send + Sync {
    fn generate(&self, points: &[(f64, f64)]) -> String;
}

/// Line path generator
#[derive(Debug, Clone, Default)]
pub struct LinePath;

impl PathGenerator for LinePath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let Some((&(x, y), rest)) = points.split_first() else {
            return String::new();
        };

        let mut builder = PathBuilder::new().move_to(x, y);
        for &(x, y) in rest {
            builder = builder.line_to(x, y);
        }

        builder.build()
    }
}

/// Closed area generator anchored to a horizontal baseline
#[derive(Debug, Clone)]
pub struct AreaPath {
    pub baseline: f64,
}

impl PathGenerator for AreaPath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let (Some(&(first_x, _)), Some(&(last_x, _))) = (points.first(), points.last()) else {
            return String::new();
        };

        PathBuilder::from(LinePath.generate(points))
            .line_to(last_x, self.baseline)
            .line_to(first_x, self.baseline)
            .close()
            .build()
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

/// Continue an existing path
impl From<String> for PathBuilder {
    fn from(commands: String) -> Self {
        Self { commands }
    }
}

/// Stroke path through the points, in order
pub fn line_path(points: &[(f64, f64)]) -> String {
    LinePath.generate(points)
}

/// Stroke path closed down to `baseline` at the last X and back to the first X
pub fn area_path(points: &[(f64, f64)], baseline: f64) -> String {
    AreaPath { baseline }.generate(points)
}

/// Total length of the polyline through the points
pub fn polyline_length(points: &[(f64, f64)]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].0 - w[0].0).hypot(w[1].1 - w[0].1))
        .sum()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChartPadding, ContainerSize};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn geometry(width: f64, height: f64) -> Geometry {
        Geometry::from_container(
            ContainerSize::new(width, height),
            ChartPadding::line_area(),
            None,
        )
    }

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);

        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(50.0), 250.0);
        assert_eq!(scale.scale(100.0), 500.0);
        assert_eq!(scale.invert(250.0), 50.0);
    }

    #[test]
    fn test_nice_ticks() {
        let scale = LinearScale::new().domain(0.0, 825.0).range(250.0, 0.0);
        assert_eq!(scale.nice_ticks(5), vec![0.0, 200.0, 400.0, 600.0, 800.0]);
        assert_eq!(scale.nice_ticks(4), vec![0.0, 500.0]);
    }

    #[test]
    fn test_map_magnitude_endpoints() {
        let geo = geometry(400.0, 300.0);

        assert_eq!(map_magnitude(0.0, 750.0, &geo), geo.plot_height);
        assert_eq!(map_magnitude(750.0, 750.0, &geo), 0.0);
        assert_relative_eq!(magnitude_height(375.0, 750.0, &geo), geo.plot_height / 2.0);
    }

    #[test]
    fn test_map_index_spacing() {
        let geo = geometry(400.0, 300.0);

        assert_eq!(map_index(0, 7, &geo, None), 0.0);
        assert_eq!(map_index(6, 7, &geo, None), 360.0);
        assert_eq!(map_index(6, 7, &geo, Some(40.0)), 320.0);
        assert_eq!(map_index(0, 1, &geo, None), 180.0);
    }

    #[test]
    fn test_bar_width() {
        assert_relative_eq!(bar_width(560.0, 7, 0.6, 40.0), 40.0);
        assert_relative_eq!(bar_width(210.0, 7, 0.6, 40.0), 18.0);
        assert_eq!(bar_width(210.0, 0, 0.6, 40.0), 0.0);
    }

    #[test]
    fn test_scale_denominator_fallback() {
        assert_eq!(scale_denominator(0.0), 1.0);
        assert_eq!(scale_denominator(f64::NAN), 1.0);
        assert_eq!(scale_denominator(42.0), 42.0);

        let geo = geometry(400.0, 300.0);
        assert_eq!(map_magnitude(0.0, 0.0, &geo), geo.plot_height);
    }

    #[test]
    fn test_max_aggregate_and_single() {
        let buckets = vec![
            ResolvedBucket { label: "a".into(), values: vec![1.0, 5.0] },
            ResolvedBucket { label: "b".into(), values: vec![4.0, 4.0] },
        ];

        assert_eq!(max_aggregate(&buckets), 8.0);
        assert_eq!(max_single(&buckets), 5.0);
        assert_eq!(max_aggregate(&[]), 0.0);
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .close()
            .build();

        assert_eq!(path, "M0.00,0.00L100.00,100.00Z");
    }

    #[test]
    fn test_line_and_area_paths() {
        let points = [(0.0, 10.0), (50.0, 0.0), (100.0, 20.0)];

        let line = line_path(&points);
        assert_eq!(line, "M0.00,10.00L50.00,0.00L100.00,20.00");

        let area = area_path(&points, 200.0);
        assert_eq!(area, format!("{}L100.00,200.00L0.00,200.00Z", line));

        assert_eq!(line_path(&[]), "");
        assert_eq!(area_path(&[], 200.0), "");
    }

    #[test]
    fn test_polyline_length() {
        assert_relative_eq!(polyline_length(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]), 11.0);
        assert_eq!(polyline_length(&[(1.0, 1.0)]), 0.0);
    }

    proptest! {
        #[test]
        fn relative_position_survives_resize(
            width in 100.0f64..2000.0,
            height in 100.0f64..1000.0,
            max in 1.0f64..100_000.0,
        ) {
            let geo = geometry(width, height);
            let mid = map_magnitude(max / 2.0, max, &geo);
            prop_assert!((mid / geo.plot_height - 0.5).abs() < 1e-9);
        }
    }
}
