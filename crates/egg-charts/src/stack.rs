//! Stack accumulation for stacked columns
//!
//! Walks a bucket's values bottom-to-top in series order, keeping a running
//! pixel height so the top of the last segment lands on the scaled bucket total.

use crate::{
    Geometry,
    chartkit::{magnitude_height, map_magnitude},
};
use egg_core::ResolvedBucket;

/// One segment of a stacked column, in plot-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackSegment {
    /// Index into the series set (0 = bottom layer)
    pub layer: usize,
    pub value: f64,
    pub top: f64,
    pub height: f64,
}

impl StackSegment {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Converts bucket values into cumulative segment offsets
#[derive(Debug, Clone, Copy)]
pub struct StackAccumulator<'a> {
    geometry: &'a Geometry,
    max_magnitude: f64,
}

impl<'a> StackAccumulator<'a> {
    pub fn new(geometry: &'a Geometry, max_magnitude: f64) -> Self {
        Self {
            geometry,
            max_magnitude,
        }
    }

    pub fn stack(&self, bucket: &ResolvedBucket) -> Vec<StackSegment> {
        let mut accumulated = 0.0;

        bucket
            .values
            .iter()
            .enumerate()
            .map(|(layer, &value)| {
                let height = magnitude_height(value, self.max_magnitude, self.geometry);
                let top = self.geometry.plot_height - accumulated - height;
                accumulated += height;

                StackSegment {
                    layer,
                    value,
                    top,
                    height,
                }
            })
            .collect()
    }

    /// Y pixel the finished column reaches
    pub fn column_top(&self, bucket: &ResolvedBucket) -> f64 {
        map_magnitude(bucket.total(), self.max_magnitude, self.geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChartPadding, ContainerSize, chartkit::max_aggregate};
    use approx::assert_relative_eq;
    use egg_core::{Bucket, SeriesSet};
    use proptest::prelude::*;

    fn geometry() -> Geometry {
        Geometry::from_container(
            ContainerSize::new(640.0, 300.0),
            ChartPadding::stacked_bar(),
            Some(600.0),
        )
    }

    fn monday() -> ResolvedBucket {
        Bucket::new("Mon")
            .with_value("cracks", 300.0)
            .with_value("dirt", 188.0)
            .with_value("deformities", 150.0)
            .with_value("bloodSpots", 75.0)
            .with_value("other", 37.0)
            .resolve(&SeriesSet::egg_defects(), &mut Vec::new())
    }

    #[test]
    fn test_top_segment_reaches_bucket_total() {
        let geo = geometry();
        let bucket = monday();
        // Thursday (825) is the daily maximum
        let stack = StackAccumulator::new(&geo, 825.0);
        let segments = stack.stack(&bucket);

        let top = segments.last().unwrap().top;
        assert_relative_eq!(top, map_magnitude(750.0, 825.0, &geo), epsilon = 1e-9);
        assert_relative_eq!(top, stack.column_top(&bucket), epsilon = 1e-9);
    }

    #[test]
    fn test_segments_are_contiguous_bottom_to_top() {
        let geo = geometry();
        let segments = StackAccumulator::new(&geo, 750.0).stack(&monday());

        assert_eq!(segments[0].layer, 0);
        assert_eq!(segments[0].value, 37.0);
        assert_relative_eq!(segments[0].bottom(), geo.plot_height);
        for pair in segments.windows(2) {
            assert_relative_eq!(pair[1].bottom(), pair[0].top, epsilon = 1e-9);
        }
        assert_relative_eq!(segments[4].top, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_values_have_zero_height() {
        let geo = geometry();
        let bucket = ResolvedBucket {
            label: "empty".into(),
            values: vec![0.0, 0.0],
        };
        let segments = StackAccumulator::new(&geo, max_aggregate(&[bucket.clone()])).stack(&bucket);

        assert!(segments.iter().all(|s| s.height == 0.0));
        assert!(segments.iter().all(|s| s.top == geo.plot_height));
    }

    proptest! {
        #[test]
        fn segment_heights_sum_to_scaled_total(
            values in prop::collection::vec(0.0f64..10_000.0, 1..8),
            headroom in 1.0f64..3.0,
            height in 80.0f64..900.0,
        ) {
            let geo = Geometry::from_container(
                ContainerSize::new(640.0, height),
                ChartPadding::stacked_bar(),
                None,
            );
            let bucket = ResolvedBucket { label: "b".into(), values };
            let max = (bucket.total() * headroom).max(1.0);
            let segments = StackAccumulator::new(&geo, max).stack(&bucket);

            let sum: f64 = segments.iter().map(|s| s.height).sum();
            let expected = magnitude_height(bucket.total(), max, &geo);
            prop_assert!((sum - expected).abs() < 1e-6);

            let top = segments.last().map(|s| s.top).unwrap_or(geo.plot_height);
            prop_assert!((top - map_magnitude(bucket.total(), max, &geo)).abs() < 1e-6);
        }
    }
}
