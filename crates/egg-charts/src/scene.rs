//! Drawable output of the renderer
//!
//! A [`Scene`] is plain data: the chart components turn it into SVG, tests
//! inspect it directly.

use crate::{
    Geometry,
    chartkit::{Scale, magnitude_scale},
    colors,
};
use egg_core::{CompactCountFormatter, CountFormatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// Fill of a shape: flat colour, gradient reference or nothing
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Color(String),
    Gradient(String),
}

impl Paint {
    pub fn color(color: impl Into<String>) -> Self {
        Self::Color(color.into())
    }

    /// SVG attribute value
    pub fn to_svg(&self) -> String {
        match self {
            Self::None => "none".to_string(),
            Self::Color(c) => c.clone(),
            Self::Gradient(id) => format!("url(#{})", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub dash_array: Option<f64>,
    pub dash_offset: Option<f64>,
}

impl Stroke {
    pub fn solid(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
            dash_array: None,
            dash_offset: None,
        }
    }

    /// Dash pattern revealing the first `(1 - offset / length)` of a path
    pub fn reveal(mut self, length: f64, offset: f64) -> Self {
        self.dash_array = Some(length);
        self.dash_offset = Some(offset);
        self
    }
}

/// Vector shape in plot-local coordinates (the plot origin is the padding corner)
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        opacity: f64,
    },
    Path {
        d: String,
        fill: Paint,
        stroke: Option<Stroke>,
        opacity: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: String,
        opacity: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        anchor: TextAnchor,
        fill: String,
        font_size: f64,
        opacity: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        width: f64,
    },
}

/// Vertical gradient fading one colour out towards the baseline
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub id: String,
    pub color: String,
    pub top_opacity: f64,
    pub bottom_opacity: f64,
}

/// One row of the tooltip body
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub swatch: Option<String>,
    pub label: Option<String>,
    /// Raw value, exactly as stored in the bucket
    pub value: f64,
    /// Formatted value
    pub text: String,
}

/// Tooltip overlay in container coordinates (`left` is the box centre)
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipOverlay {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub title: String,
    pub rows: Vec<TooltipRow>,
}

/// Everything needed to draw one frame of a chart
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub geometry: Geometry,
    pub background: Option<String>,
    pub gradients: Vec<LinearGradient>,
    pub shapes: Vec<Shape>,
    pub tooltip: Option<TooltipOverlay>,
}

impl Scene {
    /// Nothing to draw (unmeasured container or empty dataset)
    pub fn empty(geometry: Geometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.geometry.container.width
    }

    pub fn height(&self) -> f64 {
        self.geometry.container.height
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Faint gridlines and compact tick labels along the left edge of the plot
pub fn value_axis(geometry: &Geometry, max_magnitude: f64, ticks: usize) -> Vec<Shape> {
    let scale = magnitude_scale(max_magnitude, geometry);
    let formatter = CompactCountFormatter;

    scale
        .nice_ticks(ticks)
        .into_iter()
        .flat_map(|tick| {
            let y = scale.scale(tick);
            [
                Shape::Line {
                    x1: 0.0,
                    y1: y,
                    x2: geometry.plot_width,
                    y2: y,
                    stroke: colors::GRID.to_string(),
                    width: 1.0,
                },
                Shape::Text {
                    x: -8.0,
                    y: y + 4.0,
                    text: formatter.format(tick),
                    anchor: TextAnchor::End,
                    fill: colors::TEXT_MUTED.to_string(),
                    font_size: 10.0,
                    opacity: 1.0,
                },
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ChartPadding, ContainerSize};

    #[test]
    fn test_paint_to_svg() {
        assert_eq!(Paint::None.to_svg(), "none");
        assert_eq!(Paint::color("#fff").to_svg(), "#fff");
        assert_eq!(Paint::Gradient("g".into()).to_svg(), "url(#g)");
    }

    #[test]
    fn test_value_axis_labels() {
        let geo = Geometry::from_container(
            ContainerSize::new(640.0, 300.0),
            ChartPadding::stacked_bar(),
            Some(600.0),
        );
        let daily = Scene {
            geometry: geo,
            shapes: value_axis(&geo, 825.0, 5),
            ..Scene::default()
        };
        assert_eq!(
            daily.texts().collect::<Vec<_>>(),
            ["0", "200", "400", "600", "800"]
        );

        let monthly = Scene {
            geometry: geo,
            shapes: value_axis(&geo, 25_500.0, 5),
            ..Scene::default()
        };
        assert_eq!(monthly.texts().collect::<Vec<_>>(), ["0", "10K", "20K"]);
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::empty(Geometry::zero(ChartPadding::line_area()));
        assert!(scene.is_empty());
        assert!(scene.tooltip.is_none());
        assert_eq!(scene.width(), 0.0);
    }
}
