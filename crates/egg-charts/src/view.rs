//! Leptos glue shared by the chart components
//!
//! Each chart owns a [`ChartRuntime`] kept in local storage; the runtime pushes
//! scenes into a signal that [`SceneView`] and [`TooltipCard`] render.

use crate::{
    chart::ChartVariant,
    hover::PointerPosition,
    runtime::ChartRuntime,
    scene::{LinearGradient, Scene, Shape},
    web::{DateClock, ElementMeasure, RafScheduler, WindowResize},
};
use egg_core::{DatasetProvider, Granularity, HoveredBucket, SeriesSet};
use leptos::{ev::MouseEvent, html::Div, prelude::*};
use std::rc::Rc;
use wasm_bindgen::JsCast;

/// Mounts a chart variant inside a measured, pointer-tracking container
pub fn chart_view<V: ChartVariant>(
    variant: V,
    series: SeriesSet,
    provider: Rc<dyn DatasetProvider>,
    granularity: Signal<Granularity>,
    hovered: Option<RwSignal<Option<HoveredBucket>>>,
    class: &'static str,
) -> impl IntoView {
    let container = NodeRef::<Div>::new();
    let scene = RwSignal::new(Scene::default());

    let runtime = ChartRuntime::new(
        variant,
        series,
        provider,
        Rc::new(RafScheduler),
        Rc::new(DateClock),
    );
    runtime.on_render(move |frame| scene.set(frame));
    if let Some(hovered) = hovered {
        runtime.on_hover(move |bucket| hovered.set(bucket));
    }
    let runtime = StoredValue::new_local(runtime);

    // Granularity changes are dataset changes
    Effect::new(move |_| {
        let granularity = granularity.get();
        runtime.with_value(|rt| rt.set_granularity(granularity));
    });

    Effect::new(move |_| {
        if let Some(el) = container.get() {
            let element: web_sys::Element = el.unchecked_into();
            runtime.with_value(|rt| rt.mount(Box::new(ElementMeasure(element)), &WindowResize));
        }
    });

    on_cleanup(move || {
        runtime.try_with_value(|rt| rt.unmount());
    });

    let pointer = move |ev: MouseEvent| {
        let Some(el) = container.get_untracked() else {
            return;
        };
        let rect = el.get_bounding_client_rect();
        let position = PointerPosition::new(
            f64::from(ev.client_x()) - rect.left(),
            f64::from(ev.client_y()) - rect.top(),
        );
        runtime.with_value(|rt| rt.pointer_move(position));
    };

    view! {
        <div
            node_ref=container
            class=class
            style="position: relative; width: 100%; height: 100%;"
            on:mouseenter=pointer
            on:mousemove=pointer
            on:mouseleave=move |_| runtime.with_value(|rt| rt.pointer_leave())
        >
            <SceneView scene=scene />
            <TooltipCard scene=scene />
        </div>
    }
}

/// SVG rendering of a [`Scene`]
#[component]
pub fn SceneView(scene: RwSignal<Scene>) -> impl IntoView {
    view! {
        <svg
            class="chart-scene"
            viewBox=move || scene.with(|s| s.geometry.viewbox())
            preserveAspectRatio="xMidYMid meet"
            style="width: 100%; height: 100%; display: block;"
        >
            <defs>
                {move || scene.with(|s| {
                    s.gradients.iter().cloned().map(gradient_view).collect_view()
                })}
            </defs>

            // Background
            {move || scene.with(|s| {
                let (width, height) = (s.width(), s.height());
                s.background.clone().map(|fill| {
                    view! { <rect width=width height=height fill=fill rx="4" /> }
                })
            })}

            <g transform=move || scene.with(|s| s.geometry.inner_transform())>
                {move || scene.with(|s| s.shapes.iter().map(shape_view).collect_view())}
            </g>
        </svg>
    }
}

fn gradient_view(gradient: LinearGradient) -> impl IntoView {
    view! {
        <linearGradient id=gradient.id x1="0" y1="0" x2="0" y2="1">
            <stop offset="0%" stop-color=gradient.color.clone() stop-opacity=gradient.top_opacity />
            <stop offset="100%" stop-color=gradient.color stop-opacity=gradient.bottom_opacity />
        </linearGradient>
    }
}

fn shape_view(shape: &Shape) -> AnyView {
    match shape.clone() {
        Shape::Rect { x, y, width, height, fill, opacity } => view! {
            <rect x=x y=y width=width height=height fill=fill opacity=opacity />
        }
        .into_any(),

        Shape::Path { d, fill, stroke, opacity } => {
            let (color, width, dash_array, dash_offset) = match stroke {
                Some(s) => (s.color, s.width, s.dash_array, s.dash_offset),
                None => ("none".to_string(), 0.0, None, None),
            };

            view! {
                <path
                    d=d
                    fill=fill.to_svg()
                    stroke=color
                    stroke-width=width
                    stroke-dasharray=dash_array
                    stroke-dashoffset=dash_offset
                    stroke-linecap="round"
                    stroke-linejoin="round"
                    opacity=opacity
                />
            }
            .into_any()
        }

        Shape::Circle { cx, cy, r, fill, opacity } => view! {
            <circle cx=cx cy=cy r=r fill=fill opacity=opacity />
        }
        .into_any(),

        Shape::Text { x, y, text, anchor, fill, font_size, opacity } => view! {
            <text
                x=x
                y=y
                text-anchor=anchor.as_str()
                fill=fill
                font-size=font_size
                opacity=opacity
            >
                {text}
            </text>
        }
        .into_any(),

        Shape::Line { x1, y1, x2, y2, stroke, width } => view! {
            <line x1=x1 y1=y1 x2=x2 y2=y2 stroke=stroke stroke-width=width />
        }
        .into_any(),
    }
}

/// HTML tooltip positioned over the chart container
#[component]
pub fn TooltipCard(scene: RwSignal<Scene>) -> impl IntoView {
    move || {
        scene.with(|s| s.tooltip.clone()).map(|tooltip| {
            let style = format!(
                "position: absolute; left: {}px; top: {}px; width: {}px; \
                 transform: translateX(-50%); pointer-events: none;",
                tooltip.left, tooltip.top, tooltip.width
            );

            view! {
                <div class="chart-tooltip" style=style>
                    <div class="chart-tooltip-title">{tooltip.title}</div>
                    {tooltip.rows.into_iter().map(|row| {
                        view! {
                            <div class="chart-tooltip-row">
                                {row.swatch.map(|color| view! {
                                    <span
                                        class="chart-tooltip-swatch"
                                        style=format!("background: {};", color)
                                    ></span>
                                })}
                                {row.label.map(|label| view! {
                                    <span class="chart-tooltip-label">{label}":"</span>
                                })}
                                <span class="chart-tooltip-value">{row.text}</span>
                            </div>
                        }
                    }).collect_view()}
                </div>
            }
        })
    }
}
