//! Defect overview panel: selectors plus the active chart

use egg_charts::{LineAreaChart, StackedBarChart};
use egg_core::Granularity;
use egg_state::{ChartView, use_dashboard_state};
use leptos::prelude::*;

#[component]
pub fn OverviewPanel(
    #[prop(default = "Egg Defect Overview")] title: &'static str,
) -> impl IntoView {
    let state = use_dashboard_state();
    let granularity = state.granularity;
    let chart_view = state.chart_view;
    let hovered = state.hovered;

    view! {
        <div class="panel overview-panel">
            <div class="panel-header">
                <span class="panel-title">{title}</span>
                <div class="panel-controls">
                    <select
                        class="selector granularity-selector"
                        prop:value=move || granularity.get().as_str()
                        on:change=move |ev| state.select_granularity(&event_target_value(&ev))
                    >
                        {Granularity::all().iter().map(|g| view! {
                            <option value=g.as_str()>{g.label()}</option>
                        }).collect_view()}
                    </select>
                    <select
                        class="selector chart-view-selector"
                        prop:value=move || chart_view.get().as_str()
                        on:change=move |ev| state.select_chart_view(&event_target_value(&ev))
                    >
                        {ChartView::all().iter().map(|v| view! {
                            <option value=v.as_str()>{v.label()}</option>
                        }).collect_view()}
                    </select>
                </div>
            </div>

            <div class="panel-content chart-container" style="height: 300px;">
                {move || match chart_view.get() {
                    ChartView::Total => view! {
                        <LineAreaChart granularity=granularity hovered=hovered />
                    }.into_any(),
                    ChartView::Details => view! {
                        <StackedBarChart granularity=granularity hovered=hovered />
                    }.into_any(),
                }}
            </div>
        </div>
    }
}
