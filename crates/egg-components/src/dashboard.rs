//! Main dashboard layout component

use egg_core::SeriesSet;
use egg_state::{ChartView, use_dashboard_state};
use leptos::prelude::*;

use crate::{HoverSummary, OverviewPanel, SeriesLegend};

#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_dashboard_state();
    let chart_view = state.chart_view;

    view! {
        <div class="dashboard">
            <header class="dash-header">
                <h1 class="dash-title">"Dashboard"</h1>
            </header>

            <main class="dash-main">
                <section class="dash-center">
                    <OverviewPanel />
                </section>

                <aside class="dash-sidebar right">
                    <div class="panel">
                        <div class="panel-header">
                            <span class="panel-title">"Legend"</span>
                        </div>
                        <div class="panel-content">
                            {move || {
                                let series = match chart_view.get() {
                                    ChartView::Total => SeriesSet::defect_totals(),
                                    ChartView::Details => SeriesSet::egg_defects(),
                                };
                                view! { <SeriesLegend series=series /> }
                            }}
                        </div>
                    </div>

                    <div class="panel">
                        <div class="panel-header">
                            <span class="panel-title">"Selection"</span>
                        </div>
                        <div class="panel-content">
                            <HoverSummary hovered=state.hovered />
                        </div>
                    </div>
                </aside>
            </main>
        </div>
    }
}
