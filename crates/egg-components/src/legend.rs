//! Series legend and hovered-bucket summary

use egg_core::{CountFormatter, GroupedCountFormatter, HoveredBucket, SeriesSet};
use leptos::prelude::*;

/// Colour key in legend order (top of the stack first)
#[component]
pub fn SeriesLegend(series: SeriesSet) -> impl IntoView {
    let items: Vec<_> = series
        .legend_order()
        .map(|(_, def)| (def.label.clone(), def.color.clone()))
        .collect();

    view! {
        <ul class="series-legend">
            {items.into_iter().map(|(label, color)| view! {
                <li class="legend-item">
                    <span class="legend-swatch" style=format!("background: {};", color)></span>
                    <span class="legend-label">{label}</span>
                </li>
            }).collect_view()}
        </ul>
    }
}

/// Formatted total of a hovered bucket
pub fn summary_total(bucket: &HoveredBucket) -> String {
    format!("{} defects", GroupedCountFormatter.format(bucket.total()))
}

/// Mirrors the bucket under the pointer in the active chart
#[component]
pub fn HoverSummary(#[prop(into)] hovered: Signal<Option<HoveredBucket>>) -> impl IntoView {
    view! {
        <div class="hover-summary">
            {move || match hovered.get() {
                Some(bucket) => {
                    let total = summary_total(&bucket);
                    view! {
                        <div class="hs-header">
                            <span class="hs-label">{bucket.label}</span>
                            <span class="hs-total">{total}</span>
                        </div>
                        <ul class="hs-entries">
                            {bucket.entries.into_iter().map(|entry| view! {
                                <li class="hs-entry">
                                    <span
                                        class="legend-swatch"
                                        style=format!("background: {};", entry.color)
                                    ></span>
                                    <span class="hs-entry-label">{entry.label}</span>
                                    <span class="hs-entry-value">
                                        {GroupedCountFormatter.format(entry.value)}
                                    </span>
                                </li>
                            }).collect_view()}
                        </ul>
                    }
                    .into_any()
                }
                None => view! {
                    <span class="hs-empty">"Hover a chart to inspect a day or month"</span>
                }
                .into_any(),
            }}
        </div>
    }
}
