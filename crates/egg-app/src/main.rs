//! Egg inspection dashboard, WASM entry point

use egg_components::Dashboard;
use egg_state::provide_dashboard_state;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("Starting egg inspection dashboard");

    mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    provide_dashboard_state();

    view! { <Dashboard /> }
}
