//! Main App Component

use leptos::*;

use crate::bootstrap::Bootstrap;
use crate::components::{MapPanel, TrafficChart, VisitorTable};
use crate::state::provide_dashboard_state;

/// Root application component
#[component]
pub fn App(boot: Bootstrap) -> impl IntoView {
    let Bootstrap { config, payload, .. } = boot;

    provide_dashboard_state(payload.locations.clone());

    view! {
        <div class="container-fluid py-4">
            <header class="mb-4">
                <h1 class="h3">"Visits Dashboard"</h1>
            </header>

            <div class="row g-4">
                <div class="col-lg-8">
                    <MapPanel
                        map=config.map.clone()
                        refresh=config.refresh.clone()
                        initial=payload.locations
                    />
                </div>
                <div class="col-lg-4">
                    <VisitorTable />
                </div>
                <div class="col-12">
                    <TrafficChart config=config.chart.clone() points=payload.traffic />
                </div>
            </div>
        </div>
    }
}
