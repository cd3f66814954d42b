//! Visitor Table
//!
//! Locations currently on the map, busiest first.

use leptos::*;

use visits_dashboard::Location;

use crate::state::DashboardState;

/// Table of the visitor locations last drawn on the map
#[component]
pub fn VisitorTable() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    let rows = move || {
        let mut locations = state.locations.get();
        locations.sort_by(|a, b| b.visits.cmp(&a.visits).then_with(|| a.ip.cmp(&b.ip)));
        locations
    };
    let total_visits = move || state.locations.with(|l| l.iter().map(|l| l.visits).sum::<u64>());

    view! {
        <div class="card shadow-sm h-100">
            <div class="card-header d-flex justify-content-between">
                <h5 class="mb-0">"Visitors"</h5>
                <span class="badge bg-primary">{total_visits} " visits"</span>
            </div>
            <div class="card-body p-0 table-responsive">
                <table class="table table-sm table-hover mb-0">
                    <thead>
                        <tr>
                            <th>"IP"</th>
                            <th>"Location"</th>
                            <th class="text-end">"Visits"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <Show
                            when=move || state.locations.with(|l| !l.is_empty())
                            fallback=|| view! {
                                <tr>
                                    <td colspan="3" class="text-center text-muted">"No visitors yet"</td>
                                </tr>
                            }
                        >
                            <For
                                each=rows
                                key=|location| (location.ip.clone(), location.visits)
                                children=move |location: Location| view! { <VisitorRow location=location /> }
                            />
                        </Show>
                    </tbody>
                </table>
            </div>
        </div>
    }
}

#[component]
fn VisitorRow(location: Location) -> impl IntoView {
    let place = format!("{}, {}", location.city, location.country);

    view! {
        <tr>
            <td class="text-truncate font-monospace" style="max-width: 9rem">{location.ip}</td>
            <td class="text-truncate" style="max-width: 12rem">{place}</td>
            <td class="text-end">{location.visits}</td>
        </tr>
    }
}
