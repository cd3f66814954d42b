//! Map Panel
//!
//! Leaflet map of visitor locations with manual and timed marker refresh.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::IntervalStream;
use leptos::*;

use visits_dashboard::{
    DashboardError, DashboardResult, Location, MapConfig, MapView, RefreshConfig, RefreshInterval,
    RefreshLoop, Widget,
};

use crate::api::HttpLocationSource;
use crate::components::show_degraded;
use crate::leaflet::LeafletSurface;
use crate::state::{DashboardState, UiRefreshLoop};

/// Map card with its refresh control
#[component]
pub fn MapPanel(map: MapConfig, refresh: RefreshConfig, initial: Vec<Location>) -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");
    let container_ref = create_node_ref::<html::Div>();
    let started = store_value(false);

    // The node ref loads while the view is still detached; Leaflet needs
    // the laid-out container, so build the map on the next frame
    create_effect(move |_| {
        let Some(container) = container_ref.get() else {
            return;
        };
        if started.get_value() {
            return;
        }
        started.set_value(true);

        let (map, refresh, initial) = (map.clone(), refresh.clone(), initial.clone());
        request_animation_frame(move || {
            let container: &web_sys::HtmlElement = &container;
            if let Err(e) = start_map(container, map, &refresh, &initial, state) {
                show_degraded(container, Widget::Map, &e);
            }
        });
    });

    view! {
        <div class="card shadow-sm h-100">
            <div class="card-header d-flex align-items-center justify-content-between">
                <h5 class="mb-0">"Visitor Locations"</h5>
                <div class="d-flex align-items-center gap-3">
                    <LastUpdated />
                    <RefreshButton />
                </div>
            </div>
            <div class="card-body p-0">
                <div node_ref=container_ref id="map" class="dashboard-map" />
            </div>
        </div>
    }
}

/// Manual refresh control
#[component]
fn RefreshButton() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <button
            id="refreshBtn"
            class="btn btn-sm btn-outline-primary"
            on:click=move |_| state.trigger_refresh()
        >
            {move || {
                if state.is_refreshing() {
                    view! {
                        <span class="spinner-border spinner-border-sm me-1" role="status" />
                        "Refreshing"
                    }.into_view()
                } else {
                    view! { "Refresh" }.into_view()
                }
            }}
        </button>
    }
}

/// Time of the last marker replacement
#[component]
fn LastUpdated() -> impl IntoView {
    let state = use_context::<DashboardState>().expect("DashboardState not found");

    view! {
        <small class="text-muted">
            {move || {
                state.last_updated.get()
                    .and_then(chrono::DateTime::from_timestamp_millis)
                    .map(|dt| format!("Updated {}", dt.with_timezone(&chrono::Local).format("%H:%M:%S")))
                    .unwrap_or_else(|| "Loaded with page".to_string())
            }}
        </small>
    }
}

/// Create the map, draw the initial markers and start the refresh loop
fn start_map(
    container: &web_sys::HtmlElement,
    map_config: MapConfig,
    refresh_config: &RefreshConfig,
    initial: &[Location],
    state: DashboardState,
) -> DashboardResult<()> {
    let surface = LeafletSurface::attach(container)
        .map_err(|e| DashboardError::initialization(Widget::Map, e))?;
    let view = MapView::initialize(surface, map_config, initial)?;

    let interval = refresh_config.interval().unwrap_or_else(|e| {
        tracing::error!("{}; using the default interval", e);
        RefreshInterval::default()
    });

    let source = HttpLocationSource::new(&refresh_config.endpoint);
    tracing::debug!(url = source.url(), "Location source ready");

    let refresh = Rc::new(
        RefreshLoop::new(source, Rc::new(RefCell::new(view)), interval)
            .on_synchronized(move |locations| state.record_sync(locations)),
    );
    state.set_refresh_loop(refresh.clone());

    if refresh_config.enabled {
        start_auto_refresh(refresh);
    } else {
        tracing::info!("Auto-refresh disabled; manual refresh only");
    }
    Ok(())
}

fn start_auto_refresh(refresh: Rc<UiRefreshLoop>) {
    let ticks = IntervalStream::new(refresh.interval().as_millis());
    spawn_local(async move {
        refresh.run(ticks).await;
    });
}
