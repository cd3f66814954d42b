//! Global Dashboard State
//!
//! Reactive state using Leptos signals. The map and chart keep their own
//! state inside their views; the signals here only feed the surrounding page.

use std::rc::Rc;

use leptos::*;

use visits_dashboard::{Location, RefreshLoop};

use crate::api::HttpLocationSource;
use crate::leaflet::LeafletSurface;

/// Refresh loop as wired in the browser
pub type UiRefreshLoop = RefreshLoop<HttpLocationSource, LeafletSurface>;

/// Page state provided to all components
#[derive(Clone, Copy)]
pub struct DashboardState {
    /// Location set last drawn on the map
    pub locations: RwSignal<Vec<Location>>,
    /// When the markers were last replaced (epoch ms)
    pub last_updated: RwSignal<Option<i64>>,
    /// Manual refreshes in flight
    pub manual_refreshes: RwSignal<u32>,
    /// Set once the map has initialized
    refresh: StoredValue<Option<Rc<UiRefreshLoop>>>,
}

/// Provide dashboard state to the component tree
pub fn provide_dashboard_state(initial: Vec<Location>) -> DashboardState {
    let state = DashboardState {
        locations: create_rw_signal(initial),
        last_updated: create_rw_signal(None),
        manual_refreshes: create_rw_signal(0),
        refresh: store_value(None),
    };

    provide_context(state);
    state
}

impl DashboardState {
    pub fn set_refresh_loop(&self, refresh: Rc<UiRefreshLoop>) {
        self.refresh.set_value(Some(refresh));
    }

    pub fn refresh_loop(&self) -> Option<Rc<UiRefreshLoop>> {
        self.refresh.get_value()
    }

    /// Record a location set the map has just drawn
    pub fn record_sync(&self, locations: &[Location]) {
        self.locations.set(locations.to_vec());
        self.last_updated.set(Some(chrono::Utc::now().timestamp_millis()));
    }

    pub fn is_refreshing(&self) -> bool {
        self.manual_refreshes.get() > 0
    }

    /// Run one refresh cycle now; a no-op until the map exists
    pub fn trigger_refresh(&self) {
        let Some(refresh) = self.refresh_loop() else {
            tracing::warn!("Refresh requested before the map was ready");
            return;
        };

        let manual = self.manual_refreshes;
        manual.update(|n| *n += 1);
        spawn_local(async move {
            refresh.trigger_now().await;
            manual.update(|n| *n = n.saturating_sub(1));
        });
    }
}
