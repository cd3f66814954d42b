//! UI Components
//!
//! Leptos components for the dashboard page.

pub mod chart;
pub mod map_panel;
pub mod visitor_table;

pub use chart::TrafficChart;
pub use map_panel::MapPanel;
pub use visitor_table::VisitorTable;

use visits_dashboard::{DashboardError, Widget};

/// Swap a failed widget's container contents for the static warning
pub fn show_degraded(container: &web_sys::Element, widget: Widget, error: &DashboardError) {
    tracing::error!("Error initializing {}: {}", widget, error);
    container.set_inner_html(&widget.degraded_html());
}
