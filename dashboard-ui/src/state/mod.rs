//! State Management
//!
//! Reactive page state shared by the dashboard components.

pub mod global;

pub use global::{provide_dashboard_state, DashboardState, UiRefreshLoop};
