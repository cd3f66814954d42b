//! Visits Dashboard
//!
//! Visitor map and traffic chart built with Leptos (WASM).
//!
//! # Features
//!
//! - Leaflet map with one marker per visiting IP
//! - Hourly traffic chart drawn on a canvas
//! - Marker refresh every five minutes, or on demand
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. The hosting page embeds the first-render data; afterwards
//! only `/api/locations` is polled.

use leptos::*;

mod api;
mod app;
mod bootstrap;
mod components;
mod leaflet;
mod logging;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let boot = bootstrap::Bootstrap::from_document();
    logging::init(&boot.config.logging);
    boot.report();

    bootstrap::activate_truncation_tooltips();

    mount_to_body(move || view! { <app::App boot=boot /> });
}
