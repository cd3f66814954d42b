//! API Client
//!
//! HTTP access to the dashboard server.

pub mod client;

pub use client::HttpLocationSource;
