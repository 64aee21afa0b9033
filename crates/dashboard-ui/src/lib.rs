//! Terminal UI layer for the incident dashboard.
//!
//! Provides themes, header/slider/share-bar components, map, chart and
//! table views, and the main application event loop built on top of
//! [`ratatui`] for rendering dashboard snapshots in the terminal.

pub mod app;
pub mod chart_view;
pub mod components;
pub mod map_view;
pub mod table_view;
pub mod themes;

pub use dashboard_core as core;
