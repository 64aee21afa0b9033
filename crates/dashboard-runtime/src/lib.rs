//! Runtime layer for the incident dashboard.
//!
//! Owns the table cache, the interactive session state and the renderer
//! boundary between the data layer and any presentation surface.

pub mod cache;
pub mod renderer;
pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
