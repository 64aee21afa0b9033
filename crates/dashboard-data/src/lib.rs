//! Data layer for the incident dashboard.
//!
//! Responsible for loading the incident CSV into the canonical table,
//! aggregating it into the presentation tables each view consumes, and
//! bundling those tables into one snapshot per interaction.

pub mod reader;
pub mod snapshot;
pub mod views;

pub use dashboard_core as core;
