//! Domain layer for the NYC shooting incident dashboard.
//!
//! Holds the incident record and canonical table types, the categorical
//! enums used by the breakdown views, calendar parsing, the shared error
//! type, command-line settings and number formatting helpers.

pub mod calendar;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
