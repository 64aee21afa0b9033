//! Small line-oriented widgets shared by the dashboard pages.

pub mod header;
pub mod share_bar;
pub mod slider;
