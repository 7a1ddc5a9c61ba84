//! Runtime layer for Sales Insights.
//!
//! Owns the cached dataset and the mutable product selection that drive each
//! recompute of the dashboard views.

pub mod data_manager;
pub mod session;
