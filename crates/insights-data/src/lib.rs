//! Data layer for Sales Insights.
//!
//! Responsible for reading and cleaning transaction CSV exports, running the
//! selection-aware aggregate queries and bundling them into a dashboard
//! snapshot for the presentation layer.

pub mod aggregator;
pub mod dashboard;
pub mod reader;

pub use insights_core as core;
