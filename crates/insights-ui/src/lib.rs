//! Terminal dashboard for Sales Insights.
//!
//! Provides themes, the header, KPI cards and weekday share bars, the chart
//! views, and the interactive product-filter event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod themes;

pub use insights_core as core;
