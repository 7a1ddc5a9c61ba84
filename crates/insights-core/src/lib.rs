//! Shared types for Sales Insights.
//!
//! Holds the transaction data model, the error taxonomy, number formatting
//! helpers and the command-line settings used by every other crate in the
//! workspace.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{InsightsError, Result};
