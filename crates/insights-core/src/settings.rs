use clap::builder::TypedValueParser;
use clap::Parser;
use std::path::PathBuf;

use crate::error::{InsightsError, Result};
use crate::models::LoadMode;

/// Number of products shown in the top-products chart and offered in the
/// sidebar when nothing else is configured.
pub const DEFAULT_TOP_K: usize = 10;

/// Environment variable consulted when `--data-file` is not given.
pub const DATA_FILE_ENV: &str = "SALES_INSIGHTS_DATA_FILE";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// E-commerce sales insights dashboard
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-insights",
    about = "E-commerce sales performance dashboard for transaction CSV exports",
    version
)]
pub struct Settings {
    /// Transaction CSV to load
    #[arg(long, env = DATA_FILE_ENV)]
    pub data_file: PathBuf,

    /// Number of products in the top-products chart and sidebar
    #[arg(long, default_value_t = DEFAULT_TOP_K, value_parser = clap::value_parser!(u64).range(1..=100).map(|v| v as usize))]
    pub top_k: usize,

    /// Initial product selection (repeatable); defaults to the top products
    #[arg(long = "product", value_name = "DESCRIPTION")]
    pub products: Vec<String>,

    /// How to treat rows that fail to parse
    #[arg(long, value_enum, default_value_t = LoadMode::Strict)]
    pub load_mode: LoadMode,

    /// View mode
    #[arg(long, default_value = "dashboard", value_parser = ["dashboard", "report"])]
    pub view: String,

    /// Output format for the report view
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Currency symbol prefixed to revenue figures
    #[arg(long, default_value = "₹")]
    pub currency: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply derived overrides.
    ///
    /// Parse errors, `--help` and `--version` are reported by clap, which
    /// exits the process.
    pub fn load() -> Result<Self> {
        Settings::parse().finalize()
    }

    /// Same as [`Settings::load`] but with an explicit argument list, so tests
    /// can run without touching the real command line.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let settings =
            Settings::try_parse_from(args).map_err(|e| InsightsError::Config(e.to_string()))?;
        settings.finalize()
    }

    /// Apply the `--debug` override and validate cross-field constraints.
    fn finalize(mut self) -> Result<Self> {
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }

        if self.data_file.as_os_str().is_empty() {
            return Err(InsightsError::Config(format!(
                "a data file is required (--data-file or {DATA_FILE_ENV})"
            )));
        }

        self.products = self
            .products
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(self)
    }

    /// `true` when the report view should emit JSON.
    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
