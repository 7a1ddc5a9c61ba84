mod bootstrap;
mod report;

use anyhow::Result;
use insights_core::settings::Settings;
use insights_data::reader::LoadOptions;
use insights_runtime::data_manager::DataManager;
use insights_runtime::session::DashboardSession;
use insights_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("Sales Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data file: {}, View: {}, Top-k: {}, Load mode: {:?}",
        settings.data_file.display(),
        settings.view,
        settings.top_k,
        settings.load_mode
    );

    let mut manager = DataManager::new(LoadOptions::new(settings.load_mode));
    let dataset = match manager.get_data(&settings.data_file) {
        Ok(dataset) => dataset,
        Err(err) if err.is_missing_source() => {
            tracing::error!("{err}");
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
        Err(err) => {
            if err.is_malformed_input() {
                tracing::error!("{err}; rerun with --load-mode lenient to skip malformed rows");
            }
            return Err(err.into());
        }
    };

    let mut session = DashboardSession::new(dataset, settings.top_k);
    if !settings.products.is_empty() {
        session = session.with_selection(settings.products.iter().cloned());
    }

    match settings.view.as_str() {
        "dashboard" => {
            tracing::info!("Starting interactive dashboard...");
            App::new(session, &settings.theme, settings.currency.clone()).run()?;
        }
        "report" => {
            let dataset = session.dataset();
            let output = if settings.wants_json() {
                report::render_json(
                    &dataset.source,
                    &dataset.report,
                    session.snapshot(),
                    &settings.currency,
                )?
            } else {
                report::render_text(
                    &dataset.source,
                    &dataset.report,
                    session.snapshot(),
                    &settings.currency,
                )
            };
            print!("{output}");
        }
        unknown => {
            eprintln!("Unknown view mode: {}", unknown);
        }
    }

    Ok(())
}
