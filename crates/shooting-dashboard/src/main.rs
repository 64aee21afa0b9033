mod bootstrap;

use std::path::PathBuf;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::reader::load_incidents;
use dashboard_runtime::cache::TableCache;
use dashboard_runtime::renderer::JsonRenderer;
use dashboard_runtime::session::DashboardSession;
use dashboard_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load();

    let log_file = resolve_log_file(&settings)?;
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("NYC shooting dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, Year: {}, Theme: {}",
        settings.data_path.display(),
        settings.year,
        settings.theme
    );

    let cache = TableCache::new();
    let table = cache
        .get_or_load(&settings.data_path, load_incidents)
        .with_context(|| format!("loading incidents from {}", settings.data_path.display()))?;

    let session = DashboardSession::from_settings(table, &settings);

    if settings.export {
        tracing::info!("Writing JSON snapshot to stdout");
        let mut renderer = JsonRenderer::new(std::io::stdout().lock()).pretty();
        session.render(&mut renderer)?;
    } else {
        tracing::info!("Starting interactive dashboard");
        App::new(session, &settings.theme).run()?;
    }

    tracing::info!("Dashboard finished");
    Ok(())
}

/// Where logs go: the explicit `--log-file`, the default file for the TUI
/// (stderr would corrupt the alternate screen), or stderr for `--export`.
fn resolve_log_file(settings: &Settings) -> Result<Option<PathBuf>> {
    if let Some(path) = &settings.log_file {
        return Ok(Some(path.clone()));
    }
    if settings.export {
        return Ok(None);
    }
    bootstrap::ensure_directories()?;
    Ok(Some(bootstrap::default_log_file()))
}
