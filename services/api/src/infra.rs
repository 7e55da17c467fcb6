use callup::admission::CallUpService;
use callup::config::AppConfig;
use callup::roster::{RosterImport, RosterImportError, RosterImporter};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{error, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) service: Arc<CallUpService>,
}

pub(crate) fn roster_path(config: &AppConfig, override_path: Option<PathBuf>) -> PathBuf {
    override_path.unwrap_or_else(|| config.roster.path.clone())
}

pub(crate) fn import_roster(path: &Path) -> Result<RosterImport, RosterImportError> {
    let import = RosterImporter::from_path(path)?;
    if import.pool.is_empty() {
        warn!(path = %path.display(), "roster holds no candidates awaiting call-up");
    }
    Ok(import)
}

/// Builds the service for the HTTP server. A roster that cannot be imported leaves the
/// service running unloaded so simulation requests answer 503 instead of the process exiting.
pub(crate) fn service_for_server(config: &AppConfig) -> CallUpService {
    let path = &config.roster.path;
    match import_roster(path) {
        Ok(import) => CallUpService::new(import.pool, &config.reports),
        Err(err) => {
            error!(path = %path.display(), error = %err, "roster could not be loaded");
            CallUpService::unloaded(&config.reports)
        }
    }
}
