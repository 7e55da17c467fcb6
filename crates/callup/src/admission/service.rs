use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use axum::http::StatusCode;
use chrono::Local;
use tracing::{info, warn};

use super::engine::{allocate, AllocationRequest, AllocationResult};
use super::outcome::{resolve, Verdict};
use super::pool::CandidatePool;
use super::report::{RenderError, ReportData, ReportDocument, ReportFormat, ReportRenderer};
use crate::config::ReportConfig;

/// Failures surfaced to callers of the simulation service.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("candidate data has not been loaded; no simulation can run")]
    DataNotLoaded,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no simulation result is available to build a report; run a simulation first")]
    ReportUnavailable,
    #[error("report rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl SimulationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SimulationError::DataNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            SimulationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SimulationError::ReportUnavailable => StatusCode::NOT_FOUND,
            SimulationError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Verdict for the requested candidate plus the full run it was derived from.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub verdict: Verdict,
    pub result: Arc<AllocationResult>,
}

impl SimulationOutcome {
    pub fn report(&self) -> ReportData {
        ReportData::project(&self.result)
    }
}

/// Service facade holding the loaded pool and the most recent simulation.
pub struct CallUpService {
    pool: Option<CandidatePool>,
    renderer: ReportRenderer,
    reports_dir: Option<PathBuf>,
    last_run: Mutex<Option<Arc<AllocationResult>>>,
}

impl CallUpService {
    pub fn new(pool: CandidatePool, reports: &ReportConfig) -> Self {
        Self {
            pool: Some(pool),
            renderer: ReportRenderer::new(reports.rows_per_page),
            reports_dir: Some(reports.output_dir.clone()),
            last_run: Mutex::new(None),
        }
    }

    /// A service whose roster failed to load. Every simulation answers `DataNotLoaded`.
    pub fn unloaded(reports: &ReportConfig) -> Self {
        Self {
            pool: None,
            ..Self::new(CandidatePool::default(), reports)
        }
    }

    /// Keeps rendered reports in memory only.
    pub fn without_report_persistence(mut self) -> Self {
        self.reports_dir = None;
        self
    }

    pub fn pool(&self) -> Result<&CandidatePool, SimulationError> {
        self.pool.as_ref().ok_or(SimulationError::DataNotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.pool.is_some()
    }

    pub fn last_result(&self) -> Option<Arc<AllocationResult>> {
        self.last_run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn run_simulation(
        &self,
        registration_id: &str,
        request: AllocationRequest,
    ) -> Result<SimulationOutcome, SimulationError> {
        let pool = self.pool()?;
        let registration_id = registration_id.trim();
        if registration_id.is_empty() {
            return Err(SimulationError::InvalidInput(
                "registration_id must not be empty".to_string(),
            ));
        }

        let result = self.simulate(request)?;
        let verdict = resolve(pool, &result, registration_id);

        info!(
            registration_id,
            total_seats = request.total_seats,
            exclude_sub_judice = request.exclude_sub_judice,
            seated = result.seats.len(),
            unfilled = result.unfilled_seats,
            verdict = verdict.kind(),
            "simulation complete"
        );
        Ok(SimulationOutcome { verdict, result })
    }

    /// Runs an allocation and caches it for the next report request.
    pub fn simulate(
        &self,
        request: AllocationRequest,
    ) -> Result<Arc<AllocationResult>, SimulationError> {
        let result = Arc::new(allocate(self.pool()?, &request));
        if result.is_partial() {
            warn!(
                requested = request.total_seats,
                seated = result.seats.len(),
                "candidate pool exhausted before every seat was filled"
            );
        }

        self.store(result.clone());
        Ok(result)
    }

    /// Renders the most recent simulation, running one first when nothing is cached.
    pub fn fetch_report(
        &self,
        registration_id: &str,
        total_seats: u32,
        format: ReportFormat,
    ) -> Result<ReportDocument, SimulationError> {
        let pool = self.pool()?;
        let result = match self.last_result() {
            Some(result) if !result.is_empty() => result,
            _ => {
                let result = Arc::new(allocate(pool, &AllocationRequest::new(total_seats)));
                info!(
                    registration_id = registration_id.trim(),
                    total_seats,
                    seated = result.seats.len(),
                    "simulation run to back report request"
                );
                self.store(result.clone());
                result
            }
        };

        if result.is_empty() {
            return Err(SimulationError::ReportUnavailable);
        }

        let data = ReportData::project(&result);
        let document = self.renderer.render(&data, format, Local::now())?;

        if let Some(dir) = &self.reports_dir {
            match document.persist(dir) {
                Ok(path) => info!(path = %path.display(), "report written"),
                Err(err) => warn!(error = %err, dir = %dir.display(), "could not persist report"),
            }
        }

        Ok(document)
    }

    fn store(&self, result: Arc<AllocationResult>) {
        *self.last_run.lock().unwrap_or_else(PoisonError::into_inner) = Some(result);
    }
}
