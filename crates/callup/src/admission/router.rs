use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::engine::AllocationRequest;
use super::outcome::OutcomeRecord;
use super::report::{ReportFormat, ReportSummary};
use super::service::{CallUpService, SimulationError};

/// Router exposing the simulation and report endpoints.
pub fn callup_router(service: Arc<CallUpService>) -> Router {
    Router::new()
        .route("/api/v1/simulations", post(simulate_handler))
        .route("/api/v1/reports/:registration_id", get(report_handler))
        .with_state(service)
}

/// Clients send ids and seat counts as either strings or numbers.
#[derive(Debug, Default, Deserialize)]
pub struct SimulationPayload {
    #[serde(default)]
    pub registration_id: Option<Value>,
    #[serde(default)]
    pub total_seats: Option<Value>,
    #[serde(default)]
    pub exclude_sub_judice: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub verdict: String,
    pub verdict_kind: &'static str,
    pub outcome: Option<OutcomeRecord>,
    pub summary: ReportSummary,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub total_seats: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl IntoResponse for SimulationError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn simulate_handler(
    State(service): State<Arc<CallUpService>>,
    Json(payload): Json<SimulationPayload>,
) -> Result<Json<SimulationResponse>, SimulationError> {
    let registration_id = registration_from_value(payload.registration_id.as_ref())?;
    let total_seats = seats_from_value(payload.total_seats.as_ref())?;
    let request = AllocationRequest {
        total_seats,
        exclude_sub_judice: payload.exclude_sub_judice,
    };

    let outcome = service.run_simulation(&registration_id, request)?;
    let summary = outcome.report().summary;
    let verdict = outcome.verdict.message();
    let verdict_kind = outcome.verdict.kind();

    Ok(Json(SimulationResponse {
        verdict,
        verdict_kind,
        outcome: outcome.verdict.into_outcome(),
        summary,
    }))
}

pub(crate) async fn report_handler(
    State(service): State<Arc<CallUpService>>,
    Path(registration_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, SimulationError> {
    let total_seats = match query.total_seats.as_deref() {
        Some(raw) => parse_seats(raw)?,
        None => 0,
    };
    let format = match query.format.as_deref() {
        Some(raw) => raw.parse::<ReportFormat>().map_err(SimulationError::InvalidInput)?,
        None => ReportFormat::default(),
    };

    let document = service.fetch_report(&registration_id, total_seats, format)?;
    let disposition = format!("attachment; filename=\"{}\"", document.download_name);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}

fn registration_from_value(value: Option<&Value>) -> Result<String, SimulationError> {
    match value {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Ok(raw.trim().to_string()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        _ => Err(SimulationError::InvalidInput(
            "registration_id is required".to_string(),
        )),
    }
}

fn seats_from_value(value: Option<&Value>) -> Result<u32, SimulationError> {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|seats| u32::try_from(seats).ok())
            .ok_or_else(|| invalid_seats(&number.to_string())),
        Some(Value::String(raw)) => parse_seats(raw),
        Some(other) => Err(invalid_seats(&other.to_string())),
        None => Err(SimulationError::InvalidInput(
            "total_seats is required".to_string(),
        )),
    }
}

fn parse_seats(raw: &str) -> Result<u32, SimulationError> {
    raw.trim().parse::<u32>().map_err(|_| invalid_seats(raw))
}

fn invalid_seats(raw: &str) -> SimulationError {
    SimulationError::InvalidInput(format!(
        "total_seats must be a non-negative whole number, got '{raw}'"
    ))
}
