use super::super::domain::{RegistrationId, Track};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub index: usize,
    pub registration_id: RegistrationId,
    pub name: String,
    pub track: Track,
    pub track_label: &'static str,
    pub general_rank: String,
    pub quota_rank: String,
    pub note: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub requested_seats: u32,
    pub total_seated: usize,
    /// Regular and reallocated general seats together.
    pub general_total: usize,
    pub reallocated: usize,
    pub quota_total: usize,
    pub quota_eligible_via_general: usize,
    pub quota_eligible_via_quota: usize,
    pub quota_eligible_seated: usize,
    pub unfilled_seats: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub rows: Vec<ReportRow>,
    pub summary: ReportSummary,
}
