use super::super::domain::{Seat, Track};
use super::super::engine::AllocationResult;
use super::views::{ReportData, ReportRow, ReportSummary};

pub const NOTE_QUOTA_ELIGIBLE_ON_MERIT: &str = "quota-eligible, admitted on general merit";
pub const NOTE_REALLOCATED: &str = "seat reallocated from unfilled quota";

const MISSING_RANK: &str = "-";

impl ReportData {
    pub fn project(result: &AllocationResult) -> Self {
        let rows = result
            .seats
            .iter()
            .enumerate()
            .map(|(offset, seat)| row_for(offset + 1, seat))
            .collect();

        Self {
            rows,
            summary: summarize(result),
        }
    }
}

fn row_for(index: usize, seat: &Seat) -> ReportRow {
    let candidate = &seat.candidate;
    ReportRow {
        index,
        registration_id: candidate.registration_id.clone(),
        name: candidate.name.clone(),
        track: seat.track,
        track_label: seat.track.label(),
        general_rank: format_rank(candidate.general_rank),
        quota_rank: format_rank(candidate.quota_rank),
        note: note_for(seat),
    }
}

fn note_for(seat: &Seat) -> &'static str {
    match seat.track {
        Track::GeneralReallocated => NOTE_REALLOCATED,
        Track::General if seat.candidate.is_quota_eligible() => NOTE_QUOTA_ELIGIBLE_ON_MERIT,
        _ => "",
    }
}

fn format_rank(rank: Option<u32>) -> String {
    rank.map(|value| value.to_string())
        .unwrap_or_else(|| MISSING_RANK.to_string())
}

fn summarize(result: &AllocationResult) -> ReportSummary {
    let general = result.count_on(Track::General);
    let reallocated = result.count_on(Track::GeneralReallocated);
    let quota_total = result.count_on(Track::Quota);
    let quota_eligible_via_general = result
        .seats
        .iter()
        .filter(|seat| seat.quota_eligible_on_general_merit())
        .count();

    ReportSummary {
        requested_seats: result.request.total_seats,
        total_seated: result.seats.len(),
        general_total: general + reallocated,
        reallocated,
        quota_total,
        quota_eligible_via_general,
        quota_eligible_via_quota: quota_total,
        quota_eligible_seated: quota_eligible_via_general + quota_total,
        unfilled_seats: result.unfilled_seats,
    }
}
