use super::domain::{RegistrationId, Track};
use super::engine::AllocationResult;
use super::pool::CandidatePool;
use serde::Serialize;

/// Seat details for a candidate who was called in a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub name: String,
    pub registration_id: RegistrationId,
    pub track: Track,
    pub track_label: &'static str,
    pub rank_used: Option<u32>,
    pub is_quota_eligible: bool,
    /// Quota-eligible but seated on general merit, leaving a quota seat for someone else.
    pub quota_eligible_on_general_merit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Seated(OutcomeRecord),
    NotSeated {
        registration_id: RegistrationId,
        name: String,
    },
    ExcludedSubJudice {
        registration_id: RegistrationId,
        name: String,
    },
    Unknown {
        registration_id: RegistrationId,
    },
}

impl Verdict {
    pub fn outcome(&self) -> Option<&OutcomeRecord> {
        match self {
            Verdict::Seated(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_outcome(self) -> Option<OutcomeRecord> {
        match self {
            Verdict::Seated(record) => Some(record),
            _ => None,
        }
    }

    pub fn is_seated(&self) -> bool {
        matches!(self, Verdict::Seated(_))
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Verdict::Seated(_) => "seated",
            Verdict::NotSeated { .. } => "not_seated",
            Verdict::ExcludedSubJudice { .. } => "excluded_sub_judice",
            Verdict::Unknown { .. } => "unknown_candidate",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Verdict::Seated(record) => {
                let merit_note = if record.quota_eligible_on_general_merit {
                    " (quota-eligible, admitted on general merit)"
                } else {
                    ""
                };
                let rank = match (record.track.is_general(), record.rank_used) {
                    (true, Some(rank)) => format!("general rank {rank}"),
                    (false, Some(rank)) => format!("quota rank {rank}"),
                    (_, None) => "rank unavailable".to_string(),
                };
                format!(
                    "CALLED: {} ({}), track {}{}, {}",
                    record.name, record.registration_id, record.track_label, merit_note, rank
                )
            }
            Verdict::NotSeated {
                registration_id,
                name,
            } => format!(
                "NOT CALLED: {name} ({registration_id}) is ranked outside the simulated seat count"
            ),
            Verdict::ExcludedSubJudice {
                registration_id,
                name,
            } => format!(
                "NOT CALLED: {name} ({registration_id}) is sub judice and was left out of this simulation"
            ),
            Verdict::Unknown { registration_id } => format!(
                "Unknown candidate: registration {registration_id} is not in the candidate pool"
            ),
        }
    }
}

/// Answers "was this candidate called?" for a finished simulation.
///
/// The pool is the unfiltered snapshot the simulation ran against, which is what lets the
/// resolver tell an unknown id apart from a candidate who simply did not make the cut.
pub fn resolve(pool: &CandidatePool, result: &AllocationResult, registration_id: &str) -> Verdict {
    if let Some(seat) = result.seat_for(registration_id) {
        return Verdict::Seated(OutcomeRecord {
            name: seat.candidate.name.clone(),
            registration_id: seat.candidate.registration_id.clone(),
            track: seat.track,
            track_label: seat.track.label(),
            rank_used: seat.rank_used(),
            is_quota_eligible: seat.candidate.is_quota_eligible(),
            quota_eligible_on_general_merit: seat.quota_eligible_on_general_merit(),
        });
    }

    match pool.by_id(registration_id) {
        Some(candidate) if candidate.sub_judice && result.request.exclude_sub_judice => {
            Verdict::ExcludedSubJudice {
                registration_id: candidate.registration_id.clone(),
                name: candidate.name.clone(),
            }
        }
        Some(candidate) => Verdict::NotSeated {
            registration_id: candidate.registration_id.clone(),
            name: candidate.name.clone(),
        },
        None => Verdict::Unknown {
            registration_id: RegistrationId::new(registration_id),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::domain::{Candidate, CandidateStatus};
    use crate::admission::engine::{allocate, AllocationRequest};

    fn candidate(id: &str, general: Option<u32>, quota: Option<u32>) -> Candidate {
        Candidate {
            registration_id: RegistrationId::new(id),
            name: format!("Candidate {id}"),
            status: CandidateStatus::Awaiting,
            general_rank: general,
            quota_rank: quota,
            sub_judice: false,
        }
    }

    fn pool() -> CandidatePool {
        let mut pending = candidate("6", Some(6), None);
        pending.sub_judice = true;
        CandidatePool::build(vec![
            candidate("1", Some(1), Some(1)),
            candidate("2", Some(2), None),
            candidate("3", Some(3), None),
            candidate("4", Some(4), None),
            candidate("5", Some(9), Some(2)),
            pending,
            candidate("7", Some(7), None),
        ])
    }

    #[test]
    fn seated_on_merit_reports_general_rank() {
        let pool = pool();
        let result = allocate(&pool, &AllocationRequest::new(5));

        let record = resolve(&pool, &result, " 1 ")
            .into_outcome()
            .expect("candidate seated");
        assert_eq!(record.track, Track::General);
        assert_eq!(record.rank_used, Some(1));
        assert!(record.is_quota_eligible);
        assert!(record.quota_eligible_on_general_merit);
    }

    #[test]
    fn quota_seat_reports_quota_rank() {
        let pool = pool();
        let result = allocate(&pool, &AllocationRequest::new(5));

        let verdict = resolve(&pool, &result, "5");
        let record = verdict.outcome().expect("candidate seated");
        assert_eq!(record.track, Track::Quota);
        assert_eq!(record.rank_used, Some(2));
        assert!(!record.quota_eligible_on_general_merit);
        assert!(verdict.message().contains("quota rank 2"));
    }

    #[test]
    fn distinguishes_unseated_from_unknown() {
        let pool = pool();
        let result = allocate(&pool, &AllocationRequest::new(5));

        let below_cutoff = resolve(&pool, &result, "7");
        assert!(matches!(below_cutoff, Verdict::NotSeated { .. }));
        assert!(below_cutoff.message().contains("outside the simulated seat count"));

        let unknown = resolve(&pool, &result, "999");
        assert!(matches!(unknown, Verdict::Unknown { .. }));
        assert!(unknown.message().contains("not in the candidate pool"));
        assert_ne!(below_cutoff.kind(), unknown.kind());
    }

    #[test]
    fn excluded_sub_judice_candidate_gets_its_own_verdict() {
        let pool = pool();
        let result = allocate(&pool, &AllocationRequest::new(6).excluding_sub_judice());

        let verdict = resolve(&pool, &result, "6");
        assert_eq!(verdict.kind(), "excluded_sub_judice");

        let included = allocate(&pool, &AllocationRequest::new(7));
        assert!(resolve(&pool, &included, "6").is_seated());
    }
}
