use super::domain::{Candidate, RegistrationId, Seat, Track};
use super::pool::CandidatePool;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Share of the seats reserved for the quota track, in percent.
pub const QUOTA_SHARE_PERCENT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllocationRequest {
    pub total_seats: u32,
    pub exclude_sub_judice: bool,
}

impl AllocationRequest {
    pub fn new(total_seats: u32) -> Self {
        Self {
            total_seats,
            exclude_sub_judice: false,
        }
    }

    pub fn excluding_sub_judice(mut self) -> Self {
        self.exclude_sub_judice = true;
        self
    }
}

/// How the requested seats divide between tracks. Both parts always sum to `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatSplit {
    pub total: u32,
    pub general: u32,
    pub quota: u32,
}

impl SeatSplit {
    pub fn for_total(total: u32) -> Self {
        // floor(total * 20%) without going through floating point
        let quota = (u64::from(total) * u64::from(QUOTA_SHARE_PERCENT) / 100) as u32;
        Self {
            total,
            general: total - quota,
            quota,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationResult {
    pub request: AllocationRequest,
    pub split: SeatSplit,
    /// General, then quota, then reallocated seats, each in its ranking order.
    pub seats: Vec<Seat>,
    /// Quota seats converted into general seats because the quota pool ran dry.
    pub reallocated_quota_seats: u32,
    /// Seats that stayed empty because the pool itself was too small.
    pub unfilled_seats: u32,
}

impl AllocationResult {
    pub fn seats_on(&self, track: Track) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(move |seat| seat.track == track)
    }

    pub fn count_on(&self, track: Track) -> usize {
        self.seats_on(track).count()
    }

    pub fn seat_for(&self, registration_id: &str) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|seat| seat.candidate.registration_id.matches(registration_id))
    }

    pub fn is_partial(&self) -> bool {
        self.unfilled_seats > 0
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

/// Runs one call-up simulation over a pool snapshot.
///
/// General seats go to the best general ranks. Quota seats go to the best quota ranks among
/// quota-eligible candidates not already seated on merit. Quota seats that cannot be filled
/// are handed to the next best general ranks and labelled [`Track::GeneralReallocated`].
pub fn allocate(pool: &CandidatePool, request: &AllocationRequest) -> AllocationResult {
    let narrowed;
    let working = if request.exclude_sub_judice {
        narrowed = pool.exclude_sub_judice();
        &narrowed
    } else {
        pool
    };

    let split = SeatSplit::for_total(request.total_seats);
    let by_general = ranked_by(working, |c| c.general_rank);
    let by_quota = ranked_by(working, |c| c.quota_rank);

    let mut seated: HashSet<&RegistrationId> = HashSet::new();
    let mut seats = Vec::with_capacity((request.total_seats as usize).min(working.len()));

    take_into(
        &by_general,
        split.general as usize,
        Track::General,
        &mut seated,
        &mut seats,
    );
    let general_count = seats.len();

    take_into(
        &by_quota,
        split.quota as usize,
        Track::Quota,
        &mut seated,
        &mut seats,
    );
    let quota_count = seats.len() - general_count;

    let shortfall = split.quota as usize - quota_count;
    if shortfall > 0 {
        debug!(
            shortfall,
            quota_seats = split.quota,
            "quota pool exhausted, reallocating seats to general ranking"
        );
        take_into(
            &by_general,
            shortfall,
            Track::GeneralReallocated,
            &mut seated,
            &mut seats,
        );
    }
    let reallocated = seats.len() - general_count - quota_count;
    let unfilled_seats = request.total_seats - seats.len() as u32;

    debug!(
        total = split.total,
        general = general_count,
        quota = quota_count,
        reallocated,
        unfilled_seats,
        "allocation complete"
    );

    AllocationResult {
        request: *request,
        split,
        seats,
        reallocated_quota_seats: reallocated as u32,
        unfilled_seats,
    }
}

/// Candidates holding a rank, best first. The sort is stable so ties keep roster order.
fn ranked_by<F>(pool: &CandidatePool, rank: F) -> Vec<(&Candidate, u32)>
where
    F: Fn(&Candidate) -> Option<u32>,
{
    let mut ranked: Vec<(&Candidate, u32)> = pool
        .iter()
        .filter_map(|candidate| rank(candidate).map(|value| (candidate, value)))
        .collect();
    ranked.sort_by_key(|(_, value)| *value);
    ranked
}

fn take_into<'a>(
    ranked: &[(&'a Candidate, u32)],
    limit: usize,
    track: Track,
    seated: &mut HashSet<&'a RegistrationId>,
    seats: &mut Vec<Seat>,
) {
    let mut taken = 0;
    for &(candidate, _) in ranked {
        if taken == limit {
            break;
        }
        if seated.insert(&candidate.registration_id) {
            seats.push(Seat {
                candidate: candidate.clone(),
                track,
            });
            taken += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admission::domain::CandidateStatus;

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

    fn seated(result: &AllocationResult) -> Vec<(&str, Track)> {
        result
            .seats
            .iter()
            .map(|seat| (seat.candidate.registration_id.as_str(), seat.track))
            .collect()
    }

    #[test]
    fn split_always_sums_to_total() {
        for total in 0..200 {
            let split = SeatSplit::for_total(total);
            assert_eq!(split.general + split.quota, total);
            assert_eq!(split.quota, total / 5);
        }
        assert_eq!(SeatSplit::for_total(u32::MAX).quota, u32::MAX / 5);
    }

    #[test]
    fn small_totals_reserve_no_quota_seat() {
        let pool = CandidatePool::build(vec![
            candidate("1", Some(1), None),
            candidate("2", Some(2), Some(1)),
        ]);

        let result = allocate(&pool, &AllocationRequest::new(2));

        assert_eq!(result.split.quota, 0);
        assert_eq!(
            seated(&result),
            vec![("1", Track::General), ("2", Track::General)]
        );
        assert_eq!(result.reallocated_quota_seats, 0);
    }

    #[test]
    fn shallow_pool_yields_partial_fill() {
        let pool = CandidatePool::build(vec![
            candidate("1", Some(1), Some(1)),
            candidate("2", Some(2), None),
            candidate("3", Some(3), None),
        ]);

        let result = allocate(&pool, &AllocationRequest::new(5));

        assert_eq!(result.split.general, 4);
        assert_eq!(result.split.quota, 1);
        assert_eq!(result.seats.len(), 3);
        assert_eq!(result.count_on(Track::General), 3);
        assert_eq!(result.count_on(Track::Quota), 0);
        assert_eq!(result.count_on(Track::GeneralReallocated), 0);
        assert_eq!(result.unfilled_seats, 2);
        assert!(result.is_partial());
    }

    #[test]
    fn quota_seats_skip_candidates_seated_on_merit() {
        let pool = CandidatePool::build(vec![
            candidate("a", Some(1), Some(2)),
            candidate("b", Some(2), None),
            candidate("c", Some(3), None),
            candidate("d", Some(4), None),
            candidate("e", Some(5), Some(1)),
            candidate("f", Some(6), Some(3)),
        ]);

        let result = allocate(&pool, &AllocationRequest::new(5));

        assert_eq!(
            seated(&result),
            vec![
                ("a", Track::General),
                ("b", Track::General),
                ("c", Track::General),
                ("d", Track::General),
                ("e", Track::Quota),
            ]
        );
    }

    #[test]
    fn unfilled_quota_seats_move_to_general_ranking() {
        let pool = CandidatePool::build(vec![
            candidate("a", Some(1), None),
            candidate("b", Some(2), None),
            candidate("c", Some(3), None),
            candidate("d", Some(4), None),
            candidate("e", Some(5), None),
            candidate("f", Some(6), None),
            candidate("g", Some(7), None),
            candidate("h", Some(8), None),
            candidate("q", Some(20), Some(1)),
            candidate("x", Some(9), None),
            candidate("y", Some(10), None),
        ]);

        let result = allocate(&pool, &AllocationRequest::new(10));

        assert_eq!(result.split.quota, 2);
        let tail = &seated(&result)[8..];
        assert_eq!(
            tail,
            &[("q", Track::Quota), ("x", Track::GeneralReallocated)]
        );
        assert_eq!(result.reallocated_quota_seats, 1);
        assert_eq!(result.unfilled_seats, 0);
    }

    #[test]
    fn candidates_without_general_rank_only_compete_for_quota() {
        let pool = CandidatePool::build(vec![
            candidate("quota-only", None, Some(1)),
            candidate("a", Some(1), None),
            candidate("b", Some(2), None),
            candidate("c", Some(3), None),
            candidate("d", Some(4), None),
            candidate("e", Some(5), None),
        ]);

        let result = allocate(&pool, &AllocationRequest::new(5));

        assert_eq!(result.seat_for("quota-only").map(|s| s.track), Some(Track::Quota));
        assert!(result.seat_for("e").is_none());
    }

    #[test]
    fn ties_keep_roster_order() {
        let pool = CandidatePool::build(vec![
            candidate("late", Some(3), None),
            candidate("first-tie", Some(1), None),
            candidate("second-tie", Some(1), None),
        ]);

        let result = allocate(&pool, &AllocationRequest::new(2));

        assert_eq!(
            seated(&result),
            vec![("first-tie", Track::General), ("second-tie", Track::General)]
        );
    }

    #[test]
    fn sub_judice_exclusion_is_local_to_the_run() {
        let mut pending = candidate("pending", Some(1), None);
        pending.sub_judice = true;
        let pool = CandidatePool::build(vec![pending, candidate("next", Some(2), None)]);

        let result = allocate(&pool, &AllocationRequest::new(1).excluding_sub_judice());

        assert_eq!(seated(&result), vec![("next", Track::General)]);
        assert_eq!(pool.len(), 2);
        let unfiltered = allocate(&pool, &AllocationRequest::new(1));
        assert_eq!(seated(&unfiltered), vec![("pending", Track::General)]);
    }

    #[test]
    fn empty_pool_returns_empty_result() {
        let result = allocate(&CandidatePool::default(), &AllocationRequest::new(10));
        assert!(result.is_empty());
        assert_eq!(result.unfilled_seats, 10);
    }

    #[test]
    fn seat_count_far_beyond_pool_only_fills_what_exists() {
        let pool = CandidatePool::build(vec![
            candidate("a", Some(1), None),
            candidate("b", Some(2), Some(1)),
            candidate("c", None, Some(2)),
        ]);
        let result = allocate(&pool, &AllocationRequest::new(u32::MAX));

        assert_eq!(result.seats.len(), 3);
        assert_eq!(result.unfilled_seats, u32::MAX - 3);
        assert_eq!(result.split.general + result.split.quota, u32::MAX);
    }
}
