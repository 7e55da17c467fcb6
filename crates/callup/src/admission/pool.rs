use super::domain::{Candidate, CandidateStatus};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Immutable set of candidates eligible for simulation, in ingestion order.
///
/// Cloning is cheap; every transformation returns a new pool and leaves the
/// original untouched, so concurrent simulations can share one snapshot.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    candidates: Arc<[Candidate]>,
}

impl CandidatePool {
    /// Builds a pool, dropping already-called candidates and repeated registration ids.
    pub fn build<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();

        for candidate in candidates {
            if candidate.status == CandidateStatus::Called {
                continue;
            }
            if !seen.insert(candidate.registration_id.clone()) {
                warn!(
                    registration_id = %candidate.registration_id,
                    "duplicate registration id dropped from pool"
                );
                continue;
            }
            kept.push(candidate);
        }

        Self {
            candidates: kept.into(),
        }
    }

    /// Returns a new pool without the candidates whose eligibility is sub judice.
    pub fn exclude_sub_judice(&self) -> Self {
        let kept: Vec<Candidate> = self
            .candidates
            .iter()
            .filter(|candidate| !candidate.sub_judice)
            .cloned()
            .collect();

        Self {
            candidates: kept.into(),
        }
    }

    pub fn by_id(&self, registration_id: &str) -> Option<&Candidate> {
        self.candidates
            .iter()
            .find(|candidate| candidate.registration_id.matches(registration_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn quota_eligible_count(&self) -> usize {
        self.iter().filter(|c| c.is_quota_eligible()).count()
    }

    pub fn sub_judice_count(&self) -> usize {
        self.iter().filter(|c| c.sub_judice).count()
    }
}
