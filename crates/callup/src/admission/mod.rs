//! Call-up simulation: candidate pool, seat allocation, outcome lookup and reporting.

pub mod domain;
mod engine;
mod outcome;
mod pool;
pub mod report;
pub mod router;
pub mod service;

pub use domain::{Candidate, CandidateStatus, RegistrationId, Seat, Track};
pub use engine::{allocate, AllocationRequest, AllocationResult, SeatSplit, QUOTA_SHARE_PERCENT};
pub use outcome::{resolve, OutcomeRecord, Verdict};
pub use pool::CandidatePool;
pub use router::callup_router;
pub use service::{CallUpService, SimulationError, SimulationOutcome};
