use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Registration number identifying a candidate. Surrounding whitespace is never significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RegistrationId(String);

impl RegistrationId {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, raw: &str) -> bool {
        self.0 == raw.trim()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegistrationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for RegistrationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    /// Still waiting to be called.
    Awaiting,
    /// Already called in an earlier round; never part of a simulation.
    Called,
}

impl CandidateStatus {
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("CONVOCADO") {
            Self::Called
        } else {
            Self::Awaiting
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub registration_id: RegistrationId,
    pub name: String,
    pub status: CandidateStatus,
    pub general_rank: Option<u32>,
    pub quota_rank: Option<u32>,
    /// Eligibility pending litigation; such candidates can be left out of a run.
    pub sub_judice: bool,
}

impl Candidate {
    pub fn is_quota_eligible(&self) -> bool {
        self.quota_rank.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    General,
    Quota,
    GeneralReallocated,
}

impl Track {
    pub const fn ordered() -> [Self; 3] {
        [Self::General, Self::Quota, Self::GeneralReallocated]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Quota => "Quota",
            Self::GeneralReallocated => "General (reallocated)",
        }
    }

    /// General and reallocated seats are both decided by general rank.
    pub const fn is_general(self) -> bool {
        matches!(self, Self::General | Self::GeneralReallocated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub candidate: Candidate,
    pub track: Track,
}

impl Seat {
    /// Rank that earned the seat: general rank on general tracks, quota rank otherwise.
    pub fn rank_used(&self) -> Option<u32> {
        if self.track.is_general() {
            self.candidate.general_rank
        } else {
            self.candidate.quota_rank
        }
    }

    pub fn quota_eligible_on_general_merit(&self) -> bool {
        self.candidate.is_quota_eligible() && self.track.is_general()
    }
}
