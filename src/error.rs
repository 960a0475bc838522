use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::engine::tally::TallyError;
use crate::model::common::EntityKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the voting core. All of them are local validation
/// failures: none is retried internally and none is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error("Invalid state: {0}")]
    InvalidState(InvalidState),
    #[error("A voter with email {0} already exists")]
    DuplicateEmail(String),
    #[error("Start date {start} is after end date {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Tally verification failed: {0}")]
    Tally(#[from] TallyError),
}

/// Why an entity was in the wrong state for the requested operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidState {
    /// The voter's status is not `Active`.
    VoterInactive,
    /// The voter has already cast their vote.
    AlreadyVoted,
    /// The election is not `Active`, or the current time is outside its window.
    ElectionNotActive,
    /// The candidate is not linked to the election.
    CandidateNotInElection,
}

impl Display for InvalidState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::VoterInactive => "voter is not active",
            Self::AlreadyVoted => "voter has already voted",
            Self::ElectionNotActive => "election is not active",
            Self::CandidateNotInElection => "candidate is not part of this election",
        };
        f.write_str(msg)
    }
}

impl From<InvalidState> for Error {
    fn from(reason: InvalidState) -> Self {
        Self::InvalidState(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(Error::NotFound(EntityKind::Voter).to_string(), "Voter not found");
        assert_eq!(
            Error::from(InvalidState::AlreadyVoted).to_string(),
            "Invalid state: voter has already voted"
        );
        assert_eq!(
            Error::DuplicateEmail("a@x.com".to_string()).to_string(),
            "A voter with email a@x.com already exists"
        );
    }
}
