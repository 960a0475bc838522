use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{CandidateId, ElectionId, VoteId, VoterId};

/// A cast vote. The store never edits or removes one after insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Unique ID.
    pub id: VoteId,
    pub voter_id: VoterId,
    pub candidate_id: CandidateId,
    pub election_id: ElectionId,
    pub cast_at: DateTime<Utc>,
    pub valid: bool,
}

impl Vote {
    /// Create a valid vote cast at `cast_at`.
    pub fn new(
        id: VoteId,
        voter_id: VoterId,
        candidate_id: CandidateId,
        election_id: ElectionId,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            voter_id,
            candidate_id,
            election_id,
            cast_at,
            valid: true,
        }
    }
}
