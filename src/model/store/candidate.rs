use serde::{Deserialize, Serialize};

use crate::model::common::CandidateId;

/// A candidate, as held in the store. Candidates exist independently of
/// elections and are linked to them by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique ID.
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub party: String,
    /// The office being contested, e.g. "Mayor".
    pub position: String,
    pub biography: Option<String>,
    pub active: bool,
    /// Number of valid votes referencing this candidate. Never decreases.
    vote_count: u64,
}

impl Candidate {
    /// Create a new active candidate with no votes.
    pub fn new(
        id: CandidateId,
        first_name: String,
        last_name: String,
        party: String,
        position: String,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            party,
            position,
            biography: None,
            active: true,
            vote_count: 0,
        }
    }

    /// The name results are reported under.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn vote_count(&self) -> u64 {
        self.vote_count
    }

    pub(crate) fn increment_vote_count(&mut self) {
        self.vote_count += 1;
    }
}
