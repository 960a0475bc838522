use serde::{Deserialize, Serialize};

/// Whole-system counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SystemStatistics {
    pub voter_count: usize,
    pub election_count: usize,
    pub candidate_count: usize,
    pub vote_count: usize,
    /// Elections that are `Active` and inside their voting window right now.
    pub active_election_count: usize,
}
