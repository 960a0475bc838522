use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::common::CandidateId;

/// The vote count for one linked candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub candidate_id: CandidateId,
    /// Candidate full name; results are keyed by this.
    pub name: String,
    pub votes: u64,
}

impl Display for CandidateResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} vote{}",
            self.name,
            self.votes,
            if self.votes != 1 { "s" } else { "" }
        )
    }
}

/// Per-candidate results of one election, in candidate link order.
/// Sorting is left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionResults {
    entries: Vec<CandidateResult>,
}

impl ElectionResults {
    pub fn new(entries: Vec<CandidateResult>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Votes recorded under the given candidate name.
    pub fn votes_for(&self, name: &str) -> Option<u64> {
        self.entries.iter().find(|r| r.name == name).map(|r| r.votes)
    }

    /// Name to count mapping. Candidates sharing a full name are summed.
    pub fn to_map(&self) -> HashMap<String, u64> {
        let mut map = HashMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            *map.entry(entry.name.clone()).or_insert(0) += entry.votes;
        }
        map
    }

    /// Entries ordered by votes descending, ties kept in link order.
    pub fn ranked(&self) -> Vec<&CandidateResult> {
        let mut ranked = self.entries.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.votes.cmp(&a.votes));
        ranked
    }
}

impl IntoIterator for ElectionResults {
    type Item = CandidateResult;
    type IntoIter = std::vec::IntoIter<CandidateResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
