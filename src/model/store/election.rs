use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{election::ElectionState, CandidateId, ElectionId};

/// An election, as held in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    /// Unique ID.
    pub id: ElectionId,
    pub title: String,
    pub description: String,
    /// Voting opens at this instant (inclusive).
    pub start_time: DateTime<Utc>,
    /// Voting closes at this instant (exclusive).
    pub end_time: DateTime<Utc>,
    state: ElectionState,
    /// Linked candidates, in the order they were linked. No duplicates.
    candidates: Vec<CandidateId>,
    /// Number of valid votes referencing this election. Never decreases.
    total_votes: u64,
}

impl Election {
    /// Create a new scheduled election with no candidates.
    /// The caller is responsible for checking that `start_time <= end_time`.
    pub fn new(
        id: ElectionId,
        title: String,
        description: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            start_time,
            end_time,
            state: ElectionState::Scheduled,
            candidates: Vec::new(),
            total_votes: 0,
        }
    }

    pub fn state(&self) -> ElectionState {
        self.state
    }

    /// Linked candidate IDs in link order.
    pub fn candidates(&self) -> &[CandidateId] {
        &self.candidates
    }

    pub fn has_candidate(&self, candidate_id: &str) -> bool {
        self.candidates.iter().any(|id| id == candidate_id)
    }

    pub fn total_votes(&self) -> u64 {
        self.total_votes
    }

    /// Is the election open for voting at `now`?
    /// This needs both the `Active` state and `now` inside `[start_time, end_time)`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.state == ElectionState::Active && self.start_time <= now && now < self.end_time
    }

    /// Are the results final at `now`? An election past its end time counts as
    /// completed even if nobody ended it explicitly.
    pub fn is_completed_at(&self, now: DateTime<Utc>) -> bool {
        self.state == ElectionState::Completed || now >= self.end_time
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed_at(Utc::now())
    }

    /// Move to `next` if that is a legal transition. Returns whether the state changed.
    pub(crate) fn transition(&mut self, next: ElectionState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            false
        }
    }

    /// Link a candidate. Only allowed while scheduled; linking twice is a no-op.
    /// Returns false iff the election is no longer scheduled.
    pub(crate) fn link_candidate(&mut self, candidate_id: &str) -> bool {
        if self.state != ElectionState::Scheduled {
            return false;
        }
        if !self.has_candidate(candidate_id) {
            self.candidates.push(candidate_id.to_string());
        }
        true
    }

    /// Unlink a candidate. Only allowed while scheduled.
    /// Returns whether a link was removed.
    pub(crate) fn unlink_candidate(&mut self, candidate_id: &str) -> bool {
        if self.state != ElectionState::Scheduled {
            return false;
        }
        let before = self.candidates.len();
        self.candidates.retain(|id| id != candidate_id);
        self.candidates.len() != before
    }

    pub(crate) fn increment_total_votes(&mut self) {
        self.total_votes += 1;
    }
}
