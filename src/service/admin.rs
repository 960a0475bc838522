use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::logging::OperationId;
use crate::model::common::{election::ElectionState, EntityKind};
use crate::model::store::{Candidate, Election};

use super::{sorted_by_id, VotingService};

impl VotingService {
    /// Create a new scheduled election with no candidates.
    ///
    /// Fails with [`Error::InvalidRange`] if `start_time` is after `end_time`.
    /// Equal times are accepted, though such an election can never be voted in.
    pub fn create_election(
        &self,
        title: &str,
        description: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Election> {
        let op = OperationId::next();
        debug!("->op{op} create election {title:?} from {start_time} to {end_time}");

        if start_time > end_time {
            debug!("<-op{op} rejected: start after end");
            return Err(Error::InvalidRange {
                start: start_time,
                end: end_time,
            });
        }

        let election = Election::new(
            self.ids.next_id(EntityKind::Election),
            title.to_string(),
            description.to_string(),
            start_time,
            end_time,
        );
        self.store.write().insert_election(election.clone());

        debug!("<-op{op} created election {}", election.id);
        Ok(election)
    }

    /// Open a scheduled election. Returns `false` if there is no such
    /// election or it is not `Scheduled`.
    pub fn start_election(&self, election_id: &str) -> bool {
        self.transition_election(election_id, ElectionState::Active)
    }

    /// Close an active election. Returns `false` if there is no such
    /// election or it is not `Active`.
    pub fn end_election(&self, election_id: &str) -> bool {
        self.transition_election(election_id, ElectionState::Completed)
    }

    fn transition_election(&self, election_id: &str, next: ElectionState) -> bool {
        let op = OperationId::next();
        debug!("->op{op} move election {election_id} to {next}");

        let mut tables = self.store.write();
        let Some(election) = tables.election_mut(election_id) else {
            debug!("<-op{op} no such election");
            return false;
        };
        let from = election.state();
        let moved = election.transition(next);
        if moved {
            debug!("<-op{op} {from} -> {next}");
        } else {
            debug!("<-op{op} illegal transition from {from}");
        }
        moved
    }

    /// Create a new active candidate with no votes, not linked to any election.
    pub fn add_candidate(
        &self,
        first_name: &str,
        last_name: &str,
        party: &str,
        position: &str,
    ) -> Candidate {
        let op = OperationId::next();
        debug!("->op{op} add candidate {first_name} {last_name} ({party}) for {position}");

        let candidate = Candidate::new(
            self.ids.next_id(EntityKind::Candidate),
            first_name.to_string(),
            last_name.to_string(),
            party.to_string(),
            position.to_string(),
        );
        self.store.write().insert_candidate(candidate.clone());

        debug!("<-op{op} created candidate {}", candidate.id);
        candidate
    }

    /// Link a candidate to an election.
    ///
    /// Returns `false` if either does not exist or the election is no longer
    /// `Scheduled`. Linking an already-linked candidate changes nothing and
    /// returns `true`.
    pub fn add_candidate_to_election(&self, election_id: &str, candidate_id: &str) -> bool {
        let op = OperationId::next();
        debug!("->op{op} link candidate {candidate_id} to election {election_id}");

        let mut tables = self.store.write();
        if tables.candidate(candidate_id).is_none() {
            debug!("<-op{op} no such candidate");
            return false;
        }
        let Some(election) = tables.election_mut(election_id) else {
            debug!("<-op{op} no such election");
            return false;
        };
        let linked = election.link_candidate(candidate_id);
        if linked {
            debug!("<-op{op} linked");
        } else {
            debug!("<-op{op} election is {}", election.state());
        }
        linked
    }

    /// Unlink a candidate from a still-`Scheduled` election.
    /// Returns whether a link was removed.
    pub fn remove_candidate_from_election(&self, election_id: &str, candidate_id: &str) -> bool {
        let op = OperationId::next();
        debug!("->op{op} unlink candidate {candidate_id} from election {election_id}");

        let mut tables = self.store.write();
        let removed = tables
            .election_mut(election_id)
            .map_or(false, |election| election.unlink_candidate(candidate_id));
        debug!("<-op{op} {}", if removed { "unlinked" } else { "nothing to unlink" });
        removed
    }

    /// Replace a candidate's biography. Returns `false` if there is no such candidate.
    pub fn set_candidate_biography(&self, candidate_id: &str, biography: &str) -> bool {
        let mut tables = self.store.write();
        match tables.candidate_mut(candidate_id) {
            Some(candidate) => {
                candidate.biography = Some(biography.to_string());
                true
            }
            None => false,
        }
    }

    pub fn get_election(&self, election_id: &str) -> Option<Election> {
        self.store.read().election(election_id).cloned()
    }

    /// Every election, ordered by ID.
    pub fn get_all_elections(&self) -> Vec<Election> {
        sorted_by_id(self.store.read().elections().cloned().collect(), |e| &e.id)
    }

    /// Elections open for voting right now.
    pub fn get_active_elections(&self) -> Vec<Election> {
        self.get_active_elections_at(Utc::now())
    }

    /// Elections open for voting at `now`, ordered by ID.
    pub fn get_active_elections_at(&self, now: DateTime<Utc>) -> Vec<Election> {
        sorted_by_id(
            self.store
                .read()
                .elections()
                .filter(|e| e.is_active_at(now))
                .cloned()
                .collect(),
            |e| &e.id,
        )
    }

    pub fn get_candidate(&self, candidate_id: &str) -> Option<Candidate> {
        self.store.read().candidate(candidate_id).cloned()
    }

    /// Every candidate, ordered by ID.
    pub fn get_all_candidates(&self) -> Vec<Candidate> {
        sorted_by_id(self.store.read().candidates().cloned().collect(), |c| &c.id)
    }
}
