//! The entity store: every voter, candidate, election and vote, keyed by ID.
//!
//! All tables sit behind a single reader/writer lock so that a vote cast,
//! which touches four tables, is observed by readers as one unit.

mod candidate;
mod election;
mod vote;
mod voter;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use candidate::Candidate;
pub use election::Election;
pub use vote::Vote;
pub use voter::Voter;

use crate::error::{Error, Result};
use crate::model::common::{voter::VoterStatus, CandidateId, ElectionId, VoteId, VoterId};

/// The raw entity tables. Obtain them through [`Store::read`].
///
/// Only the service mutates the tables, so the counters always agree with
/// the recorded votes:
///
/// ```compile_fail
/// use voting_system::model::store::Store;
///
/// let store = Store::new();
/// store.write().candidate_mut("C000001");
/// ```
#[derive(Debug, Default)]
pub struct Tables {
    pub(crate) voters: HashMap<VoterId, Voter>,
    /// Secondary index enforcing email uniqueness.
    pub(crate) voter_emails: HashMap<String, VoterId>,
    pub(crate) candidates: HashMap<CandidateId, Candidate>,
    pub(crate) elections: HashMap<ElectionId, Election>,
    pub(crate) votes: HashMap<VoteId, Vote>,
}

impl Tables {
    pub fn voter(&self, id: &str) -> Option<&Voter> {
        self.voters.get(id)
    }

    pub fn voter_by_email(&self, email: &str) -> Option<&Voter> {
        self.voter_emails
            .get(email)
            .and_then(|id| self.voters.get(id))
    }

    pub fn voters(&self) -> impl Iterator<Item = &Voter> {
        self.voters.values()
    }

    pub fn voters_with_status(&self, status: VoterStatus) -> impl Iterator<Item = &Voter> {
        self.voters.values().filter(move |v| v.status == status)
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Insert a new voter, failing if the email is already registered.
    pub(crate) fn insert_voter(&mut self, voter: Voter) -> Result<()> {
        if self.voter_emails.contains_key(&voter.email) {
            return Err(Error::DuplicateEmail(voter.email));
        }
        self.voter_emails.insert(voter.email.clone(), voter.id.clone());
        self.voters.insert(voter.id.clone(), voter);
        Ok(())
    }

    pub(crate) fn voter_mut(&mut self, id: &str) -> Option<&mut Voter> {
        self.voters.get_mut(id)
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.get(id)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    pub(crate) fn insert_candidate(&mut self, candidate: Candidate) {
        self.candidates.insert(candidate.id.clone(), candidate);
    }

    pub(crate) fn candidate_mut(&mut self, id: &str) -> Option<&mut Candidate> {
        self.candidates.get_mut(id)
    }

    pub fn election(&self, id: &str) -> Option<&Election> {
        self.elections.get(id)
    }

    pub fn elections(&self) -> impl Iterator<Item = &Election> {
        self.elections.values()
    }

    pub(crate) fn insert_election(&mut self, election: Election) {
        self.elections.insert(election.id.clone(), election);
    }

    pub(crate) fn election_mut(&mut self, id: &str) -> Option<&mut Election> {
        self.elections.get_mut(id)
    }

    pub fn vote(&self, id: &str) -> Option<&Vote> {
        self.votes.get(id)
    }

    pub fn votes(&self) -> impl Iterator<Item = &Vote> {
        self.votes.values()
    }

    /// Votes are only ever inserted by the recorder, and never updated or removed.
    pub(crate) fn insert_vote(&mut self, vote: Vote) {
        self.votes.insert(vote.id.clone(), vote);
    }
}

/// Thread-safe owner of the [`Tables`].
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared access to the tables.
    ///
    /// Writers only mutate after all validation has passed, so a poisoned lock
    /// still guards consistent tables and is recovered from.
    pub fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the tables.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}
