use crate::error::{Error, Result};
use crate::logging::OperationId;
use crate::model::common::{voter::VoterStatus, EntityKind};
use crate::model::store::Voter;

use super::{sorted_by_id, VotingService};

impl VotingService {
    /// Register a new, active voter. Emails must be unique (exact match).
    pub fn register_voter(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: &str,
    ) -> Result<Voter> {
        let op = OperationId::next();
        debug!("->op{op} register voter {email}");

        let mut tables = self.store.write();
        // Reject before drawing an ID.
        if tables.voter_by_email(email).is_some() {
            debug!("<-op{op} email already registered");
            return Err(Error::DuplicateEmail(email.to_string()));
        }
        let voter = Voter::new(
            self.ids.next_id(EntityKind::Voter),
            first_name.to_string(),
            last_name.to_string(),
            email.to_string(),
            phone_number.to_string(),
        );
        tables.insert_voter(voter.clone())?;

        debug!("<-op{op} registered voter {}", voter.id);
        Ok(voter)
    }

    pub fn get_voter(&self, voter_id: &str) -> Option<Voter> {
        self.store.read().voter(voter_id).cloned()
    }

    pub fn get_voter_by_email(&self, email: &str) -> Option<Voter> {
        self.store.read().voter_by_email(email).cloned()
    }

    /// Every registered voter, ordered by ID.
    pub fn get_all_voters(&self) -> Vec<Voter> {
        sorted_by_id(self.store.read().voters().cloned().collect(), |v| &v.id)
    }

    pub fn get_voters_by_status(&self, status: VoterStatus) -> Vec<Voter> {
        sorted_by_id(
            self.store.read().voters_with_status(status).cloned().collect(),
            |v| &v.id,
        )
    }

    /// Change a voter's status. Returns `false` if there is no such voter.
    ///
    /// This never resets whether the voter has voted.
    pub fn update_voter_status(&self, voter_id: &str, status: VoterStatus) -> bool {
        let op = OperationId::next();
        debug!("->op{op} set voter {voter_id} to {status}");

        let mut tables = self.store.write();
        match tables.voter_mut(voter_id) {
            Some(voter) => {
                voter.status = status;
                debug!("<-op{op} done");
                true
            }
            None => {
                debug!("<-op{op} no such voter");
                false
            }
        }
    }
}
