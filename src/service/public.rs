use chrono::{DateTime, Utc};

use crate::engine::tally;
use crate::error::{Error, Result};
use crate::model::api::{ElectionReport, ElectionResults, SystemStatistics};
use crate::model::common::EntityKind;
use crate::model::store::Candidate;

use super::VotingService;

impl VotingService {
    /// Vote counts for every candidate linked to the election, in link order.
    /// Empty if there is no such election.
    pub fn get_results(&self, election_id: &str) -> ElectionResults {
        tally::results(&self.store.read(), election_id)
    }

    /// The winning candidate, if the election is over. See [`VotingService::get_winner_at`].
    pub fn get_winner(&self, election_id: &str) -> Option<Candidate> {
        self.get_winner_at(election_id, Utc::now())
    }

    /// The candidate with the most votes, if the election is completed at `now`.
    ///
    /// `None` if the election is unknown, still running, or has no candidates.
    /// A tie goes to the tied candidate that was linked first.
    pub fn get_winner_at(&self, election_id: &str, now: DateTime<Utc>) -> Option<Candidate> {
        tally::winner(&self.store.read(), election_id, now)
    }

    /// Votes in the election as a percentage of all registered voters.
    pub fn get_turnout(&self, election_id: &str) -> f64 {
        tally::turnout(&self.store.read(), election_id)
    }

    /// Number of votes cast in the election, or 0 if there is no such election.
    pub fn get_total_votes(&self, election_id: &str) -> u64 {
        self.store
            .read()
            .election(election_id)
            .map_or(0, |election| election.total_votes())
    }

    /// Recount the election's votes and check them against its stored counters.
    pub fn verify_tally(&self, election_id: &str) -> Result<()> {
        let tables = self.store.read();
        let election = tables
            .election(election_id)
            .ok_or(Error::NotFound(EntityKind::Election))?;
        tally::verify(&tables, election).map_err(|err| {
            warn!("Tally of election {election_id} is inconsistent: {err}");
            Error::from(err)
        })
    }

    /// Results, winner and turnout of the election as of `now`, read under one lock.
    pub fn get_election_report_at(
        &self,
        election_id: &str,
        now: DateTime<Utc>,
    ) -> Option<ElectionReport> {
        let tables = self.store.read();
        let election = tables.election(election_id)?;
        Some(ElectionReport {
            election_id: election.id.clone(),
            title: election.title.clone(),
            state: election.state(),
            results: tally::results(&tables, election_id),
            winner: tally::winner(&tables, election_id, now).map(|c| c.full_name()),
            total_votes: election.total_votes(),
            turnout: tally::turnout(&tables, election_id),
        })
    }

    pub fn get_system_statistics(&self) -> SystemStatistics {
        self.get_system_statistics_at(Utc::now())
    }

    /// Whole-system counts, with elections counted as active if open at `now`.
    pub fn get_system_statistics_at(&self, now: DateTime<Utc>) -> SystemStatistics {
        tally::statistics(&self.store.read(), now)
    }
}
