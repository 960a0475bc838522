use chrono::{DateTime, Utc};

use crate::error::{Error, InvalidState, Result};
use crate::model::common::{voter::VoterStatus, EntityKind};
use crate::model::store::Tables;

/// Check whether `voter_id` may cast a vote for `candidate_id` in `election_id` at `now`.
///
/// Checks run in a fixed order and the first failure is reported:
/// voter exists, voter is active, voter has not voted, election exists,
/// election is active at `now`, candidate exists, candidate is linked to the election.
pub fn validate_vote_cast(
    tables: &Tables,
    voter_id: &str,
    candidate_id: &str,
    election_id: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let voter = tables
        .voter(voter_id)
        .ok_or(Error::NotFound(EntityKind::Voter))?;
    if voter.status != VoterStatus::Active {
        return Err(InvalidState::VoterInactive.into());
    }
    if voter.has_voted() {
        return Err(InvalidState::AlreadyVoted.into());
    }

    let election = tables
        .election(election_id)
        .ok_or(Error::NotFound(EntityKind::Election))?;
    if !election.is_active_at(now) {
        return Err(InvalidState::ElectionNotActive.into());
    }

    if tables.candidate(candidate_id).is_none() {
        return Err(Error::NotFound(EntityKind::Candidate));
    }
    if !election.has_candidate(candidate_id) {
        return Err(InvalidState::CandidateNotInElection.into());
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use crate::model::common::election::ElectionState;
    use crate::model::store::{Candidate, Election, Voter};

    /// Two voters, two candidates, and an active election with only the first candidate linked.
    pub(crate) fn tables_with_active_election() -> Tables {
        let mut tables = Tables::default();
        tables.insert_voter(Voter::example1()).unwrap();
        tables.insert_voter(Voter::example2()).unwrap();
        tables.insert_candidate(Candidate::example1());
        tables.insert_candidate(Candidate::example2());

        let mut election = Election::current_example();
        assert!(election.link_candidate("C000001"));
        assert!(election.transition(ElectionState::Active));
        tables.insert_election(election);
        tables
    }

    #[test]
    fn eligible_vote_passes() {
        let tables = tables_with_active_election();
        let result = validate_vote_cast(&tables, "V000001", "C000001", "E000001", Utc::now());
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn each_check_in_turn() {
        let mut tables = tables_with_active_election();
        let now = Utc::now();
        let check = |tables: &Tables, voter, candidate, election| {
            validate_vote_cast(tables, voter, candidate, election, now)
        };

        assert_eq!(
            check(&tables, "nobody", "C000001", "E000001"),
            Err(Error::NotFound(EntityKind::Voter))
        );

        assert_eq!(
            check(&tables, "V000001", "C000001", "nowhere"),
            Err(Error::NotFound(EntityKind::Election))
        );

        assert_eq!(
            check(&tables, "V000001", "nobody", "E000001"),
            Err(Error::NotFound(EntityKind::Candidate))
        );

        assert_eq!(
            check(&tables, "V000001", "C000002", "E000001"),
            Err(Error::InvalidState(InvalidState::CandidateNotInElection))
        );

        tables.voter_mut("V000001").unwrap().mark_voted();
        assert_eq!(
            check(&tables, "V000001", "C000001", "E000001"),
            Err(Error::InvalidState(InvalidState::AlreadyVoted))
        );

        tables.voter_mut("V000002").unwrap().status = VoterStatus::Inactive;
        assert_eq!(
            check(&tables, "V000002", "C000001", "E000001"),
            Err(Error::InvalidState(InvalidState::VoterInactive))
        );
    }

    #[test]
    fn first_failure_wins() {
        let mut tables = tables_with_active_election();
        tables.voter_mut("V000001").unwrap().status = VoterStatus::Suspended;
        tables.voter_mut("V000001").unwrap().mark_voted();

        // Inactive is checked before already-voted, and both before anything about the election.
        assert_eq!(
            validate_vote_cast(&tables, "V000001", "nobody", "nowhere", Utc::now()),
            Err(Error::InvalidState(InvalidState::VoterInactive))
        );

        // Election activity is checked before the candidate exists.
        let election_end = tables.election("E000001").unwrap().end_time;
        assert_eq!(
            validate_vote_cast(&tables, "V000002", "nobody", "E000001", election_end),
            Err(Error::InvalidState(InvalidState::ElectionNotActive))
        );
    }

    #[test]
    fn scheduled_election_inside_window_is_not_active() {
        let mut tables = tables_with_active_election();
        let mut scheduled = Election::current_example();
        scheduled.id = "E000009".to_string();
        assert!(scheduled.link_candidate("C000001"));
        tables.insert_election(scheduled);

        assert_eq!(
            validate_vote_cast(&tables, "V000001", "C000001", "E000009", Utc::now()),
            Err(Error::InvalidState(InvalidState::ElectionNotActive))
        );
    }
}
