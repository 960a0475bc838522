use chrono::{DateTime, Utc};

use crate::engine::{recorder, validator};
use crate::error::Result;
use crate::logging::OperationId;
use crate::model::store::Vote;

use super::VotingService;

impl VotingService {
    /// Cast a vote now. See [`VotingService::cast_vote_at`].
    pub fn cast_vote(&self, voter_id: &str, candidate_id: &str, election_id: &str) -> Result<Vote> {
        self.cast_vote_at(voter_id, candidate_id, election_id, Utc::now())
    }

    /// Cast a vote at `now`.
    ///
    /// Eligibility is checked and the vote recorded under one write lock, so
    /// concurrent casts by the same voter cannot both succeed and no reader
    /// sees the counters without the vote. A rejected cast changes nothing.
    pub fn cast_vote_at(
        &self,
        voter_id: &str,
        candidate_id: &str,
        election_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vote> {
        let op = OperationId::next();
        debug!("->op{op} cast vote by {voter_id} for {candidate_id} in {election_id}");

        let mut tables = self.store.write();
        match recorder::record_vote(
            &mut tables,
            self.ids.as_ref(),
            voter_id,
            candidate_id,
            election_id,
            now,
        ) {
            Ok(vote) => {
                debug!("<-op{op} recorded vote {}", vote.id);
                Ok(vote)
            }
            Err(err) => {
                debug!("<-op{op} rejected: {err}");
                Err(err)
            }
        }
    }

    /// Would this vote be accepted right now? Nothing is recorded.
    pub fn validate_vote_cast(
        &self,
        voter_id: &str,
        candidate_id: &str,
        election_id: &str,
    ) -> Result<()> {
        self.validate_vote_cast_at(voter_id, candidate_id, election_id, Utc::now())
    }

    /// Would this vote be accepted at `now`? Nothing is recorded.
    pub fn validate_vote_cast_at(
        &self,
        voter_id: &str,
        candidate_id: &str,
        election_id: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        validator::validate_vote_cast(&self.store.read(), voter_id, candidate_id, election_id, now)
    }

    pub fn get_vote(&self, vote_id: &str) -> Option<Vote> {
        self.store.read().vote(vote_id).cloned()
    }

    /// Every vote cast in the election, oldest first.
    pub fn get_votes_for_election(&self, election_id: &str) -> Vec<Vote> {
        let mut votes: Vec<Vote> = self
            .store
            .read()
            .votes()
            .filter(|vote| vote.election_id == election_id)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.cast_at.cmp(&b.cast_at).then_with(|| a.id.cmp(&b.id)));
        votes
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{Duration, Utc};

    use crate::error::{Error, InvalidState};
    use crate::model::common::{voter::VoterStatus, EntityKind};
    use crate::VotingService;

    #[service_test]
    fn register_link_vote_and_tally(service: VotingService) {
        let a = service
            .register_voter("Ada", "Alpha", "a@x.com", "555-0001")
            .unwrap();
        assert_eq!(
            service.register_voter("Bea", "Beta", "a@x.com", "555-0002"),
            Err(Error::DuplicateEmail("a@x.com".to_string()))
        );

        let now = Utc::now();
        let e1 = service
            .create_election("E1", "", now, now + Duration::days(1))
            .unwrap();
        let c1 = service.add_candidate("Carl", "One", "Independent", "Mayor");
        assert!(service.add_candidate_to_election(&e1.id, &c1.id));
        assert!(service.start_election(&e1.id));

        let vote = service.cast_vote(&a.id, &c1.id, &e1.id).unwrap();
        assert_eq!(vote.voter_id, a.id);
        assert!(vote.valid);
        assert_eq!(service.get_vote(&vote.id), Some(vote.clone()));
        assert_eq!(service.get_votes_for_election(&e1.id), vec![vote]);

        let expected = HashMap::from([("Carl One".to_string(), 1)]);
        assert_eq!(service.get_results(&e1.id).to_map(), expected);

        assert_eq!(
            service.cast_vote(&a.id, &c1.id, &e1.id),
            Err(Error::InvalidState(InvalidState::AlreadyVoted))
        );
        assert!(service.get_voter(&a.id).unwrap().has_voted());
        assert_eq!(service.get_total_votes(&e1.id), 1);
    }

    #[service_test(sample)]
    fn scheduled_election_refuses_votes(service: &VotingService) {
        let election = service.get_all_elections().remove(0);
        assert_eq!(election.candidates().len(), 3);

        // Inside the window, but never started.
        let inside = election.start_time + Duration::minutes(1);
        assert_eq!(
            service.cast_vote_at("V000001", "C000001", &election.id, inside),
            Err(Error::InvalidState(InvalidState::ElectionNotActive))
        );
        assert!(service.start_election(&election.id));
        assert_eq!(
            service.validate_vote_cast_at("V000001", "C000001", &election.id, inside),
            Ok(())
        );

        // Started, but before the window opens.
        assert_eq!(
            service.validate_vote_cast_at(
                "V000001",
                "C000001",
                &election.id,
                election.start_time - Duration::seconds(1)
            ),
            Err(Error::InvalidState(InvalidState::ElectionNotActive))
        );
        assert!(service.get_votes_for_election(&election.id).is_empty());
    }

    #[service_test(sample)]
    fn rejections_in_order(service: &VotingService) {
        let presidential = service.get_all_elections()[0].clone();
        assert!(service.start_election(&presidential.id));
        let during = presidential.start_time + Duration::minutes(1);
        let cast = |voter: &str, candidate: &str, election: &str| {
            service.cast_vote_at(voter, candidate, election, during)
        };

        assert_eq!(
            cast("V999999", "C000001", &presidential.id),
            Err(Error::NotFound(EntityKind::Voter))
        );
        assert!(service.update_voter_status("V000005", VoterStatus::Suspended));
        assert_eq!(
            cast("V000005", "C000001", &presidential.id),
            Err(Error::InvalidState(InvalidState::VoterInactive))
        );
        assert_eq!(
            cast("V000001", "C000001", "E999999"),
            Err(Error::NotFound(EntityKind::Election))
        );
        assert_eq!(
            cast("V000001", "C999999", &presidential.id),
            Err(Error::NotFound(EntityKind::Candidate))
        );
        // Daniel Davis is running for mayor.
        assert_eq!(
            cast("V000001", "C000004", &presidential.id),
            Err(Error::InvalidState(InvalidState::CandidateNotInElection))
        );

        cast("V000001", "C000001", &presidential.id).unwrap();
        assert!(service
            .validate_vote_cast_at("V000002", "C000002", &presidential.id, during)
            .is_ok());

        // One vote per voter for the lifetime of the system, not per election.
        let mayoral = service.get_all_elections()[1].clone();
        assert!(service.start_election(&mayoral.id));
        assert_eq!(
            service.cast_vote_at(
                "V000001",
                "C000004",
                &mayoral.id,
                mayoral.start_time + Duration::minutes(1)
            ),
            Err(Error::InvalidState(InvalidState::AlreadyVoted))
        );
    }

    #[service_test]
    fn concurrent_votes_are_all_counted(service: VotingService) {
        let now = Utc::now();
        let election = service
            .create_election("Busy", "", now, now + Duration::days(1))
            .unwrap();
        let candidate = service.add_candidate("Popular", "Person", "Independent", "Mayor");
        assert!(service.add_candidate_to_election(&election.id, &candidate.id));
        assert!(service.start_election(&election.id));

        let voters: Vec<String> = (0..100)
            .map(|i| {
                service
                    .register_voter("Voter", &i.to_string(), &format!("voter{i}@x.com"), "555")
                    .unwrap()
                    .id
            })
            .collect();

        std::thread::scope(|scope| {
            for voter in &voters {
                let service = &service;
                let (candidate, election) = (&candidate.id, &election.id);
                scope.spawn(move || service.cast_vote(voter, candidate, election).unwrap());
            }
        });

        assert_eq!(service.get_candidate(&candidate.id).unwrap().vote_count(), 100);
        assert_eq!(service.get_total_votes(&election.id), 100);
        assert_eq!(service.get_votes_for_election(&election.id).len(), 100);
        assert_eq!(service.verify_tally(&election.id), Ok(()));
    }

    #[service_test]
    fn concurrent_votes_by_one_voter(service: VotingService) {
        let now = Utc::now();
        let election = service
            .create_election("Contested", "", now, now + Duration::days(1))
            .unwrap();
        let candidate = service.add_candidate("Only", "Choice", "Independent", "Mayor");
        assert!(service.add_candidate_to_election(&election.id, &candidate.id));
        assert!(service.start_election(&election.id));
        let voter = service
            .register_voter("Eager", "Voter", "eager@x.com", "555")
            .unwrap();

        let accepted = std::thread::scope(|scope| {
            let mut handles = Vec::new();
            for _ in 0..20 {
                handles.push(
                    scope.spawn(|| service.cast_vote(&voter.id, &candidate.id, &election.id)),
                );
            }
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(Result::is_ok)
                .count()
        });

        assert_eq!(accepted, 1);
        assert_eq!(service.get_total_votes(&election.id), 1);
    }
}
