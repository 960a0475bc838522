use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::api::{CandidateResult, ElectionResults, SystemStatistics};
use crate::model::common::CandidateId;
use crate::model::store::{Candidate, Election, Tables};

/// A stored counter that disagrees with the vote records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    /// A candidate's vote count does not match the number of votes for them.
    #[error("candidate {candidate_id} has a count of {recorded} but {counted} recorded votes")]
    Candidate {
        candidate_id: CandidateId,
        recorded: u64,
        counted: u64,
    },
    /// The election's total does not match the number of votes in it.
    #[error("election total is {recorded} but there are {counted} recorded votes")]
    Total { recorded: u64, counted: u64 },
}

/// Resolve the election's linked candidates against the store, in link order.
/// Links to candidates missing from the store are skipped.
fn linked_candidates<'a>(
    tables: &'a Tables,
    election: &'a Election,
) -> impl Iterator<Item = &'a Candidate> + 'a {
    election
        .candidates()
        .iter()
        .filter_map(|id| tables.candidate(id))
}

/// Vote counts for every candidate linked to the election, zeros included,
/// in link order. An unknown election has empty results.
pub fn results(tables: &Tables, election_id: &str) -> ElectionResults {
    let Some(election) = tables.election(election_id) else {
        return ElectionResults::default();
    };
    let entries = linked_candidates(tables, election)
        .map(|candidate| CandidateResult {
            candidate_id: candidate.id.clone(),
            name: candidate.full_name(),
            votes: candidate.vote_count(),
        })
        .collect();
    ElectionResults::new(entries)
}

/// The candidate with the most votes, once the election is completed at `now`.
///
/// Ties go to whichever tied candidate was linked first. Callers should not
/// rely on a particular winner in a tie.
pub fn winner(tables: &Tables, election_id: &str, now: DateTime<Utc>) -> Option<Candidate> {
    let election = tables.election(election_id)?;
    if !election.is_completed_at(now) {
        return None;
    }
    let mut best: Option<&Candidate> = None;
    for candidate in linked_candidates(tables, election) {
        // Strictly greater, so the first-seen candidate keeps a tie.
        if best.map_or(true, |b| candidate.vote_count() > b.vote_count()) {
            best = Some(candidate);
        }
    }
    best.cloned()
}

/// Votes in the election as a percentage of all registered voters.
/// Zero when nobody is registered or the election is unknown.
pub fn turnout(tables: &Tables, election_id: &str) -> f64 {
    let registered = tables.voter_count();
    if registered == 0 {
        return 0.0;
    }
    let votes = tables
        .election(election_id)
        .map_or(0, Election::total_votes);
    votes as f64 / registered as f64 * 100.0
}

/// Recount the valid vote records and check them against the stored counters
/// of the election and of each of its linked candidates.
///
/// Candidate counters cover every election the candidate is linked to, so they
/// are recounted across all votes, not just this election's.
pub fn verify(tables: &Tables, election: &Election) -> Result<(), TallyError> {
    let mut per_candidate: HashMap<&str, u64> = HashMap::new();
    let mut in_election = 0;
    for vote in tables.votes().filter(|v| v.valid) {
        *per_candidate.entry(vote.candidate_id.as_str()).or_insert(0) += 1;
        if vote.election_id == election.id {
            in_election += 1;
        }
    }

    for candidate in linked_candidates(tables, election) {
        let counted = per_candidate
            .get(candidate.id.as_str())
            .copied()
            .unwrap_or(0);
        if candidate.vote_count() != counted {
            return Err(TallyError::Candidate {
                candidate_id: candidate.id.clone(),
                recorded: candidate.vote_count(),
                counted,
            });
        }
    }

    if election.total_votes() != in_election {
        return Err(TallyError::Total {
            recorded: election.total_votes(),
            counted: in_election,
        });
    }

    Ok(())
}

/// Whole-system counts, with election activity judged at `now`.
pub fn statistics(tables: &Tables, now: DateTime<Utc>) -> SystemStatistics {
    SystemStatistics {
        voter_count: tables.voter_count(),
        election_count: tables.elections().count(),
        candidate_count: tables.candidates().count(),
        vote_count: tables.votes().count(),
        active_election_count: tables.elections().filter(|e| e.is_active_at(now)).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::engine::{recorder::record_vote, validator::tests::tables_with_active_election};
    use crate::model::common::election::ElectionState;
    use crate::model::ids::SequentialIds;
    use crate::model::store::Voter;

    /// An active election with both example candidates linked, and `voters` voters registered.
    fn tables_with_two_candidates(voters: usize) -> Tables {
        let mut tables = Tables::default();
        for i in 1..=voters {
            tables
                .insert_voter(Voter::new(
                    format!("V{i:06}"),
                    "Voter".to_string(),
                    format!("Number{i}"),
                    format!("voter{i}@email.com"),
                    "555-0100".to_string(),
                ))
                .unwrap();
        }
        tables.insert_candidate(Candidate::example1());
        tables.insert_candidate(Candidate::example2());
        let mut election = Election::current_example();
        assert!(election.link_candidate("C000002"));
        assert!(election.link_candidate("C000001"));
        assert!(election.transition(ElectionState::Active));
        tables.insert_election(election);
        tables
    }

    fn cast(tables: &mut Tables, ids: &SequentialIds, voter: usize, candidate: &str) {
        let voter = format!("V{voter:06}");
        record_vote(tables, ids, &voter, candidate, "E000001", Utc::now()).unwrap();
    }

    fn complete(tables: &mut Tables) {
        assert!(tables
            .election_mut("E000001")
            .unwrap()
            .transition(ElectionState::Completed));
    }

    #[test]
    fn results_in_link_order_with_zeros() {
        let mut tables = tables_with_two_candidates(3);
        let ids = SequentialIds::default();
        cast(&mut tables, &ids, 1, "C000001");

        let results = results(&tables, "E000001");
        let entries = results.iter().cloned().collect::<Vec<_>>();
        assert_eq!(
            entries,
            vec![
                CandidateResult {
                    candidate_id: "C000002".to_string(),
                    name: "Bob Baker".to_string(),
                    votes: 0,
                },
                CandidateResult {
                    candidate_id: "C000001".to_string(),
                    name: "Alice Anderson".to_string(),
                    votes: 1,
                },
            ]
        );
    }

    #[test]
    fn unknown_election_has_empty_results() {
        let tables = tables_with_active_election();
        assert!(results(&tables, "nowhere").is_empty());
        assert_eq!(winner(&tables, "nowhere", Utc::now()), None);
        assert_eq!(turnout(&tables, "nowhere"), 0.0);
    }

    #[test]
    fn winner_only_once_completed() {
        let mut tables = tables_with_two_candidates(3);
        let ids = SequentialIds::default();
        cast(&mut tables, &ids, 1, "C000001");
        cast(&mut tables, &ids, 2, "C000001");
        cast(&mut tables, &ids, 3, "C000002");

        assert_eq!(winner(&tables, "E000001", Utc::now()), None);

        // Past the end time counts as completed, even while still `Active`.
        let end = tables.election("E000001").unwrap().end_time;
        assert_eq!(winner(&tables, "E000001", end).map(|c| c.id), Some("C000001".to_string()));

        complete(&mut tables);
        assert_eq!(
            winner(&tables, "E000001", Utc::now()).map(|c| c.id),
            Some("C000001".to_string())
        );
    }

    #[test]
    fn tie_goes_to_first_linked() {
        let mut tables = tables_with_two_candidates(2);
        let ids = SequentialIds::default();
        cast(&mut tables, &ids, 1, "C000001");
        cast(&mut tables, &ids, 2, "C000002");
        complete(&mut tables);

        // C000002 was linked first.
        assert_eq!(
            winner(&tables, "E000001", Utc::now()).map(|c| c.id),
            Some("C000002".to_string())
        );
    }

    #[test]
    fn no_winner_without_candidates() {
        let mut tables = Tables::default();
        let mut election = Election::past_example();
        assert!(election.transition(ElectionState::Active));
        tables.insert_election(election);
        assert_eq!(winner(&tables, "E000003", Utc::now()), None);
    }

    #[test]
    fn turnout_over_all_registered_voters() {
        let mut tables = tables_with_two_candidates(4);
        let ids = SequentialIds::default();
        assert_eq!(turnout(&tables, "E000001"), 0.0);

        cast(&mut tables, &ids, 1, "C000001");
        assert_eq!(turnout(&tables, "E000001"), 25.0);

        assert_eq!(turnout(&Tables::default(), "E000001"), 0.0);
    }

    #[test]
    fn verify_after_casting() {
        let mut tables = tables_with_two_candidates(5);
        let ids = SequentialIds::default();
        for voter in 1..=5 {
            cast(&mut tables, &ids, voter, if voter % 2 == 0 { "C000001" } else { "C000002" });
        }

        let election = tables.election("E000001").unwrap();
        assert_eq!(verify(&tables, election), Ok(()));

        let sum: u64 = results(&tables, "E000001").iter().map(|r| r.votes).sum();
        assert_eq!(sum, election.total_votes());
    }

    #[test]
    fn verify_detects_drift() {
        let mut tables = tables_with_two_candidates(1);
        let ids = SequentialIds::default();
        cast(&mut tables, &ids, 1, "C000001");

        let mut drifted = tables.election("E000001").unwrap().clone();
        drifted.increment_total_votes();
        assert_eq!(
            verify(&tables, &drifted),
            Err(TallyError::Total {
                recorded: 2,
                counted: 1,
            })
        );

        tables.candidate_mut("C000002").unwrap().increment_vote_count();
        let election = tables.election("E000001").unwrap();
        assert_eq!(
            verify(&tables, election),
            Err(TallyError::Candidate {
                candidate_id: "C000002".to_string(),
                recorded: 1,
                counted: 0,
            })
        );
    }

    #[test]
    fn statistics_count_everything() {
        let mut tables = tables_with_two_candidates(2);
        let ids = SequentialIds::default();
        cast(&mut tables, &ids, 1, "C000001");
        tables.insert_election(Election::future_example());

        assert_eq!(
            statistics(&tables, Utc::now()),
            SystemStatistics {
                voter_count: 2,
                election_count: 2,
                candidate_count: 2,
                vote_count: 1,
                active_election_count: 1,
            }
        );
    }
}
