use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::common::EntityKind;
use crate::model::ids::IdGenerator;
use crate::model::store::{Tables, Vote};

use super::validator::validate_vote_cast;

/// Validate and record a vote.
///
/// On success the vote is stored, the candidate's and election's counters are
/// incremented, and the voter is marked as having voted. On failure nothing
/// is touched. The caller holds the write lock for the whole call, which is
/// what makes the four updates a single unit to readers.
pub fn record_vote(
    tables: &mut Tables,
    ids: &dyn IdGenerator,
    voter_id: &str,
    candidate_id: &str,
    election_id: &str,
    now: DateTime<Utc>,
) -> Result<Vote> {
    validate_vote_cast(tables, voter_id, candidate_id, election_id, now)?;

    // Borrow all three entities before changing any of them.
    let voter = tables
        .voters
        .get_mut(voter_id)
        .ok_or(Error::NotFound(EntityKind::Voter))?;
    let candidate = tables
        .candidates
        .get_mut(candidate_id)
        .ok_or(Error::NotFound(EntityKind::Candidate))?;
    let election = tables
        .elections
        .get_mut(election_id)
        .ok_or(Error::NotFound(EntityKind::Election))?;

    let vote = Vote::new(
        ids.next_id(EntityKind::Vote),
        voter.id.clone(),
        candidate.id.clone(),
        election.id.clone(),
        now,
    );
    candidate.increment_vote_count();
    election.increment_total_votes();
    voter.mark_voted();
    tables.insert_vote(vote.clone());

    Ok(vote)
}
