//! A small population of voters, candidates and elections for demos and tests.

use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::model::store::{Candidate, Election, Voter};
use crate::VotingService;

/// First name, last name, email, phone.
const VOTERS: [(&str, &str, &str, &str); 5] = [
    ("John", "Doe", "john.doe@email.com", "123-456-7890"),
    ("Jane", "Smith", "jane.smith@email.com", "123-456-7891"),
    ("Mike", "Johnson", "mike.johnson@email.com", "123-456-7892"),
    ("Sarah", "Williams", "sarah.williams@email.com", "123-456-7893"),
    ("David", "Brown", "david.brown@email.com", "123-456-7894"),
];

/// First name, last name, party, position.
const PRESIDENTIAL_CANDIDATES: [(&str, &str, &str, &str); 3] = [
    ("Alice", "Anderson", "Democratic Party", "President"),
    ("Bob", "Baker", "Republican Party", "President"),
    ("Carol", "Carter", "Independent", "President"),
];

const MAYORAL_CANDIDATES: [(&str, &str, &str, &str); 2] = [
    ("Daniel", "Davis", "Progressive Party", "Mayor"),
    ("Emma", "Evans", "Conservative Party", "Mayor"),
];

/// Everything [`seed`] created, as it was at creation.
#[derive(Debug, Clone)]
pub struct SampleData {
    pub voters: Vec<Voter>,
    pub candidates: Vec<Candidate>,
    pub presidential: Election,
    pub mayoral: Election,
}

/// Seed the service relative to the current time. See [`seed_at`].
pub fn seed(service: &VotingService) -> Result<SampleData> {
    seed_at(service, Utc::now())
}

/// Register five voters, add five candidates, and create two scheduled
/// elections with their candidates linked:
///
/// * the presidential election, open from `now + 1 minute` for seven days,
///   with the three presidential candidates;
/// * the mayoral election, open from `now + 2 minutes` until `now + 5 days`,
///   with the two mayoral candidates.
///
/// Fails if any of the sample emails is already registered.
pub fn seed_at(service: &VotingService, now: DateTime<Utc>) -> Result<SampleData> {
    info!("Seeding sample data");

    let voters = VOTERS
        .iter()
        .map(|(first, last, email, phone)| service.register_voter(first, last, email, phone))
        .collect::<Result<Vec<_>>>()?;

    let add = |(first, last, party, position): &(&str, &str, &str, &str)| {
        service.add_candidate(first, last, party, position)
    };
    let presidential_candidates: Vec<Candidate> = PRESIDENTIAL_CANDIDATES.iter().map(add).collect();
    let mayoral_candidates: Vec<Candidate> = MAYORAL_CANDIDATES.iter().map(add).collect();

    let presidential = service.create_election(
        "Presidential Election 2024",
        "General election for President of the United States",
        now + Duration::minutes(1),
        now + Duration::days(7),
    )?;
    let mayoral = service.create_election(
        "Mayoral Election 2024",
        "City mayoral election",
        now + Duration::minutes(2),
        now + Duration::days(5),
    )?;

    for (election, candidates) in [
        (&presidential, &presidential_candidates),
        (&mayoral, &mayoral_candidates),
    ] {
        for candidate in candidates {
            if !service.add_candidate_to_election(&election.id, &candidate.id) {
                warn!("Sample candidate {} was not linked to {}", candidate.id, election.id);
            }
        }
    }

    info!(
        "Seeded {} voters, {} candidates, elections {} and {}",
        voters.len(),
        presidential_candidates.len() + mayoral_candidates.len(),
        presidential.id,
        mayoral.id
    );

    Ok(SampleData {
        voters,
        candidates: presidential_candidates
            .into_iter()
            .chain(mayoral_candidates)
            .collect(),
        // Re-read to pick up the links.
        presidential: service.get_election(&presidential.id).unwrap_or(presidential),
        mayoral: service.get_election(&mayoral.id).unwrap_or(mayoral),
    })
}
