//! Scripted runs against a [`VotingService`].
//!
//! A scenario is a JSON list of steps. Entities are created under an alias
//! chosen by the script and referred to by that alias afterwards. Times are
//! given in minutes relative to the start of the run, and the run keeps its
//! own clock, which only moves on an `advance` step.
//!
//! ```json
//! [
//!   { "step": "register_voter", "alias": "ann", "first_name": "Ann", "last_name": "Lee", "email": "ann@x.com" },
//!   { "step": "add_candidate", "alias": "bo", "first_name": "Bo", "last_name": "Ray", "party": "Green", "position": "Mayor" },
//!   { "step": "create_election", "alias": "city", "title": "City", "start_minutes": 0, "end_minutes": 60 },
//!   { "step": "link", "election": "city", "candidate": "bo" },
//!   { "step": "start", "election": "city" },
//!   { "step": "cast", "voter": "ann", "candidate": "bo", "election": "city" },
//!   { "step": "end", "election": "city" },
//!   { "step": "report", "election": "city" }
//! ]
//! ```

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::api::{ElectionReport, SystemStatistics};
use crate::model::common::voter::VoterStatus;
use crate::sample::SampleData;
use crate::VotingService;

/// One instruction in a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    RegisterVoter {
        alias: String,
        first_name: String,
        last_name: String,
        email: String,
        #[serde(default)]
        phone_number: String,
    },
    AddCandidate {
        alias: String,
        first_name: String,
        last_name: String,
        party: String,
        position: String,
        #[serde(default)]
        biography: Option<String>,
    },
    CreateElection {
        alias: String,
        title: String,
        #[serde(default)]
        description: String,
        start_minutes: i64,
        end_minutes: i64,
    },
    Link {
        election: String,
        candidate: String,
    },
    Unlink {
        election: String,
        candidate: String,
    },
    Start {
        election: String,
    },
    End {
        election: String,
    },
    /// Move the run's clock forward.
    Advance {
        minutes: i64,
    },
    SetVoterStatus {
        voter: String,
        status: VoterStatus,
    },
    Cast {
        voter: String,
        candidate: String,
        election: String,
    },
    Report {
        election: String,
    },
    Statistics,
}

/// A whole scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Problems with the script itself, as opposed to operations the service refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("Step {step}: unknown alias `{alias}`")]
    UnknownAlias { step: usize, alias: String },
    #[error("Step {step}: alias `{alias}` is already in use")]
    DuplicateAlias { step: usize, alias: String },
    #[error("Step {step}: {minutes} minutes from the start is out of range")]
    TimeOutOfRange { step: usize, minutes: i64 },
}

/// What happened at one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The service accepted the operation.
    Done { detail: String },
    /// The service refused the operation.
    Rejected { reason: String },
    Report(ElectionReport),
    Statistics(SystemStatistics),
}

impl Outcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done { detail } => write!(f, "ok: {detail}"),
            Self::Rejected { reason } => write!(f, "rejected: {reason}"),
            Self::Report(report) => write!(f, "{report}"),
            Self::Statistics(stats) => write!(
                f,
                "{} voters, {} candidates, {} elections ({} active), {} votes",
                stats.voter_count,
                stats.candidate_count,
                stats.election_count,
                stats.active_election_count,
                stats.vote_count
            ),
        }
    }
}

/// Executes scenarios against a service, keeping the alias table and clock between steps.
#[derive(Debug)]
pub struct Runner<'a> {
    service: &'a VotingService,
    started: DateTime<Utc>,
    now: DateTime<Utc>,
    aliases: HashMap<String, String>,
}

impl<'a> Runner<'a> {
    /// A runner whose clock starts at `started`.
    pub fn new(service: &'a VotingService, started: DateTime<Utc>) -> Self {
        Self {
            service,
            started,
            now: started,
            aliases: HashMap::new(),
        }
    }

    /// Make the sample entities available under lowercase first names
    /// (`john`, `alice`, ...) and as `presidential` and `mayoral`.
    pub fn with_sample(mut self, sample: &SampleData) -> Self {
        let people = sample
            .voters
            .iter()
            .map(|v| (&v.first_name, &v.id))
            .chain(sample.candidates.iter().map(|c| (&c.first_name, &c.id)));
        for (name, id) in people {
            self.aliases.insert(name.to_lowercase(), id.clone());
        }
        self.aliases
            .insert("presidential".to_string(), sample.presidential.id.clone());
        self.aliases
            .insert("mayoral".to_string(), sample.mayoral.id.clone());
        self
    }

    /// The run's current time.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Run every step in order, stopping at the first script error.
    /// Refused operations do not stop the run.
    pub fn run(&mut self, scenario: &Scenario) -> Result<Vec<Outcome>, ScenarioError> {
        scenario
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| self.step(i + 1, step))
            .collect()
    }

    fn step(&mut self, index: usize, step: &Step) -> Result<Outcome, ScenarioError> {
        trace!("Scenario step {index}: {step:?}");
        let outcome = match step {
            Step::RegisterVoter {
                alias,
                first_name,
                last_name,
                email,
                phone_number,
            } => {
                self.check_free(index, alias)?;
                match self
                    .service
                    .register_voter(first_name, last_name, email, phone_number)
                {
                    Ok(voter) => self.bind(alias, voter.id),
                    Err(err) => rejected(err),
                }
            }
            Step::AddCandidate {
                alias,
                first_name,
                last_name,
                party,
                position,
                biography,
            } => {
                self.check_free(index, alias)?;
                let candidate = self
                    .service
                    .add_candidate(first_name, last_name, party, position);
                if let Some(biography) = biography {
                    self.service.set_candidate_biography(&candidate.id, biography);
                }
                self.bind(alias, candidate.id)
            }
            Step::CreateElection {
                alias,
                title,
                description,
                start_minutes,
                end_minutes,
            } => {
                self.check_free(index, alias)?;
                let start = offset(index, self.started, *start_minutes)?;
                let end = offset(index, self.started, *end_minutes)?;
                match self.service.create_election(title, description, start, end) {
                    Ok(election) => self.bind(alias, election.id),
                    Err(err) => rejected(err),
                }
            }
            Step::Link {
                election,
                candidate,
            } => {
                let election = self.resolve(index, election)?;
                let candidate = self.resolve(index, candidate)?;
                check(
                    self.service.add_candidate_to_election(election, candidate),
                    format!("linked {candidate} to {election}"),
                    format!("cannot link {candidate} to {election}"),
                )
            }
            Step::Unlink {
                election,
                candidate,
            } => {
                let election = self.resolve(index, election)?;
                let candidate = self.resolve(index, candidate)?;
                check(
                    self.service
                        .remove_candidate_from_election(election, candidate),
                    format!("unlinked {candidate} from {election}"),
                    format!("cannot unlink {candidate} from {election}"),
                )
            }
            Step::Start { election } => {
                let election = self.resolve(index, election)?;
                check(
                    self.service.start_election(election),
                    format!("started {election}"),
                    format!("cannot start {election}"),
                )
            }
            Step::End { election } => {
                let election = self.resolve(index, election)?;
                check(
                    self.service.end_election(election),
                    format!("ended {election}"),
                    format!("cannot end {election}"),
                )
            }
            Step::Advance { minutes } => {
                self.now = offset(index, self.now, *minutes)?;
                let elapsed = self.now - self.started;
                Outcome::Done {
                    detail: format!("clock at +{} minutes", elapsed.num_minutes()),
                }
            }
            Step::SetVoterStatus { voter, status } => {
                let voter = self.resolve(index, voter)?;
                check(
                    self.service.update_voter_status(voter, *status),
                    format!("{voter} is now {status}"),
                    format!("cannot update {voter}"),
                )
            }
            Step::Cast {
                voter,
                candidate,
                election,
            } => {
                let voter = self.resolve(index, voter)?;
                let candidate = self.resolve(index, candidate)?;
                let election = self.resolve(index, election)?;
                match self.service.cast_vote_at(voter, candidate, election, self.now) {
                    Ok(vote) => Outcome::Done {
                        detail: format!("vote {} by {voter} for {candidate}", vote.id),
                    },
                    Err(err) => rejected(err),
                }
            }
            Step::Report { election } => {
                let election = self.resolve(index, election)?;
                match self.service.get_election_report_at(election, self.now) {
                    Some(report) => Outcome::Report(report),
                    None => Outcome::Rejected {
                        reason: format!("no election {election}"),
                    },
                }
            }
            Step::Statistics => {
                Outcome::Statistics(self.service.get_system_statistics_at(self.now))
            }
        };
        if outcome.is_rejected() {
            debug!("Scenario step {index} {outcome}");
        }
        Ok(outcome)
    }

    /// The entity ID behind an alias.
    fn resolve(&self, step: usize, alias: &str) -> Result<&str, ScenarioError> {
        self.aliases
            .get(alias)
            .map(String::as_str)
            .ok_or_else(|| ScenarioError::UnknownAlias {
                step,
                alias: alias.to_string(),
            })
    }

    fn check_free(&self, step: usize, alias: &str) -> Result<(), ScenarioError> {
        if self.aliases.contains_key(alias) {
            return Err(ScenarioError::DuplicateAlias {
                step,
                alias: alias.to_string(),
            });
        }
        Ok(())
    }

    fn bind(&mut self, alias: &str, id: String) -> Outcome {
        let detail = format!("{alias} is {id}");
        self.aliases.insert(alias.to_string(), id);
        Outcome::Done { detail }
    }
}

/// `from` moved by a number of minutes taken from the script.
fn offset(step: usize, from: DateTime<Utc>, minutes: i64) -> Result<DateTime<Utc>, ScenarioError> {
    Duration::try_minutes(minutes)
        .and_then(|duration| from.checked_add_signed(duration))
        .ok_or(ScenarioError::TimeOutOfRange { step, minutes })
}

fn rejected(err: impl Display) -> Outcome {
    Outcome::Rejected {
        reason: err.to_string(),
    }
}

fn check(accepted: bool, done: String, refused: String) -> Outcome {
    if accepted {
        Outcome::Done { detail: done }
    } else {
        Outcome::Rejected { reason: refused }
    }
}
