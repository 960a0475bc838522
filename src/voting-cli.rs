//! A command line front-end for the voting core.
//! It seeds and runs a demonstration election, or replays a scripted scenario.

use std::fs;

use chrono::{DateTime, Duration, Utc};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use serde_json::json;
use thiserror::Error;

use voting_system::{
    logging,
    model::{
        api::{ElectionReport, SystemStatistics},
        common::EntityKind,
    },
    sample,
    scenario::{Outcome, Runner, Scenario, ScenarioError},
    Config, VotingService,
};

const PROGRAM_NAME: &str = "voting-cli";

const ABOUT_TEXT: &str = "Run elections against the in-memory voting core.

EXIT CODES:
     0: Success.
   255: Ran successfully, but a scenario step was rejected.
 Other: Error.";

const DEMO: &str = "demo";
const RUN: &str = "run";
const SCENARIO_PATH: &str = "SCENARIO_PATH";
const JSON: &str = "json";
const SAMPLE: &str = "sample";

const SCENARIO_PATH_HELP: &str = "The path to a JSON scenario file,\n\
a list of steps as described in the `scenario` module";

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .arg(
            Arg::new(JSON)
                .long(JSON)
                .help("Print output as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new(DEMO)
                .about("Seed sample data, vote in both sample elections and print the results"),
        )
        .subcommand(
            Command::new(RUN)
                .about("Replay a scenario file")
                .arg(
                    Arg::new(SCENARIO_PATH)
                        .help(SCENARIO_PATH_HELP)
                        .action(ArgAction::Set)
                        .required(true),
                )
                .arg(
                    Arg::new(SAMPLE)
                        .long(SAMPLE)
                        .help("Seed sample data first, with aliases like `john` and `presidential`")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Errors that this program may produce.
#[derive(Debug, Error)]
enum Error {
    /// IO error described by the inner message.
    #[error("IO error: {0}")]
    IO(String),
    /// Failed to decode the scenario file.
    #[error("Malformed scenario: {0}")]
    Format(String),
    /// The scenario refers to something it never defined.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    /// The core refused an operation that the program relies on.
    #[error(transparent)]
    Voting(#[from] voting_system::Error),
    /// The core refused to move an election through its lifecycle.
    #[error("Election {0} could not be {1}")]
    Lifecycle(String, &'static str),
}

/// Which voter votes for which candidate in the demo, by index into the sample data.
/// Voters 0-2 vote for president, voters 3-4 for mayor.
const DEMO_BALLOTS: [(usize, usize); 5] = [(0, 0), (1, 1), (2, 0), (3, 4), (4, 4)];

/// Seed the sample data, run both elections to completion and report on them.
fn demo(service: &VotingService) -> Result<(Vec<ElectionReport>, SystemStatistics), Error> {
    let started = Utc::now();
    let sample = sample::seed_at(service, started)?;
    let elections = [&sample.presidential, &sample.mayoral];
    for election in elections {
        if !service.start_election(&election.id) {
            return Err(Error::Lifecycle(election.id.clone(), "started"));
        }
    }

    // Both sample elections are open three minutes in.
    let polling = started + Duration::minutes(3);
    for (voter, candidate) in DEMO_BALLOTS {
        let candidate = &sample.candidates[candidate];
        let election = if sample.presidential.has_candidate(&candidate.id) {
            &sample.presidential
        } else {
            &sample.mayoral
        };
        service.cast_vote_at(&sample.voters[voter].id, &candidate.id, &election.id, polling)?;
    }

    let reports = elections
        .into_iter()
        .map(|election| close(service, &election.id, polling))
        .collect::<Result<_, _>>()?;
    Ok((reports, service.get_system_statistics_at(polling)))
}

/// End an election and report on it.
fn close(
    service: &VotingService,
    election_id: &str,
    now: DateTime<Utc>,
) -> Result<ElectionReport, Error> {
    if !service.end_election(election_id) {
        return Err(Error::Lifecycle(election_id.to_string(), "ended"));
    }
    service
        .get_election_report_at(election_id, now)
        .ok_or(Error::Voting(voting_system::Error::NotFound(EntityKind::Election)))
}

/// Load and replay a scenario file.
fn replay(service: &VotingService, path: &str, with_sample: bool) -> Result<Vec<Outcome>, Error> {
    let json = fs::read_to_string(path).map_err(|e| Error::IO(format!("{path}: {e}")))?;
    let scenario = Scenario::from_json(&json).map_err(|e| Error::Format(e.to_string()))?;
    info!("Replaying {} steps from {path}", scenario.steps.len());

    let started = Utc::now();
    let mut runner = Runner::new(service, started);
    if with_sample {
        runner = runner.with_sample(&sample::seed_at(service, started)?);
    }
    Ok(runner.run(&scenario)?)
}

/// Run the program and return the exit code.
fn run(args: &ArgMatches, config: &Config) -> u8 {
    let as_json = args.get_flag(JSON);
    let service = VotingService::from_config(config);

    match args.subcommand() {
        Some((DEMO, _)) => match demo(&service) {
            Ok((reports, statistics)) => {
                if as_json {
                    println!(
                        "{}",
                        json!({ "elections": reports, "statistics": statistics })
                    );
                } else {
                    for report in &reports {
                        println!("{report}\n");
                    }
                    println!("{}", Outcome::Statistics(statistics));
                }
                0
            }
            Err(err) => {
                println!("Demo failed: {err}");
                1
            }
        },
        Some((RUN, sub_args)) => {
            let Some(path) = sub_args.get_one::<String>(SCENARIO_PATH) else {
                return 1;
            };
            let with_sample = sub_args.get_flag(SAMPLE) || config.sample_data();
            match replay(&service, path, with_sample) {
                Ok(outcomes) => {
                    if as_json {
                        println!("{}", json!(outcomes));
                    } else {
                        for (i, outcome) in outcomes.iter().enumerate() {
                            println!("{:>3}. {outcome}", i + 1);
                        }
                    }
                    if outcomes.iter().any(Outcome::is_rejected) {
                        255
                    } else {
                        0
                    }
                }
                Err(err) => {
                    println!("Scenario failed: {err}");
                    1
                }
            }
        }
        _ => 1,
    }
}

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            std::process::exit(1)
        }
    };
    if let Err(err) = logging::init(config.log_config()) {
        eprintln!("{err}");
        std::process::exit(1)
    }
    info!("Initialised logging");

    let args = cli().get_matches();
    let exit_code = run(&args, &config);
    if exit_code == 1 {
        error!("{PROGRAM_NAME} failed");
    }
    std::process::exit(exit_code.into())
}
