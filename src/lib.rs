//! An in-memory election management core: voters, candidates, elections,
//! vote casting and tallying, behind a single thread-safe [`VotingService`].

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate service_test;

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod sample;
pub mod scenario;
pub mod service;

pub use config::Config;
pub use error::{Error, Result};
pub use service::VotingService;
