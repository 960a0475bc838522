//! The voting service: the entry point for every operation on the core.
//!
//! Operations are split by audience, as `voter`, `admin`, `voting` and
//! `public`, but all live on the one [`VotingService`].
//!
//! Operations that depend on the current time have an `_at` variant taking
//! an explicit instant; the plain variant uses [`Utc::now`](chrono::Utc::now).

mod admin;
mod public;
mod voter;
mod voting;

use crate::config::Config;
use crate::model::ids::{IdGenerator, SequentialIds};
use crate::model::store::Store;

/// Owns the entity store and the ID generator.
///
/// The service is `Sync`, so one instance can be shared by reference between
/// threads, e.g. with [`std::thread::scope`].
///
/// The tables are private to the service; every change goes through an
/// operation that keeps the vote counters in step with the votes.
///
/// ```compile_fail
/// let service = voting_system::VotingService::new();
/// service.store();
/// ```
#[derive(Debug)]
pub struct VotingService {
    store: Store,
    ids: Box<dyn IdGenerator>,
}

impl VotingService {
    /// An empty service issuing sequential IDs.
    pub fn new() -> Self {
        Self::with_id_generator(SequentialIds::default())
    }

    /// An empty service issuing IDs from the given generator.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            store: Store::new(),
            ids: Box::new(ids),
        }
    }

    /// An empty service issuing IDs from the configured scheme.
    pub fn from_config(config: &Config) -> Self {
        debug!("Creating service with {:?} IDs", config.id_scheme());
        Self {
            store: Store::new(),
            ids: config.id_scheme().generator(),
        }
    }
}

impl Default for VotingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Listings come out of hash maps, so order them by ID for stable output.
fn sorted_by_id<T>(mut items: Vec<T>, id: impl Fn(&T) -> &String) -> Vec<T> {
    items.sort_by(|a, b| id(a).cmp(id(b)));
    items
}
