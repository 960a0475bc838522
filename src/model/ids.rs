use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::common::EntityKind;

/// Source of fresh, unique identifiers for new entities.
pub trait IdGenerator: Debug + Send + Sync {
    /// Produce an ID for a new entity of the given kind. Never repeats.
    fn next_id(&self, kind: EntityKind) -> String;
}

/// Which [`IdGenerator`] to build from configuration.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// `V000001`, `C000001`, ...
    #[default]
    Sequential,
    /// `V1700000000000_123`: creation time in milliseconds plus a random suffix.
    Timestamped,
}

impl IdScheme {
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            Self::Sequential => Box::<SequentialIds>::default(),
            Self::Timestamped => Box::<TimestampedIds>::default(),
        }
    }
}

/// A counter used to implement auto-increment IDs.
#[derive(Debug)]
pub struct Counter {
    next: AtomicU64,
}

impl Counter {
    /// Create a new `Counter` starting at the given value.
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Atomically retrieve the next value of the counter.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

/// Per-kind auto-increment IDs, prefixed with the entity kind.
#[derive(Debug)]
pub struct SequentialIds {
    counters: [Counter; 4],
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self {
            counters: [Counter::new(1), Counter::new(1), Counter::new(1), Counter::new(1)],
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self, kind: EntityKind) -> String {
        let n = self.counters[kind.index()].next();
        format!("{}{n:06}", kind.prefix())
    }
}

/// Timestamp-plus-random IDs. Two draws can coincide within the same
/// millisecond, so every issued ID is remembered and clashes are redrawn.
///
/// The issued set lives as long as the generator and is never pruned, the
/// same as the entity tables it issues IDs for.
#[derive(Debug, Default)]
pub struct TimestampedIds {
    issued: Mutex<HashSet<String>>,
}

/// Random suffixes are drawn from `0..SUFFIX_RANGE`.
const SUFFIX_RANGE: u32 = 1000;

impl IdGenerator for TimestampedIds {
    fn next_id(&self, kind: EntityKind) -> String {
        let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);
        let mut rng = rand::thread_rng();
        loop {
            let millis = Utc::now().timestamp_millis();
            let suffix = rng.gen_range(0..SUFFIX_RANGE);
            let id = format!("{}{millis}_{suffix}", kind.prefix());
            if issued.insert(id.clone()) {
                return id;
            }
            trace!("Redrawing clashing ID {id}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_increment() {
        const START: u64 = 5;

        let counter = Counter::new(START);
        assert_eq!(counter.next(), START);
        assert_eq!(counter.next(), START + 1);
    }

    #[test]
    fn sequential_ids_are_prefixed_per_kind() {
        let ids = SequentialIds::default();
        assert_eq!(ids.next_id(EntityKind::Voter), "V000001");
        assert_eq!(ids.next_id(EntityKind::Voter), "V000002");
        assert_eq!(ids.next_id(EntityKind::Candidate), "C000001");
        assert_eq!(ids.next_id(EntityKind::Election), "E000001");
        assert_eq!(ids.next_id(EntityKind::Vote), "VOTE000001");
    }

    #[test]
    fn timestamped_ids_never_repeat() {
        let ids = TimestampedIds::default();
        // More IDs than there are suffixes, so clashes within a millisecond are likely.
        let count = 3 * SUFFIX_RANGE as usize;
        let drawn = (0..count)
            .map(|_| ids.next_id(EntityKind::Vote))
            .collect::<HashSet<_>>();
        assert_eq!(drawn.len(), count);
        assert!(drawn.iter().all(|id| id.starts_with("VOTE")));
    }

    #[test]
    fn scheme_builds_matching_generator() {
        let ids = IdScheme::Sequential.generator();
        assert_eq!(ids.next_id(EntityKind::Election), "E000001");

        let ids = IdScheme::Timestamped.generator();
        let id = ids.next_id(EntityKind::Candidate);
        assert!(id.starts_with('C'));
        assert!(id.contains('_'));
    }
}
