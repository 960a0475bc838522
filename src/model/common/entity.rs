use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The kinds of entity held in the store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Voter,
    Candidate,
    Election,
    Vote,
}

impl EntityKind {
    /// Identifier prefix for this kind of entity.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Voter => "V",
            Self::Candidate => "C",
            Self::Election => "E",
            Self::Vote => "VOTE",
        }
    }

    /// A dense index, for per-kind tables.
    pub fn index(self) -> usize {
        match self {
            Self::Voter => 0,
            Self::Candidate => 1,
            Self::Election => 2,
            Self::Vote => 3,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Voter => "Voter",
            Self::Candidate => "Candidate",
            Self::Election => "Election",
            Self::Vote => "Vote",
        };
        f.write_str(name)
    }
}
