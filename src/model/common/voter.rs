use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Registration status of a voter. Only `Active` voters may cast a vote.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoterStatus {
    Active,
    Inactive,
    Suspended,
}

impl Display for VoterStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Suspended => "Suspended",
        };
        f.write_str(name)
    }
}
