use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// States in the Election lifecycle.
///
/// The only transitions are `Scheduled -> Active -> Completed` and
/// `Scheduled -> Cancelled`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionState {
    /// Created and accepting candidates, not yet open for voting.
    Scheduled,
    /// Open for voting, within its time window.
    Active,
    /// Explicitly closed. Results are final.
    Completed,
    /// Abandoned before it started. Terminal.
    Cancelled,
}

impl ElectionState {
    /// Is `next` a legal successor of this state?
    pub fn can_transition_to(self, next: ElectionState) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::Active)
                | (Self::Active, Self::Completed)
                | (Self::Scheduled, Self::Cancelled)
        )
    }
}

impl Display for ElectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Scheduled => "Scheduled",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        };
        f.write_str(name)
    }
}
