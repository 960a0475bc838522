use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::common::{election::ElectionState, ElectionId};

use super::ElectionResults;

/// Everything publicly known about one election at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionReport {
    pub election_id: ElectionId,
    pub title: String,
    pub state: ElectionState,
    pub results: ElectionResults,
    /// Full name of the winner, once there is one.
    pub winner: Option<String>,
    pub total_votes: u64,
    /// Percentage of all registered voters.
    pub turnout: f64,
}

impl Display for ElectionReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} ({}, {})", self.title, self.election_id, self.state)?;
        for result in self.results.ranked() {
            writeln!(f, "  {result}")?;
        }
        match &self.winner {
            Some(name) => writeln!(f, "  Winner: {name}")?,
            None => writeln!(f, "  Winner: not decided")?,
        }
        write!(
            f,
            "  Turnout: {:.1}% ({} vote{})",
            self.turnout,
            self.total_votes,
            if self.total_votes != 1 { "s" } else { "" }
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_ranks_results() {
        let expected = "Mayoral Election 2024 (E000002, Completed)
  Emma Evans: 2 votes
  Daniel Davis: 1 vote
  Winner: Emma Evans
  Turnout: 60.0% (3 votes)";
        assert_eq!(ElectionReport::example().to_string(), expected);
    }

    #[test]
    fn undecided() {
        let report = ElectionReport {
            state: ElectionState::Active,
            winner: None,
            ..ElectionReport::example()
        };
        assert!(report.to_string().contains("Winner: not decided"));
    }
}
