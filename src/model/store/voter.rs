use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::{voter::VoterStatus, VoterId};

/// A registered voter, as held in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    /// Unique ID.
    pub id: VoterId,
    pub first_name: String,
    pub last_name: String,
    /// Unique across all voters.
    pub email: String,
    pub phone_number: String,
    pub registered_at: DateTime<Utc>,
    pub status: VoterStatus,
    /// Set once, by the vote recorder, and never cleared.
    has_voted: bool,
}

impl Voter {
    /// Create a new, active voter who has not yet voted.
    pub fn new(
        id: VoterId,
        first_name: String,
        last_name: String,
        email: String,
        phone_number: String,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            phone_number,
            registered_at: Utc::now(),
            status: VoterStatus::Active,
            has_voted: false,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    pub(crate) fn mark_voted(&mut self) {
        self.has_voted = true;
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Voter {
        pub fn example1() -> Self {
            Self::new(
                "V000001".to_string(),
                "John".to_string(),
                "Doe".to_string(),
                "john.doe@email.com".to_string(),
                "123-456-7890".to_string(),
            )
        }

        pub fn example2() -> Self {
            Self::new(
                "V000002".to_string(),
                "Jane".to_string(),
                "Smith".to_string(),
                "jane.smith@email.com".to_string(),
                "123-456-7891".to_string(),
            )
        }
    }
}
