pub mod election;
mod entity;
pub mod voter;

pub use entity::EntityKind;

/// Our voter IDs are opaque strings.
pub type VoterId = String;
/// Our candidate IDs are opaque strings.
pub type CandidateId = String;
/// Our election IDs are opaque strings.
pub type ElectionId = String;
/// Our vote IDs are opaque strings.
pub type VoteId = String;
