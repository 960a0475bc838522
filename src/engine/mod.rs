//! The vote-casting and tally engine. Every function here works on
//! [`Tables`](crate::model::store::Tables) the caller has already locked, and
//! takes the current time explicitly.

pub mod recorder;
pub mod tally;
pub mod validator;
