//! Report types handed back to callers of the voting service.

mod report;
mod results;
mod statistics;

pub use report::ElectionReport;
pub use results::{CandidateResult, ElectionResults};
pub use statistics::SystemStatistics;
