pub mod candidate;
pub mod priority;

pub use candidate::{CandidateId, CandidateResult};
pub use priority::{Criterion, ParsePriorityError, PriorityConfiguration, PriorityLevel};
