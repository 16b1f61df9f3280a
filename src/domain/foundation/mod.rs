//! Foundation value objects shared by every domain module.

mod errors;
mod ids;
mod match_percent;

pub use errors::ValidationError;
pub use ids::SubjectId;
pub use match_percent::MatchPercent;
