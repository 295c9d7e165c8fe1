use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle state of a course within a student's schedule
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Enrolled,
    Waitlisted,
    /// Kept in the schedule for history, may be enrolled again
    Dropped,
}

impl CourseStatus {
    /// Whether the course currently occupies a place in the schedule
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Dropped)
    }
}
