use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name of a student or therapist attached to read models.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantName {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl ParticipantName {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
