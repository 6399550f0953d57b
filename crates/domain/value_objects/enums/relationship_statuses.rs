use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Lifecycle of a student/therapist pairing.
///
/// `Ended` is kept as its own state so a row with no therapist is never
/// reported as `Active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    Active,
    Pending,
    Switched,
    Ended,
}

impl RelationshipStatus {
    pub const ALL: [RelationshipStatus; 4] = [
        RelationshipStatus::Active,
        RelationshipStatus::Pending,
        RelationshipStatus::Switched,
        RelationshipStatus::Ended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipStatus::Active => "active",
            RelationshipStatus::Pending => "pending",
            RelationshipStatus::Switched => "switched",
            RelationshipStatus::Ended => "ended",
        }
    }

    /// Unknown values are read as `Ended` so they never grant access.
    pub fn from_str(value: &str) -> Self {
        match value {
            "active" => RelationshipStatus::Active,
            "pending" => RelationshipStatus::Pending,
            "switched" => RelationshipStatus::Switched,
            _ => RelationshipStatus::Ended,
        }
    }

    /// A live relationship still links the student to a current therapist.
    pub fn is_live(&self) -> bool {
        !matches!(self, RelationshipStatus::Ended)
    }

    /// States from which a switch may be requested.
    pub fn can_request_switch(&self) -> bool {
        matches!(
            self,
            RelationshipStatus::Active | RelationshipStatus::Switched
        )
    }
}

impl Display for RelationshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_not_live() {
        let status = RelationshipStatus::from_str("unassigned");
        assert_eq!(status, RelationshipStatus::Ended);
        assert!(!status.is_live());
    }

    #[test]
    fn switch_can_only_be_requested_from_settled_states() {
        assert!(RelationshipStatus::Active.can_request_switch());
        assert!(RelationshipStatus::Switched.can_request_switch());
        assert!(!RelationshipStatus::Pending.can_request_switch());
        assert!(!RelationshipStatus::Ended.can_request_switch());
    }

    #[test]
    fn every_status_round_trips_through_its_column_value() {
        for status in RelationshipStatus::ALL {
            assert_eq!(RelationshipStatus::from_str(status.as_str()), status);
        }
    }
}
