use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    Pending,
    Canceled,
    Completed,
}

impl AppointmentStatus {
    pub const ALLOWED: [&'static str; 4] = ["confirmed", "pending", "canceled", "completed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Canceled => "canceled",
            AppointmentStatus::Completed => "completed",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "pending" => Some(AppointmentStatus::Pending),
            "canceled" => Some(AppointmentStatus::Canceled),
            "completed" => Some(AppointmentStatus::Completed),
            _ => None,
        }
    }
}

impl Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_four_statuses_parse() {
        for raw in AppointmentStatus::ALLOWED {
            let status = AppointmentStatus::from_str(raw).unwrap();
            assert_eq!(status.as_str(), raw);
        }

        for raw in ["cancelled", "Confirmed", "", "done"] {
            assert!(AppointmentStatus::from_str(raw).is_none(), "{raw} parsed");
        }
    }
}
