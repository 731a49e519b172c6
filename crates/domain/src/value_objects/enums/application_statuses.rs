use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
    Waitlisted,
    Withdrawn,
    Verified,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Waitlisted => "waitlisted",
            ApplicationStatus::Withdrawn => "withdrawn",
            ApplicationStatus::Verified => "verified",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ApplicationStatus::Pending),
            "approved" => Some(ApplicationStatus::Approved),
            "rejected" => Some(ApplicationStatus::Rejected),
            "waitlisted" => Some(ApplicationStatus::Waitlisted),
            "withdrawn" => Some(ApplicationStatus::Withdrawn),
            "verified" => Some(ApplicationStatus::Verified),
            _ => None,
        }
    }

    /// Terminal states cannot be cancelled or transitioned further by the
    /// cancellation path.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Withdrawn
                | ApplicationStatus::Rejected
                | ApplicationStatus::Verified
        )
    }
}

impl Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
