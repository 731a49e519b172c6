use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReconciliationStatus {
    Matched,
    Verified,
    Approved,
    Rejected,
}

impl ReconciliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationStatus::Matched => "matched",
            ReconciliationStatus::Verified => "verified",
            ReconciliationStatus::Approved => "approved",
            ReconciliationStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "matched" => Some(ReconciliationStatus::Matched),
            "verified" => Some(ReconciliationStatus::Verified),
            "approved" => Some(ReconciliationStatus::Approved),
            "rejected" => Some(ReconciliationStatus::Rejected),
            _ => None,
        }
    }

    /// "matched" is produced only by the matching engine; reviewers may move
    /// a record to one of the manual outcomes.
    pub fn is_review_outcome(&self) -> bool {
        matches!(
            self,
            ReconciliationStatus::Verified
                | ReconciliationStatus::Approved
                | ReconciliationStatus::Rejected
        )
    }
}

impl Display for ReconciliationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
