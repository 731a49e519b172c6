use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Payment channels accepted for application fees. The string form is the
/// canonical representation everywhere: wire payloads, database rows, logs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "M-Pesa")]
    Mpesa,
    #[serde(rename = "Mixx by Yas")]
    Mixx,
    #[serde(rename = "Airtel Money")]
    Airtel,
    #[serde(rename = "Bank")]
    Bank,
    #[serde(rename = "Card")]
    Card,
    #[serde(rename = "Cash")]
    Cash,
    #[serde(rename = "Other")]
    Other,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 7] = [
        PaymentMethod::Mpesa,
        PaymentMethod::Mixx,
        PaymentMethod::Airtel,
        PaymentMethod::Bank,
        PaymentMethod::Card,
        PaymentMethod::Cash,
        PaymentMethod::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "M-Pesa",
            PaymentMethod::Mixx => "Mixx by Yas",
            PaymentMethod::Airtel => "Airtel Money",
            PaymentMethod::Bank => "Bank",
            PaymentMethod::Card => "Card",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Other => "Other",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == value)
    }

    /// Mobile network operator channels confirm instantly, which drives the
    /// auto-approval rule on paid applications.
    pub fn is_mobile_money(&self) -> bool {
        matches!(
            self,
            PaymentMethod::Mpesa | PaymentMethod::Mixx | PaymentMethod::Airtel
        )
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
