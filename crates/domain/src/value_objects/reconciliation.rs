use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::bank_reconciliation::PaymentApprovalEntity;
use crate::value_objects::enums::reconciliation_statuses::ReconciliationStatus;
use crate::value_objects::payments::ApplicationTransition;

/// One successful probe of the matching engine: the bank transaction and the
/// payment it reconciles against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub bank_transaction_id: i64,
    pub payment_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReconciliationRunSummary {
    pub transactions_processed: usize,
    pub matches_found: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewReconciliationModel {
    pub status: String,
    pub user_id: i64,
    pub comments: Option<String>,
}

/// Everything one review call persists in a single transaction: the status
/// change on the reconciliation, the application transitions it implies and
/// the audit row.
#[derive(Debug, Clone)]
pub struct ReviewWrite {
    pub reconciliation_id: i64,
    pub previous_status: String,
    pub new_status: ReconciliationStatus,
    pub user_id: i64,
    pub comments: Option<String>,
    pub transitions: Vec<ApplicationTransition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentApprovalDto {
    pub id: i64,
    pub reconciliation_id: i64,
    pub user_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PaymentApprovalDto {
    pub fn from_entity(approval: &PaymentApprovalEntity) -> Self {
        Self {
            id: approval.id,
            reconciliation_id: approval.reconciliation_id,
            user_id: approval.user_id,
            previous_status: approval.previous_status.clone(),
            new_status: approval.new_status.clone(),
            comments: approval.comments.clone(),
            created_at: approval.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub reconciliation_id: i64,
    pub payment_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: i64,
}
