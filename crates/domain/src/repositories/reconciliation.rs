use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;

use crate::entities::applications::ApplicationEntity;
use crate::entities::bank_reconciliation::{BankReconciliationEntity, PaymentApprovalEntity};
use crate::entities::bank_transactions::BankTransactionEntity;
use crate::entities::payments::PaymentEntity;
use crate::value_objects::reconciliation::{MatchedPair, ReviewWrite};

#[async_trait]
#[automock]
pub trait ReconciliationRepository {
    /// Snapshot of bank transactions still awaiting reconciliation
    /// (`is_reconciled = false AND is_active = true`).
    async fn list_unreconciled_transactions(&self) -> Result<Vec<BankTransactionEntity>>;

    /// Probes for an active, not soft-deleted payment carrying the given
    /// bank reference on the given date. First match wins when several
    /// qualify.
    async fn find_matching_payment(
        &self,
        reference: String,
        payment_date: NaiveDate,
    ) -> Result<Option<PaymentEntity>>;

    /// Writes all reconciliation rows of a run and flips the matched
    /// transactions to `is_reconciled = true`, atomically. Returns the
    /// number of reconciliation rows created.
    async fn commit_matches(&self, matches: Vec<MatchedPair>) -> Result<usize>;

    async fn find_reconciliation(
        &self,
        reconciliation_id: i64,
    ) -> Result<Option<BankReconciliationEntity>>;

    /// Active applications linked to a payment through its payment details.
    async fn applications_for_payment(&self, payment_id: i64)
    -> Result<Vec<ApplicationEntity>>;

    /// Applies a manual review in one transaction: reconciliation status
    /// change, application transitions and the approval audit row.
    async fn apply_review(&self, write: ReviewWrite) -> Result<()>;

    /// Audit rows written by past reviews of a reconciliation, oldest first.
    async fn approvals_for_reconciliation(
        &self,
        reconciliation_id: i64,
    ) -> Result<Vec<PaymentApprovalEntity>>;
}
