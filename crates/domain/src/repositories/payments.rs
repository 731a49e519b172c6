use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::payments::{PaymentDetailEntity, PaymentEntity};
use crate::value_objects::payments::{PaymentLedgerEntry, PaymentListFilter};

#[async_trait]
#[automock]
pub trait PaymentRepository {
    /// Persists a payment, its details and the application transitions in
    /// one all-or-nothing transaction and returns the created payment row.
    async fn record_payment(&self, entry: PaymentLedgerEntry) -> Result<PaymentEntity>;

    async fn find_by_id(&self, payment_id: i64) -> Result<Option<PaymentEntity>>;

    async fn list(&self, filter: PaymentListFilter) -> Result<Vec<PaymentEntity>>;

    async fn details_for_payment(&self, payment_id: i64) -> Result<Vec<PaymentDetailEntity>>;

    async fn details_for_application(
        &self,
        application_id: i64,
    ) -> Result<Vec<PaymentDetailEntity>>;
}
