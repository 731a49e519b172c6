use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;

use domain::{
    entities::bank_transactions::{InsertBankStatementBatchEntity, InsertBankTransactionEntity},
    repositories::bank_statements::BankStatementRepository,
    value_objects::bank_statements::{StatementUploadSummary, UploadStatementModel},
};

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("statement upload contains no transactions")]
    EmptyStatement,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub struct BankStatementUseCase<B>
where
    B: BankStatementRepository + Send + Sync + 'static,
{
    bank_statement_repository: Arc<B>,
}

impl<B> BankStatementUseCase<B>
where
    B: BankStatementRepository + Send + Sync + 'static,
{
    pub fn new(bank_statement_repository: Arc<B>) -> Self {
        Self {
            bank_statement_repository,
        }
    }

    /// Records one uploaded statement as a batch plus its transaction lines.
    /// Lines whose bank transaction id was already uploaded are dropped
    /// silently, so re-sending a statement is safe.
    pub async fn upload(
        &self,
        model: UploadStatementModel,
    ) -> Result<StatementUploadSummary, StatementError> {
        let (Some(start_date), Some(end_date)) = (
            model.transactions.iter().map(|t| t.payment_date).min(),
            model.transactions.iter().map(|t| t.payment_date).max(),
        ) else {
            return Err(StatementError::EmptyStatement);
        };

        let now = Utc::now();
        let total_batch_amount = model.transactions.iter().map(|t| t.amount).sum();
        let batch_reference = format!("BATCH_{}", now.format("%Y%m%d_%H%M%S"));

        let batch = InsertBankStatementBatchEntity {
            batch_reference: batch_reference.clone(),
            start_date,
            end_date,
            number_of_transactions: model.transactions.len() as i32,
            total_batch_amount,
            is_active: true,
            created_by: model.user_id,
            updated_by: model.user_id,
            created_at: now,
            updated_at: now,
        };

        let transactions_received = model.transactions.len();
        let lines = model
            .transactions
            .into_iter()
            .map(|line| InsertBankTransactionEntity {
                batch_id: None,
                transaction_id: line.transaction_id,
                payment_date: line.payment_date,
                reference_number: line.reference_number,
                account_number: line.account_number,
                amount: line.amount,
                is_reconciled: false,
                is_active: true,
                created_by: model.user_id,
                updated_by: model.user_id,
                created_at: now,
                updated_at: now,
            })
            .collect();

        let record = self
            .bank_statement_repository
            .insert_statement_batch(batch, lines)
            .await?;

        info!(
            batch_id = record.batch_id,
            batch_reference,
            transactions_received,
            transactions_inserted = record.transactions_inserted,
            "bank statement batch recorded"
        );

        Ok(StatementUploadSummary {
            batch_id: record.batch_id,
            batch_reference,
            transactions_received,
            transactions_inserted: record.transactions_inserted,
            duplicates_skipped: transactions_received - record.transactions_inserted,
            start_date,
            end_date,
            total_batch_amount,
        })
    }
}
