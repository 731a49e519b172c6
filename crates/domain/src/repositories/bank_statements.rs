use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::bank_transactions::{
    InsertBankStatementBatchEntity, InsertBankTransactionEntity,
};
use crate::value_objects::bank_statements::StatementBatchRecord;

#[async_trait]
#[automock]
pub trait BankStatementRepository {
    /// Creates the batch row and its transactions in one transaction.
    /// Lines whose `transaction_id` already exists are skipped.
    async fn insert_statement_batch(
        &self,
        batch: InsertBankStatementBatchEntity,
        transactions: Vec<InsertBankTransactionEntity>,
    ) -> Result<StatementBatchRecord>;
}
