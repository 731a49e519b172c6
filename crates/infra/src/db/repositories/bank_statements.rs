use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*};
use std::sync::Arc;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::bank_transactions::{
        InsertBankStatementBatchEntity, InsertBankTransactionEntity,
    },
    repositories::bank_statements::BankStatementRepository,
    schema::{bank_statement_batches, bank_transactions},
    value_objects::bank_statements::StatementBatchRecord,
};

pub struct BankStatementPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BankStatementPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BankStatementRepository for BankStatementPostgres {
    async fn insert_statement_batch(
        &self,
        batch: InsertBankStatementBatchEntity,
        transactions: Vec<InsertBankTransactionEntity>,
    ) -> Result<StatementBatchRecord> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let record = conn.transaction::<StatementBatchRecord, anyhow::Error, _>(|conn| {
            let batch_id = insert_into(bank_statement_batches::table)
                .values(&batch)
                .returning(bank_statement_batches::id)
                .get_result::<i64>(conn)?;

            let rows: Vec<InsertBankTransactionEntity> = transactions
                .into_iter()
                .map(|mut tx| {
                    tx.batch_id = Some(batch_id);
                    tx
                })
                .collect();

            // Statement lines already uploaded in an earlier batch keep
            // their original row.
            let inserted = insert_into(bank_transactions::table)
                .values(&rows)
                .on_conflict(bank_transactions::transaction_id)
                .do_nothing()
                .execute(conn)?;

            Ok(StatementBatchRecord {
                batch_id,
                transactions_inserted: inserted,
            })
        })?;

        Ok(record)
    }
}
