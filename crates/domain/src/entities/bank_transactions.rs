use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::schema::{bank_statement_batches, bank_transactions};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bank_transactions)]
pub struct BankTransactionEntity {
    pub id: i64,
    pub batch_id: Option<i64>,
    pub transaction_id: String,
    pub payment_date: NaiveDate,
    pub reference_number: Option<String>,
    pub account_number: Option<String>,
    pub amount: f64,
    pub is_reconciled: bool,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bank_transactions)]
pub struct InsertBankTransactionEntity {
    pub batch_id: Option<i64>,
    pub transaction_id: String,
    pub payment_date: NaiveDate,
    pub reference_number: Option<String>,
    pub account_number: Option<String>,
    pub amount: f64,
    pub is_reconciled: bool,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bank_statement_batches)]
pub struct InsertBankStatementBatchEntity {
    pub batch_reference: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub number_of_transactions: i32,
    pub total_batch_amount: f64,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
