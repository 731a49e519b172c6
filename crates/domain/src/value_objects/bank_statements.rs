use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct StatementLineModel {
    pub transaction_id: String,
    pub payment_date: NaiveDate,
    pub reference_number: Option<String>,
    pub account_number: Option<String>,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadStatementModel {
    pub transactions: Vec<StatementLineModel>,
    pub user_id: Option<i64>,
}

/// What the repository reports back after writing a batch: the generated
/// batch id and how many lines were actually new (duplicates on
/// `transaction_id` are skipped).
#[derive(Debug, Clone, Copy)]
pub struct StatementBatchRecord {
    pub batch_id: i64,
    pub transactions_inserted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatementUploadSummary {
    pub batch_id: i64,
    pub batch_reference: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_batch_amount: f64,
    pub transactions_received: usize,
    pub transactions_inserted: usize,
    pub duplicates_skipped: usize,
}
