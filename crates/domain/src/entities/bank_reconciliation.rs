use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::{bank_reconciliation, payment_approvals};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bank_reconciliation)]
pub struct BankReconciliationEntity {
    pub id: i64,
    pub bank_transaction_id: i64,
    pub payment_id: i64,
    pub status: String,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bank_reconciliation)]
pub struct InsertBankReconciliationEntity {
    pub bank_transaction_id: i64,
    pub payment_id: i64,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_approvals)]
pub struct PaymentApprovalEntity {
    pub id: i64,
    pub reconciliation_id: i64,
    pub user_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_approvals)]
pub struct InsertPaymentApprovalEntity {
    pub reconciliation_id: i64,
    pub user_id: i64,
    pub previous_status: String,
    pub new_status: String,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
