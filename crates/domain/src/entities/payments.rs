use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::{payment_details, payments};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: i64,
    pub transaction_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub bank_reference: Option<String>,
    pub mobile_number: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub deleted_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub transaction_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub bank_reference: Option<String>,
    pub mobile_number: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_details)]
pub struct PaymentDetailEntity {
    pub id: i64,
    pub payment_id: i64,
    pub application_id: i64,
    pub amount: f64,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub deleted_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payment_details)]
pub struct InsertPaymentDetailEntity {
    pub payment_id: i64,
    pub application_id: i64,
    pub amount: f64,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
