use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::payments::{InsertPaymentEntity, PaymentDetailEntity, PaymentEntity};
use crate::value_objects::enums::{
    application_statuses::ApplicationStatus, payment_statuses::PaymentStatus,
};

/// Two float amounts are treated as equal when they differ by no more than
/// this. Money is stored as floating point for row compatibility with the
/// existing ledger.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessPaymentModel {
    pub application_ids: Vec<i64>,
    pub payment_method: String,
    pub mobile_number: String,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub bank_reference: Option<String>,
    pub user_id: Option<i64>,
}

/// Share of a payment attributed to one application.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentAllocation {
    pub application_id: i64,
    pub amount: f64,
}

/// Status change applied to one application alongside a ledger write.
/// A `None` payment status leaves the column untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationTransition {
    pub application_id: i64,
    pub payment_status: Option<PaymentStatus>,
    pub status: ApplicationStatus,
    pub updated_by: Option<i64>,
}

impl ApplicationTransition {
    pub fn changeset_at(
        &self,
        now: DateTime<Utc>,
    ) -> crate::entities::applications::ApplicationTransitionChangeset {
        crate::entities::applications::ApplicationTransitionChangeset {
            payment_status: self.payment_status.map(|s| s.as_str().to_string()),
            status: Some(self.status.as_str().to_string()),
            updated_by: self.updated_by,
            updated_at: now,
        }
    }
}

/// Everything one payment-processing call persists, committed as a single
/// database transaction: the payment row, its per-application details and
/// the application status transitions.
#[derive(Debug, Clone)]
pub struct PaymentLedgerEntry {
    pub payment: InsertPaymentEntity,
    pub allocations: Vec<PaymentAllocation>,
    pub transitions: Vec<ApplicationTransition>,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentListFilter {
    pub payment_status: Option<PaymentStatus>,
    pub application_id: Option<i64>,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummaryDto {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    pub payment_status: String,
    pub total_fee: f64,
}

impl ApplicationSummaryDto {
    pub fn from_entity(application: &crate::entities::applications::ApplicationEntity) -> Self {
        Self {
            id: application.id,
            user_id: application.user_id,
            status: application.status.clone(),
            payment_status: application.payment_status.clone(),
            total_fee: application.total_fee,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentDetailDto {
    pub id: i64,
    pub payment_id: i64,
    pub application_id: i64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationSummaryDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentDto {
    pub id: i64,
    pub transaction_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub bank_reference: Option<String>,
    pub mobile_number: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub payment_details: Vec<PaymentDetailDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationPaidDto {
    pub application_id: i64,
    pub amount: f64,
    pub status: String,
    pub payment_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessPaymentResponse {
    pub payment: PaymentDto,
    pub applications_paid: Vec<ApplicationPaidDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationPaymentRow {
    pub payment_id: i64,
    pub transaction_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: String,
    pub payment_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectFeeDto {
    pub subject_id: i64,
    pub fee: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationPaymentStatusDto {
    pub application_id: i64,
    pub payment_status: String,
    pub total_fee: f64,
    pub total_paid: f64,
    pub amount_remaining: f64,
    pub is_fully_paid: bool,
    pub payments: Vec<ApplicationPaymentRow>,
    pub subjects: Vec<SubjectFeeDto>,
}

impl PaymentDto {
    pub fn from_entity(payment: &PaymentEntity, details: Vec<PaymentDetailDto>) -> Self {
        Self {
            id: payment.id,
            transaction_id: payment.transaction_id.clone(),
            amount: payment.amount,
            payment_method: payment.payment_method.clone(),
            payment_status: payment.payment_status.clone(),
            payment_date: payment.payment_date,
            bank_reference: payment.bank_reference.clone(),
            mobile_number: payment.mobile_number.clone(),
            description: payment.description.clone(),
            created_at: payment.created_at,
            updated_at: payment.updated_at,
            payment_details: details,
        }
    }
}

impl PaymentDetailDto {
    pub fn from_entity(
        detail: &PaymentDetailEntity,
        application: Option<ApplicationSummaryDto>,
    ) -> Self {
        Self {
            id: detail.id,
            payment_id: detail.payment_id,
            application_id: detail.application_id,
            amount: detail.amount,
            created_at: detail.created_at,
            updated_at: detail.updated_at,
            application,
        }
    }
}
