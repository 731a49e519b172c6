use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::schema::{application_details, applications};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = applications)]
pub struct ApplicationEntity {
    pub id: i64,
    pub user_id: i64,
    pub payment_status: String,
    pub total_fee: f64,
    pub status: String,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub deleted_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = application_details)]
pub struct ApplicationDetailEntity {
    pub id: i64,
    pub application_id: i64,
    pub subject_id: i64,
    pub fee: f64,
    pub status: String,
    pub is_active: bool,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub deleted_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Partial update applied to an application when a payment or a review
/// touches it. `None` fields are left as they are.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = applications)]
pub struct ApplicationTransitionChangeset {
    pub payment_status: Option<String>,
    pub status: Option<String>,
    pub updated_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
