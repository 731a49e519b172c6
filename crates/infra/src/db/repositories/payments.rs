use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::payments::{InsertPaymentDetailEntity, PaymentDetailEntity, PaymentEntity},
    repositories::payments::PaymentRepository,
    schema::{applications, payment_details, payments},
    value_objects::payments::{PaymentLedgerEntry, PaymentListFilter},
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn record_payment(&self, entry: PaymentLedgerEntry) -> Result<PaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = conn.transaction::<PaymentEntity, anyhow::Error, _>(|conn| {
            let now = Utc::now();

            let payment = insert_into(payments::table)
                .values(&entry.payment)
                .returning(PaymentEntity::as_returning())
                .get_result::<PaymentEntity>(conn)?;

            let detail_rows: Vec<InsertPaymentDetailEntity> = entry
                .allocations
                .iter()
                .map(|allocation| InsertPaymentDetailEntity {
                    payment_id: payment.id,
                    application_id: allocation.application_id,
                    amount: allocation.amount,
                    is_active: true,
                    created_by: entry.payment.created_by,
                    updated_by: entry.payment.updated_by,
                    created_at: now,
                    updated_at: now,
                })
                .collect();

            insert_into(payment_details::table)
                .values(&detail_rows)
                .execute(conn)?;

            for transition in &entry.transitions {
                update(
                    applications::table.filter(applications::id.eq(transition.application_id)),
                )
                .set(&transition.changeset_at(now))
                .execute(conn)?;
            }

            Ok(payment)
        })?;

        Ok(payment)
    }

    async fn find_by_id(&self, payment_id: i64) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payments::table
            .filter(payments::id.eq(payment_id))
            .filter(payments::deleted_at.is_null())
            .filter(payments::is_active.eq(true))
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, filter: PaymentListFilter) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = payments::table
            .filter(payments::deleted_at.is_null())
            .filter(payments::is_active.eq(true))
            .into_boxed();

        if let Some(status) = filter.payment_status {
            query = query.filter(payments::payment_status.eq(status.as_str()));
        }

        if let Some(application_id) = filter.application_id {
            let payment_ids = payment_details::table
                .filter(payment_details::application_id.eq(application_id))
                .filter(payment_details::deleted_at.is_null())
                .select(payment_details::payment_id);
            query = query.filter(payments::id.eq_any(payment_ids));
        }

        let results = query
            .order(payments::created_at.desc())
            .offset(filter.skip)
            .limit(filter.limit)
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn details_for_payment(&self, payment_id: i64) -> Result<Vec<PaymentDetailEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payment_details::table
            .filter(payment_details::payment_id.eq(payment_id))
            .filter(payment_details::deleted_at.is_null())
            .filter(payment_details::is_active.eq(true))
            .select(PaymentDetailEntity::as_select())
            .load::<PaymentDetailEntity>(&mut conn)?;

        Ok(results)
    }

    async fn details_for_application(
        &self,
        application_id: i64,
    ) -> Result<Vec<PaymentDetailEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payment_details::table
            .filter(payment_details::application_id.eq(application_id))
            .filter(payment_details::deleted_at.is_null())
            .filter(payment_details::is_active.eq(true))
            .select(PaymentDetailEntity::as_select())
            .load::<PaymentDetailEntity>(&mut conn)?;

        Ok(results)
    }
}
