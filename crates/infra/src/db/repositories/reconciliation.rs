use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use diesel::{insert_into, prelude::*, update};
use std::sync::Arc;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::{
        applications::ApplicationEntity,
        bank_reconciliation::{
            BankReconciliationEntity, InsertBankReconciliationEntity,
            InsertPaymentApprovalEntity, PaymentApprovalEntity,
        },
        bank_transactions::BankTransactionEntity,
        payments::PaymentEntity,
    },
    repositories::reconciliation::ReconciliationRepository,
    schema::{applications, bank_reconciliation, bank_transactions, payment_approvals,
        payment_details, payments},
    value_objects::{
        enums::reconciliation_statuses::ReconciliationStatus,
        reconciliation::{MatchedPair, ReviewWrite},
    },
};

pub struct ReconciliationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ReconciliationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ReconciliationRepository for ReconciliationPostgres {
    async fn list_unreconciled_transactions(&self) -> Result<Vec<BankTransactionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = bank_transactions::table
            .filter(bank_transactions::is_reconciled.eq(false))
            .filter(bank_transactions::is_active.eq(true))
            .select(BankTransactionEntity::as_select())
            .load::<BankTransactionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_matching_payment(
        &self,
        reference: String,
        payment_date: NaiveDate,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Payments carry a full timestamp while statement lines carry a
        // date, so the probe covers the whole day.
        let day_start = payment_date.and_time(NaiveTime::MIN).and_utc();
        let day_end = (payment_date + Duration::days(1))
            .and_time(NaiveTime::MIN)
            .and_utc();

        let result = payments::table
            .filter(payments::bank_reference.eq(reference))
            .filter(payments::payment_date.ge(day_start))
            .filter(payments::payment_date.lt(day_end))
            .filter(payments::deleted_at.is_null())
            .filter(payments::is_active.eq(true))
            .order(payments::id.asc())
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn commit_matches(&self, matches: Vec<MatchedPair>) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let created = conn.transaction::<usize, anyhow::Error, _>(|conn| {
            let now = Utc::now();
            let mut created = 0;

            for pair in &matches {
                insert_into(bank_reconciliation::table)
                    .values(InsertBankReconciliationEntity {
                        bank_transaction_id: pair.bank_transaction_id,
                        payment_id: pair.payment_id,
                        status: ReconciliationStatus::Matched.as_str().to_string(),
                        is_active: true,
                        created_at: now,
                        updated_at: now,
                    })
                    .execute(conn)?;

                update(
                    bank_transactions::table
                        .filter(bank_transactions::id.eq(pair.bank_transaction_id)),
                )
                .set((
                    bank_transactions::is_reconciled.eq(true),
                    bank_transactions::updated_at.eq(now),
                ))
                .execute(conn)?;

                created += 1;
            }

            Ok(created)
        })?;

        Ok(created)
    }

    async fn find_reconciliation(
        &self,
        reconciliation_id: i64,
    ) -> Result<Option<BankReconciliationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bank_reconciliation::table
            .filter(bank_reconciliation::id.eq(reconciliation_id))
            .filter(bank_reconciliation::is_active.eq(true))
            .select(BankReconciliationEntity::as_select())
            .first::<BankReconciliationEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn applications_for_payment(
        &self,
        payment_id: i64,
    ) -> Result<Vec<ApplicationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = applications::table
            .inner_join(payment_details::table)
            .filter(payment_details::payment_id.eq(payment_id))
            .filter(payment_details::deleted_at.is_null())
            .filter(applications::deleted_at.is_null())
            .filter(applications::is_active.eq(true))
            .select(ApplicationEntity::as_select())
            .load::<ApplicationEntity>(&mut conn)?;

        Ok(results)
    }

    async fn apply_review(&self, write: ReviewWrite) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), anyhow::Error, _>(|conn| {
            let now = Utc::now();

            update(
                bank_reconciliation::table
                    .filter(bank_reconciliation::id.eq(write.reconciliation_id)),
            )
            .set((
                bank_reconciliation::status.eq(write.new_status.as_str()),
                bank_reconciliation::updated_by.eq(Some(write.user_id)),
                bank_reconciliation::updated_at.eq(now),
            ))
            .execute(conn)?;

            for transition in &write.transitions {
                update(
                    applications::table.filter(applications::id.eq(transition.application_id)),
                )
                .set(&transition.changeset_at(now))
                .execute(conn)?;
            }

            insert_into(payment_approvals::table)
                .values(InsertPaymentApprovalEntity {
                    reconciliation_id: write.reconciliation_id,
                    user_id: write.user_id,
                    previous_status: write.previous_status.clone(),
                    new_status: write.new_status.as_str().to_string(),
                    comments: write.comments.clone(),
                    created_at: now,
                    updated_at: now,
                })
                .execute(conn)?;

            Ok(())
        })?;

        Ok(())
    }

    async fn approvals_for_reconciliation(
        &self,
        reconciliation_id: i64,
    ) -> Result<Vec<PaymentApprovalEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payment_approvals::table
            .filter(payment_approvals::reconciliation_id.eq(reconciliation_id))
            .order(payment_approvals::created_at.asc())
            .select(PaymentApprovalEntity::as_select())
            .load::<PaymentApprovalEntity>(&mut conn)?;

        Ok(results)
    }
}
