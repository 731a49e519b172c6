use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use domain::{
    repositories::{payments::PaymentRepository, reconciliation::ReconciliationRepository},
    value_objects::{
        enums::{
            application_statuses::ApplicationStatus,
            reconciliation_statuses::ReconciliationStatus,
        },
        payments::ApplicationTransition,
        reconciliation::{
            MatchedPair, PaymentApprovalDto, ReconciliationRunSummary, ReviewOutcome,
            ReviewReconciliationModel, ReviewWrite,
        },
    },
};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("invalid review status: {0}; must be verified, approved or rejected")]
    InvalidStatus(String),

    #[error("reconciliation record with id {0} not found")]
    ReconciliationNotFound(i64),

    #[error("payment with id {0} not found for reconciliation")]
    PaymentNotFound(i64),

    #[error("no applications found for payment {0}")]
    NoApplications(i64),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub struct ReconciliationUseCase<R, P>
where
    R: ReconciliationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    reconciliation_repository: Arc<R>,
    payment_repository: Arc<P>,
    // Serializes matching runs within this process; the batch itself is
    // idempotent across processes since only unreconciled rows are read.
    run_guard: tokio::sync::Mutex<()>,
}

impl<R, P> ReconciliationUseCase<R, P>
where
    R: ReconciliationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    pub fn new(reconciliation_repository: Arc<R>, payment_repository: Arc<P>) -> Self {
        Self {
            reconciliation_repository,
            payment_repository,
            run_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// One matching pass: every unreconciled bank transaction is probed for
    /// a payment with the same bank reference on the same date. Matches are
    /// committed in one all-or-nothing transaction; misses stay eligible for
    /// the next run.
    pub async fn run_matching(&self) -> Result<ReconciliationRunSummary> {
        let _run = self.run_guard.lock().await;

        let transactions = self
            .reconciliation_repository
            .list_unreconciled_transactions()
            .await?;
        info!(
            unmatched = transactions.len(),
            "reconciliation: starting matching run"
        );

        let mut matches = Vec::new();
        for transaction in &transactions {
            let Some(reference) = transaction.reference_number.as_deref() else {
                debug!(
                    bank_transaction_id = transaction.id,
                    "reconciliation: transaction has no reference number, skipping"
                );
                continue;
            };

            match self
                .reconciliation_repository
                .find_matching_payment(reference.to_string(), transaction.payment_date)
                .await?
            {
                Some(payment) => {
                    debug!(
                        bank_transaction_id = transaction.id,
                        payment_id = payment.id,
                        reference,
                        "reconciliation: matched"
                    );
                    matches.push(MatchedPair {
                        bank_transaction_id: transaction.id,
                        payment_id: payment.id,
                    });
                }
                None => {
                    debug!(
                        bank_transaction_id = transaction.id,
                        reference,
                        "reconciliation: no matching payment"
                    );
                }
            }
        }

        let matches_found = if matches.is_empty() {
            0
        } else {
            self.reconciliation_repository.commit_matches(matches).await?
        };

        info!(
            transactions_processed = transactions.len(),
            matches_found, "reconciliation: matching run finished"
        );

        Ok(ReconciliationRunSummary {
            transactions_processed: transactions.len(),
            matches_found,
        })
    }

    /// Manual review of a matched reconciliation: moves it to verified,
    /// approved or rejected, mirrors the outcome onto the paid applications
    /// and writes an audit row, all in one transaction.
    pub async fn review(
        &self,
        reconciliation_id: i64,
        model: ReviewReconciliationModel,
    ) -> Result<ReviewOutcome, ReviewError> {
        let new_status = ReconciliationStatus::from_str(&model.status)
            .filter(ReconciliationStatus::is_review_outcome)
            .ok_or_else(|| ReviewError::InvalidStatus(model.status.clone()))?;

        let application_status = match new_status {
            ReconciliationStatus::Approved => ApplicationStatus::Approved,
            ReconciliationStatus::Rejected => ApplicationStatus::Rejected,
            _ => ApplicationStatus::Verified,
        };

        let reconciliation = self
            .reconciliation_repository
            .find_reconciliation(reconciliation_id)
            .await?
            .ok_or(ReviewError::ReconciliationNotFound(reconciliation_id))?;

        let payment = self
            .payment_repository
            .find_by_id(reconciliation.payment_id)
            .await?
            .ok_or(ReviewError::PaymentNotFound(reconciliation.payment_id))?;

        let applications = self
            .reconciliation_repository
            .applications_for_payment(payment.id)
            .await?;
        if applications.is_empty() {
            return Err(ReviewError::NoApplications(payment.id));
        }

        let transitions = applications
            .iter()
            .map(|a| ApplicationTransition {
                application_id: a.id,
                payment_status: None,
                status: application_status,
                updated_by: Some(model.user_id),
            })
            .collect();

        let previous_status = reconciliation.status.clone();
        self.reconciliation_repository
            .apply_review(ReviewWrite {
                reconciliation_id,
                previous_status: previous_status.clone(),
                new_status,
                user_id: model.user_id,
                comments: model.comments.clone(),
                transitions,
            })
            .await?;

        info!(
            reconciliation_id,
            payment_id = payment.id,
            previous_status = %previous_status,
            new_status = %new_status,
            user_id = model.user_id,
            "reconciliation: review applied"
        );

        Ok(ReviewOutcome {
            reconciliation_id,
            payment_id: payment.id,
            previous_status,
            new_status: new_status.as_str().to_string(),
            updated_at: Utc::now(),
            updated_by: model.user_id,
        })
    }

    /// Audit trail of a reconciliation's reviews, oldest first.
    pub async fn review_history(
        &self,
        reconciliation_id: i64,
    ) -> Result<Vec<PaymentApprovalDto>, ReviewError> {
        self.reconciliation_repository
            .find_reconciliation(reconciliation_id)
            .await?
            .ok_or(ReviewError::ReconciliationNotFound(reconciliation_id))?;

        let approvals = self
            .reconciliation_repository
            .approvals_for_reconciliation(reconciliation_id)
            .await?;

        Ok(approvals.iter().map(PaymentApprovalDto::from_entity).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use domain::entities::applications::ApplicationEntity;
    use domain::entities::bank_reconciliation::{BankReconciliationEntity, PaymentApprovalEntity};
    use domain::entities::bank_transactions::BankTransactionEntity;
    use domain::entities::payments::PaymentEntity;
    use domain::repositories::payments::MockPaymentRepository;
    use domain::repositories::reconciliation::MockReconciliationRepository;
    use domain::value_objects::enums::payment_statuses::PaymentStatus;
    use mockall::predicate::eq;

    fn sample_transaction(id: i64, reference: Option<&str>, date: NaiveDate) -> BankTransactionEntity {
        let now = Utc::now();
        BankTransactionEntity {
            id,
            batch_id: None,
            transaction_id: format!("BTX-{id}"),
            payment_date: date,
            reference_number: reference.map(str::to_string),
            account_number: None,
            amount: 150.0,
            is_reconciled: false,
            is_active: true,
            created_by: None,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_payment(id: i64, reference: &str) -> PaymentEntity {
        let now = Utc::now();
        PaymentEntity {
            id,
            transaction_id: format!("OCPA-TEST-{id}"),
            amount: 150.0,
            payment_method: "Bank".to_string(),
            payment_status: PaymentStatus::Paid.as_str().to_string(),
            payment_date: Some(now),
            bank_reference: Some(reference.to_string()),
            mobile_number: None,
            description: None,
            is_active: true,
            created_by: None,
            updated_by: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn sample_reconciliation(id: i64, payment_id: i64, status: &str) -> BankReconciliationEntity {
        let now = Utc::now();
        BankReconciliationEntity {
            id,
            bank_transaction_id: 5,
            payment_id,
            status: status.to_string(),
            is_active: true,
            created_by: None,
            updated_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_application(id: i64) -> ApplicationEntity {
        let now = Utc::now();
        ApplicationEntity {
            id,
            user_id: 7,
            payment_status: PaymentStatus::Paid.as_str().to_string(),
            total_fee: 150.0,
            status: "pending".to_string(),
            is_active: true,
            created_by: None,
            updated_by: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn matching_run_pairs_by_reference_and_commits() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let payment_repo = MockPaymentRepository::new();
        let day = date(2024, 1, 5);

        reconciliation_repo
            .expect_list_unreconciled_transactions()
            .returning(move || {
                let rows = vec![
                    sample_transaction(1, Some("REF123"), day),
                    sample_transaction(2, Some("REF999"), day),
                    sample_transaction(3, Some("REF456"), day),
                ];
                Box::pin(async move { Ok(rows) })
            });
        reconciliation_repo
            .expect_find_matching_payment()
            .with(eq("REF123".to_string()), eq(day))
            .returning(|reference, _| {
                let payment = sample_payment(11, &reference);
                Box::pin(async move { Ok(Some(payment)) })
            });
        reconciliation_repo
            .expect_find_matching_payment()
            .with(eq("REF999".to_string()), eq(day))
            .returning(|_, _| Box::pin(async move { Ok(None) }));
        reconciliation_repo
            .expect_find_matching_payment()
            .with(eq("REF456".to_string()), eq(day))
            .returning(|reference, _| {
                let payment = sample_payment(12, &reference);
                Box::pin(async move { Ok(Some(payment)) })
            });
        reconciliation_repo
            .expect_commit_matches()
            .withf(|pairs| {
                pairs.len() == 2
                    && pairs[0] == MatchedPair { bank_transaction_id: 1, payment_id: 11 }
                    && pairs[1] == MatchedPair { bank_transaction_id: 3, payment_id: 12 }
            })
            .returning(|pairs| {
                let count = pairs.len();
                Box::pin(async move { Ok(count) })
            });

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let summary = usecase.run_matching().await.unwrap();

        assert_eq!(summary.transactions_processed, 3);
        assert_eq!(summary.matches_found, 2);
    }

    #[tokio::test]
    async fn matching_run_with_nothing_unreconciled_commits_nothing() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        reconciliation_repo
            .expect_list_unreconciled_transactions()
            .returning(|| Box::pin(async move { Ok(Vec::new()) }));
        reconciliation_repo.expect_commit_matches().never();

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let summary = usecase.run_matching().await.unwrap();

        assert_eq!(summary.transactions_processed, 0);
        assert_eq!(summary.matches_found, 0);
    }

    #[tokio::test]
    async fn matching_run_skips_transactions_without_reference() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let payment_repo = MockPaymentRepository::new();
        let day = date(2024, 3, 10);

        reconciliation_repo
            .expect_list_unreconciled_transactions()
            .returning(move || {
                let rows = vec![sample_transaction(4, None, day)];
                Box::pin(async move { Ok(rows) })
            });
        reconciliation_repo.expect_find_matching_payment().never();
        reconciliation_repo.expect_commit_matches().never();

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let summary = usecase.run_matching().await.unwrap();

        assert_eq!(summary.transactions_processed, 1);
        assert_eq!(summary.matches_found, 0);
    }

    #[tokio::test]
    async fn review_rejects_unknown_status() {
        let reconciliation_repo = MockReconciliationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let result = usecase
            .review(
                1,
                ReviewReconciliationModel {
                    status: "matched".to_string(),
                    user_id: 9,
                    comments: None,
                },
            )
            .await;

        assert!(matches!(result, Err(ReviewError::InvalidStatus(ref s)) if s == "matched"));
    }

    #[tokio::test]
    async fn review_fails_when_reconciliation_missing() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        reconciliation_repo
            .expect_find_reconciliation()
            .with(eq(77))
            .returning(|_| Box::pin(async move { Ok(None) }));

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let result = usecase
            .review(
                77,
                ReviewReconciliationModel {
                    status: "approved".to_string(),
                    user_id: 9,
                    comments: None,
                },
            )
            .await;

        assert!(matches!(result, Err(ReviewError::ReconciliationNotFound(77))));
    }

    #[tokio::test]
    async fn approved_review_updates_applications_and_audits() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        reconciliation_repo
            .expect_find_reconciliation()
            .with(eq(3))
            .returning(|_| {
                let row = sample_reconciliation(3, 11, "matched");
                Box::pin(async move { Ok(Some(row)) })
            });
        payment_repo
            .expect_find_by_id()
            .with(eq(11))
            .returning(|_| {
                let payment = sample_payment(11, "REF123");
                Box::pin(async move { Ok(Some(payment)) })
            });
        reconciliation_repo
            .expect_applications_for_payment()
            .with(eq(11))
            .returning(|_| {
                let apps = vec![sample_application(21), sample_application(22)];
                Box::pin(async move { Ok(apps) })
            });
        reconciliation_repo
            .expect_apply_review()
            .withf(|write| {
                write.reconciliation_id == 3
                    && write.previous_status == "matched"
                    && write.new_status == ReconciliationStatus::Approved
                    && write.user_id == 9
                    && write.comments.as_deref() == Some("looks good")
                    && write.transitions.len() == 2
                    && write.transitions.iter().all(|t| {
                        t.payment_status.is_none()
                            && t.status == ApplicationStatus::Approved
                            && t.updated_by == Some(9)
                    })
                    && write.transitions[0].application_id == 21
                    && write.transitions[1].application_id == 22
            })
            .returning(|_| Box::pin(async move { Ok(()) }));

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let outcome = usecase
            .review(
                3,
                ReviewReconciliationModel {
                    status: "approved".to_string(),
                    user_id: 9,
                    comments: Some("looks good".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.reconciliation_id, 3);
        assert_eq!(outcome.payment_id, 11);
        assert_eq!(outcome.previous_status, "matched");
        assert_eq!(outcome.new_status, "approved");
        assert_eq!(outcome.updated_by, 9);
    }

    #[tokio::test]
    async fn verified_review_marks_applications_verified() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        reconciliation_repo
            .expect_find_reconciliation()
            .with(eq(4))
            .returning(|_| {
                let row = sample_reconciliation(4, 12, "matched");
                Box::pin(async move { Ok(Some(row)) })
            });
        payment_repo
            .expect_find_by_id()
            .with(eq(12))
            .returning(|_| {
                let payment = sample_payment(12, "REF456");
                Box::pin(async move { Ok(Some(payment)) })
            });
        reconciliation_repo
            .expect_applications_for_payment()
            .with(eq(12))
            .returning(|_| {
                let apps = vec![sample_application(30)];
                Box::pin(async move { Ok(apps) })
            });
        reconciliation_repo
            .expect_apply_review()
            .withf(|write| {
                write.new_status == ReconciliationStatus::Verified
                    && write.transitions[0].status == ApplicationStatus::Verified
            })
            .returning(|_| Box::pin(async move { Ok(()) }));

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let outcome = usecase
            .review(
                4,
                ReviewReconciliationModel {
                    status: "verified".to_string(),
                    user_id: 5,
                    comments: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(outcome.new_status, "verified");
    }

    #[tokio::test]
    async fn review_fails_when_payment_has_no_applications() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        reconciliation_repo
            .expect_find_reconciliation()
            .with(eq(8))
            .returning(|_| {
                let row = sample_reconciliation(8, 40, "matched");
                Box::pin(async move { Ok(Some(row)) })
            });
        payment_repo
            .expect_find_by_id()
            .with(eq(40))
            .returning(|_| {
                let payment = sample_payment(40, "REF777");
                Box::pin(async move { Ok(Some(payment)) })
            });
        reconciliation_repo
            .expect_applications_for_payment()
            .with(eq(40))
            .returning(|_| Box::pin(async move { Ok(Vec::new()) }));

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let result = usecase
            .review(
                8,
                ReviewReconciliationModel {
                    status: "rejected".to_string(),
                    user_id: 2,
                    comments: None,
                },
            )
            .await;

        assert!(matches!(result, Err(ReviewError::NoApplications(40))));
    }

    #[tokio::test]
    async fn review_history_lists_audit_rows_oldest_first() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        reconciliation_repo
            .expect_find_reconciliation()
            .with(eq(6))
            .returning(|_| {
                let row = sample_reconciliation(6, 13, "approved");
                Box::pin(async move { Ok(Some(row)) })
            });
        reconciliation_repo
            .expect_approvals_for_reconciliation()
            .with(eq(6))
            .returning(|_| {
                let now = Utc::now();
                let rows = vec![
                    PaymentApprovalEntity {
                        id: 1,
                        reconciliation_id: 6,
                        user_id: 9,
                        previous_status: "matched".to_string(),
                        new_status: "verified".to_string(),
                        comments: None,
                        created_at: now,
                        updated_at: now,
                    },
                    PaymentApprovalEntity {
                        id: 2,
                        reconciliation_id: 6,
                        user_id: 3,
                        previous_status: "verified".to_string(),
                        new_status: "approved".to_string(),
                        comments: Some("checked against statement".to_string()),
                        created_at: now,
                        updated_at: now,
                    },
                ];
                Box::pin(async move { Ok(rows) })
            });

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let history = usecase.review_history(6).await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].previous_status, "matched");
        assert_eq!(history[0].new_status, "verified");
        assert_eq!(history[1].new_status, "approved");
        assert_eq!(history[1].comments.as_deref(), Some("checked against statement"));
    }

    #[tokio::test]
    async fn review_history_for_unknown_reconciliation_is_not_found() {
        let mut reconciliation_repo = MockReconciliationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        reconciliation_repo
            .expect_find_reconciliation()
            .with(eq(99))
            .returning(|_| Box::pin(async move { Ok(None) }));
        reconciliation_repo
            .expect_approvals_for_reconciliation()
            .never();

        let usecase =
            ReconciliationUseCase::new(Arc::new(reconciliation_repo), Arc::new(payment_repo));
        let result = usecase.review_history(99).await;

        assert!(matches!(result, Err(ReviewError::ReconciliationNotFound(99))));
    }
}
