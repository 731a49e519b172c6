use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use domain::{
    entities::payments::InsertPaymentEntity,
    repositories::{applications::ApplicationRepository, payments::PaymentRepository},
    value_objects::{
        enums::{
            application_statuses::ApplicationStatus, payment_methods::PaymentMethod,
            payment_statuses::PaymentStatus,
        },
        payments::{
            AMOUNT_TOLERANCE, ApplicationPaidDto, ApplicationPaymentRow,
            ApplicationPaymentStatusDto, ApplicationSummaryDto, ApplicationTransition,
            PaymentAllocation, PaymentDetailDto, PaymentDto, PaymentLedgerEntry,
            PaymentListFilter, ProcessPaymentModel, ProcessPaymentResponse, SubjectFeeDto,
        },
    },
};

const TRANSACTION_ID_PREFIX: &str = "OCPA";
const TRANSACTION_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("at least one application id is required")]
    NoApplications,

    #[error("invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    #[error("some applications not found: {0:?}")]
    ApplicationsNotFound(Vec<i64>),

    #[error("applications already paid: {0:?}")]
    AlreadyPaid(Vec<i64>),

    #[error("payment amount {supplied} does not match total application fees {expected}")]
    AmountMismatch { supplied: f64, expected: f64 },

    #[error("payment with id {0} not found")]
    PaymentNotFound(i64),

    #[error("application with id {0} not found")]
    ApplicationNotFound(i64),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub struct PaymentUseCase<A, P>
where
    A: ApplicationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    application_repository: Arc<A>,
    payment_repository: Arc<P>,
}

impl<A, P> PaymentUseCase<A, P>
where
    A: ApplicationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    pub fn new(application_repository: Arc<A>, payment_repository: Arc<P>) -> Self {
        Self {
            application_repository,
            payment_repository,
        }
    }

    /// Records a payment against one or more applications and moves each of
    /// them to its post-payment state, all in one database transaction.
    pub async fn process_payment(
        &self,
        model: ProcessPaymentModel,
    ) -> Result<ProcessPaymentResponse, PaymentError> {
        if model.application_ids.is_empty() {
            return Err(PaymentError::NoApplications);
        }

        let method = PaymentMethod::from_str(&model.payment_method)
            .ok_or_else(|| PaymentError::InvalidPaymentMethod(model.payment_method.clone()))?;

        let applications = self
            .application_repository
            .find_active_by_ids(model.application_ids.clone())
            .await?;

        if applications.len() != model.application_ids.len() {
            let found: Vec<i64> = applications.iter().map(|a| a.id).collect();
            let missing: Vec<i64> = model
                .application_ids
                .iter()
                .copied()
                .filter(|id| !found.contains(id))
                .collect();
            warn!(?missing, "payments: unknown application ids in payment request");
            return Err(PaymentError::ApplicationsNotFound(missing));
        }

        let already_paid: Vec<i64> = applications
            .iter()
            .filter(|a| a.payment_status == PaymentStatus::Paid.as_str())
            .map(|a| a.id)
            .collect();
        if !already_paid.is_empty() {
            return Err(PaymentError::AlreadyPaid(already_paid));
        }

        let expected: f64 = applications.iter().map(|a| a.total_fee).sum();
        let amount = match model.amount {
            Some(supplied) if supplied > 0.0 => {
                if (supplied - expected).abs() > AMOUNT_TOLERANCE {
                    return Err(PaymentError::AmountMismatch { supplied, expected });
                }
                supplied
            }
            _ => expected,
        };

        // Mobile money confirms instantly, so those applications go straight
        // to approved; every other channel waits for manual review.
        let post_payment_status = if method.is_mobile_money() {
            ApplicationStatus::Approved
        } else {
            ApplicationStatus::Pending
        };

        let now = Utc::now();
        let transaction_id = generate_transaction_id();
        let bank_reference = if method == PaymentMethod::Bank {
            model.bank_reference.clone()
        } else {
            None
        };
        let description = model.description.clone().unwrap_or_else(|| {
            format!("Payment for applications {:?}", model.application_ids)
        });

        let payment = InsertPaymentEntity {
            transaction_id,
            amount,
            payment_method: method.as_str().to_string(),
            payment_status: PaymentStatus::Paid.as_str().to_string(),
            payment_date: Some(now),
            bank_reference,
            mobile_number: Some(model.mobile_number.clone()),
            description: Some(description),
            is_active: true,
            created_by: model.user_id,
            updated_by: model.user_id,
            created_at: now,
            updated_at: now,
        };

        let allocations: Vec<PaymentAllocation> = applications
            .iter()
            .map(|a| PaymentAllocation {
                application_id: a.id,
                amount: a.total_fee,
            })
            .collect();

        let transitions: Vec<ApplicationTransition> = applications
            .iter()
            .map(|a| ApplicationTransition {
                application_id: a.id,
                payment_status: Some(PaymentStatus::Paid),
                status: post_payment_status,
                updated_by: model.user_id,
            })
            .collect();

        let created = self
            .payment_repository
            .record_payment(PaymentLedgerEntry {
                payment,
                allocations,
                transitions,
            })
            .await?;

        info!(
            payment_id = created.id,
            transaction_id = %created.transaction_id,
            amount,
            method = %method,
            applications = applications.len(),
            "payments: payment recorded"
        );

        let applications_paid = applications
            .iter()
            .map(|a| ApplicationPaidDto {
                application_id: a.id,
                amount: a.total_fee,
                status: post_payment_status.as_str().to_string(),
                payment_status: PaymentStatus::Paid.as_str().to_string(),
            })
            .collect();

        Ok(ProcessPaymentResponse {
            payment: PaymentDto::from_entity(&created, Vec::new()),
            applications_paid,
        })
    }

    pub async fn get_payment(&self, payment_id: i64) -> Result<PaymentDto, PaymentError> {
        let payment = self
            .payment_repository
            .find_by_id(payment_id)
            .await?
            .ok_or(PaymentError::PaymentNotFound(payment_id))?;

        let details = self
            .payment_repository
            .details_for_payment(payment_id)
            .await?;

        let mut detail_dtos = Vec::with_capacity(details.len());
        for detail in &details {
            let application = self
                .application_repository
                .find_active_by_id(detail.application_id)
                .await?
                .map(|app| ApplicationSummaryDto::from_entity(&app));
            detail_dtos.push(PaymentDetailDto::from_entity(detail, application));
        }

        Ok(PaymentDto::from_entity(&payment, detail_dtos))
    }

    pub async fn list_payments(
        &self,
        filter: PaymentListFilter,
    ) -> Result<Vec<PaymentDto>, PaymentError> {
        let payments = self.payment_repository.list(filter).await?;

        let mut results = Vec::with_capacity(payments.len());
        for payment in &payments {
            let details = self
                .payment_repository
                .details_for_payment(payment.id)
                .await?;
            let detail_dtos = details
                .iter()
                .map(|d| PaymentDetailDto::from_entity(d, None))
                .collect();
            results.push(PaymentDto::from_entity(payment, detail_dtos));
        }

        Ok(results)
    }

    pub async fn application_payment_status(
        &self,
        application_id: i64,
    ) -> Result<ApplicationPaymentStatusDto, PaymentError> {
        let application = self
            .application_repository
            .find_active_by_id(application_id)
            .await?
            .ok_or(PaymentError::ApplicationNotFound(application_id))?;

        let details = self
            .payment_repository
            .details_for_application(application_id)
            .await?;

        let mut payments = Vec::new();
        let mut total_paid = 0.0;
        for detail in &details {
            if let Some(payment) = self.payment_repository.find_by_id(detail.payment_id).await? {
                if payment.payment_status == PaymentStatus::Paid.as_str() {
                    total_paid += detail.amount;
                }
                payments.push(ApplicationPaymentRow {
                    payment_id: payment.id,
                    transaction_id: payment.transaction_id.clone(),
                    amount: detail.amount,
                    payment_method: payment.payment_method.clone(),
                    payment_status: payment.payment_status.clone(),
                    payment_date: payment.payment_date,
                    description: payment.description.clone(),
                });
            }
        }

        let subjects = self
            .application_repository
            .details_for_application(application_id)
            .await?
            .iter()
            .map(|d| SubjectFeeDto {
                subject_id: d.subject_id,
                fee: d.fee,
                status: d.status.clone(),
            })
            .collect();

        let amount_remaining = (application.total_fee - total_paid).max(0.0);

        Ok(ApplicationPaymentStatusDto {
            application_id,
            payment_status: application.payment_status.clone(),
            total_fee: application.total_fee,
            total_paid,
            amount_remaining,
            is_fully_paid: application.payment_status == PaymentStatus::Paid.as_str(),
            payments,
            subjects,
        })
    }
}

fn generate_transaction_id() -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..8)
        .map(|_| {
            let idx = rng.gen_range(0..TRANSACTION_ID_CHARSET.len());
            TRANSACTION_ID_CHARSET[idx] as char
        })
        .collect();

    format!(
        "{}-{}-{}",
        TRANSACTION_ID_PREFIX,
        token,
        Utc::now().format("%Y%m%d%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::entities::applications::ApplicationEntity;
    use domain::entities::payments::PaymentEntity;
    use domain::repositories::applications::MockApplicationRepository;
    use domain::repositories::payments::MockPaymentRepository;

    fn sample_application(id: i64, total_fee: f64) -> ApplicationEntity {
        let now = Utc::now();
        ApplicationEntity {
            id,
            user_id: 7,
            payment_status: PaymentStatus::Pending.as_str().to_string(),
            total_fee,
            status: ApplicationStatus::Pending.as_str().to_string(),
            is_active: true,
            created_by: None,
            updated_by: None,
            deleted_by: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn payment_row_for(entry: &PaymentLedgerEntry) -> PaymentEntity {
        PaymentEntity {
            id: 99,
            transaction_id: entry.payment.transaction_id.clone(),
            amount: entry.payment.amount,
            payment_method: entry.payment.payment_method.clone(),
            payment_status: entry.payment.payment_status.clone(),
            payment_date: entry.payment.payment_date,
            bank_reference: entry.payment.bank_reference.clone(),
            mobile_number: entry.payment.mobile_number.clone(),
            description: entry.payment.description.clone(),
            is_active: true,
            created_by: entry.payment.created_by,
            updated_by: entry.payment.updated_by,
            deleted_by: None,
            created_at: entry.payment.created_at,
            updated_at: entry.payment.updated_at,
            deleted_at: None,
        }
    }

    fn base_model(payment_method: &str) -> ProcessPaymentModel {
        ProcessPaymentModel {
            application_ids: vec![1, 2],
            payment_method: payment_method.to_string(),
            mobile_number: "255712000001".to_string(),
            amount: None,
            description: None,
            bank_reference: None,
            user_id: Some(42),
        }
    }

    #[tokio::test]
    async fn mobile_money_payment_approves_applications() {
        let mut application_repo = MockApplicationRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        application_repo
            .expect_find_active_by_ids()
            .returning(|_| {
                Box::pin(async {
                    Ok(vec![sample_application(1, 100.0), sample_application(2, 50.0)])
                })
            });

        payment_repo
            .expect_record_payment()
            .withf(|entry: &PaymentLedgerEntry| {
                entry.payment.amount == 150.0
                    && entry.allocations
                        == vec![
                            PaymentAllocation {
                                application_id: 1,
                                amount: 100.0,
                            },
                            PaymentAllocation {
                                application_id: 2,
                                amount: 50.0,
                            },
                        ]
                    && entry.transitions.iter().all(|t| {
                        t.status == ApplicationStatus::Approved
                            && t.payment_status == Some(PaymentStatus::Paid)
                            && t.updated_by == Some(42)
                    })
            })
            .returning(|entry| {
                let payment = payment_row_for(&entry);
                Box::pin(async move { Ok(payment) })
            });

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let response = usecase.process_payment(base_model("M-Pesa")).await.unwrap();

        assert_eq!(response.payment.amount, 150.0);
        assert_eq!(response.payment.payment_status, "paid");
        assert_eq!(response.applications_paid.len(), 2);
        for paid in &response.applications_paid {
            assert_eq!(paid.status, "approved");
            assert_eq!(paid.payment_status, "paid");
        }
    }

    #[tokio::test]
    async fn bank_payment_leaves_applications_pending() {
        let mut application_repo = MockApplicationRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        application_repo
            .expect_find_active_by_ids()
            .returning(|_| Box::pin(async { Ok(vec![sample_application(1, 100.0), sample_application(2, 50.0)]) }));

        payment_repo
            .expect_record_payment()
            .withf(|entry: &PaymentLedgerEntry| {
                entry.payment.bank_reference.as_deref() == Some("REF123")
                    && entry
                        .transitions
                        .iter()
                        .all(|t| t.status == ApplicationStatus::Pending)
            })
            .returning(|entry| {
                let payment = payment_row_for(&entry);
                Box::pin(async move { Ok(payment) })
            });

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let mut model = base_model("Bank");
        model.bank_reference = Some("REF123".to_string());
        let response = usecase.process_payment(model).await.unwrap();

        assert_eq!(response.payment.bank_reference.as_deref(), Some("REF123"));
        for paid in &response.applications_paid {
            assert_eq!(paid.status, "pending");
        }
    }

    #[tokio::test]
    async fn bank_reference_dropped_for_non_bank_methods() {
        let mut application_repo = MockApplicationRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        application_repo
            .expect_find_active_by_ids()
            .returning(|_| Box::pin(async { Ok(vec![sample_application(1, 100.0), sample_application(2, 50.0)]) }));

        payment_repo
            .expect_record_payment()
            .withf(|entry: &PaymentLedgerEntry| entry.payment.bank_reference.is_none())
            .returning(|entry| {
                let payment = payment_row_for(&entry);
                Box::pin(async move { Ok(payment) })
            });

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let mut model = base_model("Cash");
        model.bank_reference = Some("REF123".to_string());
        usecase.process_payment(model).await.unwrap();
    }

    #[tokio::test]
    async fn amount_mismatch_is_rejected_without_writing() {
        let mut application_repo = MockApplicationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        application_repo
            .expect_find_active_by_ids()
            .returning(|_| Box::pin(async { Ok(vec![sample_application(1, 100.0), sample_application(2, 50.0)]) }));

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let mut model = base_model("M-Pesa");
        model.amount = Some(151.0);
        let err = usecase.process_payment(model).await.unwrap_err();

        match err {
            PaymentError::AmountMismatch { supplied, expected } => {
                assert_eq!(supplied, 151.0);
                assert_eq!(expected, 150.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn supplied_amount_within_tolerance_is_kept() {
        let mut application_repo = MockApplicationRepository::new();
        let mut payment_repo = MockPaymentRepository::new();

        application_repo
            .expect_find_active_by_ids()
            .returning(|_| Box::pin(async { Ok(vec![sample_application(1, 100.0), sample_application(2, 50.0)]) }));

        payment_repo
            .expect_record_payment()
            .withf(|entry: &PaymentLedgerEntry| (entry.payment.amount - 150.005).abs() < 1e-9)
            .returning(|entry| {
                let payment = payment_row_for(&entry);
                Box::pin(async move { Ok(payment) })
            });

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let mut model = base_model("M-Pesa");
        model.amount = Some(150.005);
        let response = usecase.process_payment(model).await.unwrap();

        assert!((response.payment.amount - 150.005).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_applications_are_reported() {
        let mut application_repo = MockApplicationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        application_repo
            .expect_find_active_by_ids()
            .returning(|_| Box::pin(async { Ok(vec![sample_application(1, 100.0)]) }));

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let err = usecase.process_payment(base_model("M-Pesa")).await.unwrap_err();

        match err {
            PaymentError::ApplicationsNotFound(missing) => assert_eq!(missing, vec![2]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn already_paid_applications_are_rejected() {
        let mut application_repo = MockApplicationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        application_repo.expect_find_active_by_ids().returning(|_| {
            Box::pin(async {
                let mut paid = sample_application(1, 100.0);
                paid.payment_status = PaymentStatus::Paid.as_str().to_string();
                Ok(vec![paid, sample_application(2, 50.0)])
            })
        });

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let err = usecase.process_payment(base_model("M-Pesa")).await.unwrap_err();

        match err {
            PaymentError::AlreadyPaid(ids) => assert_eq!(ids, vec![1]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unknown_payment_method_is_rejected() {
        let application_repo = MockApplicationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let err = usecase.process_payment(base_model("Wire")).await.unwrap_err();

        assert!(matches!(err, PaymentError::InvalidPaymentMethod(m) if m == "Wire"));
    }

    #[tokio::test]
    async fn empty_application_list_is_rejected() {
        let application_repo = MockApplicationRepository::new();
        let payment_repo = MockPaymentRepository::new();

        let usecase = PaymentUseCase::new(Arc::new(application_repo), Arc::new(payment_repo));
        let mut model = base_model("M-Pesa");
        model.application_ids = Vec::new();
        let err = usecase.process_payment(model).await.unwrap_err();

        assert!(matches!(err, PaymentError::NoApplications));
    }

    #[test]
    fn transaction_ids_follow_the_ledger_format() {
        let id = generate_transaction_id();
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts[0], "OCPA");
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1]
            .bytes()
            .all(|b| TRANSACTION_ID_CHARSET.contains(&b)));
        assert_eq!(parts[2].len(), 14);
    }
}
