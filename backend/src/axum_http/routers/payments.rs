use crate::axum_http::error_responses::AppError;
use crate::usecases::payments::PaymentUseCase;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use domain::{
    repositories::{applications::ApplicationRepository, payments::PaymentRepository},
    value_objects::{
        enums::payment_statuses::PaymentStatus,
        payments::{PaymentListFilter, ProcessPaymentModel},
    },
};
use infra::db::{
    postgres::postgres_connection::PgPoolSquad,
    repositories::{applications::ApplicationPostgres, payments::PaymentPostgres},
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let application_repository = ApplicationPostgres::new(Arc::clone(&db_pool));
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let payment_usecase = PaymentUseCase::new(
        Arc::new(application_repository),
        Arc::new(payment_repository),
    );

    Router::new()
        .route("/", post(process_payment).get(list_payments))
        .route("/:payment_id", get(get_payment))
        .with_state(Arc::new(payment_usecase))
}

pub async fn process_payment<A, P>(
    State(payment_usecase): State<Arc<PaymentUseCase<A, P>>>,
    Json(process_payment_model): Json<ProcessPaymentModel>,
) -> Result<impl IntoResponse, AppError>
where
    A: ApplicationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    let response = payment_usecase.process_payment(process_payment_model).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_payment<A, P>(
    State(payment_usecase): State<Arc<PaymentUseCase<A, P>>>,
    Path(payment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    A: ApplicationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    let payment = payment_usecase.get_payment(payment_id).await?;
    Ok((StatusCode::OK, Json(payment)))
}

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub payment_status: Option<String>,
    pub application_id: Option<i64>,
}

impl ListPaymentsQuery {
    // Pagination values go straight into SQL OFFSET/LIMIT, so negatives
    // must never get through.
    fn into_filter(self) -> Result<PaymentListFilter, AppError> {
        let payment_status = match self.payment_status.as_deref() {
            Some(value) => Some(PaymentStatus::from_str(value).ok_or_else(|| {
                AppError::BadRequest(format!("invalid payment status: {value}"))
            })?),
            None => None,
        };

        Ok(PaymentListFilter {
            payment_status,
            application_id: self.application_id,
            skip: self.skip.unwrap_or(0).max(0),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(0, MAX_PAGE_SIZE),
        })
    }
}

pub async fn list_payments<A, P>(
    State(payment_usecase): State<Arc<PaymentUseCase<A, P>>>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<impl IntoResponse, AppError>
where
    A: ApplicationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    let payments = payment_usecase.list_payments(query.into_filter()?).await?;
    Ok((StatusCode::OK, Json(payments)))
}
