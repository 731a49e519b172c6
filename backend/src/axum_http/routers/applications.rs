use crate::axum_http::error_responses::AppError;
use crate::usecases::payments::PaymentUseCase;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use domain::repositories::{
    applications::ApplicationRepository, payments::PaymentRepository,
};
use infra::db::{
    postgres::postgres_connection::PgPoolSquad,
    repositories::{applications::ApplicationPostgres, payments::PaymentPostgres},
};
use std::sync::Arc;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let application_repository = ApplicationPostgres::new(Arc::clone(&db_pool));
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let payment_usecase = PaymentUseCase::new(
        Arc::new(application_repository),
        Arc::new(payment_repository),
    );

    Router::new()
        .route("/:application_id/payment-status", get(payment_status))
        .with_state(Arc::new(payment_usecase))
}

pub async fn payment_status<A, P>(
    State(payment_usecase): State<Arc<PaymentUseCase<A, P>>>,
    Path(application_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    A: ApplicationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    let status = payment_usecase
        .application_payment_status(application_id)
        .await?;
    Ok((StatusCode::OK, Json(status)))
}
