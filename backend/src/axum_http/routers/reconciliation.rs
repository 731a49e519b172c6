use crate::axum_http::error_responses::AppError;
use crate::usecases::reconciliation::ReconciliationUseCase;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use domain::{
    repositories::{
        payments::PaymentRepository, reconciliation::ReconciliationRepository,
    },
    value_objects::reconciliation::ReviewReconciliationModel,
};
use infra::db::{
    postgres::postgres_connection::PgPoolSquad,
    repositories::{payments::PaymentPostgres, reconciliation::ReconciliationPostgres},
};
use std::sync::Arc;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let reconciliation_repository = ReconciliationPostgres::new(Arc::clone(&db_pool));
    let payment_repository = PaymentPostgres::new(Arc::clone(&db_pool));
    let reconciliation_usecase = ReconciliationUseCase::new(
        Arc::new(reconciliation_repository),
        Arc::new(payment_repository),
    );

    Router::new()
        .route("/", post(run_matching))
        .route("/:reconciliation_id/review", post(review))
        .route("/:reconciliation_id/history", get(review_history))
        .with_state(Arc::new(reconciliation_usecase))
}

pub async fn run_matching<R, P>(
    State(reconciliation_usecase): State<Arc<ReconciliationUseCase<R, P>>>,
) -> Result<impl IntoResponse, AppError>
where
    R: ReconciliationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    let summary = reconciliation_usecase
        .run_matching()
        .await
        .map_err(|error| AppError::Internal(error.to_string()))?;
    Ok((StatusCode::OK, Json(summary)))
}

pub async fn review<R, P>(
    State(reconciliation_usecase): State<Arc<ReconciliationUseCase<R, P>>>,
    Path(reconciliation_id): Path<i64>,
    Json(review_model): Json<ReviewReconciliationModel>,
) -> Result<impl IntoResponse, AppError>
where
    R: ReconciliationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    let outcome = reconciliation_usecase
        .review(reconciliation_id, review_model)
        .await?;
    Ok((StatusCode::OK, Json(outcome)))
}

pub async fn review_history<R, P>(
    State(reconciliation_usecase): State<Arc<ReconciliationUseCase<R, P>>>,
    Path(reconciliation_id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    R: ReconciliationRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
{
    let history = reconciliation_usecase
        .review_history(reconciliation_id)
        .await?;
    Ok((StatusCode::OK, Json(history)))
}
