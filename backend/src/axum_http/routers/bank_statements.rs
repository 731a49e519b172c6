use crate::axum_http::error_responses::AppError;
use crate::usecases::bank_statements::BankStatementUseCase;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use domain::{
    repositories::bank_statements::BankStatementRepository,
    value_objects::bank_statements::UploadStatementModel,
};
use infra::db::{
    postgres::postgres_connection::PgPoolSquad,
    repositories::bank_statements::BankStatementPostgres,
};
use std::sync::Arc;

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let bank_statement_repository = BankStatementPostgres::new(Arc::clone(&db_pool));
    let bank_statement_usecase =
        BankStatementUseCase::new(Arc::new(bank_statement_repository));

    Router::new()
        .route("/", post(upload_statement))
        .with_state(Arc::new(bank_statement_usecase))
}

pub async fn upload_statement<B>(
    State(bank_statement_usecase): State<Arc<BankStatementUseCase<B>>>,
    Json(upload_statement_model): Json<UploadStatementModel>,
) -> Result<impl IntoResponse, AppError>
where
    B: BankStatementRepository + Send + Sync + 'static,
{
    let summary = bank_statement_usecase.upload(upload_statement_model).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}
