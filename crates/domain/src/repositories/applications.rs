use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::entities::applications::{ApplicationDetailEntity, ApplicationEntity};

#[async_trait]
#[automock]
pub trait ApplicationRepository {
    /// Loads the applications with the given ids, skipping soft-deleted and
    /// inactive rows. Missing ids are simply absent from the result.
    async fn find_active_by_ids(&self, ids: Vec<i64>) -> Result<Vec<ApplicationEntity>>;

    async fn find_active_by_id(&self, application_id: i64)
    -> Result<Option<ApplicationEntity>>;

    async fn details_for_application(
        &self,
        application_id: i64,
    ) -> Result<Vec<ApplicationDetailEntity>>;
}
