use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::db::postgres::postgres_connection::PgPoolSquad;
use domain::{
    entities::applications::{ApplicationDetailEntity, ApplicationEntity},
    repositories::applications::ApplicationRepository,
    schema::{application_details, applications},
};

pub struct ApplicationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ApplicationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ApplicationRepository for ApplicationPostgres {
    async fn find_active_by_ids(&self, ids: Vec<i64>) -> Result<Vec<ApplicationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = applications::table
            .filter(applications::id.eq_any(ids))
            .filter(applications::deleted_at.is_null())
            .filter(applications::is_active.eq(true))
            .select(ApplicationEntity::as_select())
            .load::<ApplicationEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_active_by_id(
        &self,
        application_id: i64,
    ) -> Result<Option<ApplicationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = applications::table
            .filter(applications::id.eq(application_id))
            .filter(applications::deleted_at.is_null())
            .filter(applications::is_active.eq(true))
            .select(ApplicationEntity::as_select())
            .first::<ApplicationEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn details_for_application(
        &self,
        application_id: i64,
    ) -> Result<Vec<ApplicationDetailEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = application_details::table
            .filter(application_details::application_id.eq(application_id))
            .filter(application_details::deleted_at.is_null())
            .filter(application_details::is_active.eq(true))
            .select(ApplicationDetailEntity::as_select())
            .load::<ApplicationDetailEntity>(&mut conn)?;

        Ok(results)
    }
}
