use std::time::Instant;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use tracing::error;

use crate::domain::{
    common::entities::app_errors::CoreError,
    health::{entities::DatabaseHealthStatus, ports::HealthCheckRepository},
};

#[derive(Debug, Clone)]
pub struct PostgresHealthCheckRepository {
    pub db: DatabaseConnection,
}

impl PostgresHealthCheckRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ping(&self) -> Result<u64, CoreError> {
        let started = Instant::now();
        self.db
            .execute(Statement::from_string(DbBackend::Postgres, "SELECT 1"))
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX))
    }
}

impl HealthCheckRepository for PostgresHealthCheckRepository {
    async fn health(&self) -> Result<u64, CoreError> {
        self.ping().await
    }

    async fn readiness(&self) -> Result<DatabaseHealthStatus, CoreError> {
        let response_time_ms = self.ping().await?;
        Ok(DatabaseHealthStatus::up("postgres", response_time_ms))
    }
}
