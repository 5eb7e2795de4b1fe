use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    flow::ports::LLMClient,
    food_log::ports::FoodItemRepository,
    health::{
        entities::DatabaseHealthStatus,
        ports::{HealthCheckRepository, HealthCheckService},
    },
    symptom_log::ports::SymptomLogRepository,
};

impl<FI, SL, HC, LLM> HealthCheckService for Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn readiness(&self) -> Result<DatabaseHealthStatus, CoreError> {
        self.health_check_repository.readiness().await
    }

    async fn health(&self) -> Result<u64, CoreError> {
        self.health_check_repository.health().await
    }
}
