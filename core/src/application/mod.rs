use tracing::info;

use crate::{
    domain::common::{GutlogConfig, services::Service},
    infrastructure::{
        db::postgres::{Postgres, PostgresConfig},
        food_log::repositories::PostgresFoodItemRepository,
        health::PostgresHealthCheckRepository,
        llm::GeminiLLMClient,
        symptom_log::repositories::PostgresSymptomLogRepository,
    },
};

pub type GutlogService = Service<
    PostgresFoodItemRepository,
    PostgresSymptomLogRepository,
    PostgresHealthCheckRepository,
    GeminiLLMClient,
>;

/// Connects to Postgres, applies migrations and wires every repository and
/// the Gemini client into one [`GutlogService`].
pub async fn create_service(config: GutlogConfig) -> Result<GutlogService, anyhow::Error> {
    let postgres = Postgres::new(PostgresConfig {
        database_url: config.database.url(),
    })
    .await?;
    postgres.migrate().await?;

    let llm_client = GeminiLLMClient::new(&config.llm)?;
    info!(model = %config.llm.gemini_model, "gemini client ready");

    Ok(Service::new(
        PostgresFoodItemRepository::new(postgres.get_db()),
        PostgresSymptomLogRepository::new(postgres.get_db()),
        PostgresHealthCheckRepository::new(postgres.get_db()),
        llm_client,
    ))
}
