use std::sync::Arc;

use crate::domain::{
    flow::ports::LLMClient, food_log::ports::FoodItemRepository,
    health::ports::HealthCheckRepository, symptom_log::ports::SymptomLogRepository,
};

/// Application service shared by every domain. Each domain implements its
/// service trait on this struct in its own `services.rs`.
#[derive(Clone)]
pub struct Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    pub(crate) food_item_repository: Arc<FI>,
    pub(crate) symptom_log_repository: Arc<SL>,
    pub(crate) health_check_repository: Arc<HC>,
    pub(crate) llm_client: Arc<LLM>,
}

impl<FI, SL, HC, LLM> Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    pub fn new(
        food_item_repository: FI,
        symptom_log_repository: SL,
        health_check_repository: HC,
        llm_client: LLM,
    ) -> Self {
        Self {
            food_item_repository: Arc::new(food_item_repository),
            symptom_log_repository: Arc::new(symptom_log_repository),
            health_check_repository: Arc::new(health_check_repository),
            llm_client: Arc::new(llm_client),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Service;
    use crate::domain::{
        flow::ports::MockLLMClient, food_log::ports::MockFoodItemRepository,
        health::ports::MockHealthCheckRepository, symptom_log::ports::MockSymptomLogRepository,
    };

    pub(crate) type MockService = Service<
        MockFoodItemRepository,
        MockSymptomLogRepository,
        MockHealthCheckRepository,
        MockLLMClient,
    >;

    pub(crate) fn service(
        food_items: MockFoodItemRepository,
        symptom_logs: MockSymptomLogRepository,
        llm: MockLLMClient,
    ) -> MockService {
        Service::new(food_items, symptom_logs, MockHealthCheckRepository::new(), llm)
    }
}
