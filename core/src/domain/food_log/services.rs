use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_timestamp, services::Service},
    flow::{
        flows::{fodmap_detection::DetectFodmap, nutrition::EstimateNutrition},
        gateway::run_flow,
        ports::LLMClient,
    },
    food_log::{
        entities::{FodmapAnnotation, LoggedFoodItem, LoggedFoodItemConfig, NutritionAnnotation},
        ports::{FoodItemRepository, FoodLogService},
        value_objects::{
            AnalyzeFoodItemInput, CreateFoodItemInput, GetFoodItemsFilter, SetFoodFeedbackInput,
            UpdateFoodItemInput,
        },
    },
    health::ports::HealthCheckRepository,
    identity::Identity,
    symptom_log::ports::SymptomLogRepository,
};

impl<FI, SL, HC, LLM> Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn owned_food_item(
        &self,
        identity: &Identity,
        item_id: Uuid,
    ) -> Result<LoggedFoodItem, CoreError> {
        self.food_item_repository
            .get_by_id(item_id, identity.id())
            .await?
            .ok_or(CoreError::NotFound)
    }
}

impl<FI, SL, HC, LLM> FoodLogService for Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn create_food_item(
        &self,
        identity: Identity,
        input: CreateFoodItemInput,
    ) -> Result<LoggedFoodItem, CoreError> {
        let input = input.trimmed();
        input.validate()?;

        let item = LoggedFoodItem::new(LoggedFoodItemConfig {
            user_id: identity.id(),
            name: input.name,
            ingredients: input.ingredients,
            portion_size: input.portion_size,
            portion_unit: input.portion_unit,
            logged_at: input.logged_at,
        });

        self.food_item_repository.create_item(item).await
    }

    async fn get_food_item(
        &self,
        identity: Identity,
        item_id: Uuid,
    ) -> Result<LoggedFoodItem, CoreError> {
        self.owned_food_item(&identity, item_id).await
    }

    async fn list_food_items(
        &self,
        identity: Identity,
        mut filter: GetFoodItemsFilter,
    ) -> Result<Vec<LoggedFoodItem>, CoreError> {
        filter.logged_at_gte = identity
            .retention_tier
            .clamp_from(filter.logged_at_gte, Utc::now());

        self.food_item_repository
            .get_by_user(identity.id(), filter)
            .await
    }

    async fn update_food_item(
        &self,
        identity: Identity,
        item_id: Uuid,
        input: UpdateFoodItemInput,
    ) -> Result<LoggedFoodItem, CoreError> {
        let input = input.trimmed();
        input.validate()?;

        let mut item = self.owned_food_item(&identity, item_id).await?;
        item.update(
            input.name,
            input.ingredients,
            input.portion_size,
            input.portion_unit,
            input.logged_at,
        );

        self.food_item_repository.update_item(item).await
    }

    async fn delete_food_item(&self, identity: Identity, item_id: Uuid) -> Result<(), CoreError> {
        self.food_item_repository
            .delete_item(item_id, identity.id())
            .await
    }

    async fn set_food_feedback(
        &self,
        identity: Identity,
        item_id: Uuid,
        input: SetFoodFeedbackInput,
    ) -> Result<LoggedFoodItem, CoreError> {
        let mut item = self.owned_food_item(&identity, item_id).await?;
        item.set_feedback(input.feedback);

        self.food_item_repository.update_item(item).await
    }

    #[tracing::instrument(skip(self, identity, input), fields(user_id = %identity.id()))]
    async fn analyze_food_item(
        &self,
        identity: Identity,
        item_id: Uuid,
        input: AnalyzeFoodItemInput,
    ) -> Result<LoggedFoodItem, CoreError> {
        let mut item = self.owned_food_item(&identity, item_id).await?;

        let llm = self.llm_client.as_ref();
        let (fodmap, nutrition) = tokio::join!(
            run_flow(llm, &DetectFodmap, item.to_fodmap_input(input.user_fodmap_profile)),
            run_flow(llm, &EstimateNutrition, item.to_nutrition_input()),
        );

        let (analyzed_at, _) = generate_timestamp();
        let fodmap = FodmapAnnotation::from_detection(fodmap?, analyzed_at);
        let nutrition = match nutrition {
            Ok(output) => Some(NutritionAnnotation::from_estimate(output, analyzed_at)),
            Err(e) => {
                warn!(error = %e, "nutrition estimate skipped");
                None
            }
        };

        info!(risk = fodmap.overall_risk.as_str(), "food item analyzed");
        item.apply_analysis(fodmap, nutrition);

        self.food_item_repository.update_item(item).await
    }
}
