use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    flow::{
        flows::{
            fodmap_detection::{DetectFodmap, DetectFodmapInput, DetectFodmapOutput},
            food_image::{IdentifyFoodImage, IdentifyFoodImageInput, IdentifyFoodImageOutput},
            food_similarity::{
                CheckFoodSimilarity, CheckFoodSimilarityInput, CheckFoodSimilarityOutput,
            },
            meal_suggestion::{SuggestMeal, SuggestMealInput, SuggestMealOutput},
            nutrition::{EstimateNutrition, EstimateNutritionInput, EstimateNutritionOutput},
            symptom_patterns::{
                AnalyzeSymptomPatterns, AnalyzeSymptomPatternsInput, AnalyzeSymptomPatternsOutput,
            },
        },
        gateway::run_flow,
        ports::{FlowService, LLMClient},
    },
    food_log::ports::FoodItemRepository,
    health::ports::HealthCheckRepository,
    symptom_log::ports::SymptomLogRepository,
};

impl<FI, SL, HC, LLM> FlowService for Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn detect_fodmap(&self, input: DetectFodmapInput) -> Result<DetectFodmapOutput, CoreError> {
        run_flow(self.llm_client.as_ref(), &DetectFodmap, input).await
    }

    async fn identify_food_image(
        &self,
        input: IdentifyFoodImageInput,
    ) -> Result<IdentifyFoodImageOutput, CoreError> {
        run_flow(self.llm_client.as_ref(), &IdentifyFoodImage, input).await
    }

    async fn estimate_nutrition(
        &self,
        input: EstimateNutritionInput,
    ) -> Result<EstimateNutritionOutput, CoreError> {
        run_flow(self.llm_client.as_ref(), &EstimateNutrition, input).await
    }

    async fn check_food_similarity(
        &self,
        input: CheckFoodSimilarityInput,
    ) -> Result<CheckFoodSimilarityOutput, CoreError> {
        run_flow(self.llm_client.as_ref(), &CheckFoodSimilarity, input).await
    }

    async fn analyze_symptom_patterns(
        &self,
        input: AnalyzeSymptomPatternsInput,
    ) -> Result<AnalyzeSymptomPatternsOutput, CoreError> {
        run_flow(self.llm_client.as_ref(), &AnalyzeSymptomPatterns, input).await
    }

    async fn suggest_meal(&self, input: SuggestMealInput) -> Result<SuggestMealOutput, CoreError> {
        run_flow(self.llm_client.as_ref(), &SuggestMeal, input).await
    }
}
