use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    flow::{
        flows::{
            fodmap_detection::{DetectFodmapInput, DetectFodmapOutput},
            food_image::{IdentifyFoodImageInput, IdentifyFoodImageOutput},
            food_similarity::{CheckFoodSimilarityInput, CheckFoodSimilarityOutput},
            meal_suggestion::{SuggestMealInput, SuggestMealOutput},
            nutrition::{EstimateNutritionInput, EstimateNutritionOutput},
            symptom_patterns::{AnalyzeSymptomPatternsInput, AnalyzeSymptomPatternsOutput},
        },
        value_objects::ImageData,
    },
};

/// LLM Client trait for calling AI models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    fn generate_with_image(
        &self,
        prompt: String,
        image: ImageData,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn generate_with_text(
        &self,
        prompt: String,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// One entry point per AI flow. Every call is a single stateless
/// request/response against the model.
#[cfg_attr(test, mockall::automock)]
pub trait FlowService: Send + Sync {
    fn detect_fodmap(
        &self,
        input: DetectFodmapInput,
    ) -> impl Future<Output = Result<DetectFodmapOutput, CoreError>> + Send;

    fn identify_food_image(
        &self,
        input: IdentifyFoodImageInput,
    ) -> impl Future<Output = Result<IdentifyFoodImageOutput, CoreError>> + Send;

    fn estimate_nutrition(
        &self,
        input: EstimateNutritionInput,
    ) -> impl Future<Output = Result<EstimateNutritionOutput, CoreError>> + Send;

    fn check_food_similarity(
        &self,
        input: CheckFoodSimilarityInput,
    ) -> impl Future<Output = Result<CheckFoodSimilarityOutput, CoreError>> + Send;

    fn analyze_symptom_patterns(
        &self,
        input: AnalyzeSymptomPatternsInput,
    ) -> impl Future<Output = Result<AnalyzeSymptomPatternsOutput, CoreError>> + Send;

    fn suggest_meal(
        &self,
        input: SuggestMealInput,
    ) -> impl Future<Output = Result<SuggestMealOutput, CoreError>> + Send;
}
