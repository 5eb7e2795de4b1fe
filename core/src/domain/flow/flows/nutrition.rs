use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::flow::gateway::Flow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EstimateNutritionInput {
    #[validate(length(
        min = 1,
        max = 200,
        message = "foodItem must be between 1 and 200 characters"
    ))]
    pub food_item: String,
    #[validate(length(
        min = 1,
        max = 2000,
        message = "ingredients must be between 1 and 2000 characters"
    ))]
    pub ingredients: String,
    #[validate(length(min = 1, max = 50, message = "portionSize is required"))]
    pub portion_size: String,
    #[validate(length(min = 1, max = 50, message = "portionUnit is required"))]
    pub portion_unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EstimateNutritionOutput {
    #[validate(range(min = 0.0, max = 10000.0))]
    pub calories: f64,
    #[validate(range(min = 0.0))]
    pub protein_grams: f64,
    #[validate(range(min = 0.0))]
    pub carbs_grams: f64,
    #[validate(range(min = 0.0))]
    pub fat_grams: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub fiber_grams: Option<f64>,
}

pub struct EstimateNutrition;

const TEMPLATE: &str = r#"Estimate the nutrition of this portion of food.

- Food item: {{foodItem}}
- Ingredients: {{ingredients}}
- Portion: {{portionSize}} {{portionUnit}}

Give kilocalories in calories and grams in proteinGrams, carbsGrams, fatGrams and fiberGrams.
Estimate for the whole portion, not per 100 g. Use your best estimate when unsure.
"#;

impl Flow for EstimateNutrition {
    type Input = EstimateNutritionInput;
    type Output = EstimateNutritionOutput;

    const NAME: &'static str = "estimate_nutrition";

    fn template(&self) -> &'static str {
        TEMPLATE
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "calories": { "type": "number" },
                "proteinGrams": { "type": "number" },
                "carbsGrams": { "type": "number" },
                "fatGrams": { "type": "number" },
                "fiberGrams": { "type": "number" }
            },
            "required": ["calories", "proteinGrams", "carbsGrams", "fatGrams"]
        })
    }
}
