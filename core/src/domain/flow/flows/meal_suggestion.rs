use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::flow::gateway::Flow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum MealTime {
    #[serde(alias = "breakfast")]
    Breakfast,
    #[serde(alias = "lunch")]
    Lunch,
    #[serde(alias = "dinner")]
    Dinner,
    #[serde(alias = "snack")]
    Snack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestMealInput {
    pub time_of_day: MealTime,
    #[serde(default)]
    #[validate(length(max = 200, message = "at most 200 safe foods can be used"))]
    pub safe_foods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "dietaryPreferences must be at most 500 characters"))]
    pub dietary_preferences: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub recent_symptoms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SuggestMealOutput {
    #[validate(length(min = 1, message = "mealName must not be empty"))]
    pub meal_name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "a meal needs at least one ingredient"))]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

pub const MEAL_SUGGESTION_UNAVAILABLE: &str = "No suggestion available";

pub struct SuggestMeal;

const TEMPLATE: &str = r#"Suggest one low FODMAP {{timeOfDay}} for a person with IBS.

{{#if safeFoods}}Foods they tolerate well, prefer building on these:
{{#each safeFoods}}- {{this}}
{{/each}}{{else}}They have not recorded any safe foods yet, stick to well known low FODMAP ingredients.
{{/if}}{{#if dietaryPreferences}}Dietary preferences: {{dietaryPreferences}}
{{/if}}{{#if recentSymptoms}}Recent symptoms: {{recentSymptoms}}. Keep the meal gentle on digestion.
{{/if}}
Return the meal in mealName, a short description, the ingredient list in ingredients and why it suits them in reasoning.
"#;

impl Flow for SuggestMeal {
    type Input = SuggestMealInput;
    type Output = SuggestMealOutput;

    const NAME: &'static str = "suggest_meal";

    fn template(&self) -> &'static str {
        TEMPLATE
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "mealName": { "type": "string" },
                "description": { "type": "string" },
                "ingredients": { "type": "array", "items": { "type": "string" } },
                "reasoning": { "type": "string" }
            },
            "required": ["mealName", "description", "ingredients", "reasoning"]
        })
    }

    fn fallback(&self, _input: &SuggestMealInput) -> Option<SuggestMealOutput> {
        Some(SuggestMealOutput {
            meal_name: MEAL_SUGGESTION_UNAVAILABLE.to_string(),
            description: "We could not generate a meal suggestion at this time.".to_string(),
            ingredients: Vec::new(),
            reasoning: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        common::entities::app_errors::CoreError,
        flow::{gateway::run_flow, ports::MockLLMClient},
    };

    fn input() -> SuggestMealInput {
        SuggestMealInput {
            time_of_day: MealTime::Lunch,
            safe_foods: vec!["Rice".to_string(), "Chicken".to_string()],
            dietary_preferences: None,
            recent_symptoms: vec!["Bloating".to_string()],
        }
    }

    #[tokio::test]
    async fn test_prompt_lists_safe_foods_and_symptoms() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .withf(|prompt, _| {
                prompt.starts_with("Suggest one low FODMAP Lunch")
                    && prompt.contains("- Rice\n- Chicken\n")
                    && prompt.contains("Recent symptoms: Bloating.")
                    && !prompt.contains("Dietary preferences")
            })
            .times(1)
            .returning(|_, _| {
                Box::pin(async {
                    Ok(r#"{"mealName": "Chicken rice bowl", "description": "Steamed rice with grilled chicken.",
                          "ingredients": ["rice", "chicken", "carrot"], "reasoning": "Built from your safe foods."}"#
                        .to_string())
                })
            });

        let output = run_flow(&llm, &SuggestMeal, input()).await.unwrap();

        assert_eq!(output.meal_name, "Chicken rice bowl");
        assert_eq!(output.ingredients.len(), 3);
    }

    #[tokio::test]
    async fn test_reply_without_ingredients_falls_back() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().times(1).returning(|_, _| {
            Box::pin(async {
                Ok(r#"{"mealName": "Soup", "description": "", "ingredients": [], "reasoning": ""}"#
                    .to_string())
            })
        });

        let output = run_flow(&llm, &SuggestMeal, input()).await.unwrap();

        assert_eq!(output.meal_name, MEAL_SUGGESTION_UNAVAILABLE);
        assert!(output.ingredients.is_empty());
    }

    #[tokio::test]
    async fn test_overlong_preferences_are_rejected_locally() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().never();

        let mut bad = input();
        bad.dietary_preferences = Some("x".repeat(501));

        let err = run_flow(&llm, &SuggestMeal, bad).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
    }
}
