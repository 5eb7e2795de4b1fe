use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{common::entities::app_errors::CoreError, flow::gateway::Flow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FoodDescriptor {
    #[validate(length(min = 1, max = 200, message = "food name must be between 1 and 200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub ingredients: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckFoodSimilarityInput {
    #[validate(nested)]
    pub current_food: FoodDescriptor,
    #[validate(
        length(max = 200, message = "at most 200 safe foods can be compared"),
        nested
    )]
    pub safe_foods: Vec<FoodDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckFoodSimilarityOutput {
    pub is_similar: bool,
    #[serde(default)]
    pub similar_safe_food_name: Option<String>,
    #[validate(length(min = 1, message = "reason must not be empty"))]
    pub reason: String,
}

pub const SIMILARITY_UNAVAILABLE: &str =
    "We could not compare this food with your safe foods right now.";

pub struct CheckFoodSimilarity;

const TEMPLATE: &str = r#"A person with IBS keeps a list of foods they tolerate well ("safe foods").
Decide whether the new food is similar enough to one of them that it is likely safe too.
Consider shared main ingredients and preparation, not just the name.

New food: {{currentFood.name}}{{#if currentFood.ingredients}} (ingredients: {{currentFood.ingredients}}){{/if}}

Safe foods:
{{#each safeFoods}}- {{name}}{{#if ingredients}} (ingredients: {{ingredients}}){{/if}}
{{/each}}
Set isSimilar, put the matching safe food name exactly as listed in similarSafeFoodName when isSimilar is true, and explain in reason.
"#;

impl Flow for CheckFoodSimilarity {
    type Input = CheckFoodSimilarityInput;
    type Output = CheckFoodSimilarityOutput;

    const NAME: &'static str = "check_food_similarity";

    fn template(&self) -> &'static str {
        TEMPLATE
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "isSimilar": { "type": "boolean" },
                "similarSafeFoodName": { "type": "string" },
                "reason": { "type": "string" }
            },
            "required": ["isSimilar", "reason"]
        })
    }

    fn check(
        &self,
        input: &CheckFoodSimilarityInput,
        output: &CheckFoodSimilarityOutput,
    ) -> Result<(), CoreError> {
        if !output.is_similar {
            return Ok(());
        }

        let name = output.similar_safe_food_name.as_deref().ok_or_else(|| {
            CoreError::MalformedResponse("similar food without similarSafeFoodName".to_string())
        })?;

        let known = input
            .safe_foods
            .iter()
            .any(|f| f.name.trim().eq_ignore_ascii_case(name.trim()));
        if !known {
            return Err(CoreError::MalformedResponse(format!(
                "'{}' is not one of the safe foods",
                name
            )));
        }

        Ok(())
    }

    fn fallback(&self, _input: &CheckFoodSimilarityInput) -> Option<CheckFoodSimilarityOutput> {
        Some(CheckFoodSimilarityOutput {
            is_similar: false,
            similar_safe_food_name: None,
            reason: SIMILARITY_UNAVAILABLE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::{gateway::run_flow, ports::MockLLMClient};

    fn food(name: &str, ingredients: &str) -> FoodDescriptor {
        FoodDescriptor {
            name: name.to_string(),
            ingredients: ingredients.to_string(),
        }
    }

    fn input() -> CheckFoodSimilarityInput {
        CheckFoodSimilarityInput {
            current_food: food("Sourdough toast", "sourdough bread, butter"),
            safe_foods: vec![food("Spelt sourdough", ""), food("Rice cakes", "rice")],
        }
    }

    #[tokio::test]
    async fn test_safe_foods_are_listed_and_match_is_returned() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .withf(|prompt, _| {
                prompt.contains("New food: Sourdough toast (ingredients: sourdough bread, butter)")
                    && prompt.contains("- Spelt sourdough\n- Rice cakes (ingredients: rice)\n")
            })
            .times(1)
            .returning(|_, _| {
                Box::pin(async {
                    Ok(r#"{"isSimilar": true, "similarSafeFoodName": "spelt sourdough", "reason": "Both are long fermented sourdough breads."}"#.to_string())
                })
            });

        let output = run_flow(&llm, &CheckFoodSimilarity, input()).await.unwrap();

        assert!(output.is_similar);
        assert_eq!(output.similar_safe_food_name.as_deref(), Some("spelt sourdough"));
    }

    #[tokio::test]
    async fn test_invented_safe_food_falls_back() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().times(1).returning(|_, _| {
            Box::pin(async {
                Ok(r#"{"isSimilar": true, "similarSafeFoodName": "Baguette", "reason": "bread"}"#
                    .to_string())
            })
        });

        let output = run_flow(&llm, &CheckFoodSimilarity, input()).await.unwrap();

        assert!(!output.is_similar);
        assert_eq!(output.reason, SIMILARITY_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_replaced_by_fallback() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().never();

        let mut bad = input();
        bad.current_food.name = String::new();

        let err = run_flow(&llm, &CheckFoodSimilarity, bad).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
    }
}
