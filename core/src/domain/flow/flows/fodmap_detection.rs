use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{common::entities::app_errors::CoreError, flow::gateway::Flow};

/// FODMAP traffic light rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum FodmapRisk {
    #[serde(alias = "green", alias = "GREEN", alias = "Low", alias = "low")]
    Green,
    #[serde(alias = "yellow", alias = "YELLOW", alias = "Moderate", alias = "moderate")]
    Yellow,
    #[serde(alias = "red", alias = "RED", alias = "High", alias = "high")]
    Red,
}

impl FodmapRisk {
    pub fn as_str(&self) -> &str {
        match self {
            FodmapRisk::Green => "Green",
            FodmapRisk::Yellow => "Yellow",
            FodmapRisk::Red => "Red",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "green" => Some(FodmapRisk::Green),
            "yellow" => Some(FodmapRisk::Yellow),
            "red" => Some(FodmapRisk::Red),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserFodmapProfile {
    #[serde(default)]
    pub known_sensitivities: Vec<String>,
    #[serde(default)]
    pub safe_foods: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DetectFodmapInput {
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
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_fodmap_profile: Option<UserFodmapProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientFodmapScore {
    #[validate(length(min = 1, message = "ingredient name must not be empty"))]
    pub ingredient: String,
    pub score: FodmapRisk,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DetectFodmapOutput {
    pub overall_risk: FodmapRisk,
    #[validate(length(min = 1, message = "reason must not be empty"))]
    pub reason: String,
    #[validate(nested)]
    pub ingredient_fodmap_scores: Vec<IngredientFodmapScore>,
    #[serde(default)]
    pub detected_fodmaps: Vec<String>,
    #[serde(default)]
    pub is_user_known_sensitivity: bool,
}

/// Splits a free text ingredient list on commas, semicolons and new lines.
pub fn split_ingredients(ingredients: &str) -> Vec<String> {
    ingredients
        .split([',', ';', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Case and whitespace insensitive form used to pair scores with ingredients.
fn normalize_ingredient(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub struct DetectFodmap;

const TEMPLATE: &str = r#"You are a dietitian specialised in the low FODMAP diet, helping a person who manages IBS.

Rate the FODMAP risk of the following food for that person:
- Food item: {{foodItem}}
- Ingredients: {{ingredients}}
- Portion: {{portionSize}} {{portionUnit}}
{{#if userFodmapProfile}}
What we know about this person:
{{#if userFodmapProfile.knownSensitivities}}- Known sensitivities: {{userFodmapProfile.knownSensitivities}}
{{/if}}{{#if userFodmapProfile.safeFoods}}- Foods they tolerate well: {{userFodmapProfile.safeFoods}}
{{/if}}{{/if}}
Rules:
- Use Green for low FODMAP, Yellow for moderate and Red for high FODMAP at this portion size.
- Score every listed ingredient separately in ingredientFodmapScores, naming it exactly as written above.
- List the FODMAP groups involved (fructans, GOS, lactose, excess fructose, sorbitol, mannitol) in detectedFodmaps.
- Set isUserKnownSensitivity to true only if an ingredient matches a known sensitivity.
- Explain the overall rating in one or two plain sentences in reason.
"#;

impl Flow for DetectFodmap {
    type Input = DetectFodmapInput;
    type Output = DetectFodmapOutput;

    const NAME: &'static str = "detect_fodmap";

    fn template(&self) -> &'static str {
        TEMPLATE
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "overallRisk": { "type": "string", "enum": ["Green", "Yellow", "Red"] },
                "reason": { "type": "string" },
                "ingredientFodmapScores": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "ingredient": { "type": "string" },
                            "score": { "type": "string", "enum": ["Green", "Yellow", "Red"] },
                            "reason": { "type": "string" }
                        },
                        "required": ["ingredient", "score"]
                    }
                },
                "detectedFodmaps": { "type": "array", "items": { "type": "string" } },
                "isUserKnownSensitivity": { "type": "boolean" }
            },
            "required": ["overallRisk", "reason", "ingredientFodmapScores"]
        })
    }

    fn check(&self, input: &DetectFodmapInput, output: &DetectFodmapOutput) -> Result<(), CoreError> {
        if output.reason.trim().is_empty() {
            return Err(CoreError::MalformedResponse(
                "reason must not be blank".to_string(),
            ));
        }

        let scored: Vec<String> = output
            .ingredient_fodmap_scores
            .iter()
            .map(|s| normalize_ingredient(&s.ingredient))
            .collect();

        for ingredient in split_ingredients(&input.ingredients) {
            let wanted = normalize_ingredient(&ingredient);
            if !scored.contains(&wanted) {
                return Err(CoreError::MalformedResponse(format!(
                    "no FODMAP score for ingredient '{}'",
                    ingredient
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::{gateway::run_flow, ports::MockLLMClient};

    fn garlic_bread() -> DetectFodmapInput {
        DetectFodmapInput {
            food_item: "Garlic Bread".to_string(),
            ingredients: "Bread, Butter, Garlic".to_string(),
            portion_size: "1".to_string(),
            portion_unit: "slice".to_string(),
            user_fodmap_profile: None,
        }
    }

    const GARLIC_BREAD_REPLY: &str = r#"{
        "overallRisk": "Red",
        "reason": "Wheat bread and garlic are both high in fructans.",
        "ingredientFodmapScores": [
            { "ingredient": "Bread", "score": "Red", "reason": "wheat fructans" },
            { "ingredient": "Butter", "score": "Green" },
            { "ingredient": "Garlic", "score": "red" }
        ],
        "detectedFodmaps": ["fructans"]
    }"#;

    #[tokio::test]
    async fn test_garlic_bread_scenario() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .withf(|prompt, _| {
                prompt.contains("Food item: Garlic Bread")
                    && prompt.contains("Ingredients: Bread, Butter, Garlic")
                    && prompt.contains("Portion: 1 slice")
                    && !prompt.contains("What we know about this person")
            })
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(GARLIC_BREAD_REPLY.to_string()) }));

        let output = run_flow(&llm, &DetectFodmap, garlic_bread()).await.unwrap();

        assert_eq!(output.overall_risk, FodmapRisk::Red);
        assert!(!output.reason.is_empty());
        let names: Vec<&str> = output
            .ingredient_fodmap_scores
            .iter()
            .map(|s| s.ingredient.as_str())
            .collect();
        assert_eq!(names, vec!["Bread", "Butter", "Garlic"]);
        assert_eq!(output.ingredient_fodmap_scores[2].score, FodmapRisk::Red);
        assert!(!output.is_user_known_sensitivity);
    }

    #[tokio::test]
    async fn test_missing_ingredient_score_is_rejected() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().times(1).returning(|_, _| {
            Box::pin(async {
                Ok(r#"{"overallRisk":"Yellow","reason":"Some fructans.","ingredientFodmapScores":[{"ingredient":"Bread","score":"Yellow"}]}"#.to_string())
            })
        });

        let err = run_flow(&llm, &DetectFodmap, garlic_bread())
            .await
            .unwrap_err();

        match err {
            CoreError::MalformedResponse(message) => assert!(message.contains("Butter")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_combined_score_does_not_cover_each_ingredient() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().times(1).returning(|_, _| {
            Box::pin(async {
                Ok(r#"{"overallRisk":"Red","reason":"Fructans.","ingredientFodmapScores":[{"ingredient":"Garlic Bread","score":"Red"},{"ingredient":"  butter ","score":"Green"}]}"#.to_string())
            })
        });

        let err = run_flow(&llm, &DetectFodmap, garlic_bread())
            .await
            .unwrap_err();

        match err {
            CoreError::MalformedResponse(message) => assert!(message.contains("'Bread'")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_ingredient() {
        assert_eq!(normalize_ingredient("  Garlic   Bread "), "garlic bread");
        assert_eq!(normalize_ingredient("BUTTER"), "butter");
    }

    #[tokio::test]
    async fn test_unknown_risk_value_is_rejected() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().times(1).returning(|_, _| {
            Box::pin(async {
                Ok(r#"{"overallRisk":"Purple","reason":"?","ingredientFodmapScores":[]}"#.to_string())
            })
        });

        let err = run_flow(&llm, &DetectFodmap, garlic_bread())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_portion_is_rejected_locally() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().never();

        let mut input = garlic_bread();
        input.portion_unit = String::new();

        let err = run_flow(&llm, &DetectFodmap, input).await.unwrap_err();

        match err {
            CoreError::Validation(fields) => {
                assert_eq!(fields.0.len(), 1);
                assert_eq!(fields.0[0].message, "portionUnit is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_profile_is_rendered_into_prompt() {
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .withf(|prompt, _| {
                prompt.contains("- Known sensitivities: garlic, onion")
                    && !prompt.contains("Foods they tolerate well")
            })
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(GARLIC_BREAD_REPLY.to_string()) }));

        let mut input = garlic_bread();
        input.user_fodmap_profile = Some(UserFodmapProfile {
            known_sensitivities: vec!["garlic".to_string(), "onion".to_string()],
            safe_foods: Vec::new(),
        });

        assert!(run_flow(&llm, &DetectFodmap, input).await.is_ok());
    }

    #[test]
    fn test_split_ingredients() {
        assert_eq!(
            split_ingredients(" Bread,Butter ;\nGarlic , ,"),
            vec!["Bread", "Butter", "Garlic"]
        );
    }
}
