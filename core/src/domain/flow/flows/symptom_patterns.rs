use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::flow::{flows::fodmap_detection::FodmapRisk, gateway::Flow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FoodLogEntry {
    #[validate(length(min = 1, max = 200))]
    pub food_name: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub portion: Option<String>,
    /// RFC 3339 timestamp of the meal.
    #[validate(length(min = 1))]
    pub logged_at: String,
    #[serde(default)]
    pub overall_risk: Option<FodmapRisk>,
    #[serde(default)]
    pub user_feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLogEntry {
    #[validate(length(min = 1, message = "each symptom entry needs at least one symptom"))]
    pub symptoms: Vec<String>,
    #[validate(range(min = 1, max = 5, message = "severity must be between 1 and 5"))]
    pub severity: u8,
    #[validate(length(min = 1))]
    pub logged_at: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSymptomPatternsInput {
    #[validate(length(max = 500, message = "at most 500 food entries can be analyzed"), nested)]
    pub food_log: Vec<FoodLogEntry>,
    #[validate(
        length(
            min = 1,
            max = 500,
            message = "at least one symptom entry is needed to look for patterns"
        ),
        nested
    )]
    pub symptom_log: Vec<SymptomLogEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Confidence {
    #[serde(alias = "low", alias = "LOW")]
    Low,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "high", alias = "HIGH")]
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PotentialTrigger {
    #[validate(length(min = 1))]
    pub food_name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSymptomPatternsOutput {
    #[validate(length(min = 1, message = "summary must not be empty"))]
    pub summary: String,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub potential_triggers: Vec<PotentialTrigger>,
}

pub const INSIGHTS_UNAVAILABLE: &str =
    "We could not generate insights at this time. Please try again later.";

pub struct AnalyzeSymptomPatterns;

const TEMPLATE: &str = r#"You are helping a person with IBS understand which foods may trigger their symptoms.
You are not giving medical advice; suggest patterns worth discussing with a dietitian.

Food log:
{{#each foodLog}}- {{loggedAt}}: {{foodName}}{{#if portion}}, {{portion}}{{/if}}{{#if ingredients}} (ingredients: {{ingredients}}){{/if}}{{#if overallRisk}} [FODMAP {{overallRisk}}]{{/if}}{{#if userFeedback}} [user marked {{userFeedback}}]{{/if}}
{{/each}}
Symptom log:
{{#each symptomLog}}- {{loggedAt}}: {{symptoms}} (severity {{severity}}/5){{#if notes}}, notes: {{notes}}{{/if}}
{{/each}}
Look for foods that are repeatedly followed by symptoms within roughly 2 to 24 hours.
Summarize the picture in summary, list short observations in insights and name likely triggers in potentialTriggers with a confidence of Low, Medium or High.
"#;

impl Flow for AnalyzeSymptomPatterns {
    type Input = AnalyzeSymptomPatternsInput;
    type Output = AnalyzeSymptomPatternsOutput;

    const NAME: &'static str = "analyze_symptom_patterns";

    fn template(&self) -> &'static str {
        TEMPLATE
    }

    fn output_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string" },
                "insights": { "type": "array", "items": { "type": "string" } },
                "potentialTriggers": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "foodName": { "type": "string" },
                            "symptoms": { "type": "array", "items": { "type": "string" } },
                            "confidence": { "type": "string", "enum": ["Low", "Medium", "High"] }
                        },
                        "required": ["foodName", "confidence"]
                    }
                }
            },
            "required": ["summary", "insights", "potentialTriggers"]
        })
    }

    fn fallback(&self, _input: &AnalyzeSymptomPatternsInput) -> Option<AnalyzeSymptomPatternsOutput> {
        Some(AnalyzeSymptomPatternsOutput {
            summary: INSIGHTS_UNAVAILABLE.to_string(),
            insights: Vec::new(),
            potential_triggers: Vec::new(),
        })
    }
}
