use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::generate_timestamp,
    flow::flows::{
        fodmap_detection::{
            DetectFodmapInput, DetectFodmapOutput, FodmapRisk, IngredientFodmapScore,
            UserFodmapProfile,
        },
        nutrition::{EstimateNutritionInput, EstimateNutritionOutput},
        symptom_patterns::FoodLogEntry,
    },
};

/// Whether the user tolerated a food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SafetyFeedback {
    #[serde(alias = "safe", alias = "SAFE")]
    Safe,
    #[serde(alias = "unsafe", alias = "UNSAFE")]
    Unsafe,
}

impl SafetyFeedback {
    pub fn as_str(&self) -> &str {
        match self {
            SafetyFeedback::Safe => "Safe",
            SafetyFeedback::Unsafe => "Unsafe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "safe" => Some(SafetyFeedback::Safe),
            "unsafe" => Some(SafetyFeedback::Unsafe),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FodmapAnnotation {
    pub overall_risk: FodmapRisk,
    pub reason: String,
    pub ingredient_scores: Vec<IngredientFodmapScore>,
    pub detected_fodmaps: Vec<String>,
    pub is_user_known_sensitivity: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl FodmapAnnotation {
    pub fn from_detection(output: DetectFodmapOutput, analyzed_at: DateTime<Utc>) -> Self {
        Self {
            overall_risk: output.overall_risk,
            reason: output.reason,
            ingredient_scores: output.ingredient_fodmap_scores,
            detected_fodmaps: output.detected_fodmaps,
            is_user_known_sensitivity: output.is_user_known_sensitivity,
            analyzed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NutritionAnnotation {
    pub calories: f64,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: Option<f64>,
    pub analyzed_at: DateTime<Utc>,
}

impl NutritionAnnotation {
    pub fn from_estimate(output: EstimateNutritionOutput, analyzed_at: DateTime<Utc>) -> Self {
        Self {
            calories: output.calories,
            protein_grams: output.protein_grams,
            carbs_grams: output.carbs_grams,
            fat_grams: output.fat_grams,
            fiber_grams: output.fiber_grams,
            analyzed_at,
        }
    }
}

/// A meal the user logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoggedFoodItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Free text, comma separated.
    pub ingredients: String,
    pub portion_size: String,
    pub portion_unit: String,
    pub logged_at: DateTime<Utc>,
    pub fodmap: Option<FodmapAnnotation>,
    pub nutrition: Option<NutritionAnnotation>,
    pub user_feedback: Option<SafetyFeedback>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct LoggedFoodItemConfig {
    pub user_id: Uuid,
    pub name: String,
    pub ingredients: String,
    pub portion_size: String,
    pub portion_unit: String,
    pub logged_at: Option<DateTime<Utc>>,
}

impl LoggedFoodItem {
    pub fn new(config: LoggedFoodItemConfig) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            user_id: config.user_id,
            name: config.name,
            ingredients: config.ingredients,
            portion_size: config.portion_size,
            portion_unit: config.portion_unit,
            logged_at: config.logged_at.unwrap_or(now),
            fodmap: None,
            nutrition: None,
            user_feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial edit. Annotations computed from the previous name,
    /// ingredients or portion are dropped when any of them changes.
    pub fn update(
        &mut self,
        name: Option<String>,
        ingredients: Option<String>,
        portion_size: Option<String>,
        portion_unit: Option<String>,
        logged_at: Option<DateTime<Utc>>,
    ) {
        let mut content_changed = false;

        for (field, value) in [
            (&mut self.name, name),
            (&mut self.ingredients, ingredients),
            (&mut self.portion_size, portion_size),
            (&mut self.portion_unit, portion_unit),
        ] {
            if let Some(value) = value
                && *field != value
            {
                *field = value;
                content_changed = true;
            }
        }

        if let Some(logged_at) = logged_at {
            self.logged_at = logged_at;
        }

        if content_changed {
            self.fodmap = None;
            self.nutrition = None;
        }

        self.touch();
    }

    pub fn set_feedback(&mut self, feedback: Option<SafetyFeedback>) {
        self.user_feedback = feedback;
        self.touch();
    }

    /// Merges the results of an analysis run. A missing nutrition estimate
    /// keeps the previous one.
    pub fn apply_analysis(&mut self, fodmap: FodmapAnnotation, nutrition: Option<NutritionAnnotation>) {
        self.fodmap = Some(fodmap);
        if nutrition.is_some() {
            self.nutrition = nutrition;
        }
        self.touch();
    }

    pub fn overall_risk(&self) -> Option<FodmapRisk> {
        self.fodmap.as_ref().map(|f| f.overall_risk)
    }

    fn analysis_ingredients(&self) -> String {
        if self.ingredients.trim().is_empty() {
            self.name.clone()
        } else {
            self.ingredients.clone()
        }
    }

    pub fn to_fodmap_input(&self, profile: Option<UserFodmapProfile>) -> DetectFodmapInput {
        DetectFodmapInput {
            food_item: self.name.clone(),
            ingredients: self.analysis_ingredients(),
            portion_size: self.portion_size.clone(),
            portion_unit: self.portion_unit.clone(),
            user_fodmap_profile: profile,
        }
    }

    pub fn to_nutrition_input(&self) -> EstimateNutritionInput {
        EstimateNutritionInput {
            food_item: self.name.clone(),
            ingredients: self.analysis_ingredients(),
            portion_size: self.portion_size.clone(),
            portion_unit: self.portion_unit.clone(),
        }
    }

    pub fn to_food_log_entry(&self) -> FoodLogEntry {
        FoodLogEntry {
            food_name: self.name.clone(),
            ingredients: self.ingredients.clone(),
            portion: Some(format!("{} {}", self.portion_size, self.portion_unit)),
            logged_at: self.logged_at.to_rfc3339(),
            overall_risk: self.overall_risk(),
            user_feedback: self.user_feedback.map(|f| f.as_str().to_string()),
        }
    }

    fn touch(&mut self) {
        let (now, _) = generate_timestamp();
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> LoggedFoodItem {
        LoggedFoodItem::new(LoggedFoodItemConfig {
            user_id: Uuid::new_v4(),
            name: "Garlic Bread".to_string(),
            ingredients: "Bread, Butter, Garlic".to_string(),
            portion_size: "1".to_string(),
            portion_unit: "slice".to_string(),
            logged_at: None,
        })
    }

    fn annotated() -> LoggedFoodItem {
        let mut item = item();
        item.apply_analysis(
            FodmapAnnotation {
                overall_risk: FodmapRisk::Red,
                reason: "fructans".to_string(),
                ingredient_scores: Vec::new(),
                detected_fodmaps: vec!["fructans".to_string()],
                is_user_known_sensitivity: false,
                analyzed_at: Utc::now(),
            },
            Some(NutritionAnnotation {
                calories: 180.0,
                protein_grams: 4.0,
                carbs_grams: 20.0,
                fat_grams: 9.0,
                fiber_grams: None,
                analyzed_at: Utc::now(),
            }),
        );
        item
    }

    #[test]
    fn test_new_item_defaults_logged_at_to_creation_time() {
        let item = item();
        assert_eq!(item.logged_at, item.created_at);
        assert!(item.fodmap.is_none());
        assert_eq!(item.id.get_version_num(), 7);
    }

    #[test]
    fn test_editing_ingredients_clears_annotations() {
        let mut item = annotated();
        item.update(None, Some("Bread, Butter".to_string()), None, None, None);

        assert!(item.fodmap.is_none());
        assert!(item.nutrition.is_none());
    }

    #[test]
    fn test_same_values_or_time_change_keep_annotations() {
        let mut item = annotated();
        item.update(
            Some("Garlic Bread".to_string()),
            None,
            None,
            None,
            Some(Utc::now()),
        );

        assert_eq!(item.overall_risk(), Some(FodmapRisk::Red));
        assert!(item.nutrition.is_some());
    }

    #[test]
    fn test_missing_nutrition_keeps_previous_estimate() {
        let mut item = annotated();
        let fodmap = item.fodmap.clone().unwrap();
        item.apply_analysis(fodmap, None);

        assert_eq!(item.nutrition.as_ref().map(|n| n.calories), Some(180.0));
    }

    #[test]
    fn test_empty_ingredients_fall_back_to_name_for_analysis() {
        let mut item = item();
        item.ingredients = String::new();

        assert_eq!(item.to_fodmap_input(None).ingredients, "Garlic Bread");
        assert_eq!(item.to_nutrition_input().ingredients, "Garlic Bread");
    }

    #[test]
    fn test_safety_feedback_parse() {
        assert_eq!(SafetyFeedback::parse("SAFE"), Some(SafetyFeedback::Safe));
        assert_eq!(SafetyFeedback::parse("unsafe"), Some(SafetyFeedback::Unsafe));
        assert_eq!(SafetyFeedback::parse("maybe"), None);
    }
}
