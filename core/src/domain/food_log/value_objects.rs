use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{
    flow::flows::fodmap_detection::{FodmapRisk, UserFodmapProfile},
    food_log::entities::SafetyFeedback,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateFoodItemInput {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "ingredients must be at most 2000 characters"))]
    pub ingredients: String,
    #[validate(length(min = 1, max = 50, message = "portion size is required"))]
    pub portion_size: String,
    #[validate(length(min = 1, max = 50, message = "portion unit is required"))]
    pub portion_unit: String,
    /// Defaults to now.
    pub logged_at: Option<DateTime<Utc>>,
}

/// Partial update, absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateFoodItemInput {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "ingredients must be at most 2000 characters"))]
    pub ingredients: Option<String>,
    #[validate(length(min = 1, max = 50, message = "portion size is required"))]
    pub portion_size: Option<String>,
    #[validate(length(min = 1, max = 50, message = "portion unit is required"))]
    pub portion_unit: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
}

impl CreateFoodItemInput {
    /// Text fields with surrounding whitespace removed. Length checks run on this form.
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            ingredients: self.ingredients.trim().to_string(),
            portion_size: self.portion_size.trim().to_string(),
            portion_unit: self.portion_unit.trim().to_string(),
            logged_at: self.logged_at,
        }
    }
}

impl UpdateFoodItemInput {
    pub fn trimmed(self) -> Self {
        let trim = |s: Option<String>| s.map(|s| s.trim().to_string());
        Self {
            name: trim(self.name),
            ingredients: trim(self.ingredients),
            portion_size: trim(self.portion_size),
            portion_unit: trim(self.portion_unit),
            logged_at: self.logged_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetFoodFeedbackInput {
    /// `null` clears earlier feedback.
    pub feedback: Option<SafetyFeedback>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeFoodItemInput {
    pub user_fodmap_profile: Option<UserFodmapProfile>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetFoodItemsFilter {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub logged_at_gte: Option<DateTime<Utc>>,
    pub logged_at_lte: Option<DateTime<Utc>>,
    pub overall_risk: Option<FodmapRisk>,
    pub user_feedback: Option<SafetyFeedback>,
    pub sort: Option<String>, // e.g. "-logged_at" or "name"
}
