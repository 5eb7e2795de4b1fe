use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    domain::{
        flow::flows::fodmap_detection::FodmapRisk,
        food_log::entities::{
            FodmapAnnotation, LoggedFoodItem, NutritionAnnotation, SafetyFeedback,
        },
    },
    entity::food_items,
};

/// Decodes an optional JSON column. Rows written by an older shape are read
/// as if the annotation were absent.
fn decode_annotation<T: DeserializeOwned>(
    column: &str,
    value: Option<&serde_json::Value>,
) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("Ignoring unreadable food_items.{} value: {}", column, e);
            None
        }
    }
}

impl From<&food_items::Model> for LoggedFoodItem {
    fn from(model: &food_items::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name.clone(),
            ingredients: model.ingredients.clone(),
            portion_size: model.portion_size.clone(),
            portion_unit: model.portion_unit.clone(),
            logged_at: model.logged_at.to_utc(),
            fodmap: decode_annotation::<FodmapAnnotation>("fodmap", model.fodmap.as_ref()),
            nutrition: decode_annotation::<NutritionAnnotation>("nutrition", model.nutrition.as_ref()),
            user_feedback: model
                .user_feedback
                .as_deref()
                .and_then(SafetyFeedback::parse),
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}

impl From<food_items::Model> for LoggedFoodItem {
    fn from(model: food_items::Model) -> Self {
        Self::from(&model)
    }
}

pub fn risk_column(risk: Option<FodmapRisk>) -> Option<String> {
    risk.map(|r| r.as_str().to_string())
}

pub fn feedback_column(feedback: Option<SafetyFeedback>) -> Option<String> {
    feedback.map(|f| f.as_str().to_string())
}

pub fn annotation_column<T: serde::Serialize>(annotation: Option<&T>) -> Option<serde_json::Value> {
    annotation.and_then(|a| serde_json::to_value(a).ok())
}
