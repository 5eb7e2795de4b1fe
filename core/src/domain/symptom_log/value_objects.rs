use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::symptom_log::entities::Symptom;

pub const NO_SYMPTOM_SELECTED: &str = "Please select at least one symptom.";

fn validate_symptoms_selected(symptoms: &[Symptom]) -> Result<(), ValidationError> {
    if symptoms.is_empty() {
        return Err(ValidationError::new("symptoms_required")
            .with_message(Cow::Borrowed(NO_SYMPTOM_SELECTED)));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateSymptomLogInput {
    #[serde(default)]
    #[validate(custom(function = "validate_symptoms_selected"))]
    pub symptoms: Vec<Symptom>,
    #[validate(range(min = 1, max = 5, message = "severity must be between 1 and 5"))]
    pub severity: u8,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
    /// Defaults to now.
    pub logged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 50, message = "at most 50 food items can be linked"))]
    pub linked_food_item_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateSymptomLogInput {
    #[validate(custom(function = "validate_symptoms_selected"))]
    pub symptoms: Option<Vec<Symptom>>,
    #[validate(range(min = 1, max = 5, message = "severity must be between 1 and 5"))]
    pub severity: Option<u8>,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
    #[validate(length(max = 50, message = "at most 50 food items can be linked"))]
    pub linked_food_item_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetSymptomLogsFilter {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub logged_at_gte: Option<DateTime<Utc>>,
    pub logged_at_lte: Option<DateTime<Utc>>,
    pub min_severity: Option<u8>,
    pub sort: Option<String>, // e.g. "-logged_at" or "severity"
}
