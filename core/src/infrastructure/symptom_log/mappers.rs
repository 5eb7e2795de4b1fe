use tracing::warn;
use uuid::Uuid;

use crate::{
    domain::symptom_log::entities::{Symptom, SymptomLog},
    entity::symptom_logs,
};

/// Symptom codes are stored as a JSON array of strings. Unknown codes are
/// skipped.
pub fn map_symptoms(value: &serde_json::Value) -> Vec<Symptom> {
    let Some(codes) = value.as_array() else {
        warn!("symptom_logs.symptoms is not an array: {}", value);
        return Vec::new();
    };

    codes
        .iter()
        .filter_map(|code| {
            let code = code.as_str()?;
            match code.parse::<Symptom>() {
                Ok(symptom) => Some(symptom),
                Err(e) => {
                    warn!("Skipping stored symptom: {}", e);
                    None
                }
            }
        })
        .collect()
}

pub fn symptoms_column(symptoms: &[Symptom]) -> serde_json::Value {
    serde_json::Value::Array(
        symptoms
            .iter()
            .map(|s| serde_json::Value::String(s.as_str().to_string()))
            .collect(),
    )
}

pub fn map_linked_ids(value: &serde_json::Value) -> Vec<Uuid> {
    value
        .as_array()
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str().and_then(|s| Uuid::parse_str(s).ok()))
                .collect()
        })
        .unwrap_or_default()
}

pub fn linked_ids_column(ids: &[Uuid]) -> serde_json::Value {
    serde_json::Value::Array(
        ids.iter()
            .map(|id| serde_json::Value::String(id.to_string()))
            .collect(),
    )
}

impl From<&symptom_logs::Model> for SymptomLog {
    fn from(model: &symptom_logs::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            symptoms: map_symptoms(&model.symptoms),
            severity: u8::try_from(model.severity).unwrap_or(1),
            notes: model.notes.clone(),
            logged_at: model.logged_at.to_utc(),
            linked_food_item_ids: map_linked_ids(&model.linked_food_item_ids),
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}

impl From<symptom_logs::Model> for SymptomLog {
    fn from(model: symptom_logs::Model) -> Self {
        Self::from(&model)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unknown_symptom_codes_are_skipped() {
        let symptoms = map_symptoms(&json!(["BLOATING", "SNEEZING", 3, "ABDOMINAL_PAIN"]));
        assert_eq!(symptoms, vec![Symptom::Bloating, Symptom::AbdominalPain]);
    }

    #[test]
    fn test_columns_are_readable_back() {
        let symptoms = vec![Symptom::Heartburn, Symptom::Nausea];
        assert_eq!(map_symptoms(&symptoms_column(&symptoms)), symptoms);

        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        assert_eq!(map_linked_ids(&linked_ids_column(&ids)), ids);
    }
}
