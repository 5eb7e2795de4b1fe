use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{common::generate_timestamp, flow::flows::symptom_patterns::SymptomLogEntry};

/// Fixed symptom catalogue offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Symptom {
    Bloating,
    Gas,
    AbdominalPain,
    Cramping,
    Diarrhea,
    Constipation,
    Nausea,
    Heartburn,
    Fatigue,
    Headache,
    Other,
}

impl Symptom {
    pub const ALL: [Symptom; 11] = [
        Symptom::Bloating,
        Symptom::Gas,
        Symptom::AbdominalPain,
        Symptom::Cramping,
        Symptom::Diarrhea,
        Symptom::Constipation,
        Symptom::Nausea,
        Symptom::Heartburn,
        Symptom::Fatigue,
        Symptom::Headache,
        Symptom::Other,
    ];

    /// Storage code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Symptom::Bloating => "BLOATING",
            Symptom::Gas => "GAS",
            Symptom::AbdominalPain => "ABDOMINAL_PAIN",
            Symptom::Cramping => "CRAMPING",
            Symptom::Diarrhea => "DIARRHEA",
            Symptom::Constipation => "CONSTIPATION",
            Symptom::Nausea => "NAUSEA",
            Symptom::Heartburn => "HEARTBURN",
            Symptom::Fatigue => "FATIGUE",
            Symptom::Headache => "HEADACHE",
            Symptom::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Symptom::Bloating => "Bloating",
            Symptom::Gas => "Gas",
            Symptom::AbdominalPain => "Abdominal pain",
            Symptom::Cramping => "Cramping",
            Symptom::Diarrhea => "Diarrhea",
            Symptom::Constipation => "Constipation",
            Symptom::Nausea => "Nausea",
            Symptom::Heartburn => "Heartburn",
            Symptom::Fatigue => "Fatigue",
            Symptom::Headache => "Headache",
            Symptom::Other => "Other",
        }
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symptom {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace([' ', '-'], "_").to_ascii_uppercase();
        Symptom::ALL
            .into_iter()
            .find(|symptom| symptom.as_str() == normalized)
            .ok_or_else(|| format!("unknown symptom '{}'", s))
    }
}

/// Order preserving de-duplication.
pub fn dedup_symptoms(symptoms: Vec<Symptom>) -> Vec<Symptom> {
    let mut out: Vec<Symptom> = Vec::with_capacity(symptoms.len());
    for symptom in symptoms {
        if !out.contains(&symptom) {
            out.push(symptom);
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SymptomLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub symptoms: Vec<Symptom>,
    /// 1 (mild) to 5 (severe).
    pub severity: u8,
    pub notes: Option<String>,
    pub logged_at: DateTime<Utc>,
    pub linked_food_item_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SymptomLogConfig {
    pub user_id: Uuid,
    pub symptoms: Vec<Symptom>,
    pub severity: u8,
    pub notes: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
    pub linked_food_item_ids: Vec<Uuid>,
}

impl SymptomLog {
    pub fn new(config: SymptomLogConfig) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            user_id: config.user_id,
            symptoms: dedup_symptoms(config.symptoms),
            severity: config.severity,
            notes: config.notes,
            logged_at: config.logged_at.unwrap_or(now),
            linked_food_item_ids: config.linked_food_item_ids,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update(
        &mut self,
        symptoms: Option<Vec<Symptom>>,
        severity: Option<u8>,
        notes: Option<String>,
        logged_at: Option<DateTime<Utc>>,
        linked_food_item_ids: Option<Vec<Uuid>>,
    ) {
        let (now, _) = generate_timestamp();

        if let Some(s) = symptoms {
            self.symptoms = dedup_symptoms(s);
        }
        if let Some(s) = severity {
            self.severity = s;
        }
        if let Some(n) = notes {
            self.notes = Some(n).filter(|n| !n.trim().is_empty());
        }
        if let Some(l) = logged_at {
            self.logged_at = l;
        }
        if let Some(ids) = linked_food_item_ids {
            self.linked_food_item_ids = ids;
        }

        self.updated_at = now;
    }

    pub fn to_symptom_log_entry(&self) -> SymptomLogEntry {
        SymptomLogEntry {
            symptoms: self.symptoms.iter().map(|s| s.label().to_string()).collect(),
            severity: self.severity,
            logged_at: self.logged_at.to_rfc3339(),
            notes: self.notes.clone(),
        }
    }
}
