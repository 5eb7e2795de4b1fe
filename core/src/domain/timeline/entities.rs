use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{food_log::entities::LoggedFoodItem, symptom_log::entities::SymptomLog};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", content = "entry", rename_all = "lowercase")]
pub enum TimelineEntry {
    Food(LoggedFoodItem),
    Symptom(SymptomLog),
}

impl TimelineEntry {
    pub fn logged_at(&self) -> DateTime<Utc> {
        match self {
            TimelineEntry::Food(item) => item.logged_at,
            TimelineEntry::Symptom(log) => log.logged_at,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            TimelineEntry::Food(item) => item.id,
            TimelineEntry::Symptom(log) => log.id,
        }
    }

    /// Newest first. Entries logged at the same instant are ordered by
    /// descending id.
    fn newest_first(a: &TimelineEntry, b: &TimelineEntry) -> Ordering {
        b.logged_at()
            .cmp(&a.logged_at())
            .then_with(|| b.id().cmp(&a.id()))
    }
}

/// Interleaves both logs into one timeline and keeps the `limit` newest entries.
pub fn merge_timeline(
    foods: Vec<LoggedFoodItem>,
    symptoms: Vec<SymptomLog>,
    limit: usize,
) -> Vec<TimelineEntry> {
    let mut entries: Vec<TimelineEntry> = foods
        .into_iter()
        .map(TimelineEntry::Food)
        .chain(symptoms.into_iter().map(TimelineEntry::Symptom))
        .collect();

    entries.sort_by(TimelineEntry::newest_first);
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::{
        food_log::entities::LoggedFoodItemConfig,
        symptom_log::entities::{Symptom, SymptomLogConfig},
    };

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, hour, 0, 0).unwrap()
    }

    fn food(hour: u32) -> LoggedFoodItem {
        LoggedFoodItem::new(LoggedFoodItemConfig {
            user_id: Uuid::nil(),
            name: format!("meal at {hour}"),
            ingredients: String::new(),
            portion_size: "1".to_string(),
            portion_unit: "plate".to_string(),
            logged_at: Some(at(hour)),
        })
    }

    fn symptom(hour: u32) -> SymptomLog {
        SymptomLog::new(SymptomLogConfig {
            user_id: Uuid::nil(),
            symptoms: vec![Symptom::Bloating],
            severity: 2,
            notes: None,
            logged_at: Some(at(hour)),
            linked_food_item_ids: Vec::new(),
        })
    }

    #[test]
    fn test_entries_are_interleaved_newest_first() {
        let timeline = merge_timeline(vec![food(8), food(12)], vec![symptom(10), symptom(15)], 10);

        let hours: Vec<DateTime<Utc>> = timeline.iter().map(TimelineEntry::logged_at).collect();
        assert_eq!(hours, vec![at(15), at(12), at(10), at(8)]);
        assert!(matches!(timeline[0], TimelineEntry::Symptom(_)));
        assert!(matches!(timeline[1], TimelineEntry::Food(_)));
    }

    #[test]
    fn test_ties_are_broken_by_id() {
        let a = food(9);
        let b = symptom(9);
        let expected_first = a.id.max(b.id);

        let timeline = merge_timeline(vec![a], vec![b], 10);

        assert_eq!(timeline[0].id(), expected_first);
        assert!(timeline[0].id() > timeline[1].id());
    }

    #[test]
    fn test_limit_keeps_newest() {
        let timeline = merge_timeline(
            vec![food(1), food(2), food(3)],
            vec![symptom(4), symptom(5)],
            2,
        );

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[1].logged_at(), at(4));
        assert!(timeline[0].logged_at() - timeline[1].logged_at() == Duration::hours(1));
    }

    #[test]
    fn test_entry_is_tagged_by_kind() {
        let json = serde_json::to_value(TimelineEntry::Symptom(symptom(7))).unwrap();
        assert_eq!(json["kind"], "symptom");
        assert_eq!(json["entry"]["symptoms"][0], "BLOATING");
    }
}
