use chrono::Utc;
use tracing::debug;

use crate::domain::{
    common::{MAX_PAGE_SIZE, entities::app_errors::CoreError, page_limit, services::Service},
    flow::{
        flows::symptom_patterns::{
            AnalyzeSymptomPatterns, AnalyzeSymptomPatternsInput, AnalyzeSymptomPatternsOutput,
        },
        gateway::run_flow,
        ports::LLMClient,
    },
    food_log::{
        entities::LoggedFoodItem, ports::FoodItemRepository,
        value_objects::GetFoodItemsFilter,
    },
    health::ports::HealthCheckRepository,
    identity::Identity,
    symptom_log::{
        entities::SymptomLog, ports::SymptomLogRepository, value_objects::GetSymptomLogsFilter,
    },
    timeline::{
        entities::{TimelineEntry, merge_timeline},
        ports::TimelineService,
        value_objects::GetTimelineFilter,
    },
};

impl<FI, SL, HC, LLM> Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    /// Newest `limit` entries of each log inside the readable window.
    async fn timeline_window(
        &self,
        identity: &Identity,
        filter: &GetTimelineFilter,
        limit: u32,
    ) -> Result<(Vec<LoggedFoodItem>, Vec<SymptomLog>), CoreError> {
        let from = identity.retention_tier.clamp_from(filter.from, Utc::now());
        debug!(?from, to = ?filter.to, limit, "reading timeline window");

        let foods = self.food_item_repository.get_by_user(
            identity.id(),
            GetFoodItemsFilter {
                limit: Some(limit),
                logged_at_gte: from,
                logged_at_lte: filter.to,
                sort: Some("-logged_at".to_string()),
                ..Default::default()
            },
        );
        let symptoms = self.symptom_log_repository.get_by_user(
            identity.id(),
            GetSymptomLogsFilter {
                limit: Some(limit),
                logged_at_gte: from,
                logged_at_lte: filter.to,
                sort: Some("-logged_at".to_string()),
                ..Default::default()
            },
        );

        let (foods, symptoms) = tokio::join!(foods, symptoms);
        Ok((foods?, symptoms?))
    }
}

impl<FI, SL, HC, LLM> TimelineService for Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn get_timeline(
        &self,
        identity: Identity,
        filter: GetTimelineFilter,
    ) -> Result<Vec<TimelineEntry>, CoreError> {
        let limit = page_limit(filter.limit) as u32;
        let (foods, symptoms) = self.timeline_window(&identity, &filter, limit).await?;

        Ok(merge_timeline(foods, symptoms, limit as usize))
    }

    async fn analyze_timeline(
        &self,
        identity: Identity,
        filter: GetTimelineFilter,
    ) -> Result<AnalyzeSymptomPatternsOutput, CoreError> {
        let (mut foods, mut symptoms) = self
            .timeline_window(&identity, &filter, MAX_PAGE_SIZE)
            .await?;

        foods.sort_by_key(|item| item.logged_at);
        symptoms.sort_by_key(|log| log.logged_at);

        let input = AnalyzeSymptomPatternsInput {
            food_log: foods.iter().map(LoggedFoodItem::to_food_log_entry).collect(),
            symptom_log: symptoms.iter().map(SymptomLog::to_symptom_log_entry).collect(),
        };

        run_flow(self.llm_client.as_ref(), &AnalyzeSymptomPatterns, input).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{
        common::services::test_support::service,
        flow::ports::MockLLMClient,
        food_log::{entities::LoggedFoodItemConfig, ports::MockFoodItemRepository},
        identity::RetentionTier,
        symptom_log::{
            entities::{Symptom, SymptomLogConfig},
            ports::MockSymptomLogRepository,
        },
    };

    fn food(user_id: Uuid, hours_ago: i64) -> LoggedFoodItem {
        LoggedFoodItem::new(LoggedFoodItemConfig {
            user_id,
            name: "Onion soup".to_string(),
            ingredients: "onion, stock".to_string(),
            portion_size: "1".to_string(),
            portion_unit: "bowl".to_string(),
            logged_at: Some(Utc::now() - Duration::hours(hours_ago)),
        })
    }

    fn symptom(user_id: Uuid, hours_ago: i64) -> SymptomLog {
        SymptomLog::new(SymptomLogConfig {
            user_id,
            symptoms: vec![Symptom::Bloating],
            severity: 4,
            notes: None,
            logged_at: Some(Utc::now() - Duration::hours(hours_ago)),
            linked_food_item_ids: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_free_tier_timeline_reads_last_seven_days_only() {
        let identity = Identity::new(Uuid::new_v4(), RetentionTier::Free);
        let user_id = identity.id();
        let requested_from = Utc::now() - Duration::days(90);

        let mut food_items = MockFoodItemRepository::new();
        food_items
            .expect_get_by_user()
            .withf(|_, filter| {
                filter
                    .logged_at_gte
                    .is_some_and(|from| from > Utc::now() - Duration::days(8))
            })
            .times(1)
            .returning(move |_, _| {
                let items = vec![food(user_id, 5)];
                Box::pin(async move { Ok(items) })
            });
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs
            .expect_get_by_user()
            .withf(|_, filter| filter.logged_at_gte.is_some())
            .times(1)
            .returning(move |_, _| {
                let logs = vec![symptom(user_id, 2)];
                Box::pin(async move { Ok(logs) })
            });
        let service = service(food_items, symptom_logs, MockLLMClient::new());

        let timeline = service
            .get_timeline(
                identity,
                GetTimelineFilter {
                    from: Some(requested_from),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(timeline.len(), 2);
        assert!(matches!(timeline[0], TimelineEntry::Symptom(_)));
    }

    #[tokio::test]
    async fn test_premium_tier_timeline_is_unbounded() {
        let identity = Identity::new(Uuid::new_v4(), RetentionTier::Premium);

        let mut food_items = MockFoodItemRepository::new();
        food_items
            .expect_get_by_user()
            .withf(|_, filter| filter.logged_at_gte.is_none())
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(Vec::new()) }));
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs
            .expect_get_by_user()
            .withf(|_, filter| filter.logged_at_gte.is_none())
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(Vec::new()) }));
        let service = service(food_items, symptom_logs, MockLLMClient::new());

        let timeline = service
            .get_timeline(identity, GetTimelineFilter::default())
            .await
            .unwrap();

        assert!(timeline.is_empty());
    }

    #[tokio::test]
    async fn test_analysis_without_symptoms_never_calls_the_model() {
        let identity = Identity::new(Uuid::new_v4(), RetentionTier::Premium);
        let user_id = identity.id();

        let mut food_items = MockFoodItemRepository::new();
        food_items.expect_get_by_user().returning(move |_, _| {
            let items = vec![food(user_id, 3)];
            Box::pin(async move { Ok(items) })
        });
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs
            .expect_get_by_user()
            .returning(|_, _| Box::pin(async { Ok(Vec::new()) }));
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text().never();
        let service = service(food_items, symptom_logs, llm);

        let err = service
            .analyze_timeline(identity, GetTimelineFilter::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_analysis_sends_stored_logs_to_the_model() {
        let identity = Identity::new(Uuid::new_v4(), RetentionTier::Premium);
        let user_id = identity.id();

        let mut food_items = MockFoodItemRepository::new();
        food_items.expect_get_by_user().returning(move |_, _| {
            let items = vec![food(user_id, 6)];
            Box::pin(async move { Ok(items) })
        });
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs.expect_get_by_user().returning(move |_, _| {
            let logs = vec![symptom(user_id, 2)];
            Box::pin(async move { Ok(logs) })
        });
        let mut llm = MockLLMClient::new();
        llm.expect_generate_with_text()
            .withf(|prompt, _| {
                prompt.contains("Onion soup, 1 bowl (ingredients: onion, stock)")
                    && prompt.contains("Bloating (severity 4/5)")
            })
            .times(1)
            .returning(|_, _| {
                Box::pin(async {
                    Ok(r#"{"summary": "Bloating follows onion.", "insights": [], "potentialTriggers": []}"#
                        .to_string())
                })
            });
        let service = service(food_items, symptom_logs, llm);

        let output = service
            .analyze_timeline(identity, GetTimelineFilter::default())
            .await
            .unwrap();

        assert_eq!(output.summary, "Bloating follows onion.");
    }
}
