use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{
    common::{
        entities::app_errors::{CoreError, FieldErrors},
        services::Service,
    },
    flow::ports::LLMClient,
    food_log::ports::FoodItemRepository,
    health::ports::HealthCheckRepository,
    identity::Identity,
    symptom_log::{
        entities::{SymptomLog, SymptomLogConfig},
        ports::{SymptomLogRepository, SymptomLogService},
        value_objects::{CreateSymptomLogInput, GetSymptomLogsFilter, UpdateSymptomLogInput},
    },
};

impl<FI, SL, HC, LLM> Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    /// De-duplicates `ids` and checks that each one is a food item of the caller.
    async fn owned_food_item_ids(
        &self,
        identity: &Identity,
        ids: Vec<Uuid>,
    ) -> Result<Vec<Uuid>, CoreError> {
        let mut unique: Vec<Uuid> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        if unique.is_empty() {
            return Ok(unique);
        }

        let found = self
            .food_item_repository
            .get_by_ids(unique.clone(), identity.id())
            .await?;

        if let Some(missing) = unique
            .iter()
            .find(|id| !found.iter().any(|item| item.id == **id))
        {
            return Err(CoreError::Validation(FieldErrors::single(
                "linked_food_item_ids",
                format!("food item {} does not exist", missing),
            )));
        }

        Ok(unique)
    }
}

impl<FI, SL, HC, LLM> SymptomLogService for Service<FI, SL, HC, LLM>
where
    FI: FoodItemRepository,
    SL: SymptomLogRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
{
    async fn create_symptom_log(
        &self,
        identity: Identity,
        input: CreateSymptomLogInput,
    ) -> Result<SymptomLog, CoreError> {
        input.validate()?;

        let linked_food_item_ids = self
            .owned_food_item_ids(&identity, input.linked_food_item_ids)
            .await?;

        let log = SymptomLog::new(SymptomLogConfig {
            user_id: identity.id(),
            symptoms: input.symptoms,
            severity: input.severity,
            notes: input.notes.filter(|n| !n.trim().is_empty()),
            logged_at: input.logged_at,
            linked_food_item_ids,
        });

        self.symptom_log_repository.create_log(log).await
    }

    async fn get_symptom_log(
        &self,
        identity: Identity,
        log_id: Uuid,
    ) -> Result<SymptomLog, CoreError> {
        self.symptom_log_repository
            .get_by_id(log_id, identity.id())
            .await?
            .ok_or(CoreError::NotFound)
    }

    async fn list_symptom_logs(
        &self,
        identity: Identity,
        mut filter: GetSymptomLogsFilter,
    ) -> Result<Vec<SymptomLog>, CoreError> {
        filter.logged_at_gte = identity
            .retention_tier
            .clamp_from(filter.logged_at_gte, Utc::now());

        self.symptom_log_repository
            .get_by_user(identity.id(), filter)
            .await
    }

    async fn update_symptom_log(
        &self,
        identity: Identity,
        log_id: Uuid,
        input: UpdateSymptomLogInput,
    ) -> Result<SymptomLog, CoreError> {
        input.validate()?;

        let mut log = self
            .symptom_log_repository
            .get_by_id(log_id, identity.id())
            .await?
            .ok_or(CoreError::NotFound)?;

        let linked_food_item_ids = match input.linked_food_item_ids {
            Some(ids) => Some(self.owned_food_item_ids(&identity, ids).await?),
            None => None,
        };

        log.update(
            input.symptoms,
            input.severity,
            input.notes,
            input.logged_at,
            linked_food_item_ids,
        );

        self.symptom_log_repository.update_log(log).await
    }

    async fn delete_symptom_log(&self, identity: Identity, log_id: Uuid) -> Result<(), CoreError> {
        self.symptom_log_repository
            .delete_log(log_id, identity.id())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        common::services::test_support::service,
        flow::ports::MockLLMClient,
        food_log::{
            entities::{LoggedFoodItem, LoggedFoodItemConfig},
            ports::MockFoodItemRepository,
        },
        identity::RetentionTier,
        symptom_log::{
            entities::Symptom, ports::MockSymptomLogRepository,
            value_objects::NO_SYMPTOM_SELECTED,
        },
    };

    fn identity() -> Identity {
        Identity::new(Uuid::new_v4(), RetentionTier::Premium)
    }

    fn input(symptoms: Vec<Symptom>) -> CreateSymptomLogInput {
        CreateSymptomLogInput {
            symptoms,
            severity: 3,
            notes: None,
            logged_at: None,
            linked_food_item_ids: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_zero_symptoms_is_rejected_without_io() {
        let mut food_items = MockFoodItemRepository::new();
        food_items.expect_get_by_ids().never();
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs.expect_create_log().never();
        let service = service(food_items, symptom_logs, MockLLMClient::new());

        let err = service
            .create_symptom_log(identity(), input(Vec::new()))
            .await
            .unwrap_err();

        match err {
            CoreError::Validation(fields) => {
                assert_eq!(fields.0.len(), 1);
                assert_eq!(fields.0[0].field, "symptoms");
                assert_eq!(fields.0[0].message, NO_SYMPTOM_SELECTED);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clearing_all_symptoms_on_update_is_rejected() {
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs.expect_get_by_id().never();
        symptom_logs.expect_update_log().never();
        let service = service(MockFoodItemRepository::new(), symptom_logs, MockLLMClient::new());

        let err = service
            .update_symptom_log(
                identity(),
                Uuid::new_v4(),
                UpdateSymptomLogInput {
                    symptoms: Some(Vec::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        match err {
            CoreError::Validation(fields) => {
                assert_eq!(fields.0[0].field, "symptoms");
                assert_eq!(fields.0[0].message, NO_SYMPTOM_SELECTED);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_severity_out_of_range_is_rejected() {
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs.expect_create_log().never();
        let service = service(MockFoodItemRepository::new(), symptom_logs, MockLLMClient::new());

        let mut bad = input(vec![Symptom::Gas]);
        bad.severity = 6;

        let err = service
            .create_symptom_log(identity(), bad)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_collapses_duplicates_and_links_owned_food() {
        let identity = identity();
        let food = LoggedFoodItem::new(LoggedFoodItemConfig {
            user_id: identity.id(),
            name: "Onion soup".to_string(),
            ingredients: "onion".to_string(),
            portion_size: "1".to_string(),
            portion_unit: "bowl".to_string(),
            logged_at: None,
        });
        let food_id = food.id;

        let mut food_items = MockFoodItemRepository::new();
        food_items
            .expect_get_by_ids()
            .withf(move |ids, _| ids == &vec![food_id])
            .times(1)
            .returning(move |_, _| {
                let food = food.clone();
                Box::pin(async move { Ok(vec![food]) })
            });
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs
            .expect_create_log()
            .times(1)
            .returning(|log| Box::pin(async move { Ok(log) }));
        let service = service(food_items, symptom_logs, MockLLMClient::new());

        let mut create = input(vec![Symptom::Bloating, Symptom::Bloating, Symptom::Gas]);
        create.linked_food_item_ids = vec![food_id, food_id];

        let log = service.create_symptom_log(identity, create).await.unwrap();

        assert_eq!(log.symptoms, vec![Symptom::Bloating, Symptom::Gas]);
        assert_eq!(log.linked_food_item_ids, vec![food_id]);
    }

    #[tokio::test]
    async fn test_linking_foreign_food_item_is_rejected() {
        let mut food_items = MockFoodItemRepository::new();
        food_items
            .expect_get_by_ids()
            .returning(|_, _| Box::pin(async { Ok(Vec::new()) }));
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs.expect_create_log().never();
        let service = service(food_items, symptom_logs, MockLLMClient::new());

        let mut create = input(vec![Symptom::Nausea]);
        create.linked_food_item_ids = vec![Uuid::new_v4()];

        let err = service
            .create_symptom_log(identity(), create)
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_to_zero_symptoms_is_rejected() {
        let mut symptom_logs = MockSymptomLogRepository::new();
        symptom_logs.expect_get_by_id().never();
        symptom_logs.expect_update_log().never();
        let service = service(MockFoodItemRepository::new(), symptom_logs, MockLLMClient::new());

        let err = service
            .update_symptom_log(
                identity(),
                Uuid::new_v4(),
                UpdateSymptomLogInput {
                    symptoms: Some(Vec::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Validation(_)));
    }
}
