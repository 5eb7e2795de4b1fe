use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        common::{entities::app_errors::CoreError, page_limit},
        symptom_log::{
            entities::SymptomLog, ports::SymptomLogRepository,
            value_objects::GetSymptomLogsFilter,
        },
    },
    entity::symptom_logs::{ActiveModel, Column, Entity},
    infrastructure::symptom_log::mappers::{linked_ids_column, symptoms_column},
};

#[derive(Debug, Clone)]
pub struct PostgresSymptomLogRepository {
    pub db: DatabaseConnection,
}

impl PostgresSymptomLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(log: &SymptomLog) -> ActiveModel {
    ActiveModel {
        id: Set(log.id),
        user_id: Set(log.user_id),
        symptoms: Set(symptoms_column(&log.symptoms)),
        severity: Set(i16::from(log.severity)),
        notes: Set(log.notes.clone()),
        logged_at: Set(log.logged_at.fixed_offset()),
        linked_food_item_ids: Set(linked_ids_column(&log.linked_food_item_ids)),
        created_at: Set(log.created_at.fixed_offset()),
        updated_at: Set(log.updated_at.fixed_offset()),
    }
}

impl SymptomLogRepository for PostgresSymptomLogRepository {
    async fn create_log(&self, log: SymptomLog) -> Result<SymptomLog, CoreError> {
        let created = Entity::insert(active_model(&log))
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to create symptom log: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(SymptomLog::from(created))
    }

    async fn get_by_id(&self, log_id: Uuid, user_id: Uuid) -> Result<Option<SymptomLog>, CoreError> {
        let log = Entity::find()
            .filter(Column::Id.eq(log_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to get symptom log: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(log.map(SymptomLog::from))
    }

    async fn get_by_user(
        &self,
        user_id: Uuid,
        filter: GetSymptomLogsFilter,
    ) -> Result<Vec<SymptomLog>, CoreError> {
        let mut condition = Condition::all().add(Column::UserId.eq(user_id));

        if let Some(logged_at_gte) = filter.logged_at_gte {
            condition = condition.add(Column::LoggedAt.gte(logged_at_gte.fixed_offset()));
        }

        if let Some(logged_at_lte) = filter.logged_at_lte {
            condition = condition.add(Column::LoggedAt.lte(logged_at_lte.fixed_offset()));
        }

        if let Some(min_severity) = filter.min_severity {
            condition = condition.add(Column::Severity.gte(i16::from(min_severity)));
        }

        let mut query = Entity::find().filter(condition);

        // Apply sorting
        if let Some(ref sort_str) = filter.sort {
            for sort_part in sort_str.split(',') {
                let sort_part = sort_part.trim();
                let (field, order) = match sort_part.strip_prefix('-') {
                    Some(field) => (field, Order::Desc),
                    None => (sort_part, Order::Asc),
                };
                match field {
                    "logged_at" => query = query.order_by(Column::LoggedAt, order),
                    "created_at" => query = query.order_by(Column::CreatedAt, order),
                    "severity" => query = query.order_by(Column::Severity, order),
                    _ => {}
                }
            }
        } else {
            // Default sort: -logged_at
            query = query.order_by_desc(Column::LoggedAt);
        }

        let logs = query
            .order_by_desc(Column::Id)
            .limit(page_limit(filter.limit))
            .offset(u64::from(filter.offset.unwrap_or(0)))
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to get symptom logs: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(logs.into_iter().map(SymptomLog::from).collect())
    }

    async fn update_log(&self, log: SymptomLog) -> Result<SymptomLog, CoreError> {
        let updated = Entity::update(active_model(&log))
            .filter(Column::UserId.eq(log.user_id))
            .exec(&self.db)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => CoreError::NotFound,
                e => {
                    error!("Failed to update symptom log: {}", e);
                    CoreError::InternalServerError
                }
            })?;

        Ok(SymptomLog::from(updated))
    }

    async fn delete_log(&self, log_id: Uuid, user_id: Uuid) -> Result<(), CoreError> {
        let result = Entity::delete_many()
            .filter(Column::Id.eq(log_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to delete symptom log: {}", e);
                CoreError::InternalServerError
            })?;

        if result.rows_affected == 0 {
            return Err(CoreError::NotFound);
        }

        Ok(())
    }
}
