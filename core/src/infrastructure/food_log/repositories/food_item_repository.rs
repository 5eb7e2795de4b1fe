use sea_orm::{
    ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Select,
    sea_query::{Expr, SimpleExpr},
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        common::{entities::app_errors::CoreError, page_limit},
        flow::flows::fodmap_detection::FodmapRisk,
        food_log::{
            entities::LoggedFoodItem, ports::FoodItemRepository, value_objects::GetFoodItemsFilter,
        },
    },
    entity::food_items::{ActiveModel, Column, Entity},
    infrastructure::food_log::mappers::{annotation_column, feedback_column, risk_column},
};

#[derive(Debug, Clone)]
pub struct PostgresFoodItemRepository {
    pub db: DatabaseConnection,
}

impl PostgresFoodItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn active_model(item: &LoggedFoodItem) -> ActiveModel {
    ActiveModel {
        id: Set(item.id),
        user_id: Set(item.user_id),
        name: Set(item.name.clone()),
        ingredients: Set(item.ingredients.clone()),
        portion_size: Set(item.portion_size.clone()),
        portion_unit: Set(item.portion_unit.clone()),
        logged_at: Set(item.logged_at.fixed_offset()),
        overall_risk: Set(risk_column(item.overall_risk())),
        fodmap: Set(annotation_column(item.fodmap.as_ref())),
        nutrition: Set(annotation_column(item.nutrition.as_ref())),
        user_feedback: Set(feedback_column(item.user_feedback)),
        created_at: Set(item.created_at.fixed_offset()),
        updated_at: Set(item.updated_at.fixed_offset()),
    }
}

/// Green < Yellow < Red, unanalyzed items last.
fn risk_rank() -> SimpleExpr {
    Expr::case(Expr::col(Column::OverallRisk).eq(FodmapRisk::Green.as_str()), 0)
        .case(Expr::col(Column::OverallRisk).eq(FodmapRisk::Yellow.as_str()), 1)
        .case(Expr::col(Column::OverallRisk).eq(FodmapRisk::Red.as_str()), 2)
        .finally(3)
        .into()
}

fn apply_sort(mut query: Select<Entity>, sort: Option<&str>) -> Select<Entity> {
    let Some(sort) = sort else {
        // Default sort: -logged_at
        return query
            .order_by_desc(Column::LoggedAt)
            .order_by_desc(Column::Id);
    };

    for sort_part in sort.split(',') {
        let sort_part = sort_part.trim();
        let (field, order) = match sort_part.strip_prefix('-') {
            Some(field) => (field, Order::Desc),
            None => (sort_part, Order::Asc),
        };
        match field {
            "logged_at" => query = query.order_by(Column::LoggedAt, order),
            "created_at" => query = query.order_by(Column::CreatedAt, order),
            "name" => query = query.order_by(Column::Name, order),
            "overall_risk" => query = query.order_by(risk_rank(), order),
            _ => {}
        }
    }

    query.order_by_desc(Column::Id)
}

impl FoodItemRepository for PostgresFoodItemRepository {
    async fn create_item(&self, item: LoggedFoodItem) -> Result<LoggedFoodItem, CoreError> {
        let created = Entity::insert(active_model(&item))
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to create food item: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(LoggedFoodItem::from(created))
    }

    async fn get_by_id(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<LoggedFoodItem>, CoreError> {
        let item = Entity::find()
            .filter(Column::Id.eq(item_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to get food item: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(item.map(LoggedFoodItem::from))
    }

    async fn get_by_ids(
        &self,
        item_ids: Vec<Uuid>,
        user_id: Uuid,
    ) -> Result<Vec<LoggedFoodItem>, CoreError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = Entity::find()
            .filter(Column::Id.is_in(item_ids))
            .filter(Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to get food items by ids: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(items.into_iter().map(LoggedFoodItem::from).collect())
    }

    async fn get_by_user(
        &self,
        user_id: Uuid,
        filter: GetFoodItemsFilter,
    ) -> Result<Vec<LoggedFoodItem>, CoreError> {
        let mut condition = Condition::all().add(Column::UserId.eq(user_id));

        if let Some(logged_at_gte) = filter.logged_at_gte {
            condition = condition.add(Column::LoggedAt.gte(logged_at_gte.fixed_offset()));
        }

        if let Some(logged_at_lte) = filter.logged_at_lte {
            condition = condition.add(Column::LoggedAt.lte(logged_at_lte.fixed_offset()));
        }

        if let Some(risk) = filter.overall_risk {
            condition = condition.add(Column::OverallRisk.eq(risk.as_str()));
        }

        if let Some(feedback) = filter.user_feedback {
            condition = condition.add(Column::UserFeedback.eq(feedback.as_str()));
        }

        let query = apply_sort(Entity::find().filter(condition), filter.sort.as_deref())
            .limit(page_limit(filter.limit))
            .offset(u64::from(filter.offset.unwrap_or(0)));

        let items = query.all(&self.db).await.map_err(|e| {
            error!("Failed to get food items: {}", e);
            CoreError::InternalServerError
        })?;

        Ok(items.into_iter().map(LoggedFoodItem::from).collect())
    }

    async fn update_item(&self, item: LoggedFoodItem) -> Result<LoggedFoodItem, CoreError> {
        let updated = Entity::update(active_model(&item))
            .filter(Column::UserId.eq(item.user_id))
            .exec(&self.db)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => CoreError::NotFound,
                e => {
                    error!("Failed to update food item: {}", e);
                    CoreError::InternalServerError
                }
            })?;

        Ok(LoggedFoodItem::from(updated))
    }

    async fn delete_item(&self, item_id: Uuid, user_id: Uuid) -> Result<(), CoreError> {
        let result = Entity::delete_many()
            .filter(Column::Id.eq(item_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to delete food item: {}", e);
                CoreError::InternalServerError
            })?;

        if result.rows_affected == 0 {
            return Err(CoreError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    fn sql(sort: Option<&str>) -> String {
        apply_sort(Entity::find(), sort)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_risk_sort_uses_severity_rank() {
        let sql = sql(Some("-overall_risk"));

        assert!(sql.contains("CASE WHEN"), "{sql}");
        assert!(sql.contains("'Green'") && sql.contains("'Yellow'") && sql.contains("'Red'"));
        assert!(sql.contains("ELSE 3 END"), "{sql}");
        assert!(!sql.contains(r#""overall_risk" DESC"#), "{sql}");
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let sql = sql(None);

        assert!(sql.contains(r#"ORDER BY "food_items"."logged_at" DESC"#), "{sql}");
    }
}
