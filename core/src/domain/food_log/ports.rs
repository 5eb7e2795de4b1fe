use std::future::Future;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_log::{
        entities::LoggedFoodItem,
        value_objects::{
            AnalyzeFoodItemInput, CreateFoodItemInput, GetFoodItemsFilter, SetFoodFeedbackInput,
            UpdateFoodItemInput,
        },
    },
    identity::Identity,
};

/// Repository trait for logged food items. Every lookup is scoped to the
/// owning user.
#[cfg_attr(test, mockall::automock)]
pub trait FoodItemRepository: Send + Sync {
    fn create_item(
        &self,
        item: LoggedFoodItem,
    ) -> impl Future<Output = Result<LoggedFoodItem, CoreError>> + Send;

    fn get_by_id(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<LoggedFoodItem>, CoreError>> + Send;

    fn get_by_ids(
        &self,
        item_ids: Vec<Uuid>,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<LoggedFoodItem>, CoreError>> + Send;

    fn get_by_user(
        &self,
        user_id: Uuid,
        filter: GetFoodItemsFilter,
    ) -> impl Future<Output = Result<Vec<LoggedFoodItem>, CoreError>> + Send;

    fn update_item(
        &self,
        item: LoggedFoodItem,
    ) -> impl Future<Output = Result<LoggedFoodItem, CoreError>> + Send;

    fn delete_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

pub trait FoodLogService: Send + Sync {
    fn create_food_item(
        &self,
        identity: Identity,
        input: CreateFoodItemInput,
    ) -> impl Future<Output = Result<LoggedFoodItem, CoreError>> + Send;

    fn get_food_item(
        &self,
        identity: Identity,
        item_id: Uuid,
    ) -> impl Future<Output = Result<LoggedFoodItem, CoreError>> + Send;

    fn list_food_items(
        &self,
        identity: Identity,
        filter: GetFoodItemsFilter,
    ) -> impl Future<Output = Result<Vec<LoggedFoodItem>, CoreError>> + Send;

    fn update_food_item(
        &self,
        identity: Identity,
        item_id: Uuid,
        input: UpdateFoodItemInput,
    ) -> impl Future<Output = Result<LoggedFoodItem, CoreError>> + Send;

    fn delete_food_item(
        &self,
        identity: Identity,
        item_id: Uuid,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn set_food_feedback(
        &self,
        identity: Identity,
        item_id: Uuid,
        input: SetFoodFeedbackInput,
    ) -> impl Future<Output = Result<LoggedFoodItem, CoreError>> + Send;

    /// Runs FODMAP detection and nutrition estimation on a copy of the stored
    /// item and persists the merged annotations.
    fn analyze_food_item(
        &self,
        identity: Identity,
        item_id: Uuid,
        input: AnalyzeFoodItemInput,
    ) -> impl Future<Output = Result<LoggedFoodItem, CoreError>> + Send;
}
