pub mod analyze_food_item;
pub mod create_food_item;
pub mod delete_food_item;
pub mod get_food_item;
pub mod get_food_items;
pub mod set_food_feedback;
pub mod update_food_item;
