pub use super::food_items::Entity as FoodItems;
pub use super::symptom_logs::Entity as SymptomLogs;
