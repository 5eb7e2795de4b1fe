pub mod prelude;

pub mod food_items;
pub mod symptom_logs;
