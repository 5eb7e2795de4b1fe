pub mod db;
pub mod food_log;
pub mod health;
pub mod llm;
pub mod symptom_log;
