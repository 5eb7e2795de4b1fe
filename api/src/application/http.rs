pub mod flow;
pub mod food_item;
pub mod health;
pub mod query_extractor;
pub mod query_params;
pub mod server;
pub mod symptom_log;
pub mod timeline;
