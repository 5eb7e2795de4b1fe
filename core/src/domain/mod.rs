pub mod common;
pub mod flow;
pub mod food_log;
pub mod health;
pub mod identity;
pub mod symptom_log;
pub mod timeline;
