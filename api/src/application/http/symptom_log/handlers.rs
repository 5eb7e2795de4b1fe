pub mod create_symptom_log;
pub mod delete_symptom_log;
pub mod get_symptom_log;
pub mod get_symptom_logs;
pub mod update_symptom_log;
