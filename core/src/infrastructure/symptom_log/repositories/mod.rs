pub mod symptom_log_repository;

pub use symptom_log_repository::PostgresSymptomLogRepository;
