use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealthStatus {
    pub status: String,
    pub database: String,
    /// Round trip of a trivial query, in milliseconds.
    pub response_time_ms: u64,
}

impl DatabaseHealthStatus {
    pub fn up(database: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            status: "UP".to_string(),
            database: database.into(),
            response_time_ms,
        }
    }
}
