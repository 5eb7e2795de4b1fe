use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// The caller on whose behalf a service operation runs. Every stored entry is
/// owned by exactly one `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub retention_tier: RetentionTier,
}

impl Identity {
    pub fn new(user_id: Uuid, retention_tier: RetentionTier) -> Self {
        Self {
            user_id,
            retention_tier,
        }
    }

    pub fn id(&self) -> Uuid {
        self.user_id
    }
}

/// How much history a user may read back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RetentionTier {
    #[default]
    Free,
    Premium,
}

impl RetentionTier {
    pub const FREE_HISTORY_DAYS: i64 = 7;

    pub fn history_window(&self) -> Option<Duration> {
        match self {
            RetentionTier::Free => Some(Duration::days(Self::FREE_HISTORY_DAYS)),
            RetentionTier::Premium => None,
        }
    }

    /// Earliest timestamp readable at `now`, `None` when unbounded.
    pub fn history_floor(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.history_window().map(|window| now - window)
    }

    /// Narrows a requested lower bound to what the tier may read.
    pub fn clamp_from(
        &self,
        from: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match (from, self.history_floor(now)) {
            (Some(from), Some(floor)) => Some(from.max(floor)),
            (from, floor) => from.or(floor),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RetentionTier::Free => "free",
            RetentionTier::Premium => "premium",
        }
    }
}

impl From<&str> for RetentionTier {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "premium" => RetentionTier::Premium,
            _ => RetentionTier::Free,
        }
    }
}
