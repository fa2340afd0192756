use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// In-progress questionnaire state, one row per owner. Saving again
/// overwrites the previous draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub owner_id: Uuid,
    pub data: serde_json::Value,
    pub step: i64,
    pub updated_at: DateTime<Utc>,
}
