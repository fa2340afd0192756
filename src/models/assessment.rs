use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AssessmentStatus;

/// A scored intake submission. Immutable once `status` is `Final`;
/// resubmission inserts a new row.
///
/// `id` is a plain UUID for persisted rows, `"local-<uuid>"` for
/// submissions that could not be persisted, and `"draft-<owner_id>"` for
/// draft-shaped fallback rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub pain_level: Option<u8>,
    pub functional_score: u8,
    pub red_flag: bool,
    pub region: Option<String>,
    pub chronicity: Option<String>,
    pub status: AssessmentStatus,
    pub data: serde_json::Value,
}
