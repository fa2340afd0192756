use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::RecommendationSource;

/// A generated (or gated) exercise program attached to an assessment.
/// Assessments accumulate recommendations; the newest one wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub assessment_id: String,
    pub program: serde_json::Value,
    pub confidence: f64,
    pub source: RecommendationSource,
    pub created_at: DateTime<Utc>,
}
