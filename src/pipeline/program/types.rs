use serde::{Deserialize, Serialize};

use super::ProgramError;
use crate::models::IntakeForm;
use crate::pipeline::mapping::ClinicalMapping;
use crate::pipeline::scoring::ScoreResult;

/// Exercise program payload as clients render it. Key names and order are
/// part of the external contract; `isFallback` keeps its legacy casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgram {
    pub title: String,
    pub description: String,
    pub phase: String,
    pub weekly_target: i64,
    pub report: ProgramReport,
    pub exercises: Vec<Exercise>,
    pub schedule: ProgramSchedule,
    pub notes: String,
    #[serde(rename = "isFallback")]
    pub is_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub duration: String,
    pub frequency: String,
    pub sessions_per_week: i64,
    pub phase: String,
    pub difficulty: String,
    pub target_area: String,
    pub equipment: String,
    pub instructions: Vec<String>,
    pub precautions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramReport {
    pub summary: String,
    pub findings: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSchedule {
    pub current_phase: String,
    pub early: PhaseSummary,
    pub intermediate: PhaseSummary,
    pub advanced: PhaseSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub summary: String,
}

/// Snapshot of one assessment as the generation service consumes it.
/// Mixed key casing mirrors the established request payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentData {
    #[serde(rename = "healthData")]
    pub health_data: ScoreResult,
    #[serde(rename = "questionnaireAnswers")]
    pub questionnaire_answers: IntakeForm,
    pub ai_mapping: ClinicalMapping,
    #[serde(rename = "hasVideo")]
    pub has_video: bool,
}

/// What one generation attempt produced. `error` carries diagnostic text
/// only; a fallback with no error means generation was skipped on purpose.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub program: ExerciseProgram,
    pub is_fallback: bool,
    pub error: Option<String>,
}

/// Chat-completion client abstraction (allows mocking).
pub trait ModelClient {
    fn complete(&self, model: &str, system: &str, prompt: &str) -> Result<String, ProgramError>;
}
