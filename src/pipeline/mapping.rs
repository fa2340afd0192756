//! Clinical signal mapping: raw questionnaire answers to the categorical
//! signals the program generator consumes.
//!
//! Like scoring, this is pure. The self-exercise lookup is intentionally
//! conservative and non-diagnostic; anything outside the known region
//! groups gets a generic mobility/posture pair.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::scoring::red_flag_checks;
use crate::models::{IntakeForm, OnsetBucket};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalMapping {
    pub acute_stage: bool,
    pub regions: Vec<String>,
    pub ergonomic_causes: Vec<String>,
    pub safe_self_exercises: Vec<String>,
    pub red_flags: Vec<String>,
}

// ── Region keyword groups ───────────────────────────────────

static NECK_KEYWORDS: &[&str] = &["neck", "upper back", "cervical", "trapezius"];
static NECK_EXERCISES: &[&str] = &["gentle neck mobility", "postural resets"];

static SHOULDER_KEYWORDS: &[&str] = &["shoulder", "rotator"];
static SHOULDER_EXERCISES: &[&str] = &["shoulder range-of-motion drills", "rotator cuff activation"];

static LOWER_BACK_KEYWORDS: &[&str] = &["lower back", "low back", "lumbar"];
static LOWER_BACK_EXERCISES: &[&str] = &["lumbar mobility drills", "core stabilization"];

static GENERIC_EXERCISES: &[&str] = &["general mobility routine", "postural awareness cues"];

pub fn map_signals(form: &IntakeForm) -> ClinicalMapping {
    let regions = form.effective_regions();

    ClinicalMapping {
        acute_stage: form.onset.as_deref().is_some_and(is_acute_onset),
        safe_self_exercises: safe_self_exercises(&regions),
        regions,
        ergonomic_causes: ergonomic_causes(form),
        red_flags: red_flag_checks(form)
            .iter()
            .filter(|&&(_, fired)| fired)
            .map(|&(code, _)| code.to_string())
            .collect(),
    }
}

/// Unknown onset strings bucket as non-acute.
fn is_acute_onset(onset: &str) -> bool {
    OnsetBucket::from_str(onset).is_ok_and(|bucket| bucket.is_acute())
}

/// One fixed label per positive exposure, appended in check order.
fn ergonomic_causes(form: &IntakeForm) -> Vec<String> {
    let checks = [
        (form.prolonged_sitting, "prolonged static posture"),
        (form.repetitive_motion, "high-frequency repetitive strain"),
        (form.overhead_work, "sustained overhead positioning"),
        (form.vibrating_tools, "vibrating tool exposure"),
    ];

    checks
        .iter()
        .filter(|&&(exposed, _)| exposed)
        .map(|&(_, label)| label.to_string())
        .collect()
}

/// Static region-keyword lookup. Matches across regions are unioned in
/// first-seen order without duplicates.
fn safe_self_exercises(regions: &[String]) -> Vec<String> {
    let groups: [(&[&str], &[&str]); 3] = [
        (NECK_KEYWORDS, NECK_EXERCISES),
        (SHOULDER_KEYWORDS, SHOULDER_EXERCISES),
        (LOWER_BACK_KEYWORDS, LOWER_BACK_EXERCISES),
    ];

    let mut exercises: Vec<String> = Vec::new();
    for region in regions {
        let lowered = region.to_lowercase();
        for (keywords, set) in groups {
            if keywords.iter().any(|k| lowered.contains(k)) {
                for label in set {
                    if !exercises.iter().any(|e| e == label) {
                        exercises.push((*label).to_string());
                    }
                }
            }
        }
    }

    if exercises.is_empty() {
        GENERIC_EXERCISES.iter().map(|s| (*s).to_string()).collect()
    } else {
        exercises
    }
}
