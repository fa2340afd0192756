//! Deterministic risk scoring over a completed intake form.
//!
//! Pure computation: no I/O, no clock, no randomness. The same answers
//! always produce the same scores. Range validation happens at the
//! submission boundary, before scoring.

use serde::{Deserialize, Serialize};

use crate::models::IntakeForm;

/// Red-flag screening checks in reporting order. Pairs each stable code
/// with whether it fired; scoring ORs them, mapping reports the codes.
pub(crate) fn red_flag_checks(form: &IntakeForm) -> [(&'static str, bool); 4] {
    [
        ("numbness", form.numbness),
        ("bowel_bladder_loss", form.bowel_bladder_loss),
        ("fever_weight_loss", form.fever_weight_loss),
        ("recent_trauma", form.recent_trauma),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub pain_level: Option<u8>,
    pub functional_score: u8,
    pub red_flag: bool,
    pub chronicity: Option<String>,
    pub region: Option<String>,
    pub bmi: Option<f64>,
}

pub fn score(form: &IntakeForm) -> ScoreResult {
    let limits = [
        form.limits_work,
        form.limits_sleep,
        form.limits_walk,
        form.limits_lift,
    ];

    ScoreResult {
        pain_level: pain_level(form.pain_now, form.pain_week),
        functional_score: limits.iter().filter(|&&limited| limited).count() as u8,
        red_flag: red_flag_checks(form).iter().any(|&(_, fired)| fired),
        chronicity: form.chronicity.clone(),
        region: form.region.clone(),
        bmi: bmi(form.height_cm, form.weight_kg),
    }
}

/// Rounded average when both scores are present, passthrough when only
/// one is, absent when neither.
fn pain_level(now: Option<i64>, week: Option<i64>) -> Option<u8> {
    match (now, week) {
        (Some(n), Some(w)) => Some(((n + w) as f64 / 2.0).round() as u8),
        (Some(n), None) => Some(n as u8),
        (None, Some(w)) => Some(w as u8),
        (None, None) => None,
    }
}

/// BMI to one decimal place, only when both measurements are positive.
fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    match (height_cm, weight_kg) {
        (Some(height), Some(weight)) if height > 0.0 && weight > 0.0 => {
            let meters = height / 100.0;
            Some((weight / (meters * meters) * 10.0).round() / 10.0)
        }
        _ => None,
    }
}
