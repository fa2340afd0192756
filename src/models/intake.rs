use serde::{Deserialize, Serialize};

/// Musculoskeletal intake questionnaire as answered by the patient.
///
/// Every field defaults when absent, so a partially answered form still
/// deserializes. Validation of ranges and consent happens at submission,
/// not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeForm {
    // Demographics
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,

    // Occupation
    pub occupation: Option<String>,
    pub hours_seated_per_day: Option<f64>,

    // Pain characteristics. Onset stays a raw string on the wire;
    // unknown values bucket as non-acute downstream.
    pub onset: Option<String>,
    pub pain_now: Option<i64>,
    pub pain_week: Option<i64>,
    pub pain_pattern: Option<String>,
    pub worse_with: Vec<String>,
    pub better_with: Vec<String>,

    // Red-flag screening answers
    pub numbness: bool,
    pub bowel_bladder_loss: bool,
    pub fever_weight_loss: bool,
    pub recent_trauma: bool,

    // Ergonomic exposures
    pub prolonged_sitting: bool,
    pub repetitive_motion: bool,
    pub overhead_work: bool,
    pub vibrating_tools: bool,
    pub desk_setup: Option<String>,

    // Functional limitations
    pub limits_work: bool,
    pub limits_sleep: bool,
    pub limits_walk: bool,
    pub limits_lift: bool,

    // History
    pub prior_injury: bool,
    pub prior_injury_detail: Option<String>,
    pub prior_surgery: bool,
    pub prior_surgery_detail: Option<String>,

    // Free text
    pub symptom_description: Option<String>,
    pub additional_notes: Option<String>,

    // Goals and available equipment
    pub goals: Vec<String>,
    pub equipment: Vec<String>,

    // Body regions: multi-select plus the legacy single-select field
    pub regions: Vec<String>,
    pub region: Option<String>,

    pub chronicity: Option<String>,
    pub consent: bool,
}

impl IntakeForm {
    /// Body regions with the multi-select list taking precedence over the
    /// legacy single-select field.
    pub fn effective_regions(&self) -> Vec<String> {
        if !self.regions.is_empty() {
            return self.regions.clone();
        }
        match &self.region {
            Some(r) if !r.is_empty() => vec![r.clone()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses_with_defaults() {
        let form: IntakeForm = serde_json::from_str("{}").unwrap();
        assert!(form.age.is_none());
        assert!(form.pain_now.is_none());
        assert!(!form.numbness);
        assert!(!form.consent);
        assert!(form.regions.is_empty());
        assert!(form.goals.is_empty());
    }

    #[test]
    fn partial_form_parses() {
        let form: IntakeForm = serde_json::from_value(serde_json::json!({
            "age": 41,
            "onset": "1-3w",
            "pain_now": 6,
            "limits_work": true,
            "regions": ["lower back"],
            "consent": true,
            "some_future_ui_field": "ignored",
        }))
        .unwrap();
        assert_eq!(form.age, Some(41));
        assert_eq!(form.onset.as_deref(), Some("1-3w"));
        assert_eq!(form.pain_now, Some(6));
        assert!(form.limits_work);
        assert!(form.consent);
        assert_eq!(form.regions, vec!["lower back"]);
    }

    #[test]
    fn multi_select_regions_win_over_legacy_field() {
        let form = IntakeForm {
            regions: vec!["neck".into(), "shoulder".into()],
            region: Some("lower back".into()),
            ..Default::default()
        };
        assert_eq!(form.effective_regions(), vec!["neck", "shoulder"]);
    }

    #[test]
    fn legacy_region_used_when_multi_select_empty() {
        let form = IntakeForm {
            region: Some("shoulder".into()),
            ..Default::default()
        };
        assert_eq!(form.effective_regions(), vec!["shoulder"]);

        let empty = IntakeForm::default();
        assert!(empty.effective_regions().is_empty());
    }
}
