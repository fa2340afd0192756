use super::sanitize::sanitize_for_prompt;
use super::types::AssessmentData;

pub const PROGRAM_SYSTEM_PROMPT: &str = r#"
You are an exercise program assistant for musculoskeletal complaints. You turn
screened questionnaire data into a conservative home exercise program.

RULES — ABSOLUTE, NO EXCEPTIONS:
1. Output ONLY a single JSON object matching the requested schema. No prose,
   no markdown fences, nothing before or after the object.
2. Recommend only conservative, low-risk exercises suitable for unsupervised
   home practice. No maximal loading, no end-range provocation.
3. NEVER provide a diagnosis, medication advice, or injury prognosis.
4. Scale intensity to the reported pain level; prefer gentle progressions.
5. Include 3 to 5 exercises covering warm-up, main work, and cool-down.
6. Phase the program as early / intermediate / advanced with a weekly
   session target.
"#;

/// Build the generation prompt for one assessment. Missing answers appear
/// as explicit "Not specified" placeholders, never as blanks; free-text
/// answers are sanitized before embedding.
pub fn build_program_prompt(data: &AssessmentData) -> String {
    let form = &data.questionnaire_answers;
    let health = &data.health_data;
    let mapping = &data.ai_mapping;

    format!(
        r#"Create a personalized exercise program for the following patient.

PATIENT PROFILE:
- Age: {age}
- Sex: {sex}
- BMI: {bmi}
- Occupation: {occupation}
- Hours seated per day: {hours_seated}

SYMPTOMS:
- Affected regions: {regions}
- Symptom onset: {onset}
- Pain level (0-10): {pain_level}
- Pain pattern: {pain_pattern}
- Worse with: {worse_with}
- Better with: {better_with}
- Functional limitation score (0-4): {functional_score}
- Stage: {stage}
- Chronicity: {chronicity}
- Symptom description: {symptom_description}
- Additional notes: {additional_notes}

CONTRIBUTING FACTORS:
- Ergonomic contributors: {ergonomic_causes}
- Suggested safe self-exercise categories: {safe_exercises}

CONTEXT:
- Goals: {goals}
- Available equipment: {equipment}
- Video assessment available: {has_video}

Return ONLY a JSON object with this exact structure:

{{
  "title": "Program title",
  "description": "One-paragraph overview",
  "phase": "early | intermediate | advanced",
  "weekly_target": 3,
  "report": {{
    "summary": "Short clinical-style summary of the presentation",
    "findings": ["finding 1", "finding 2"],
    "recommendations": ["recommendation 1", "recommendation 2"]
  }},
  "exercises": [
    {{
      "id": "lowercase-hyphenated-slug",
      "name": "Exercise name",
      "description": "What it does",
      "duration": "e.g., 2 minutes",
      "frequency": "e.g., daily",
      "sessions_per_week": 3,
      "phase": "early | intermediate | advanced",
      "difficulty": "gentle | moderate",
      "target_area": "body region",
      "equipment": "none | item",
      "instructions": ["step 1", "step 2"],
      "precautions": ["precaution 1"]
    }}
  ],
  "schedule": {{
    "current_phase": "early",
    "early": {{"summary": "Weeks 1-2 focus"}},
    "intermediate": {{"summary": "Weeks 3-4 focus"}},
    "advanced": {{"summary": "Weeks 5+ focus"}}
  }},
  "notes": "Safety notes for the patient"
}}"#,
        age = opt_num(form.age),
        sex = opt_text(&form.sex),
        bmi = opt_num(health.bmi),
        occupation = opt_text(&form.occupation),
        hours_seated = opt_num(form.hours_seated_per_day),
        regions = list_or_placeholder(&mapping.regions),
        onset = opt_text(&form.onset),
        pain_level = opt_num(health.pain_level),
        pain_pattern = opt_text(&form.pain_pattern),
        worse_with = list_or_placeholder(&form.worse_with),
        better_with = list_or_placeholder(&form.better_with),
        functional_score = health.functional_score,
        stage = if mapping.acute_stage { "acute" } else { "established" },
        chronicity = opt_text(&form.chronicity),
        symptom_description = opt_text(&form.symptom_description),
        additional_notes = opt_text(&form.additional_notes),
        ergonomic_causes = list_or_placeholder(&mapping.ergonomic_causes),
        safe_exercises = list_or_placeholder(&mapping.safe_self_exercises),
        goals = list_or_placeholder(&form.goals),
        equipment = list_or_placeholder(&form.equipment),
        has_video = if data.has_video { "yes" } else { "no" },
    )
}

const NOT_SPECIFIED: &str = "Not specified";

fn opt_text(value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => sanitize_for_prompt(v),
        _ => NOT_SPECIFIED.to_string(),
    }
}

fn opt_num<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_SPECIFIED.to_string(), |v| v.to_string())
}

fn list_or_placeholder(items: &[String]) -> String {
    if items.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        sanitize_for_prompt(&items.join(", "))
    }
}
