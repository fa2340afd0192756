use serde::Deserialize;

use super::ProgramError;

/// Loosely typed program object as the model returned it. Every field is
/// optional; normalization turns this into a complete `ExerciseProgram`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawProgram {
    pub title: Option<String>,
    pub description: Option<String>,
    pub phase: Option<String>,
    pub weekly_target: Option<serde_json::Value>,
    pub report: Option<RawReport>,
    pub exercises: Option<Vec<RawExercise>>,
    pub schedule: Option<RawSchedule>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawReport {
    pub summary: Option<String>,
    pub findings: Option<Vec<String>>,
    pub recommendations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawExercise {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub frequency: Option<String>,
    pub sessions_per_week: Option<serde_json::Value>,
    pub phase: Option<String>,
    pub difficulty: Option<String>,
    pub target_area: Option<String>,
    pub equipment: Option<String>,
    pub instructions: Option<Vec<String>>,
    pub precautions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSchedule {
    pub current_phase: Option<String>,
    pub early: Option<RawPhaseSummary>,
    pub intermediate: Option<RawPhaseSummary>,
    pub advanced: Option<RawPhaseSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPhaseSummary {
    pub summary: Option<String>,
}

/// Parse the model's completion text into a raw program object.
pub(crate) fn parse_program(response: &str) -> Result<RawProgram, ProgramError> {
    let json_str = extract_first_json_object(response).ok_or(ProgramError::NoJsonObject)?;
    serde_json::from_str(json_str).map_err(|e| ProgramError::MalformedProgram(e.to_string()))
}

/// Find the first balanced `{...}` object in free text. String- and
/// escape-aware, so braces inside JSON strings do not break the count.
/// Prose and markdown fences around the object are tolerated.
pub(crate) fn extract_first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if escaped {
            escaped = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_completion() -> &'static str {
        r#"Here is your program:

```json
{
  "title": "Lower Back Recovery Plan",
  "description": "A gentle 6-week progression.",
  "phase": "early",
  "weekly_target": 4,
  "report": {
    "summary": "Mechanical lower back pain, early stage.",
    "findings": ["reduced lumbar mobility"],
    "recommendations": ["daily walking"]
  },
  "exercises": [
    {
      "name": "Pelvic Tilt",
      "description": "Activates deep core muscles.",
      "duration": "2 minutes",
      "frequency": "daily",
      "sessions_per_week": 5,
      "phase": "early",
      "difficulty": "gentle",
      "target_area": "lower back",
      "equipment": "none",
      "instructions": ["Lie on your back", "Flatten your lower back"],
      "precautions": ["Stop if pain radiates"]
    }
  ],
  "schedule": {
    "current_phase": "early",
    "early": {"summary": "Mobility focus"},
    "intermediate": {"summary": "Add load"},
    "advanced": {"summary": "Return to sport"}
  },
  "notes": "Move within a comfortable range."
}
```

Let me know if you need adjustments."#
    }

    #[test]
    fn parses_program_from_fenced_completion() {
        let raw = parse_program(sample_completion()).unwrap();
        assert_eq!(raw.title.as_deref(), Some("Lower Back Recovery Plan"));
        let exercises = raw.exercises.unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].name.as_deref(), Some("Pelvic Tilt"));
        assert_eq!(raw.schedule.unwrap().current_phase.as_deref(), Some("early"));
    }

    #[test]
    fn extracts_bare_object_without_prose() {
        let text = r#"{"title": "Plan"}"#;
        assert_eq!(extract_first_json_object(text), Some(text));
    }

    #[test]
    fn braces_inside_strings_do_not_break_extraction() {
        let text = r#"note {"title": "use {curly} braces", "notes": "ok"} trailing"#;
        let extracted = extract_first_json_object(text).unwrap();
        assert_eq!(
            extracted,
            r#"{"title": "use {curly} braces", "notes": "ok"}"#
        );
    }

    #[test]
    fn escaped_quotes_inside_strings_handled() {
        let text = r#"{"title": "she said \"start slow\" {"}"#;
        let extracted = extract_first_json_object(text).unwrap();
        assert_eq!(extracted, text);
    }

    #[test]
    fn first_of_two_objects_wins() {
        let text = r#"{"title": "first"} {"title": "second"}"#;
        let raw = parse_program(text).unwrap();
        assert_eq!(raw.title.as_deref(), Some("first"));
    }

    #[test]
    fn no_object_is_an_error() {
        let err = parse_program("I cannot produce a program today.").unwrap_err();
        assert!(matches!(err, ProgramError::NoJsonObject));
    }

    #[test]
    fn unbalanced_object_is_an_error() {
        let err = parse_program(r#"{"title": "never closed"#).unwrap_err();
        assert!(matches!(err, ProgramError::NoJsonObject));
    }

    #[test]
    fn invalid_json_in_braces_is_malformed() {
        let err = parse_program(r#"{"title": }"#).unwrap_err();
        assert!(matches!(err, ProgramError::MalformedProgram(_)));
    }

    #[test]
    fn numeric_string_session_counts_survive_parsing() {
        let raw = parse_program(r#"{"exercises": [{"name": "X", "sessions_per_week": "4"}]}"#)
            .unwrap();
        let exercises = raw.exercises.unwrap();
        assert_eq!(
            exercises[0].sessions_per_week,
            Some(serde_json::json!("4"))
        );
    }
}
