use super::parser::{RawExercise, RawPhaseSummary, RawProgram};
use super::types::{Exercise, ExerciseProgram, PhaseSummary, ProgramReport, ProgramSchedule};
use super::ProgramError;
use crate::models::ProgramPhase;

/// Session count used when the model omits or mangles a weekly number.
const DEFAULT_SESSIONS_PER_WEEK: i64 = 3;

/// Normalize a parsed raw program into the external contract shape.
///
/// Absent strings become empty, absent lists become empty, phases default
/// to early, and every exercise ends up with a unique slug id. A program
/// with zero exercises counts as a parse failure so callers fall back.
pub(crate) fn normalize_program(raw: RawProgram) -> Result<ExerciseProgram, ProgramError> {
    let exercises = normalize_exercises(raw.exercises.unwrap_or_default());
    if exercises.is_empty() {
        return Err(ProgramError::EmptyProgram);
    }

    let report = raw.report.unwrap_or_default();
    let schedule = raw.schedule.unwrap_or_default();

    Ok(ExerciseProgram {
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        phase: raw.phase.unwrap_or_else(default_phase),
        weekly_target: coerce_count(raw.weekly_target),
        report: ProgramReport {
            summary: report.summary.unwrap_or_default(),
            findings: report.findings.unwrap_or_default(),
            recommendations: report.recommendations.unwrap_or_default(),
        },
        exercises,
        schedule: ProgramSchedule {
            current_phase: schedule.current_phase.unwrap_or_else(default_phase),
            early: phase_summary(schedule.early),
            intermediate: phase_summary(schedule.intermediate),
            advanced: phase_summary(schedule.advanced),
        },
        notes: raw.notes.unwrap_or_default(),
        is_fallback: false,
    })
}

fn default_phase() -> String {
    ProgramPhase::Early.as_str().to_string()
}

fn phase_summary(raw: Option<RawPhaseSummary>) -> PhaseSummary {
    PhaseSummary {
        summary: raw.and_then(|p| p.summary).unwrap_or_default(),
    }
}

fn normalize_exercises(raw: Vec<RawExercise>) -> Vec<Exercise> {
    let mut used_ids: Vec<String> = Vec::new();

    raw.into_iter()
        .enumerate()
        .map(|(index, exercise)| {
            let id = unique_id(&exercise, index, &mut used_ids);
            Exercise {
                id,
                name: exercise.name.unwrap_or_default(),
                description: exercise.description.unwrap_or_default(),
                duration: exercise.duration.unwrap_or_default(),
                frequency: exercise.frequency.unwrap_or_default(),
                sessions_per_week: coerce_count(exercise.sessions_per_week),
                phase: exercise.phase.unwrap_or_default(),
                difficulty: exercise.difficulty.unwrap_or_default(),
                target_area: exercise.target_area.unwrap_or_default(),
                equipment: exercise.equipment.unwrap_or_default(),
                instructions: exercise.instructions.unwrap_or_default(),
                precautions: exercise.precautions.unwrap_or_default(),
            }
        })
        .collect()
}

/// Derive a unique slug id: the provided id when present, otherwise the
/// exercise name, otherwise a positional `exercise-N`. Duplicates get a
/// numeric suffix.
fn unique_id(exercise: &RawExercise, index: usize, used_ids: &mut Vec<String>) -> String {
    let source = exercise
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .or(exercise.name.as_deref());

    let mut base = source.map(slugify).unwrap_or_default();
    if base.is_empty() {
        base = format!("exercise-{}", index + 1);
    }

    let mut candidate = base.clone();
    let mut suffix = 2;
    while used_ids.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }

    used_ids.push(candidate.clone());
    candidate
}

/// Lowercase, alphanumerics kept, everything else collapsed to single
/// hyphens, no leading or trailing hyphen.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.to_lowercase().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Accept a number or a numeric string; anything else gets the default.
fn coerce_count(value: Option<serde_json::Value>) -> i64 {
    match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(DEFAULT_SESSIONS_PER_WEEK),
        Some(serde_json::Value::String(s)) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f.round() as i64))
                .unwrap_or(DEFAULT_SESSIONS_PER_WEEK)
        }
        _ => DEFAULT_SESSIONS_PER_WEEK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::parser::parse_program;

    fn normalize_json(json: &str) -> Result<ExerciseProgram, ProgramError> {
        parse_program(json).and_then(normalize_program)
    }

    #[test]
    fn slug_derived_from_name() {
        let program = normalize_json(
            r#"{"exercises": [{"name": "Cat & Cow Stretch!"}]}"#,
        )
        .unwrap();
        assert_eq!(program.exercises[0].id, "cat-cow-stretch");
    }

    #[test]
    fn provided_id_is_slugified() {
        let program = normalize_json(
            r#"{"exercises": [{"id": "Pelvic Tilt 1", "name": "Pelvic Tilt"}]}"#,
        )
        .unwrap();
        assert_eq!(program.exercises[0].id, "pelvic-tilt-1");
    }

    #[test]
    fn nameless_exercises_get_positional_ids() {
        let program = normalize_json(
            r#"{"exercises": [{"duration": "2 min"}, {"duration": "3 min"}]}"#,
        )
        .unwrap();
        assert_eq!(program.exercises[0].id, "exercise-1");
        assert_eq!(program.exercises[1].id, "exercise-2");
    }

    #[test]
    fn duplicate_slugs_get_numeric_suffix() {
        let program = normalize_json(
            r#"{"exercises": [
                {"name": "Wall Slide"},
                {"name": "Wall Slide"},
                {"name": "wall slide"}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<&str> = program.exercises.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["wall-slide", "wall-slide-2", "wall-slide-3"]);
    }

    #[test]
    fn sessions_per_week_coercion() {
        let program = normalize_json(
            r#"{"exercises": [
                {"name": "A", "sessions_per_week": 5},
                {"name": "B", "sessions_per_week": "4"},
                {"name": "C", "sessions_per_week": "often"},
                {"name": "D"}
            ]}"#,
        )
        .unwrap();
        let counts: Vec<i64> = program
            .exercises
            .iter()
            .map(|e| e.sessions_per_week)
            .collect();
        assert_eq!(counts, vec![5, 4, 3, 3]);
    }

    #[test]
    fn phases_default_to_early() {
        let program = normalize_json(r#"{"exercises": [{"name": "A"}]}"#).unwrap();
        assert_eq!(program.phase, "early");
        assert_eq!(program.schedule.current_phase, "early");
    }

    #[test]
    fn absent_fields_become_empty_not_null() {
        let program = normalize_json(r#"{"exercises": [{"name": "A"}]}"#).unwrap();
        assert_eq!(program.title, "");
        assert_eq!(program.notes, "");
        assert!(program.report.findings.is_empty());
        assert_eq!(program.schedule.early.summary, "");
        assert!(!program.is_fallback);
    }

    #[test]
    fn zero_exercises_is_a_failure() {
        let err = normalize_json(r#"{"title": "Empty", "exercises": []}"#).unwrap_err();
        assert!(matches!(err, ProgramError::EmptyProgram));

        let err = normalize_json(r#"{"title": "None at all"}"#).unwrap_err();
        assert!(matches!(err, ProgramError::EmptyProgram));
    }

    #[test]
    fn weekly_target_accepts_numeric_string() {
        let program = normalize_json(
            r#"{"weekly_target": "4", "exercises": [{"name": "A"}]}"#,
        )
        .unwrap();
        assert_eq!(program.weekly_target, 4);

        let program = normalize_json(r#"{"exercises": [{"name": "A"}]}"#).unwrap();
        assert_eq!(program.weekly_target, 3);
    }
}
