use super::types::{Exercise, ExerciseProgram, PhaseSummary, ProgramReport, ProgramSchedule};

/// Canonical fallback title. Clients key on it, so it never changes.
pub const FALLBACK_TITLE: &str = "General Exercise Program";

/// Static, equipment-free program served whenever generation is skipped,
/// unavailable, or unusable. Deliberately conservative: every movement is
/// low-load and self-limited.
pub fn fallback_program() -> ExerciseProgram {
    ExerciseProgram {
        title: FALLBACK_TITLE.to_string(),
        description: "A gentle, general-purpose routine to keep you moving while a \
                      personalized program is unavailable. All movements are low-intensity \
                      and need no equipment."
            .to_string(),
        phase: "early".to_string(),
        weekly_target: 3,
        report: ProgramReport {
            summary: "Personalized generation was unavailable; this is a conservative \
                      general routine."
                .to_string(),
            findings: vec![],
            recommendations: vec![
                "Move daily within a comfortable range".to_string(),
                "Seek professional advice if symptoms worsen".to_string(),
            ],
        },
        exercises: vec![
            Exercise {
                id: "gentle-walking".to_string(),
                name: "Gentle Walking".to_string(),
                description: "Light walking to raise circulation and ease general stiffness."
                    .to_string(),
                duration: "10-15 minutes".to_string(),
                frequency: "daily".to_string(),
                sessions_per_week: 5,
                phase: "early".to_string(),
                difficulty: "gentle".to_string(),
                target_area: "whole body".to_string(),
                equipment: "none".to_string(),
                instructions: vec![
                    "Walk at a comfortable, conversational pace".to_string(),
                    "Keep your posture tall and shoulders relaxed".to_string(),
                ],
                precautions: vec!["Shorten the walk if pain increases".to_string()],
            },
            Exercise {
                id: "cat-cow-mobility".to_string(),
                name: "Cat-Cow Mobility".to_string(),
                description: "Slow spinal flexion and extension to restore segmental movement."
                    .to_string(),
                duration: "2 minutes".to_string(),
                frequency: "daily".to_string(),
                sessions_per_week: 5,
                phase: "early".to_string(),
                difficulty: "gentle".to_string(),
                target_area: "spine".to_string(),
                equipment: "none".to_string(),
                instructions: vec![
                    "Start on hands and knees".to_string(),
                    "Alternate slowly between arching and rounding your back".to_string(),
                    "Breathe with each movement".to_string(),
                ],
                precautions: vec!["Stay within a pain-free range".to_string()],
            },
            Exercise {
                id: "glute-bridge".to_string(),
                name: "Glute Bridge".to_string(),
                description: "Activates the hips and posterior chain without loading the spine."
                    .to_string(),
                duration: "2 sets of 8-10 repetitions".to_string(),
                frequency: "every other day".to_string(),
                sessions_per_week: 3,
                phase: "early".to_string(),
                difficulty: "gentle".to_string(),
                target_area: "hips and lower back".to_string(),
                equipment: "none".to_string(),
                instructions: vec![
                    "Lie on your back with knees bent".to_string(),
                    "Lift your hips until your body forms a straight line".to_string(),
                    "Lower slowly".to_string(),
                ],
                precautions: vec!["Avoid over-arching the lower back".to_string()],
            },
            Exercise {
                id: "diaphragmatic-breathing".to_string(),
                name: "Diaphragmatic Breathing".to_string(),
                description: "Slow breathing to down-regulate muscle guarding.".to_string(),
                duration: "3 minutes".to_string(),
                frequency: "daily".to_string(),
                sessions_per_week: 5,
                phase: "early".to_string(),
                difficulty: "gentle".to_string(),
                target_area: "trunk".to_string(),
                equipment: "none".to_string(),
                instructions: vec![
                    "Lie down or sit comfortably".to_string(),
                    "Breathe in through the nose, letting the belly rise".to_string(),
                    "Exhale slowly through pursed lips".to_string(),
                ],
                precautions: vec![],
            },
        ],
        schedule: ProgramSchedule {
            current_phase: "early".to_string(),
            early: PhaseSummary {
                summary: "Daily gentle movement and breathing, staying well within comfort."
                    .to_string(),
            },
            intermediate: PhaseSummary {
                summary: "Add repetitions gradually once movement feels easy.".to_string(),
            },
            advanced: PhaseSummary {
                summary: "Transition to a personalized program when available.".to_string(),
            },
        },
        notes: "Stop any exercise that sharply increases pain, causes numbness, or produces \
                dizziness, and consult a clinician."
            .to_string(),
        is_fallback: true,
    }
}
