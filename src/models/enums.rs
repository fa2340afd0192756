use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same strings, so wire and storage values match.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $variant
            ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(OnsetBucket {
    UnderOneWeek => "<1w",
    OneToThreeWeeks => "1-3w",
    ThreeToSixWeeks => "3-6w",
    OverSixWeeks => ">6w",
});

impl OnsetBucket {
    /// Buckets under six weeks count as the acute stage.
    pub fn is_acute(&self) -> bool {
        !matches!(self, Self::OverSixWeeks)
    }
}

str_enum!(AssessmentStatus {
    Draft => "draft",
    Final => "final",
});

str_enum!(RecommendationSource {
    Ai => "ai",
    Fallback => "fallback",
    Flagged => "flagged",
});

str_enum!(ProgramPhase {
    Early => "early",
    Intermediate => "intermediate",
    Advanced => "advanced",
});

str_enum!(DraftStorage {
    Primary => "primary",
    AssessmentFallback => "assessment_fallback",
});

str_enum!(Disposition {
    ClinicianReview => "clinician_review",
    Program => "program",
});
