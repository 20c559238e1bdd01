//! Categorical risk and claim attributes.
//!
//! Every category is a closed enum. The weighted ones are paired with an
//! explicit draw table; the rest are drawn uniformly from `ALL`.

use serde::{Deserialize, Serialize};

macro_rules! labelled {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label used in exported tables.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled!(Gender {
    Male => "male",
    Female => "female",
});

labelled!(Smoker {
    Yes => "yes",
    No => "no",
});

labelled!(MedicalHistory {
    Hypertension => "hypertension",
    Diabetes => "diabetes",
    None => "none",
    HeartDisease => "heart disease",
    Cancer => "cancer",
});

labelled!(CoverageTier {
    Basic => "basic",
    Standard => "standard",
    Comprehensive => "comprehensive",
});

labelled!(ClaimStatus {
    NoClaim => "no claim",
    Claimed => "claimed",
});

labelled!(CauseOfLoss {
    Death => "death",
    Accident => "accident",
    CriticalIllness => "critical illness",
    NaturalCauses => "natural causes",
    Suicide => "suicide",
});

labelled!(ClaimReason {
    Damage => "damage",
    TotalLoss => "total loss",
    PartialLoss => "partial loss",
    HealthIssues => "health issues",
    NaturalEvent => "natural event",
});

impl Smoker {
    pub fn is_smoker(&self) -> bool {
        matches!(self, Smoker::Yes)
    }
}

/// Draw weights for medical history, in the order the underwriting
/// questionnaire lists conditions.
pub const MEDICAL_HISTORY_WEIGHTS: [(MedicalHistory, f64); 5] = [
    (MedicalHistory::Hypertension, 0.30),
    (MedicalHistory::Diabetes, 0.20),
    (MedicalHistory::None, 0.40),
    (MedicalHistory::HeartDisease, 0.05),
    (MedicalHistory::Cancer, 0.05),
];

pub const COVERAGE_WEIGHTS: [(CoverageTier, f64); 3] = [
    (CoverageTier::Basic, 0.5),
    (CoverageTier::Standard, 0.3),
    (CoverageTier::Comprehensive, 0.2),
];

/// Claims per claimed policy: mostly one, occasionally a follow-up.
pub const CLAIM_COUNT_WEIGHTS: [(u32, f64); 3] = [(1, 0.80), (2, 0.15), (3, 0.05)];
