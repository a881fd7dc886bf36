//! Incident categories.

use serde::{Deserialize, Serialize};

/// Category of a reported incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentType {
    VerbalBullying,
    PhysicalBullying,
    CyberBullying,
    SocialExclusion,
    Harassment,
    /// Catch-all; also absorbs unrecognized categories on read.
    #[serde(other)]
    Other,
}

impl IncidentType {
    /// All selectable categories, in form order.
    pub const ALL: [Self; 6] = [
        Self::VerbalBullying,
        Self::PhysicalBullying,
        Self::CyberBullying,
        Self::SocialExclusion,
        Self::Harassment,
        Self::Other,
    ];

    /// The wire key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VerbalBullying => "verbal-bullying",
            Self::PhysicalBullying => "physical-bullying",
            Self::CyberBullying => "cyber-bullying",
            Self::SocialExclusion => "social-exclusion",
            Self::Harassment => "harassment",
            Self::Other => "other",
        }
    }

    /// Human label for the category selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VerbalBullying => "Verbal bullying",
            Self::PhysicalBullying => "Physical bullying",
            Self::CyberBullying => "Cyber bullying",
            Self::SocialExclusion => "Social exclusion",
            Self::Harassment => "Harassment",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
