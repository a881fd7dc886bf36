//! Complaint status semantics.

use serde::{Deserialize, Serialize};

/// Canonical complaint status.
///
/// The wire format is underscored lowercase (`in_progress`) and is
/// round-tripped verbatim; the server additionally emits the legacy alias
/// `pending`, which reads as [`ComplaintStatus::New`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    /// Received, pending review.
    #[default]
    #[serde(alias = "pending")]
    New,
    /// Under investigation by an administrator.
    InProgress,
    /// Closed with a resolution.
    Resolved,
    /// Closed without action.
    Rejected,
}

impl ComplaintStatus {
    /// All statuses, in triage order.
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::Resolved, Self::Rejected];

    /// Map an arbitrary server status string onto a canonical status.
    ///
    /// Exact matches (including the legacy `pending` alias) are resolved
    /// first; anything else falls back to case-insensitive substring
    /// matching, and unrecognized strings read as [`Self::New`]. The
    /// mapping is idempotent over its own wire keys.
    #[must_use]
    pub fn canonicalize(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "" | "pending" | "new" => Self::New,
            "in_progress" | "investigating" => Self::InProgress,
            "resolved" => Self::Resolved,
            "rejected" => Self::Rejected,
            other => {
                if other.contains("progress") {
                    Self::InProgress
                } else if other.contains("resolve") || other.contains("complete") {
                    Self::Resolved
                } else if other.contains("reject") || other.contains("fail") {
                    Self::Rejected
                } else {
                    Self::New
                }
            }
        }
    }

    /// The canonical wire key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Rejected => "rejected",
        }
    }

    /// Human label shown in lists and detail cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "Investigating",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }

    /// Style hook for badges.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::New => "status-new",
            Self::InProgress => "status-in-progress",
            Self::Resolved => "status-resolved",
            Self::Rejected => "status-rejected",
        }
    }

    /// Reporter-facing notice for the status card.
    #[must_use]
    pub const fn notice(self) -> &'static str {
        match self {
            Self::New => "Your complaint has been received and is pending review.",
            Self::InProgress => "Our team is investigating your complaint.",
            Self::Resolved => "Your complaint has been resolved, thank you.",
            Self::Rejected => "Your complaint was rejected, please review the feedback.",
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
