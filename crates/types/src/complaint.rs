//! Complaint records, comments, and the submission payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AttachmentMeta, ComplaintStatus, IncidentType};

/// A comment on a complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(default, alias = "complaintId")]
    pub complaint_id: Option<i64>,
    #[serde(default, alias = "authorId")]
    pub author_id: Option<i64>,
    #[serde(default, alias = "authorName")]
    pub author_name: String,
    #[serde(default, alias = "authorRole")]
    pub author_role: Option<String>,
    pub message: String,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A complaint record as returned by the API.
///
/// The server is inconsistent about timestamp field spelling
/// (`submitted_at` vs `submittedAt`); aliases normalize both onto the
/// snake_case shape on read. The raw status string is kept verbatim so it
/// round-trips; views derive the canonical status from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: i64,
    #[serde(alias = "referenceCode")]
    pub reference_code: String,
    #[serde(default, alias = "userId")]
    pub user_id: Option<i64>,
    #[serde(default, alias = "studentName")]
    pub student_name: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(alias = "incidentType")]
    pub incident_type: IncidentType,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "roomNumber")]
    pub room_number: Option<String>,
    #[serde(default, alias = "incidentDate")]
    pub incident_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub witnesses: Option<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentMeta>,
    /// Raw status string, round-tripped verbatim.
    #[serde(default)]
    pub status: String,
    #[serde(alias = "submittedAt")]
    pub submitted_at: DateTime<Utc>,
    #[serde(alias = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Complaint {
    /// Canonical status derived from the raw server string.
    #[must_use]
    pub fn canonical_status(&self) -> ComplaintStatus {
        ComplaintStatus::canonicalize(&self.status)
    }

    /// Name to display for the reporter.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.anonymous {
            return "Anonymous";
        }
        self.student_name.as_deref().unwrap_or("Anonymous")
    }
}

/// Payload for creating a complaint.
///
/// `student_name` is omitted entirely for anonymous submissions; the
/// server may still retain `user_id` for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComplaint {
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub anonymous: bool,
    pub incident_type: IncidentType,
    pub incident_date: Option<DateTime<Utc>>,
    pub description: String,
    pub room_number: Option<String>,
    pub witnesses: Option<String>,
    pub attachments: Vec<AttachmentMeta>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_snake_case_record() {
        let raw = r#"{
            "id": 12,
            "reference_code": "A0012",
            "user_id": 4,
            "student_name": "Ada",
            "anonymous": false,
            "incident_type": "cyber-bullying",
            "description": "Threatening messages in the hall group chat.",
            "room_number": "B-204",
            "incident_date": "2025-08-10T14:30:00+00:00",
            "witnesses": "Grace",
            "attachments": [{"name": "notes.pdf", "size": 1048576, "type": "application/pdf"}],
            "status": "new",
            "submitted_at": "2025-08-11T09:00:00+08:00",
            "updated_at": "2025-08-11T09:00:00+08:00",
            "comments": []
        }"#;
        let complaint: Complaint = serde_json::from_str(raw).unwrap();
        assert_eq!(complaint.reference_code, "A0012");
        assert_eq!(complaint.canonical_status(), ComplaintStatus::New);
        assert_eq!(complaint.display_name(), "Ada");
        assert_eq!(complaint.attachments.len(), 1);
    }

    #[test]
    fn test_reads_camel_case_timestamps() {
        let raw = r#"{
            "id": 13,
            "referenceCode": "A0013",
            "anonymous": true,
            "incidentType": "harassment",
            "status": "pending",
            "submittedAt": "2025-08-11T09:00:00Z",
            "updatedAt": "2025-08-12T10:30:00Z"
        }"#;
        let complaint: Complaint = serde_json::from_str(raw).unwrap();
        assert_eq!(complaint.canonical_status(), ComplaintStatus::New);
        assert_eq!(complaint.display_name(), "Anonymous");
        assert!(complaint.updated_at > complaint.submitted_at);
    }

    #[test]
    fn test_anonymous_payload_omits_student_name() {
        let payload = NewComplaint {
            user_id: Some(4),
            student_name: None,
            anonymous: true,
            incident_type: IncidentType::CyberBullying,
            incident_date: None,
            description: "…".to_string(),
            room_number: Some("B-204".to_string()),
            witnesses: None,
            attachments: vec![],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("student_name").is_none());
        assert_eq!(value["anonymous"], serde_json::json!(true));
    }

    #[test]
    fn test_named_payload_carries_student_name() {
        let payload = NewComplaint {
            user_id: Some(4),
            student_name: Some("Ada".to_string()),
            anonymous: false,
            incident_type: IncidentType::CyberBullying,
            incident_date: None,
            description: "…".to_string(),
            room_number: None,
            witnesses: None,
            attachments: vec![],
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["student_name"], serde_json::json!("Ada"));
        assert_eq!(value["anonymous"], serde_json::json!(false));
    }
}
