//! Complaint submission form controller.

use chrono::{DateTime, Utc};

use youmatter_client::ApiClient;
use youmatter_common::{AppError, AppResult};
use youmatter_types::{Complaint, FileCandidate, IncidentType, NewComplaint, User};

use crate::services::policy;

/// Submission form state.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub anonymous: bool,
    pub student_name: String,
    pub room_number: String,
    pub incident_type: Option<IncidentType>,
    pub description: String,
    pub incident_date: Option<DateTime<Utc>>,
    pub witnesses: String,
    pub attachments: Vec<FileCandidate>,
}

/// Controller owning the submission form.
#[derive(Debug, Default)]
pub struct SubmissionController {
    session_user: Option<User>,
    form: SubmissionForm,
    attachment_errors: Vec<String>,
    in_flight: bool,
}

impl SubmissionController {
    /// Create a controller for the given session user (None when the
    /// reporter is not signed in).
    #[must_use]
    pub fn new(session_user: Option<User>) -> Self {
        let mut controller = Self {
            session_user,
            ..Self::default()
        };
        controller.form.student_name = controller.default_student_name();
        controller
    }

    /// Current form state.
    #[must_use]
    pub const fn form(&self) -> &SubmissionForm {
        &self.form
    }

    /// Errors from the most recent attachment batch.
    #[must_use]
    pub fn attachment_errors(&self) -> &[String] {
        &self.attachment_errors
    }

    /// Whether a submission is currently in flight.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    fn default_student_name(&self) -> String {
        self.session_user
            .as_ref()
            .map(|user| user.display_name().to_string())
            .unwrap_or_default()
    }

    /// The name field is read-only while the reporter is signed in and not
    /// anonymous; the session provides the name.
    #[must_use]
    pub const fn name_read_only(&self) -> bool {
        self.session_user.is_some() && !self.form.anonymous
    }

    /// Toggle anonymity. Turning it on clears the name; turning it off
    /// restores it from the session user.
    pub fn set_anonymous(&mut self, anonymous: bool) {
        self.form.anonymous = anonymous;
        if anonymous {
            self.form.student_name.clear();
        } else {
            self.form.student_name = self.default_student_name();
        }
    }

    /// Edit the name; ignored while the field is disabled (anonymous) or
    /// read-only (signed in).
    pub fn set_student_name(&mut self, name: impl Into<String>) {
        if self.form.anonymous || self.name_read_only() {
            return;
        }
        self.form.student_name = name.into();
    }

    /// Set the incident date, clamped to the current instant. The server
    /// revalidates the bound on submission.
    pub fn set_incident_date(&mut self, value: DateTime<Utc>) {
        self.form.incident_date = Some(clamp_incident_date(value, Utc::now()));
    }

    /// Select the incident category.
    pub fn set_incident_type(&mut self, incident_type: IncidentType) {
        self.form.incident_type = Some(incident_type);
    }

    /// Edit the incident description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    /// Edit the room number.
    pub fn set_room_number(&mut self, room_number: impl Into<String>) {
        self.form.room_number = room_number.into();
    }

    /// Edit the witnesses field.
    pub fn set_witnesses(&mut self, witnesses: impl Into<String>) {
        self.form.witnesses = witnesses.into();
    }

    /// Run a picker batch through the acceptance policy. The underlying
    /// picker is cleared after every batch, accepted or not; returns the
    /// aggregated errors for inline display.
    pub fn attach_files(&mut self, batch: &[FileCandidate]) -> &[String] {
        let outcome = policy::screen_files(&self.form.attachments, batch);
        self.form.attachments = outcome.accepted;
        self.attachment_errors = outcome.errors;
        &self.attachment_errors
    }

    /// Remove one attachment by index; out-of-range indexes are ignored.
    pub fn remove_attachment(&mut self, index: usize) {
        if index < self.form.attachments.len() {
            self.form.attachments.remove(index);
        }
    }

    /// Build the submission payload from the current form state.
    pub fn build_payload(&self, now: DateTime<Utc>) -> AppResult<NewComplaint> {
        let Some(incident_type) = self.form.incident_type else {
            return Err(AppError::Validation(
                "Please choose an incident type.".to_string(),
            ));
        };

        let description = self.form.description.trim();
        if description.is_empty() {
            return Err(AppError::Validation(
                "Please describe the incident.".to_string(),
            ));
        }

        let student_name = if self.form.anonymous {
            None
        } else {
            let name = self.form.student_name.trim();
            if name.is_empty() {
                return Err(AppError::Validation(
                    "Please provide your name or submit anonymously.".to_string(),
                ));
            }
            Some(name.to_string())
        };

        Ok(NewComplaint {
            user_id: self.session_user.as_ref().map(|user| user.id),
            student_name,
            anonymous: self.form.anonymous,
            incident_type,
            incident_date: self
                .form
                .incident_date
                .map(|date| clamp_incident_date(date, now)),
            description: description.to_string(),
            room_number: non_empty(&self.form.room_number),
            witnesses: non_empty(&self.form.witnesses),
            attachments: self.form.attachments.iter().map(FileCandidate::meta).collect(),
        })
    }

    /// Submit the complaint. Refuses to re-submit while a previous
    /// submission is still in flight; on success the form resets and the
    /// created complaint is returned for the caller to surface.
    pub async fn submit(&mut self, client: &ApiClient) -> AppResult<Complaint> {
        if self.in_flight {
            return Err(AppError::Validation(
                "A submission is already in progress.".to_string(),
            ));
        }

        let payload = self.build_payload(Utc::now())?;

        self.in_flight = true;
        let result = client.create_complaint(&payload).await;
        self.in_flight = false;

        match result {
            Ok(complaint) => {
                tracing::debug!(reference = %complaint.reference_code, "Complaint submitted");
                self.reset();
                Ok(complaint)
            }
            Err(e) => {
                tracing::debug!(error = %e, kind = e.kind(), "Complaint submission failed");
                Err(e)
            }
        }
    }

    /// Reset the form to its initial state for the session user.
    pub fn reset(&mut self) {
        self.form = SubmissionForm {
            student_name: self.default_student_name(),
            ..SubmissionForm::default()
        };
        self.attachment_errors.clear();
    }
}

/// Clamp a prospective incident date to the current instant.
#[must_use]
pub fn clamp_incident_date(value: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    value.min(now)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
