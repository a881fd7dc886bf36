//! Student and administrator roster operations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use youmatter_common::AppResult;
use youmatter_types::{User, UserRole};

use crate::ApiClient;
use crate::auth::Acknowledgement;

/// Request to invite a student.
#[derive(Debug, Serialize, Validate)]
pub struct InviteStudentRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,
}

/// Partial update of a student record.
#[derive(Debug, Default, Serialize)]
pub struct UpdateStudentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Request to invite an administrator.
#[derive(Debug, Serialize, Validate)]
pub struct InviteAdminRequest {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    pub role: UserRole,
}

/// An invited student together with its one-time temporary password.
#[derive(Debug, Clone, Deserialize)]
pub struct InvitedStudent {
    pub student: User,
    pub temporary_password: String,
}

/// An invited administrator together with its one-time temporary password.
#[derive(Debug, Clone, Deserialize)]
pub struct InvitedAdmin {
    pub admin: User,
    pub temporary_password: String,
}

impl ApiClient {
    /// Fetch the student roster.
    pub async fn get_students(&self) -> AppResult<Vec<User>> {
        self.get_json("/admin/students").await
    }

    /// Invite a student; the response carries a temporary password shown
    /// once to the inviting administrator.
    pub async fn invite_student(&self, req: &InviteStudentRequest) -> AppResult<InvitedStudent> {
        req.validate()?;
        self.post_json("/admin/students", req).await
    }

    /// Update a student record.
    pub async fn update_student(
        &self,
        student_id: i64,
        req: &UpdateStudentRequest,
    ) -> AppResult<User> {
        self.patch_json(&format!("/admin/students/{student_id}"), req)
            .await
    }

    /// Issue a new temporary password for a student.
    pub async fn reset_student_password(&self, student_id: i64) -> AppResult<InvitedStudent> {
        self.post_json(
            &format!("/admin/students/{student_id}/reset_password"),
            &serde_json::json!({}),
        )
        .await
    }

    /// Remove a student account.
    pub async fn delete_student(&self, student_id: i64) -> AppResult<Acknowledgement> {
        self.delete_json(&format!("/admin/students/{student_id}"))
            .await
    }

    /// Invite an administrator.
    pub async fn invite_admin(&self, req: &InviteAdminRequest) -> AppResult<InvitedAdmin> {
        req.validate()?;
        self.post_json("/admin/admins", req).await
    }
}
