//! Complaint operations.

use serde::Serialize;

use youmatter_common::{AppError, AppResult};
use youmatter_types::{Comment, Complaint, ComplaintStatus, NewComplaint};

use crate::ApiClient;

/// Query parameters for the complaints listing.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ComplaintQuery {
    /// Restrict to complaints submitted by this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Include each complaint's comment thread.
    pub include_comments: bool,
}

impl ComplaintQuery {
    /// Listing of one user's complaints, with comments.
    #[must_use]
    pub const fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            include_comments: true,
        }
    }

    /// Listing of every complaint, without comment threads.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            user_id: None,
            include_comments: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct AddCommentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    author_id: Option<i64>,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateStatusRequest {
    status: ComplaintStatus,
}

impl ApiClient {
    /// Submit a new complaint.
    pub async fn create_complaint(&self, payload: &NewComplaint) -> AppResult<Complaint> {
        self.post_json("/complaints", payload).await
    }

    /// Fetch complaints matching the query.
    pub async fn get_complaints(&self, query: &ComplaintQuery) -> AppResult<Vec<Complaint>> {
        self.get_json_with_query("/complaints", query).await
    }

    /// Fetch one complaint by reference code or numeric id.
    pub async fn get_complaint_by_identifier(&self, identifier: &str) -> AppResult<Complaint> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AppError::Validation(
                "A complaint reference is required.".to_string(),
            ));
        }
        self.get_json(&format!("/complaints/{identifier}")).await
    }

    /// Fetch a complaint's comment thread.
    pub async fn get_complaint_comments(&self, complaint_id: i64) -> AppResult<Vec<Comment>> {
        self.get_json(&format!("/complaints/{complaint_id}/comments"))
            .await
    }

    /// Append a comment to a complaint.
    pub async fn add_complaint_comment(
        &self,
        complaint_id: i64,
        author_id: Option<i64>,
        message: &str,
    ) -> AppResult<Comment> {
        self.post_json(
            &format!("/complaints/{complaint_id}/comments"),
            &AddCommentRequest { author_id, message },
        )
        .await
    }

    /// Move a complaint to a new status; the response is the refreshed
    /// complaint record.
    pub async fn update_complaint_status(
        &self,
        complaint_id: i64,
        status: ComplaintStatus,
    ) -> AppResult<Complaint> {
        self.patch_json(
            &format!("/complaints/{complaint_id}/status"),
            &UpdateStatusRequest { status },
        )
        .await
    }
}
