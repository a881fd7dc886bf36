//! Reporter-facing complaint status view.

use std::collections::HashMap;
use std::time::Duration;

use youmatter_client::{ApiClient, ComplaintQuery};
use youmatter_common::{AppError, AppResult, format_file_size, format_response_time};
use youmatter_types::{AttachmentMeta, Complaint, ComplaintStatus, User};

/// How long a deep-linked card stays highlighted.
pub const HIGHLIGHT_DURATION: Duration = Duration::from_secs(3);

/// A rendered attachment row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentView {
    pub name: String,
    pub size_label: String,
    /// Inline view URL, resolved against the API origin.
    pub view_url: Option<String>,
    /// Download variant of the view URL.
    pub download_url: Option<String>,
}

/// Derived presentation of one complaint.
#[derive(Debug, Clone)]
pub struct StatusCard {
    pub complaint_id: i64,
    pub reference_code: String,
    pub status: ComplaintStatus,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub notice: &'static str,
    pub response_time: String,
    pub attachments: Vec<AttachmentView>,
}

/// Derive attachment rows with best-effort link resolution.
#[must_use]
pub fn attachment_views(attachments: &[AttachmentMeta], api_base: &str) -> Vec<AttachmentView> {
    attachments
        .iter()
        .map(|meta| {
            let view_url = meta
                .url
                .as_deref()
                .map(|path| youmatter_common::to_absolute_url(api_base, path));
            let download_url = view_url.as_deref().map(youmatter_common::download_url);
            AttachmentView {
                name: meta.name.clone(),
                size_label: format_file_size(meta.size),
                view_url,
                download_url,
            }
        })
        .collect()
}

/// Derive the presentation card for a complaint.
#[must_use]
pub fn status_card(complaint: &Complaint, api_base: &str) -> StatusCard {
    let status = complaint.canonical_status();
    StatusCard {
        complaint_id: complaint.id,
        reference_code: complaint.reference_code.clone(),
        status,
        status_label: status.label(),
        status_class: status.class_name(),
        notice: status.notice(),
        response_time: format_response_time(complaint.submitted_at, complaint.updated_at),
        attachments: attachment_views(&complaint.attachments, api_base),
    }
}

/// View model for the reporter's own complaints.
#[derive(Debug)]
pub struct ReportsView {
    user: User,
    complaints: Vec<Complaint>,
    drafts: HashMap<i64, String>,
    posting_comment: bool,
    deep_link: Option<i64>,
    highlighted: Option<i64>,
    loaded: bool,
    epoch: u64,
}

impl ReportsView {
    /// Create a view for the signed-in reporter.
    #[must_use]
    pub fn new(user: User) -> Self {
        Self {
            user,
            complaints: Vec::new(),
            drafts: HashMap::new(),
            posting_comment: false,
            deep_link: None,
            highlighted: None,
            loaded: false,
            epoch: 0,
        }
    }

    /// Fetch the reporter's complaints, newest first as served.
    pub async fn load(&mut self, client: &ApiClient) -> AppResult<()> {
        let epoch = self.epoch;
        let complaints = client
            .get_complaints(&ComplaintQuery::for_user(self.user.id))
            .await?;

        // A view torn down while the request was in flight ignores the
        // late result.
        if self.epoch != epoch {
            return Ok(());
        }

        self.complaints = complaints;
        self.loaded = true;
        Ok(())
    }

    /// Whether the initial fetch has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The loaded complaints.
    #[must_use]
    pub fn complaints(&self) -> &[Complaint] {
        &self.complaints
    }

    /// Derived cards for every loaded complaint.
    #[must_use]
    pub fn cards(&self, api_base: &str) -> Vec<StatusCard> {
        self.complaints
            .iter()
            .map(|complaint| status_card(complaint, api_base))
            .collect()
    }

    /// The comment draft for a complaint.
    #[must_use]
    pub fn draft(&self, complaint_id: i64) -> &str {
        self.drafts
            .get(&complaint_id)
            .map_or("", String::as_str)
    }

    /// Edit the comment draft for a complaint.
    pub fn set_draft(&mut self, complaint_id: i64, text: impl Into<String>) {
        self.drafts.insert(complaint_id, text.into());
    }

    /// Post the draft comment on a complaint.
    ///
    /// Guarded against double-fire; on success the returned comment is
    /// appended to the tail of the thread and the draft cleared. On
    /// failure the draft is preserved for retry.
    pub async fn post_comment(&mut self, client: &ApiClient, complaint_id: i64) -> AppResult<()> {
        if self.posting_comment {
            return Err(AppError::Validation(
                "A comment is already being posted.".to_string(),
            ));
        }

        let message = self.draft(complaint_id).trim().to_string();
        if message.is_empty() {
            return Err(AppError::Validation(
                "Comment message is required.".to_string(),
            ));
        }

        self.posting_comment = true;
        let result = client
            .add_complaint_comment(complaint_id, Some(self.user.id), &message)
            .await;
        self.posting_comment = false;

        match result {
            Ok(comment) => {
                if let Some(complaint) = self
                    .complaints
                    .iter_mut()
                    .find(|complaint| complaint.id == complaint_id)
                {
                    complaint.comments.push(comment);
                }
                self.drafts.remove(&complaint_id);
                Ok(())
            }
            Err(e) => {
                tracing::debug!(complaint_id, error = %e, "Comment post failed; draft preserved");
                Err(e)
            }
        }
    }

    /// Record a deep link from navigation state.
    pub fn open_deep_link(&mut self, complaint_id: i64) {
        self.deep_link = Some(complaint_id);
    }

    /// Consume the deep link once, marking the card highlighted. The
    /// caller scrolls the card into view and clears the highlight after
    /// [`HIGHLIGHT_DURATION`].
    pub fn take_deep_link(&mut self) -> Option<i64> {
        let target = self.deep_link.take()?;
        self.highlighted = Some(target);
        Some(target)
    }

    /// The currently highlighted card, if any.
    #[must_use]
    pub const fn highlighted(&self) -> Option<i64> {
        self.highlighted
    }

    /// Clear the deep-link highlight.
    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    /// Tear the view down; any in-flight request result is discarded.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.complaints.clear();
        self.drafts.clear();
        self.posting_comment = false;
        self.deep_link = None;
        self.highlighted = None;
        self.loaded = false;
    }
}
