//! Administrator triage surface.
//!
//! List mode derives searchable rows from every complaint and owns
//! filtering and pagination; detail mode drives the status state machine
//! and the comment thread for one complaint.

use std::time::Duration;

use chrono::NaiveDate;

use youmatter_client::{ApiClient, ComplaintQuery};
use youmatter_common::{AppError, AppResult, format_submitted_at};
use youmatter_types::{Complaint, ComplaintStatus, User};

use crate::services::reports::{StatusCard, status_card};

/// Rows per list page.
pub const PAGE_SIZE: usize = 10;

/// Maximum number of page buttons shown at once.
pub const PAGE_WINDOW: usize = 5;

/// How long the status-change confirmation banner stays up.
pub const STATUS_BANNER_DURATION: Duration = Duration::from_millis(3500);

/// Message surfaced when a non-admin reaches the triage surface.
const NO_PERMISSION: &str = "You do not have permission to view complaints.";

/// Whether an admin may move a complaint between two statuses.
///
/// Every edge is currently allowed; forbidden transitions get one place
/// to land if domain rules ever tighten.
#[must_use]
pub const fn transition_allowed(_from: ComplaintStatus, _to: ComplaintStatus) -> bool {
    true
}

/// A derived list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageRow {
    pub complaint_id: i64,
    pub reference_code: String,
    pub submitted_label: String,
    pub student_label: String,
    /// Raw server status, round-tripped verbatim.
    pub raw_status: String,
    pub status: ComplaintStatus,
    pub status_label: &'static str,
}

impl TriageRow {
    fn derive(complaint: &Complaint) -> Self {
        let status = complaint.canonical_status();
        Self {
            complaint_id: complaint.id,
            reference_code: complaint.reference_code.clone(),
            submitted_label: format_submitted_at(complaint.submitted_at),
            student_label: complaint.display_name().to_string(),
            raw_status: complaint.status.clone(),
            status,
            status_label: status.label(),
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.student_label.to_lowercase().contains(needle)
            || self.reference_code.to_lowercase().contains(needle)
            || self.submitted_label.to_lowercase().contains(needle)
            || self.status_label.to_lowercase().contains(needle)
    }
}

/// An inclusive submitted-at date range; the upper bound covers the whole
/// end day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start
            && date < start
        {
            return false;
        }
        if let Some(end) = self.end
            && date > end
        {
            return false;
        }
        true
    }
}

/// Applied list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriageFilters {
    /// Exact canonical status, or None for "all".
    pub status: Option<ComplaintStatus>,
    pub range: DateRange,
}

/// View model for the triage list.
#[derive(Debug)]
pub struct TriageList {
    viewer: User,
    complaints: Vec<Complaint>,
    search: String,
    filters: TriageFilters,
    page: usize,
    loaded: bool,
    epoch: u64,
}

impl TriageList {
    /// Create a list view for the acting administrator.
    #[must_use]
    pub fn new(viewer: User) -> Self {
        Self {
            viewer,
            complaints: Vec::new(),
            search: String::new(),
            filters: TriageFilters::default(),
            page: 1,
            loaded: false,
            epoch: 0,
        }
    }

    /// Fetch every complaint. Fetched once per mount; non-admin viewers
    /// are rejected before any network call.
    pub async fn load(&mut self, client: &ApiClient) -> AppResult<()> {
        if !self.viewer.role.is_admin() {
            return Err(AppError::Forbidden(NO_PERMISSION.to_string()));
        }

        let epoch = self.epoch;
        let complaints = client.get_complaints(&ComplaintQuery::all()).await?;
        if self.epoch != epoch {
            return Ok(());
        }

        self.complaints = complaints;
        self.loaded = true;
        self.clamp_page();
        Ok(())
    }

    /// Whether the initial fetch has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Update the search needle and re-clamp the page.
    pub fn set_search(&mut self, needle: impl Into<String>) {
        self.search = needle.into();
        self.clamp_page();
    }

    /// Apply status and date-range filters. An inverted range is rejected
    /// here, before it ever reaches the row pipeline.
    pub fn apply_filters(
        &mut self,
        status: Option<ComplaintStatus>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<()> {
        if let (Some(start), Some(end)) = (start, end)
            && start > end
        {
            return Err(AppError::Validation(
                "The start date must be on or before the end date.".to_string(),
            ));
        }

        self.filters = TriageFilters {
            status,
            range: DateRange { start, end },
        };
        self.clamp_page();
        Ok(())
    }

    /// Currently applied filters.
    #[must_use]
    pub const fn filters(&self) -> &TriageFilters {
        &self.filters
    }

    /// All rows surviving search and filters, in server order.
    #[must_use]
    pub fn filtered_rows(&self) -> Vec<TriageRow> {
        let needle = self.search.trim().to_lowercase();
        self.complaints
            .iter()
            .filter(|complaint| {
                if let Some(status) = self.filters.status
                    && complaint.canonical_status() != status
                {
                    return false;
                }
                self.filters
                    .range
                    .contains(complaint.submitted_at.date_naive())
            })
            .map(TriageRow::derive)
            .filter(|row| needle.is_empty() || row.matches_search(&needle))
            .collect()
    }

    /// Rows for the current page.
    #[must_use]
    pub fn page_rows(&self) -> Vec<TriageRow> {
        let rows = self.filtered_rows();
        let start = (self.page - 1) * PAGE_SIZE;
        rows.into_iter().skip(start).take(PAGE_SIZE).collect()
    }

    /// Total pages for the filtered set; at least 1.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.filtered_rows().len().div_ceil(PAGE_SIZE).max(1)
    }

    /// Current page, 1-based.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.page
    }

    /// Navigate to a page; clamped into the valid range.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp_page();
    }

    /// Page buttons to render: up to [`PAGE_WINDOW`] numbers centered on
    /// the current page.
    #[must_use]
    pub fn page_window(&self) -> Vec<usize> {
        let total = self.page_count();
        if total <= PAGE_WINDOW {
            return (1..=total).collect();
        }

        let half = PAGE_WINDOW / 2;
        let start = self
            .page
            .saturating_sub(half)
            .clamp(1, total - PAGE_WINDOW + 1);
        (start..start + PAGE_WINDOW).collect()
    }

    /// Tear the view down; any in-flight request result is discarded.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.complaints.clear();
        self.search.clear();
        self.filters = TriageFilters::default();
        self.page = 1;
        self.loaded = false;
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.page_count());
    }
}

/// View model for one complaint in triage.
#[derive(Debug)]
pub struct TriageDetail {
    viewer: User,
    complaint: Option<Complaint>,
    missing_identifier: Option<String>,
    saving_status: bool,
    posting_comment: bool,
    banner: Option<ComplaintStatus>,
    epoch: u64,
}

impl TriageDetail {
    /// Create a detail view for the acting administrator.
    #[must_use]
    pub fn new(viewer: User) -> Self {
        Self {
            viewer,
            complaint: None,
            missing_identifier: None,
            saving_status: false,
            posting_comment: false,
            banner: None,
            epoch: 0,
        }
    }

    /// Fetch one complaint by reference code or numeric id. An unknown
    /// identifier is not an error: it lands the view in the empty state
    /// with a back-to-list affordance.
    pub async fn load(&mut self, client: &ApiClient, identifier: &str) -> AppResult<()> {
        if !self.viewer.role.is_admin() {
            return Err(AppError::Forbidden(NO_PERMISSION.to_string()));
        }

        let epoch = self.epoch;
        match client.get_complaint_by_identifier(identifier).await {
            Ok(complaint) => {
                if self.epoch != epoch {
                    return Ok(());
                }
                self.complaint = Some(complaint);
                self.missing_identifier = None;
                Ok(())
            }
            Err(AppError::NotFound(_)) => {
                if self.epoch != epoch {
                    return Ok(());
                }
                self.complaint = None;
                self.missing_identifier = Some(identifier.to_string());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// The loaded complaint, if any.
    #[must_use]
    pub const fn complaint(&self) -> Option<&Complaint> {
        self.complaint.as_ref()
    }

    /// The identifier that failed to resolve, when in the empty state.
    #[must_use]
    pub fn missing_identifier(&self) -> Option<&str> {
        self.missing_identifier.as_deref()
    }

    /// Derived presentation card for the loaded complaint.
    #[must_use]
    pub fn card(&self, api_base: &str) -> Option<StatusCard> {
        self.complaint
            .as_ref()
            .map(|complaint| status_card(complaint, api_base))
    }

    /// Statuses the admin may move the complaint to.
    #[must_use]
    pub fn available_statuses(&self) -> Vec<ComplaintStatus> {
        let Some(complaint) = &self.complaint else {
            return Vec::new();
        };
        let current = complaint.canonical_status();
        ComplaintStatus::ALL
            .into_iter()
            .filter(|status| *status != current && transition_allowed(current, *status))
            .collect()
    }

    /// Move the complaint to a new status.
    ///
    /// Guarded against double-fire; on success local state is replaced by
    /// the server response (refreshing `updated_at`) and a confirmation
    /// banner is armed for [`STATUS_BANNER_DURATION`].
    pub async fn change_status(
        &mut self,
        client: &ApiClient,
        target: ComplaintStatus,
    ) -> AppResult<()> {
        if self.saving_status {
            return Err(AppError::Validation(
                "A status update is already in progress.".to_string(),
            ));
        }

        let Some(complaint) = &self.complaint else {
            return Err(AppError::Validation("No complaint is loaded.".to_string()));
        };
        let current = complaint.canonical_status();
        if !transition_allowed(current, target) {
            return Err(AppError::Validation(format!(
                "Cannot move a complaint from {current} to {target}."
            )));
        }
        let complaint_id = complaint.id;

        self.saving_status = true;
        let result = client.update_complaint_status(complaint_id, target).await;
        self.saving_status = false;

        match result {
            Ok(refreshed) => {
                tracing::debug!(
                    complaint_id,
                    status = %target,
                    "Complaint status updated"
                );
                self.complaint = Some(refreshed);
                self.banner = Some(target);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// The armed confirmation banner, if any. The caller clears it after
    /// [`STATUS_BANNER_DURATION`].
    #[must_use]
    pub const fn banner(&self) -> Option<ComplaintStatus> {
        self.banner
    }

    /// Dismiss the confirmation banner.
    pub fn clear_banner(&mut self) {
        self.banner = None;
    }

    /// Append a comment as the acting administrator.
    pub async fn post_comment(&mut self, client: &ApiClient, message: &str) -> AppResult<()> {
        if self.posting_comment {
            return Err(AppError::Validation(
                "A comment is already being posted.".to_string(),
            ));
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::Validation(
                "Comment message is required.".to_string(),
            ));
        }

        let Some(complaint) = &self.complaint else {
            return Err(AppError::Validation("No complaint is loaded.".to_string()));
        };
        let complaint_id = complaint.id;

        self.posting_comment = true;
        let result = client
            .add_complaint_comment(complaint_id, Some(self.viewer.id), message)
            .await;
        self.posting_comment = false;

        match result {
            Ok(comment) => {
                if let Some(complaint) = &mut self.complaint {
                    complaint.comments.push(comment);
                }
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Tear the view down; any in-flight request result is discarded.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.complaint = None;
        self.missing_identifier = None;
        self.saving_status = false;
        self.posting_comment = false;
        self.banner = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use youmatter_types::{AttachmentMeta, IncidentType, UserRole, UserStatus};

    fn admin() -> User {
        User {
            id: 1,
            username: "warden".to_string(),
            email: "warden@example.com".to_string(),
            full_name: Some("Hall Warden".to_string()),
            role: UserRole::Admin,
            status: UserStatus::Active,
            avatar_url: None,
            invited_at: None,
            last_login_at: None,
        }
    }

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn complaint(id: i64, reference: &str, status: &str, submitted: &str) -> Complaint {
        Complaint {
            id,
            reference_code: reference.to_string(),
            user_id: Some(4),
            student_name: Some("Ada".to_string()),
            anonymous: false,
            incident_type: IncidentType::VerbalBullying,
            description: "…".to_string(),
            room_number: None,
            incident_date: None,
            witnesses: None,
            attachments: Vec::<AttachmentMeta>::new(),
            status: status.to_string(),
            submitted_at: instant(submitted),
            updated_at: instant(submitted),
            comments: vec![],
        }
    }

    fn list_with(complaints: Vec<Complaint>) -> TriageList {
        let mut list = TriageList::new(admin());
        list.complaints = complaints;
        list.loaded = true;
        list
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_rows_derive_reference_name_and_label() {
        let list = list_with(vec![complaint(1, "A0001", "pending", "2025-03-12T06:30:00Z")]);
        let rows = list.filtered_rows();
        assert_eq!(rows[0].reference_code, "A0001");
        assert_eq!(rows[0].student_label, "Ada");
        assert_eq!(rows[0].raw_status, "pending");
        assert_eq!(rows[0].status, ComplaintStatus::New);
        assert_eq!(rows[0].status_label, "New");
        assert_eq!(rows[0].submitted_label, "12 Mar 2025, 06:30");
    }

    #[test]
    fn test_anonymous_rows_display_anonymous() {
        let mut anonymous = complaint(2, "A0002", "new", "2025-03-12T06:30:00Z");
        anonymous.anonymous = true;
        anonymous.student_name = None;
        let list = list_with(vec![anonymous]);
        assert_eq!(list.filtered_rows()[0].student_label, "Anonymous");
    }

    #[test]
    fn test_search_matches_all_derived_columns() {
        let mut list = list_with(vec![
            complaint(1, "A0001", "new", "2025-03-12T06:30:00Z"),
            complaint(2, "A0002", "resolved", "2025-04-02T06:30:00Z"),
        ]);

        list.set_search("a0002");
        assert_eq!(list.filtered_rows().len(), 1);

        list.set_search("Mar 2025");
        assert_eq!(list.filtered_rows().len(), 1);

        list.set_search("resolved");
        assert_eq!(list.filtered_rows().len(), 1);

        list.set_search("ada");
        assert_eq!(list.filtered_rows().len(), 2);

        list.set_search("nothing");
        assert!(list.filtered_rows().is_empty());
    }

    #[test]
    fn test_status_filter_uses_canonical_values() {
        let mut list = list_with(vec![
            complaint(1, "A0001", "pending", "2025-03-12T06:30:00Z"),
            complaint(2, "A0002", "in_progress", "2025-03-13T06:30:00Z"),
        ]);

        list.apply_filters(Some(ComplaintStatus::New), None, None)
            .unwrap();
        let rows = list.filtered_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reference_code, "A0001");
    }

    #[test]
    fn test_date_range_is_inclusive_of_end_day() {
        let mut list = list_with(vec![
            complaint(1, "A0001", "new", "2025-03-12T06:30:00Z"),
            complaint(2, "A0002", "new", "2025-03-15T23:45:00Z"),
            complaint(3, "A0003", "new", "2025-03-20T00:00:00Z"),
        ]);

        list.apply_filters(None, Some(date("2025-03-12")), Some(date("2025-03-15")))
            .unwrap();
        assert_eq!(list.filtered_rows().len(), 2);
    }

    #[test]
    fn test_inverted_range_rejected_at_apply_time() {
        let mut list = list_with(vec![]);
        let err = list
            .apply_filters(None, Some(date("2025-03-20")), Some(date("2025-03-12")))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        // The previous filters stay in effect.
        assert_eq!(list.filters(), &TriageFilters::default());
    }

    #[test]
    fn test_pagination_clamps_when_filtered_set_shrinks() {
        let complaints: Vec<Complaint> = (1..=35)
            .map(|i| {
                complaint(
                    i,
                    &format!("A{i:04}"),
                    "new",
                    "2025-03-12T06:30:00Z",
                )
            })
            .collect();
        let mut list = list_with(complaints);

        assert_eq!(list.page_count(), 4);
        list.set_page(4);
        assert_eq!(list.page_rows().len(), 5);

        // Narrowing the search shrinks the set; the page clamps back.
        list.set_search("A0003");
        assert_eq!(list.current_page(), 1);
        assert!(list.current_page() <= list.page_count());
    }

    #[test]
    fn test_set_page_clamps_into_range() {
        let complaints: Vec<Complaint> = (1..=12)
            .map(|i| complaint(i, &format!("A{i:04}"), "new", "2025-03-12T06:30:00Z"))
            .collect();
        let mut list = list_with(complaints);

        list.set_page(0);
        assert_eq!(list.current_page(), 1);
        list.set_page(99);
        assert_eq!(list.current_page(), 2);
    }

    #[test]
    fn test_page_window_centers_on_current_page() {
        let complaints: Vec<Complaint> = (1..=95)
            .map(|i| complaint(i, &format!("A{i:04}"), "new", "2025-03-12T06:30:00Z"))
            .collect();
        let mut list = list_with(complaints);
        assert_eq!(list.page_count(), 10);

        list.set_page(1);
        assert_eq!(list.page_window(), vec![1, 2, 3, 4, 5]);

        list.set_page(6);
        assert_eq!(list.page_window(), vec![4, 5, 6, 7, 8]);

        list.set_page(10);
        assert_eq!(list.page_window(), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_page_window_with_few_pages() {
        let complaints: Vec<Complaint> = (1..=25)
            .map(|i| complaint(i, &format!("A{i:04}"), "new", "2025-03-12T06:30:00Z"))
            .collect();
        let list = list_with(complaints);
        assert_eq!(list.page_window(), vec![1, 2, 3]);
    }

    #[test]
    fn test_transitions_any_to_any() {
        for from in ComplaintStatus::ALL {
            for to in ComplaintStatus::ALL {
                assert!(transition_allowed(from, to));
            }
        }
    }

    #[test]
    fn test_available_statuses_exclude_current() {
        let mut detail = TriageDetail::new(admin());
        detail.complaint = Some(complaint(1, "A0012", "new", "2025-03-12T06:30:00Z"));
        let targets = detail.available_statuses();
        assert_eq!(
            targets,
            vec![
                ComplaintStatus::InProgress,
                ComplaintStatus::Resolved,
                ComplaintStatus::Rejected
            ]
        );
    }
}
