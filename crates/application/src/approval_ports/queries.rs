use brokerly_core::{AppError, AppResult};
use brokerly_domain::{ApprovalRun, ApprovalRunId, ApprovalStep, AuditEntry, Property, PropertyId};
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Default page size for review queues.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Offset pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl PageRequest {
    /// Normalizes caller input against the configured maximum page size.
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>, max_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, max_limit.max(1)),
        }
    }

    /// Returns the row offset.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// One page of rows plus the total row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Rows across all pages.
    pub total: u64,
}

/// Current step of an in-progress run joined with its property.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStepRecord {
    /// Run identifier.
    pub run_id: ApprovalRunId,
    /// Property under review.
    pub property: Property,
    /// Current step.
    pub step: ApprovalStep,
}

/// Which review queue to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingView {
    /// Current steps of step-wise runs.
    #[default]
    Steps,
    /// Pending properties awaiting direct approval.
    Properties,
}

impl PendingView {
    /// Parses transport value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "steps" => Ok(Self::Steps),
            "properties" => Ok(Self::Properties),
            _ => Err(AppError::Validation(format!(
                "view must be 'steps' or 'properties', got '{value}'"
            ))),
        }
    }
}

/// Review queue query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingApprovalQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Queue to read.
    pub view: PendingView,
}

/// One row of a review queue.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingApprovalItem {
    /// Property awaiting a decision.
    pub property: Property,
    /// Run identifier when the row comes from a step-wise run.
    pub run_id: Option<ApprovalRunId>,
    /// Current step when the row comes from a step-wise run.
    pub step: Option<ApprovalStep>,
    /// Whole days the item has been waiting.
    pub days_pending: i64,
}

/// Pagination metadata returned with a review queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Rows across all pages.
    pub total: u64,
    /// Number of pages.
    pub total_pages: u64,
}

impl Pagination {
    /// Builds pagination metadata for a page request.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total,
            total_pages: total.div_ceil(u64::from(request.limit.max(1))),
        }
    }
}

/// Review queue page.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingApprovalPage {
    /// Rows on this page.
    pub items: Vec<PendingApprovalItem>,
    /// Pagination metadata.
    pub pagination: Pagination,
}

/// Workflow-relevant audit trail of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyHistory {
    /// Property identifier.
    pub property_id: PropertyId,
    /// Audit entries, newest first.
    pub history: Vec<AuditEntry>,
}

/// Current approval state of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalStatusView {
    /// Property record.
    pub property: Property,
    /// Most recent run, if any was ever started.
    pub run: Option<ApprovalRun>,
}

impl ApprovalStatusView {
    /// Returns the current step of the latest run.
    #[must_use]
    pub fn current_step(&self) -> Option<&ApprovalStep> {
        self.run.as_ref().and_then(ApprovalRun::current_step)
    }
}

/// Whole days elapsed between `created_at` and `now`.
#[must_use]
pub fn days_pending(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_milliseconds().max(0) / MILLIS_PER_DAY
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::{PageRequest, Pagination, days_pending};

    #[test]
    fn page_request_clamps_to_bounds() {
        let request = PageRequest::new(Some(0), Some(500), 100);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 100);
        assert_eq!(request.offset(), 0);

        let third = PageRequest::new(Some(3), None, 100);
        assert_eq!(third.offset(), 40);
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let pagination = Pagination::new(PageRequest::new(Some(1), Some(20), 100), 41);
        assert_eq!(pagination.total_pages, 3);
    }

    #[test]
    fn days_pending_floors_partial_days() {
        let now = Utc::now();
        assert_eq!(days_pending(now - Duration::hours(47), now), 1);
        assert_eq!(days_pending(now - Duration::days(3), now), 3);
        assert_eq!(days_pending(now + Duration::hours(1), now), 0);
    }
}
