use async_trait::async_trait;
use brokerly_core::{AppResult, Role};
use brokerly_domain::{
    ApprovalRun, ApprovalStep, AuditAction, AuditEntry, NewAuditEntry, Property, PropertyId,
    PropertyStatus,
};
use chrono::{DateTime, Utc};

use super::queries::{Page, PageRequest, PendingStepRecord};

/// Storage port for properties, approval runs and the audit log.
///
/// Mutations only happen through [`ApprovalTransaction`]; the read methods
/// here back the query service.
#[async_trait]
pub trait ApprovalStore: Send + Sync {
    /// Opens one unit of work. Dropping it without commit rolls it back.
    async fn begin(&self) -> AppResult<Box<dyn ApprovalTransaction>>;

    /// Returns one property by id.
    async fn find_property(&self, property_id: PropertyId) -> AppResult<Option<Property>>;

    /// Returns the most recently started run for a property.
    async fn find_latest_run(&self, property_id: PropertyId) -> AppResult<Option<ApprovalRun>>;

    /// Lists pending properties, oldest first.
    async fn list_pending_properties(&self, page: PageRequest) -> AppResult<Page<Property>>;

    /// Lists current steps of in-progress runs, optionally for one role, oldest first.
    async fn list_current_steps(
        &self,
        required_role: Option<Role>,
        page: PageRequest,
    ) -> AppResult<Page<PendingStepRecord>>;

    /// Lists audit entries for one entity, newest first.
    async fn list_audit_entries(
        &self,
        entity: &str,
        entity_id: &str,
        actions: &[AuditAction],
    ) -> AppResult<Vec<AuditEntry>>;
}

/// Atomic unit of work over properties, runs, steps and audit entries.
#[async_trait]
pub trait ApprovalTransaction: Send {
    /// Reads one property and holds it until commit or rollback.
    async fn lock_property(&mut self, property_id: PropertyId) -> AppResult<Option<Property>>;

    /// Inserts a new property.
    async fn insert_property(&mut self, property: &Property) -> AppResult<()>;

    /// Moves a property from `expected` to `status`.
    ///
    /// Fails with `AppError::Conflict` when the stored status is not `expected`.
    async fn update_property_status(
        &mut self,
        property_id: PropertyId,
        expected: PropertyStatus,
        status: PropertyStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Property>;

    /// Returns the most recently started run for a property.
    async fn latest_run(&mut self, property_id: PropertyId) -> AppResult<Option<ApprovalRun>>;

    /// Inserts a run with its steps.
    ///
    /// Fails with `AppError::Conflict` when another run is already in progress.
    async fn insert_run(&mut self, run: &ApprovalRun) -> AppResult<()>;

    /// Persists one step decision together with the run status it produced.
    async fn save_decision(&mut self, run: &ApprovalRun, step: &ApprovalStep) -> AppResult<()>;

    /// Appends one audit entry.
    async fn append_audit(&mut self, entry: NewAuditEntry) -> AppResult<AuditEntry>;

    /// Makes every write of this unit of work visible.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
