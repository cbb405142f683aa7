use std::str::FromStr;

use brokerly_core::{Actor, AppError, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Stable audit actions recorded against properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    /// Record created.
    Create,
    /// Record updated.
    Update,
    /// Record deleted.
    Delete,
    /// Listing approved directly.
    Approve,
    /// Listing rejected directly.
    Reject,
    /// Lead converted.
    Convert,
    /// Booking or deal cancelled.
    Cancel,
    /// Step-wise approval run opened.
    ApprovalStarted,
    /// VP budget step left out of the plan.
    BudgetStepSkipped,
    /// Non-final approval step approved.
    ApprovalStepApproved,
    /// Approval run rejected at a step.
    ApprovalRejected,
    /// Final step approved and listing published.
    PropertyApproved,
}

impl AuditAction {
    /// Actions shown in a property's approval history.
    pub const WORKFLOW: &'static [Self] = &[
        Self::Create,
        Self::Update,
        Self::Approve,
        Self::Reject,
        Self::ApprovalStarted,
        Self::BudgetStepSkipped,
        Self::ApprovalStepApproved,
        Self::ApprovalRejected,
        Self::PropertyApproved,
    ];

    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
            Self::Convert => "CONVERT",
            Self::Cancel => "CANCEL",
            Self::ApprovalStarted => "approval_started",
            Self::BudgetStepSkipped => "budget_step_skipped",
            Self::ApprovalStepApproved => "approval_step_approved",
            Self::ApprovalRejected => "approval_rejected",
            Self::PropertyApproved => "property_approved",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "APPROVE" => Ok(Self::Approve),
            "REJECT" => Ok(Self::Reject),
            "CONVERT" => Ok(Self::Convert),
            "CANCEL" => Ok(Self::Cancel),
            "approval_started" => Ok(Self::ApprovalStarted),
            "budget_step_skipped" => Ok(Self::BudgetStepSkipped),
            "approval_step_approved" => Ok(Self::ApprovalStepApproved),
            "approval_rejected" => Ok(Self::ApprovalRejected),
            "property_approved" => Ok(Self::PropertyApproved),
            _ => Err(AppError::Validation(format!(
                "unknown audit action '{value}'"
            ))),
        }
    }
}

/// Entity label written with each audit entry.
pub const PROPERTY_ENTITY: &str = "Property";

/// Audit entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditEntryId(Uuid);

impl AuditEntryId {
    /// Creates a random audit entry identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AuditEntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuditEntryId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Audit payload built by services before it is appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    /// Acting user.
    pub actor_id: String,
    /// Acting user's role.
    pub actor_role: Role,
    /// Entity label.
    pub entity: String,
    /// Entity identifier.
    pub entity_id: String,
    /// Audit action.
    pub action: AuditAction,
    /// Snapshot before the mutation.
    pub before: Option<Value>,
    /// Snapshot after the mutation.
    pub after: Option<Value>,
    /// Free-form context such as comments or skip reasons.
    pub metadata: Option<Value>,
}

impl NewAuditEntry {
    /// Starts an entry for a property-scoped action.
    #[must_use]
    pub fn property(actor: &Actor, entity_id: impl ToString, action: AuditAction) -> Self {
        Self {
            actor_id: actor.id().to_owned(),
            actor_role: actor.role(),
            entity: PROPERTY_ENTITY.to_owned(),
            entity_id: entity_id.to_string(),
            action,
            before: None,
            after: None,
            metadata: None,
        }
    }

    /// Sets the before snapshot.
    #[must_use]
    pub fn with_before(mut self, before: Value) -> Self {
        self.before = Some(before);
        self
    }

    /// Sets the after snapshot.
    #[must_use]
    pub fn with_after(mut self, after: Value) -> Self {
        self.after = Some(after);
        self
    }

    /// Sets the metadata payload.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Materializes the stored entry.
    #[must_use]
    pub fn into_entry(self, id: AuditEntryId, created_at: DateTime<Utc>) -> AuditEntry {
        AuditEntry {
            id,
            actor_id: self.actor_id,
            actor_role: self.actor_role,
            entity: self.entity,
            entity_id: self.entity_id,
            action: self.action,
            before: self.before,
            after: self.after,
            metadata: self.metadata,
            created_at,
        }
    }
}

/// Persisted append-only audit entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    /// Entry identifier.
    pub id: AuditEntryId,
    /// Acting user.
    pub actor_id: String,
    /// Acting user's role.
    pub actor_role: Role,
    /// Entity label.
    pub entity: String,
    /// Entity identifier.
    pub entity_id: String,
    /// Audit action.
    pub action: AuditAction,
    /// Snapshot before the mutation.
    pub before: Option<Value>,
    /// Snapshot after the mutation.
    pub after: Option<Value>,
    /// Free-form context.
    pub metadata: Option<Value>,
    /// Append timestamp.
    pub created_at: DateTime<Utc>,
}
