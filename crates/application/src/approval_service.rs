use std::sync::Arc;

use brokerly_core::{Actor, AppError};
use brokerly_domain::{
    ApprovalDecision, ApprovalError, ApprovalResult, ApprovalRun, ApprovalRunStatus, AuditAction,
    BUDGET_STEP_NAME, DecisionOutcome, NewAuditEntry, Property, PropertyId, PropertyStatus,
    REJECTION_REASON_MIN_LENGTH, build_plan, ensure_can_review_directly, ensure_can_start,
    validate_listing_type_requirements,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, info, warn};

use crate::approval_ports::{
    ApprovalStore, ApprovalTransaction, DecideApprovalOutput, DirectApprovalOptions,
    DirectApprovalOutput, DirectRejectionOutput, StartApprovalOutput,
};

mod decide;
mod direct;
mod start;

/// Approval state machine over the unit-of-work storage port.
///
/// Every operation opens one transaction, validates against the locked
/// property snapshot, writes its mutations plus audit entries and commits.
/// Any early return drops the transaction, which rolls it back.
#[derive(Clone)]
pub struct ApprovalService {
    store: Arc<dyn ApprovalStore>,
}

impl ApprovalService {
    /// Creates an approval service.
    #[must_use]
    pub fn new(store: Arc<dyn ApprovalStore>) -> Self {
        Self { store }
    }
}

fn ensure_pending(property: &Property) -> ApprovalResult<()> {
    if property.status == PropertyStatus::Pending {
        return Ok(());
    }

    Err(ApprovalError::InvalidStatus {
        current: property.status.as_str().to_owned(),
    })
}

async fn lock_pending_property(
    transaction: &mut dyn ApprovalTransaction,
    property_id: PropertyId,
) -> ApprovalResult<Property> {
    let property = transaction
        .lock_property(property_id)
        .await?
        .ok_or_else(|| ApprovalError::PropertyNotFound(property_id.to_string()))?;
    ensure_pending(&property)?;
    Ok(property)
}

async fn ensure_no_run_in_progress(
    transaction: &mut dyn ApprovalTransaction,
    property_id: PropertyId,
) -> ApprovalResult<()> {
    let latest = transaction.latest_run(property_id).await?;
    if latest.is_some_and(|run| run.status == ApprovalRunStatus::InProgress) {
        return Err(ApprovalError::ApprovalExists(property_id.to_string()));
    }

    Ok(())
}

/// Moves a locked pending property to `status`.
async fn transition_property(
    transaction: &mut dyn ApprovalTransaction,
    property_id: PropertyId,
    status: PropertyStatus,
    now: DateTime<Utc>,
) -> ApprovalResult<Property> {
    match transaction
        .update_property_status(property_id, PropertyStatus::Pending, status, now)
        .await
    {
        Ok(property) => Ok(property),
        Err(AppError::Conflict(_)) => {
            let current = transaction
                .lock_property(property_id)
                .await?
                .map_or_else(|| "missing".to_owned(), |stored| stored.status.as_str().to_owned());
            Err(ApprovalError::InvalidStatus { current })
        }
        Err(error) => Err(error.into()),
    }
}

fn log_failure(operation: &str, actor: &Actor, property_id: PropertyId, failure: &ApprovalError) {
    if failure.is_internal() {
        error!(
            operation,
            property_id = %property_id,
            actor = actor.id(),
            role = %actor.role(),
            error = %failure,
            "approval operation failed"
        );
    } else {
        warn!(
            operation,
            property_id = %property_id,
            actor = actor.id(),
            role = %actor.role(),
            code = failure.code(),
            reason = %failure,
            "approval operation refused"
        );
    }
}
