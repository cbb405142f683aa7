use std::str::FromStr;

use brokerly_application::PendingStepRecord;
use brokerly_core::{AppError, AppResult, Role};
use brokerly_domain::{
    ApprovalRun, ApprovalRunId, ApprovalRunStatus, ApprovalStep, ApprovalStepStatus, AuditAction,
    AuditEntry, AuditEntryId, Property, PropertyId, PropertyStatus,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{FromRow, PgConnection};
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub(super) struct PropertyRow {
    id: Uuid,
    title: String,
    status: String,
    listing_type: String,
    buy_price: Option<Decimal>,
    owner_first_name: Option<String>,
    owner_last_name: Option<String>,
    owner_contact: Option<String>,
    brokerage_commission_percent: Option<Decimal>,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PropertyRow {
    pub(super) fn into_property(self) -> AppResult<Property> {
        Ok(Property {
            id: PropertyId::from_uuid(self.id),
            title: self.title,
            status: PropertyStatus::parse(self.status.as_str())?,
            listing_type: self.listing_type,
            buy_price: self.buy_price,
            owner_first_name: self.owner_first_name,
            owner_last_name: self.owner_last_name,
            owner_contact: self.owner_contact,
            brokerage_commission_percent: self.brokerage_commission_percent,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct RunRow {
    id: Uuid,
    property_id: Uuid,
    status: String,
    started_by: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct StepRow {
    step_order: i32,
    required_role: String,
    step_name: String,
    status: String,
    approved_by: Option<String>,
    approved_at: Option<DateTime<Utc>>,
    comments: Option<String>,
    created_at: DateTime<Utc>,
}

impl StepRow {
    fn into_step(self) -> AppResult<ApprovalStep> {
        Ok(ApprovalStep {
            step_order: self.step_order,
            required_role: Role::parse(self.required_role.as_str())?,
            step_name: self.step_name,
            status: ApprovalStepStatus::parse(self.status.as_str())?,
            approved_by: self.approved_by,
            approved_at: self.approved_at,
            comments: self.comments,
            created_at: self.created_at,
        })
    }
}

/// Current step of an in-progress run joined with its property.
#[derive(Debug, FromRow)]
pub(super) struct PendingStepRow {
    run_id: Uuid,
    step_order: i32,
    required_role: String,
    step_name: String,
    step_status: String,
    approved_by: Option<String>,
    approved_at: Option<DateTime<Utc>>,
    comments: Option<String>,
    step_created_at: DateTime<Utc>,
    id: Uuid,
    title: String,
    status: String,
    listing_type: String,
    buy_price: Option<Decimal>,
    owner_first_name: Option<String>,
    owner_last_name: Option<String>,
    owner_contact: Option<String>,
    brokerage_commission_percent: Option<Decimal>,
    created_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PendingStepRow {
    pub(super) fn into_record(self) -> AppResult<PendingStepRecord> {
        let step = StepRow {
            step_order: self.step_order,
            required_role: self.required_role,
            step_name: self.step_name,
            status: self.step_status,
            approved_by: self.approved_by,
            approved_at: self.approved_at,
            comments: self.comments,
            created_at: self.step_created_at,
        }
        .into_step()?;
        let property = PropertyRow {
            id: self.id,
            title: self.title,
            status: self.status,
            listing_type: self.listing_type,
            buy_price: self.buy_price,
            owner_first_name: self.owner_first_name,
            owner_last_name: self.owner_last_name,
            owner_contact: self.owner_contact,
            brokerage_commission_percent: self.brokerage_commission_percent,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_property()?;

        Ok(PendingStepRecord {
            run_id: ApprovalRunId::from_uuid(self.run_id),
            property,
            step,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct AuditRow {
    id: Uuid,
    actor_id: String,
    actor_role: String,
    entity: String,
    entity_id: String,
    action: String,
    before_state: Option<Value>,
    after_state: Option<Value>,
    metadata: Option<Value>,
    created_at: DateTime<Utc>,
}

impl AuditRow {
    pub(super) fn into_entry(self) -> AppResult<AuditEntry> {
        Ok(AuditEntry {
            id: AuditEntryId::from_uuid(self.id),
            actor_id: self.actor_id,
            actor_role: Role::parse(self.actor_role.as_str())?,
            entity: self.entity,
            entity_id: self.entity_id,
            action: AuditAction::from_str(self.action.as_str())?,
            before: self.before_state,
            after: self.after_state,
            metadata: self.metadata,
            created_at: self.created_at,
        })
    }
}

pub(super) async fn fetch_latest_run(
    connection: &mut PgConnection,
    property_id: PropertyId,
) -> AppResult<Option<ApprovalRun>> {
    let run = sqlx::query_as::<_, RunRow>(
        r#"
        SELECT id, property_id, status, started_by, started_at, completed_at
        FROM approval_runs
        WHERE property_id = $1
        ORDER BY started_at DESC, seq DESC
        LIMIT 1
        "#,
    )
    .bind(property_id.as_uuid())
    .fetch_optional(&mut *connection)
    .await
    .map_err(|error| {
        AppError::Internal(format!(
            "failed to load latest approval run for property '{property_id}': {error}"
        ))
    })?;

    let Some(run) = run else {
        return Ok(None);
    };

    let steps = sqlx::query_as::<_, StepRow>(
        r#"
        SELECT
            step_order,
            required_role,
            step_name,
            status,
            approved_by,
            approved_at,
            comments,
            created_at
        FROM approval_steps
        WHERE run_id = $1
        ORDER BY step_order
        "#,
    )
    .bind(run.id)
    .fetch_all(&mut *connection)
    .await
    .map_err(|error| {
        AppError::Internal(format!(
            "failed to load steps for approval run '{}': {error}",
            run.id
        ))
    })?
    .into_iter()
    .map(StepRow::into_step)
    .collect::<AppResult<Vec<_>>>()?;

    Ok(Some(ApprovalRun {
        id: ApprovalRunId::from_uuid(run.id),
        property_id: PropertyId::from_uuid(run.property_id),
        status: ApprovalRunStatus::parse(run.status.as_str())?,
        started_by: run.started_by,
        started_at: run.started_at,
        completed_at: run.completed_at,
        steps,
    }))
}

pub(super) async fn fetch_property(
    connection: &mut PgConnection,
    property_id: PropertyId,
    for_update: bool,
) -> AppResult<Option<Property>> {
    let query = if for_update {
        r#"
        SELECT
            id, title, status, listing_type, buy_price, owner_first_name, owner_last_name,
            owner_contact, brokerage_commission_percent, created_by, created_at, updated_at
        FROM properties
        WHERE id = $1
        FOR UPDATE
        "#
    } else {
        r#"
        SELECT
            id, title, status, listing_type, buy_price, owner_first_name, owner_last_name,
            owner_contact, brokerage_commission_percent, created_by, created_at, updated_at
        FROM properties
        WHERE id = $1
        "#
    };

    sqlx::query_as::<_, PropertyRow>(query)
        .bind(property_id.as_uuid())
        .fetch_optional(connection)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load property '{property_id}': {error}"))
        })?
        .map(PropertyRow::into_property)
        .transpose()
}

pub(super) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error) if database_error.code().as_deref() == Some("23505")
    )
}
