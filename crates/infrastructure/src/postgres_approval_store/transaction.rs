use async_trait::async_trait;
use brokerly_application::ApprovalTransaction;
use brokerly_core::{AppError, AppResult};
use brokerly_domain::{
    ApprovalRun, ApprovalStep, AuditEntry, AuditEntryId, NewAuditEntry, Property, PropertyId,
    PropertyStatus,
};
use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use tracing::warn;

use super::rows::{PropertyRow, fetch_latest_run, fetch_property, is_unique_violation};

/// One approval unit of work. Dropping it without commit rolls back.
pub(super) struct PostgresApprovalTransaction {
    transaction: Transaction<'static, Postgres>,
}

impl PostgresApprovalTransaction {
    pub(super) fn new(transaction: Transaction<'static, Postgres>) -> Self {
        Self { transaction }
    }
}

#[async_trait]
impl ApprovalTransaction for PostgresApprovalTransaction {
    async fn lock_property(&mut self, property_id: PropertyId) -> AppResult<Option<Property>> {
        fetch_property(&mut self.transaction, property_id, true).await
    }

    async fn insert_property(&mut self, property: &Property) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO properties (
                id,
                title,
                status,
                listing_type,
                buy_price,
                owner_first_name,
                owner_last_name,
                owner_contact,
                brokerage_commission_percent,
                created_by,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(property.id.as_uuid())
        .bind(property.title.as_str())
        .bind(property.status.as_str())
        .bind(property.listing_type.as_str())
        .bind(property.buy_price)
        .bind(property.owner_first_name.as_deref())
        .bind(property.owner_last_name.as_deref())
        .bind(property.owner_contact.as_deref())
        .bind(property.brokerage_commission_percent)
        .bind(property.created_by.as_str())
        .bind(property.created_at)
        .bind(property.updated_at)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                return AppError::Conflict(format!("property '{}' already exists", property.id));
            }

            AppError::Internal(format!(
                "failed to insert property '{}': {error}",
                property.id
            ))
        })?;

        Ok(())
    }

    async fn update_property_status(
        &mut self,
        property_id: PropertyId,
        expected: PropertyStatus,
        status: PropertyStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Property> {
        let updated = sqlx::query_as::<_, PropertyRow>(
            r#"
            UPDATE properties
            SET status = $3, updated_at = $4
            WHERE id = $1 AND status = $2
            RETURNING
                id, title, status, listing_type, buy_price, owner_first_name, owner_last_name,
                owner_contact, brokerage_commission_percent, created_by, created_at, updated_at
            "#,
        )
        .bind(property_id.as_uuid())
        .bind(expected.as_str())
        .bind(status.as_str())
        .bind(now)
        .fetch_optional(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update status of property '{property_id}': {error}"
            ))
        })?;

        if let Some(row) = updated {
            return row.into_property();
        }

        match fetch_property(&mut self.transaction, property_id, false).await? {
            Some(current) => Err(AppError::Conflict(format!(
                "property '{property_id}' is {} instead of {expected}",
                current.status
            ))),
            None => Err(AppError::NotFound(format!(
                "property '{property_id}' does not exist"
            ))),
        }
    }

    async fn latest_run(&mut self, property_id: PropertyId) -> AppResult<Option<ApprovalRun>> {
        fetch_latest_run(&mut self.transaction, property_id).await
    }

    async fn insert_run(&mut self, run: &ApprovalRun) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO approval_runs (id, property_id, status, started_by, started_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(run.id.as_uuid())
        .bind(run.property_id.as_uuid())
        .bind(run.status.as_str())
        .bind(run.started_by.as_str())
        .bind(run.started_at)
        .bind(run.completed_at)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            if is_unique_violation(&error) {
                warn!(
                    property_id = %run.property_id,
                    approval_id = %run.id,
                    "approval run insert lost to a concurrent start"
                );
                return AppError::Conflict(format!(
                    "property '{}' already has an approval in progress",
                    run.property_id
                ));
            }

            AppError::Internal(format!(
                "failed to insert approval run '{}': {error}",
                run.id
            ))
        })?;

        for step in &run.steps {
            sqlx::query(
                r#"
                INSERT INTO approval_steps (
                    run_id,
                    step_order,
                    required_role,
                    step_name,
                    status,
                    approved_by,
                    approved_at,
                    comments,
                    created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(run.id.as_uuid())
            .bind(step.step_order)
            .bind(step.required_role.as_str())
            .bind(step.step_name.as_str())
            .bind(step.status.as_str())
            .bind(step.approved_by.as_deref())
            .bind(step.approved_at)
            .bind(step.comments.as_deref())
            .bind(step.created_at)
            .execute(&mut *self.transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to insert step {} of approval run '{}': {error}",
                    step.step_order, run.id
                ))
            })?;
        }

        Ok(())
    }

    async fn save_decision(&mut self, run: &ApprovalRun, step: &ApprovalStep) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE approval_steps
            SET status = $3, approved_by = $4, approved_at = $5, comments = $6
            WHERE run_id = $1 AND step_order = $2 AND status = 'pending'
            "#,
        )
        .bind(run.id.as_uuid())
        .bind(step.step_order)
        .bind(step.status.as_str())
        .bind(step.approved_by.as_deref())
        .bind(step.approved_at)
        .bind(step.comments.as_deref())
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to save decision on step {} of approval run '{}': {error}",
                step.step_order, run.id
            ))
        })
        .and_then(|result| {
            if result.rows_affected() == 1 {
                Ok(())
            } else {
                Err(AppError::Conflict(format!(
                    "step {} of approval run '{}' is no longer pending",
                    step.step_order, run.id
                )))
            }
        })?;

        sqlx::query(
            r#"
            UPDATE approval_runs
            SET status = $2, completed_at = $3
            WHERE id = $1
            "#,
        )
        .bind(run.id.as_uuid())
        .bind(run.status.as_str())
        .bind(run.completed_at)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update approval run '{}': {error}",
                run.id
            ))
        })?;

        Ok(())
    }

    async fn append_audit(&mut self, entry: NewAuditEntry) -> AppResult<AuditEntry> {
        let entry = entry.into_entry(AuditEntryId::new(), Utc::now());

        sqlx::query(
            r#"
            INSERT INTO audit_log_entries (
                id,
                actor_id,
                actor_role,
                entity,
                entity_id,
                action,
                before_state,
                after_state,
                metadata,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.actor_id.as_str())
        .bind(entry.actor_role.as_str())
        .bind(entry.entity.as_str())
        .bind(entry.entity_id.as_str())
        .bind(entry.action.as_str())
        .bind(entry.before.as_ref())
        .bind(entry.after.as_ref())
        .bind(entry.metadata.as_ref())
        .bind(entry.created_at)
        .execute(&mut *self.transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to append audit entry '{}' for {} '{}': {error}",
                entry.action.as_str(),
                entry.entity,
                entry.entity_id
            ))
        })?;

        Ok(entry)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit approval transaction: {error}"))
        })
    }
}
