use async_trait::async_trait;
use brokerly_application::{
    ApprovalStore, ApprovalTransaction, Page, PageRequest, PendingStepRecord,
};
use brokerly_core::{AppError, AppResult, Role};
use brokerly_domain::{ApprovalRun, AuditAction, AuditEntry, Property, PropertyId};
use sqlx::PgPool;

mod rows;
mod transaction;

use rows::{AuditRow, PendingStepRow, PropertyRow, fetch_latest_run, fetch_property};
use transaction::PostgresApprovalTransaction;

/// PostgreSQL-backed store for properties, approval runs and the audit log.
///
/// Each unit of work is one database transaction that takes a row lock on
/// the property it touches.
#[derive(Clone)]
pub struct PostgresApprovalStore {
    pool: PgPool,
}

impl PostgresApprovalStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> AppResult<sqlx::pool::PoolConnection<sqlx::Postgres>> {
        self.pool.acquire().await.map_err(|error| {
            AppError::Internal(format!("failed to acquire database connection: {error}"))
        })
    }
}

fn page_bounds(page: PageRequest) -> (i64, i64) {
    (
        i64::from(page.limit),
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    )
}

#[async_trait]
impl ApprovalStore for PostgresApprovalStore {
    async fn begin(&self) -> AppResult<Box<dyn ApprovalTransaction>> {
        let transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin approval transaction: {error}"))
        })?;

        Ok(Box::new(PostgresApprovalTransaction::new(transaction)))
    }

    async fn find_property(&self, property_id: PropertyId) -> AppResult<Option<Property>> {
        let mut connection = self.acquire().await?;
        fetch_property(&mut connection, property_id, false).await
    }

    async fn find_latest_run(&self, property_id: PropertyId) -> AppResult<Option<ApprovalRun>> {
        let mut connection = self.acquire().await?;
        fetch_latest_run(&mut connection, property_id).await
    }

    async fn list_pending_properties(&self, page: PageRequest) -> AppResult<Page<Property>> {
        let (limit, offset) = page_bounds(page);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM properties
            WHERE status = 'pending'
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count pending properties: {error}"))
        })?;

        let items = sqlx::query_as::<_, PropertyRow>(
            r#"
            SELECT
                id, title, status, listing_type, buy_price, owner_first_name, owner_last_name,
                owner_contact, brokerage_commission_percent, created_by, created_at, updated_at
            FROM properties
            WHERE status = 'pending'
            ORDER BY created_at ASC, id ASC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list pending properties: {error}"))
        })?
        .into_iter()
        .map(PropertyRow::into_property)
        .collect::<AppResult<Vec<_>>>()?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn list_current_steps(
        &self,
        required_role: Option<Role>,
        page: PageRequest,
    ) -> AppResult<Page<PendingStepRecord>> {
        let (limit, offset) = page_bounds(page);
        let role = required_role.map(|role| role.as_str());

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM approval_runs runs
            JOIN LATERAL (
                SELECT steps.required_role
                FROM approval_steps steps
                WHERE steps.run_id = runs.id AND steps.status = 'pending'
                ORDER BY steps.step_order
                LIMIT 1
            ) current_step ON TRUE
            WHERE runs.status = 'in_progress'
                AND ($1::TEXT IS NULL OR current_step.required_role = $1)
            "#,
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to count pending approval steps: {error}"))
        })?;

        let items = sqlx::query_as::<_, PendingStepRow>(
            r#"
            SELECT
                runs.id AS run_id,
                current_step.step_order,
                current_step.required_role,
                current_step.step_name,
                current_step.status AS step_status,
                current_step.approved_by,
                current_step.approved_at,
                current_step.comments,
                current_step.created_at AS step_created_at,
                properties.id,
                properties.title,
                properties.status,
                properties.listing_type,
                properties.buy_price,
                properties.owner_first_name,
                properties.owner_last_name,
                properties.owner_contact,
                properties.brokerage_commission_percent,
                properties.created_by,
                properties.created_at,
                properties.updated_at
            FROM approval_runs runs
            JOIN LATERAL (
                SELECT *
                FROM approval_steps steps
                WHERE steps.run_id = runs.id AND steps.status = 'pending'
                ORDER BY steps.step_order
                LIMIT 1
            ) current_step ON TRUE
            JOIN properties ON properties.id = runs.property_id
            WHERE runs.status = 'in_progress'
                AND ($1::TEXT IS NULL OR current_step.required_role = $1)
            ORDER BY current_step.created_at ASC, runs.seq ASC
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(role)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list pending approval steps: {error}"))
        })?
        .into_iter()
        .map(PendingStepRow::into_record)
        .collect::<AppResult<Vec<_>>>()?;

        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn list_audit_entries(
        &self,
        entity: &str,
        entity_id: &str,
        actions: &[AuditAction],
    ) -> AppResult<Vec<AuditEntry>> {
        let actions = actions
            .iter()
            .map(|action| action.as_str().to_owned())
            .collect::<Vec<_>>();

        sqlx::query_as::<_, AuditRow>(
            r#"
            SELECT
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
            FROM audit_log_entries
            WHERE entity = $1
                AND entity_id = $2
                AND action = ANY($3)
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(entity)
        .bind(entity_id)
        .bind(actions)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list audit entries for {entity} '{entity_id}': {error}"
            ))
        })?
        .into_iter()
        .map(AuditRow::into_entry)
        .collect()
    }
}
