use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use brokerly_application::{
    ApprovalStore, ApprovalTransaction, Page, PageRequest, PendingStepRecord,
};
use brokerly_core::{AppError, AppResult, Role};
use brokerly_domain::{
    ApprovalRun, ApprovalRunStatus, ApprovalStep, ApprovalStepStatus, AuditAction, AuditEntry,
    AuditEntryId, NewAuditEntry, Property, PropertyId, PropertyStatus,
};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
struct InMemoryState {
    properties: HashMap<PropertyId, Property>,
    runs: Vec<ApprovalRun>,
    audit_entries: Vec<AuditEntry>,
}

impl InMemoryState {
    fn latest_run(&self, property_id: PropertyId) -> Option<ApprovalRun> {
        self.runs
            .iter()
            .filter(|run| run.property_id == property_id)
            .max_by_key(|run| run.started_at)
            .cloned()
    }
}

/// In-memory approval store.
///
/// Units of work are serialized by a single mutex and stage their writes
/// on a copy of the state that replaces it on commit.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApprovalStore {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryApprovalStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);

    Page {
        items: items.into_iter().skip(offset).take(limit).collect(),
        total,
    }
}

#[async_trait]
impl ApprovalStore for InMemoryApprovalStore {
    async fn begin(&self) -> AppResult<Box<dyn ApprovalTransaction>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();

        Ok(Box::new(InMemoryApprovalTransaction { guard, staged }))
    }

    async fn find_property(&self, property_id: PropertyId) -> AppResult<Option<Property>> {
        Ok(self.state.lock().await.properties.get(&property_id).cloned())
    }

    async fn find_latest_run(&self, property_id: PropertyId) -> AppResult<Option<ApprovalRun>> {
        Ok(self.state.lock().await.latest_run(property_id))
    }

    async fn list_pending_properties(&self, page: PageRequest) -> AppResult<Page<Property>> {
        let state = self.state.lock().await;
        let mut values: Vec<Property> = state
            .properties
            .values()
            .filter(|property| property.status == PropertyStatus::Pending)
            .cloned()
            .collect();
        values.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.as_uuid().cmp(&right.id.as_uuid()))
        });

        Ok(paginate(values, page))
    }

    async fn list_current_steps(
        &self,
        required_role: Option<Role>,
        page: PageRequest,
    ) -> AppResult<Page<PendingStepRecord>> {
        let state = self.state.lock().await;
        let mut values: Vec<PendingStepRecord> = state
            .runs
            .iter()
            .filter_map(|run| {
                let step = run.current_step()?;
                if required_role.is_some_and(|role| step.required_role != role) {
                    return None;
                }

                state
                    .properties
                    .get(&run.property_id)
                    .map(|property| PendingStepRecord {
                        run_id: run.id,
                        property: property.clone(),
                        step: step.clone(),
                    })
            })
            .collect();
        values.sort_by(|left, right| left.step.created_at.cmp(&right.step.created_at));

        Ok(paginate(values, page))
    }

    async fn list_audit_entries(
        &self,
        entity: &str,
        entity_id: &str,
        actions: &[AuditAction],
    ) -> AppResult<Vec<AuditEntry>> {
        let state = self.state.lock().await;
        let mut values: Vec<AuditEntry> = state
            .audit_entries
            .iter()
            .filter(|entry| {
                entry.entity == entity
                    && entry.entity_id == entity_id
                    && actions.contains(&entry.action)
            })
            .cloned()
            .collect();
        values.reverse();
        values.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(values)
    }
}

struct InMemoryApprovalTransaction {
    guard: OwnedMutexGuard<InMemoryState>,
    staged: InMemoryState,
}

#[async_trait]
impl ApprovalTransaction for InMemoryApprovalTransaction {
    async fn lock_property(&mut self, property_id: PropertyId) -> AppResult<Option<Property>> {
        Ok(self.staged.properties.get(&property_id).cloned())
    }

    async fn insert_property(&mut self, property: &Property) -> AppResult<()> {
        if self.staged.properties.contains_key(&property.id) {
            return Err(AppError::Conflict(format!(
                "property '{}' already exists",
                property.id
            )));
        }

        self.staged
            .properties
            .insert(property.id, property.clone());
        Ok(())
    }

    async fn update_property_status(
        &mut self,
        property_id: PropertyId,
        expected: PropertyStatus,
        status: PropertyStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Property> {
        let property = self
            .staged
            .properties
            .get_mut(&property_id)
            .ok_or_else(|| AppError::NotFound(format!("property '{property_id}' does not exist")))?;

        if property.status != expected {
            return Err(AppError::Conflict(format!(
                "property '{property_id}' is {} instead of {expected}",
                property.status
            )));
        }

        property.status = status;
        property.updated_at = now;
        Ok(property.clone())
    }

    async fn latest_run(&mut self, property_id: PropertyId) -> AppResult<Option<ApprovalRun>> {
        Ok(self.staged.latest_run(property_id))
    }

    async fn insert_run(&mut self, run: &ApprovalRun) -> AppResult<()> {
        let in_progress = self.staged.runs.iter().any(|existing| {
            existing.property_id == run.property_id
                && existing.status == ApprovalRunStatus::InProgress
        });
        if in_progress {
            return Err(AppError::Conflict(format!(
                "property '{}' already has an approval in progress",
                run.property_id
            )));
        }

        self.staged.runs.push(run.clone());
        Ok(())
    }

    async fn save_decision(&mut self, run: &ApprovalRun, step: &ApprovalStep) -> AppResult<()> {
        let stored = self
            .staged
            .runs
            .iter_mut()
            .find(|existing| existing.id == run.id)
            .ok_or_else(|| AppError::NotFound(format!("approval run '{}' does not exist", run.id)))?;

        let stored_step = stored
            .steps
            .iter_mut()
            .find(|existing| existing.step_order == step.step_order)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "step {} of approval run '{}' does not exist",
                    step.step_order, run.id
                ))
            })?;
        if stored_step.status != ApprovalStepStatus::Pending {
            return Err(AppError::Conflict(format!(
                "step {} of approval run '{}' is no longer pending",
                step.step_order, run.id
            )));
        }

        *stored_step = step.clone();
        stored.status = run.status;
        stored.completed_at = run.completed_at;
        Ok(())
    }

    async fn append_audit(&mut self, entry: NewAuditEntry) -> AppResult<AuditEntry> {
        let entry = entry.into_entry(AuditEntryId::new(), Utc::now());
        self.staged.audit_entries.push(entry.clone());
        Ok(entry)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let Self { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
