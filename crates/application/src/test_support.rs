use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use brokerly_core::{AppError, AppResult, Role};
use brokerly_domain::{
    ApprovalRun, ApprovalRunStatus, ApprovalStep, AuditAction, AuditEntry, AuditEntryId,
    NewAuditEntry, Property, PropertyId, PropertyStatus,
};
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::approval_ports::{
    ApprovalStore, ApprovalTransaction, Page, PageRequest, PendingStepRecord,
};

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeState {
    pub(crate) properties: HashMap<PropertyId, Property>,
    pub(crate) runs: Vec<ApprovalRun>,
    pub(crate) audit: Vec<AuditEntry>,
}

/// Store fake with a single-writer staging transaction and audit failure injection.
#[derive(Default)]
pub(crate) struct FakeApprovalStore {
    state: Arc<Mutex<FakeState>>,
    failing_audit_action: Option<AuditAction>,
}

impl FakeApprovalStore {
    pub(crate) fn failing_audit(action: AuditAction) -> Self {
        Self {
            state: Arc::default(),
            failing_audit_action: Some(action),
        }
    }

    pub(crate) async fn seed_property(&self, property: Property) {
        self.state
            .lock()
            .await
            .properties
            .insert(property.id, property);
    }

    pub(crate) async fn property(&self, property_id: PropertyId) -> Option<Property> {
        self.state.lock().await.properties.get(&property_id).cloned()
    }

    pub(crate) async fn runs(&self) -> Vec<ApprovalRun> {
        self.state.lock().await.runs.clone()
    }

    pub(crate) async fn audit_actions(&self) -> Vec<AuditAction> {
        self.state
            .lock()
            .await
            .audit
            .iter()
            .map(|entry| entry.action)
            .collect()
    }

    pub(crate) async fn audit_entries(&self) -> Vec<AuditEntry> {
        self.state.lock().await.audit.clone()
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(page.limit as usize)
        .collect();
    Page { items, total }
}

fn latest_run_for(state: &FakeState, property_id: PropertyId) -> Option<ApprovalRun> {
    state
        .runs
        .iter()
        .rev()
        .find(|run| run.property_id == property_id)
        .cloned()
}

#[async_trait]
impl ApprovalStore for FakeApprovalStore {
    async fn begin(&self) -> AppResult<Box<dyn ApprovalTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(FakeTransaction {
            guard,
            staged,
            failing_audit_action: self.failing_audit_action,
        }))
    }

    async fn find_property(&self, property_id: PropertyId) -> AppResult<Option<Property>> {
        Ok(self.property(property_id).await)
    }

    async fn find_latest_run(&self, property_id: PropertyId) -> AppResult<Option<ApprovalRun>> {
        Ok(latest_run_for(&*self.state.lock().await, property_id))
    }

    async fn list_pending_properties(&self, page: PageRequest) -> AppResult<Page<Property>> {
        let state = self.state.lock().await;
        let mut pending = state
            .properties
            .values()
            .filter(|property| property.status == PropertyStatus::Pending)
            .cloned()
            .collect::<Vec<_>>();
        pending.sort_by_key(|property| property.created_at);
        Ok(paginate(pending, page))
    }

    async fn list_current_steps(
        &self,
        required_role: Option<Role>,
        page: PageRequest,
    ) -> AppResult<Page<PendingStepRecord>> {
        let state = self.state.lock().await;
        let mut records = state
            .runs
            .iter()
            .filter_map(|run| {
                let step = run.current_step()?;
                if required_role.is_some_and(|role| role != step.required_role) {
                    return None;
                }
                let property = state.properties.get(&run.property_id)?;
                Some(PendingStepRecord {
                    run_id: run.id,
                    property: property.clone(),
                    step: step.clone(),
                })
            })
            .collect::<Vec<_>>();
        records.sort_by_key(|record| record.step.created_at);
        Ok(paginate(records, page))
    }

    async fn list_audit_entries(
        &self,
        entity: &str,
        entity_id: &str,
        actions: &[AuditAction],
    ) -> AppResult<Vec<AuditEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .audit
            .iter()
            .rev()
            .filter(|entry| {
                entry.entity == entity
                    && entry.entity_id == entity_id
                    && actions.contains(&entry.action)
            })
            .cloned()
            .collect())
    }
}

struct FakeTransaction {
    guard: OwnedMutexGuard<FakeState>,
    staged: FakeState,
    failing_audit_action: Option<AuditAction>,
}

#[async_trait]
impl ApprovalTransaction for FakeTransaction {
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
            .ok_or_else(|| AppError::NotFound(format!("property '{property_id}' not found")))?;
        if property.status != expected {
            return Err(AppError::Conflict(format!(
                "property '{property_id}' is {}",
                property.status
            )));
        }

        property.status = status;
        property.updated_at = now;
        Ok(property.clone())
    }

    async fn latest_run(&mut self, property_id: PropertyId) -> AppResult<Option<ApprovalRun>> {
        Ok(latest_run_for(&self.staged, property_id))
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

    async fn save_decision(&mut self, run: &ApprovalRun, _step: &ApprovalStep) -> AppResult<()> {
        let stored = self
            .staged
            .runs
            .iter_mut()
            .find(|existing| existing.id == run.id)
            .ok_or_else(|| AppError::NotFound(format!("approval run '{}' not found", run.id)))?;
        *stored = run.clone();
        Ok(())
    }

    async fn append_audit(&mut self, entry: NewAuditEntry) -> AppResult<AuditEntry> {
        if self.failing_audit_action == Some(entry.action) {
            return Err(AppError::Internal(format!(
                "audit sink unavailable for {}",
                entry.action.as_str()
            )));
        }

        let entry = entry.into_entry(AuditEntryId::new(), Utc::now());
        self.staged.audit.push(entry.clone());
        Ok(entry)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let FakeTransaction {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }
}
