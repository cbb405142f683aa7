use std::sync::Arc;

use brokerly_core::Actor;
use brokerly_domain::{
    ApprovalError, ApprovalResult, AuditAction, PROPERTY_ENTITY, PropertyId,
    ensure_can_review_directly,
};
use chrono::Utc;
use tracing::warn;

use crate::approval_ports::{
    ApprovalStatusView, ApprovalStore, PageRequest, Pagination, PendingApprovalItem,
    PendingApprovalPage, PendingApprovalQuery, PendingView, PropertyHistory, days_pending,
};

/// Largest page size served unless configured otherwise.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Read-only views over approval state and the audit trail.
#[derive(Clone)]
pub struct ApprovalQueryService {
    store: Arc<dyn ApprovalStore>,
    max_page_size: u32,
}

impl ApprovalQueryService {
    /// Creates a query service.
    #[must_use]
    pub fn new(store: Arc<dyn ApprovalStore>) -> Self {
        Self {
            store,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }

    /// Overrides the page size ceiling.
    #[must_use]
    pub fn with_max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size.max(1);
        self
    }

    /// Lists the review queue visible to the actor.
    ///
    /// The steps view only shows steps owned by the actor's role; admins see
    /// every role's steps.
    pub async fn pending_for_role(
        &self,
        actor: &Actor,
        query: PendingApprovalQuery,
    ) -> ApprovalResult<PendingApprovalPage> {
        ensure_can_review_directly(actor.role()).inspect_err(|failure| {
            warn!(actor = actor.id(), role = %actor.role(), reason = %failure, "review queue refused");
        })?;

        let request = PageRequest::new(query.page, query.limit, self.max_page_size);
        let now = Utc::now();

        let (items, total) = match query.view {
            PendingView::Steps => {
                let role = (!actor.is_admin()).then_some(actor.role());
                let page = self.store.list_current_steps(role, request).await?;
                let items = page
                    .items
                    .into_iter()
                    .map(|record| PendingApprovalItem {
                        days_pending: days_pending(record.step.created_at, now),
                        property: record.property,
                        run_id: Some(record.run_id),
                        step: Some(record.step),
                    })
                    .collect();
                (items, page.total)
            }
            PendingView::Properties => {
                let page = self.store.list_pending_properties(request).await?;
                let items = page
                    .items
                    .into_iter()
                    .map(|property| PendingApprovalItem {
                        days_pending: days_pending(property.created_at, now),
                        property,
                        run_id: None,
                        step: None,
                    })
                    .collect();
                (items, page.total)
            }
        };

        Ok(PendingApprovalPage {
            items,
            pagination: Pagination::new(request, total),
        })
    }

    /// Returns workflow audit entries for a property, newest first.
    pub async fn history(&self, property_id: PropertyId) -> ApprovalResult<PropertyHistory> {
        if self.store.find_property(property_id).await?.is_none() {
            return Err(ApprovalError::PropertyNotFound(property_id.to_string()));
        }

        let mut history = self
            .store
            .list_audit_entries(
                PROPERTY_ENTITY,
                property_id.to_string().as_str(),
                AuditAction::WORKFLOW,
            )
            .await?;
        history.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(PropertyHistory {
            property_id,
            history,
        })
    }

    /// Returns the property with its latest run and derived current step.
    pub async fn status(&self, property_id: PropertyId) -> ApprovalResult<ApprovalStatusView> {
        let property = self
            .store
            .find_property(property_id)
            .await?
            .ok_or_else(|| ApprovalError::PropertyNotFound(property_id.to_string()))?;
        let run = self.store.find_latest_run(property_id).await?;

        Ok(ApprovalStatusView { property, run })
    }
}

#[cfg(test)]
mod tests;
