use std::sync::Arc;

use brokerly_core::{Actor, AppError};
use brokerly_domain::{
    ApprovalError, ApprovalResult, AuditAction, NewAuditEntry, NewPropertyInput, Property,
    PropertyId, ensure_can_register,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::approval_ports::ApprovalStore;

/// Registers and reads property listings.
#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn ApprovalStore>,
}

impl PropertyService {
    /// Creates a property service.
    #[must_use]
    pub fn new(store: Arc<dyn ApprovalStore>) -> Self {
        Self { store }
    }

    /// Registers a pending listing and audits its creation.
    pub async fn register_property(
        &self,
        actor: &Actor,
        input: NewPropertyInput,
    ) -> ApprovalResult<Property> {
        ensure_can_register(actor.role()).inspect_err(|failure| {
            warn!(actor = actor.id(), role = %actor.role(), reason = %failure, "property registration refused");
        })?;
        let property = Property::register(input, actor.id(), Utc::now())?;

        let mut transaction = self.store.begin().await?;
        transaction
            .insert_property(&property)
            .await
            .map_err(|error| match error {
                AppError::Conflict(message) => ApprovalError::ValidationFailed(message),
                other => other.into(),
            })?;
        transaction
            .append_audit(
                NewAuditEntry::property(actor, property.id, AuditAction::Create)
                    .with_after(property.snapshot()),
            )
            .await?;
        transaction.commit().await?;

        info!(
            property_id = %property.id,
            actor = actor.id(),
            listing_type = property.listing_type.as_str(),
            "property registered"
        );

        Ok(property)
    }

    /// Returns one property.
    pub async fn get_property(&self, property_id: PropertyId) -> ApprovalResult<Property> {
        self.store
            .find_property(property_id)
            .await?
            .ok_or_else(|| ApprovalError::PropertyNotFound(property_id.to_string()))
    }
}
