use super::*;

impl ApprovalService {
    /// Publishes a pending listing without step records.
    pub async fn approve_property(
        &self,
        actor: &Actor,
        property_id: PropertyId,
        options: DirectApprovalOptions,
    ) -> ApprovalResult<DirectApprovalOutput> {
        self.approve_in_transaction(actor, property_id, options)
            .await
            .inspect_err(|failure| log_failure("approve_property", actor, property_id, failure))
    }

    /// Rejects a pending listing without step records.
    pub async fn reject_property(
        &self,
        actor: &Actor,
        property_id: PropertyId,
        reason: &str,
    ) -> ApprovalResult<DirectRejectionOutput> {
        self.reject_in_transaction(actor, property_id, reason)
            .await
            .inspect_err(|failure| log_failure("reject_property", actor, property_id, failure))
    }

    async fn approve_in_transaction(
        &self,
        actor: &Actor,
        property_id: PropertyId,
        options: DirectApprovalOptions,
    ) -> ApprovalResult<DirectApprovalOutput> {
        ensure_can_review_directly(actor.role())?;

        let mut transaction = self.store.begin().await?;
        let property = lock_pending_property(transaction.as_mut(), property_id).await?;
        validate_listing_type_requirements(&property).into_result()?;
        ensure_no_run_in_progress(transaction.as_mut(), property_id).await?;

        let updated = transition_property(
            transaction.as_mut(),
            property_id,
            PropertyStatus::Active,
            Utc::now(),
        )
        .await?;
        let notes = options
            .notes
            .map(|notes| notes.trim().to_owned())
            .filter(|notes| !notes.is_empty());
        let entry = transaction
            .append_audit(
                NewAuditEntry::property(actor, property_id, AuditAction::Approve)
                    .with_before(property.snapshot())
                    .with_after(updated.snapshot())
                    .with_metadata(json!({ "notes": notes })),
            )
            .await?;

        transaction.commit().await?;

        info!(
            property_id = %property_id,
            actor = actor.id(),
            audit_log_id = %entry.id,
            "property approved directly"
        );

        Ok(DirectApprovalOutput {
            property_id,
            new_status: updated.status,
            audit_log_id: entry.id,
        })
    }

    async fn reject_in_transaction(
        &self,
        actor: &Actor,
        property_id: PropertyId,
        reason: &str,
    ) -> ApprovalResult<DirectRejectionOutput> {
        ensure_can_review_directly(actor.role())?;

        let reason = reason.trim();
        if reason.chars().count() < REJECTION_REASON_MIN_LENGTH {
            return Err(ApprovalError::InvalidReason);
        }

        let mut transaction = self.store.begin().await?;
        let property = lock_pending_property(transaction.as_mut(), property_id).await?;
        ensure_no_run_in_progress(transaction.as_mut(), property_id).await?;

        let updated = transition_property(
            transaction.as_mut(),
            property_id,
            PropertyStatus::Rejected,
            Utc::now(),
        )
        .await?;
        let entry = transaction
            .append_audit(
                NewAuditEntry::property(actor, property_id, AuditAction::Reject)
                    .with_before(property.snapshot())
                    .with_after(updated.snapshot())
                    .with_metadata(json!({ "reason": reason })),
            )
            .await?;

        transaction.commit().await?;

        info!(
            property_id = %property_id,
            actor = actor.id(),
            audit_log_id = %entry.id,
            "property rejected directly"
        );

        Ok(DirectRejectionOutput {
            property_id,
            new_status: updated.status,
            rejection_reason: reason.to_owned(),
            audit_log_id: entry.id,
        })
    }
}
