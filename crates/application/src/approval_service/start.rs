use super::*;

impl ApprovalService {
    /// Opens a step-wise approval run for a pending property.
    ///
    /// The property stays pending. A second audit entry records the skipped
    /// budget step for listing types that do not need it.
    pub async fn start(
        &self,
        actor: &Actor,
        property_id: PropertyId,
    ) -> ApprovalResult<StartApprovalOutput> {
        self.start_in_transaction(actor, property_id)
            .await
            .inspect_err(|failure| log_failure("start_approval", actor, property_id, failure))
    }

    async fn start_in_transaction(
        &self,
        actor: &Actor,
        property_id: PropertyId,
    ) -> ApprovalResult<StartApprovalOutput> {
        let mut transaction = self.store.begin().await?;
        let property = lock_pending_property(transaction.as_mut(), property_id).await?;
        ensure_can_start(actor.role())?;
        ensure_no_run_in_progress(transaction.as_mut(), property_id).await?;

        let plan = build_plan(property.listing_type()?);
        let now = Utc::now();
        let run = ApprovalRun::open(property_id, &plan, actor.id(), now);

        transaction.insert_run(&run).await.map_err(|failure| match failure {
            AppError::Conflict(_) => ApprovalError::ApprovalExists(property_id.to_string()),
            other => other.into(),
        })?;

        transaction
            .append_audit(
                NewAuditEntry::property(actor, property_id, AuditAction::ApprovalStarted)
                    .with_metadata(json!({
                        "approval_id": run.id.to_string(),
                        "listing_type": plan.listing_type().as_str(),
                        "steps": plan
                            .steps()
                            .iter()
                            .map(|step| step.step_name)
                            .collect::<Vec<_>>(),
                    })),
            )
            .await?;

        if let Some(reason) = plan.budget_skip_reason() {
            transaction
                .append_audit(
                    NewAuditEntry::property(actor, property_id, AuditAction::BudgetStepSkipped)
                        .with_metadata(json!({
                            "approval_id": run.id.to_string(),
                            "step": BUDGET_STEP_NAME,
                            "reason": reason,
                        })),
                )
                .await?;
        }

        transaction.commit().await?;

        info!(
            property_id = %property_id,
            approval_id = %run.id,
            actor = actor.id(),
            listing_type = plan.listing_type().as_str(),
            steps = run.steps.len(),
            "approval run started"
        );

        Ok(StartApprovalOutput {
            approval_id: run.id,
            message: format!("Approval workflow started with {} steps", run.steps.len()),
            run,
        })
    }
}
