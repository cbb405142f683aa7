use super::*;

impl ApprovalService {
    /// Records a decision on the current step of the property's run.
    ///
    /// Rejection terminates the run and the listing. Approving the last step
    /// publishes the listing.
    pub async fn decide(
        &self,
        actor: &Actor,
        property_id: PropertyId,
        decision: ApprovalDecision,
        comments: Option<String>,
    ) -> ApprovalResult<DecideApprovalOutput> {
        self.decide_in_transaction(actor, property_id, decision, comments)
            .await
            .inspect_err(|failure| log_failure("decide_approval", actor, property_id, failure))
    }

    async fn decide_in_transaction(
        &self,
        actor: &Actor,
        property_id: PropertyId,
        decision: ApprovalDecision,
        comments: Option<String>,
    ) -> ApprovalResult<DecideApprovalOutput> {
        let mut transaction = self.store.begin().await?;
        let property = transaction
            .lock_property(property_id)
            .await?
            .ok_or_else(|| ApprovalError::PropertyNotFound(property_id.to_string()))?;
        let mut run = transaction
            .latest_run(property_id)
            .await?
            .ok_or_else(|| ApprovalError::ApprovalNotFound(property_id.to_string()))?;
        // Terminal runs answer with RunNotActive; an open run needs a pending listing.
        if run.status == ApprovalRunStatus::InProgress {
            ensure_pending(&property)?;
        }

        let now = Utc::now();
        let outcome = run.decide(actor, decision, comments, now)?;
        transaction.save_decision(&run, outcome.step()).await?;

        let step = outcome.step();
        let step_metadata = json!({
            "approval_id": run.id.to_string(),
            "step": step.step_name,
            "step_order": step.step_order,
            "required_role": step.required_role.as_str(),
            "comments": step.comments,
        });

        let (message, property_status) = match &outcome {
            DecisionOutcome::StepApproved { step, next } => {
                let mut metadata = step_metadata;
                metadata["next_step"] = json!(next.step_name);
                metadata["next_role"] = json!(next.required_role.as_str());
                transaction
                    .append_audit(
                        NewAuditEntry::property(actor, property_id, AuditAction::ApprovalStepApproved)
                            .with_metadata(metadata),
                    )
                    .await?;

                (
                    format!(
                        "Step '{}' approved; next step '{}' requires {} role",
                        step.step_name, next.step_name, next.required_role
                    ),
                    property.status,
                )
            }
            DecisionOutcome::RunApproved { .. } => {
                let updated = transition_property(
                    transaction.as_mut(),
                    property_id,
                    PropertyStatus::Active,
                    now,
                )
                .await?;
                let mut metadata = step_metadata;
                metadata["status"] = json!(PropertyStatus::Active.as_str());
                transaction
                    .append_audit(
                        NewAuditEntry::property(actor, property_id, AuditAction::PropertyApproved)
                            .with_before(property.snapshot())
                            .with_after(updated.snapshot())
                            .with_metadata(metadata),
                    )
                    .await?;

                (
                    "Property approved and published".to_owned(),
                    updated.status,
                )
            }
            DecisionOutcome::RunRejected { step } => {
                let updated = transition_property(
                    transaction.as_mut(),
                    property_id,
                    PropertyStatus::Rejected,
                    now,
                )
                .await?;
                transaction
                    .append_audit(
                        NewAuditEntry::property(actor, property_id, AuditAction::ApprovalRejected)
                            .with_before(property.snapshot())
                            .with_after(updated.snapshot())
                            .with_metadata(step_metadata),
                    )
                    .await?;

                (
                    format!("Approval rejected at step '{}'", step.step_name),
                    updated.status,
                )
            }
        };

        transaction.commit().await?;

        info!(
            property_id = %property_id,
            approval_id = %run.id,
            actor = actor.id(),
            action = decision.as_str(),
            run_status = run.status.as_str(),
            "approval decision recorded"
        );

        Ok(DecideApprovalOutput {
            message,
            run_status: run.status,
            property_status,
            run,
        })
    }
}
