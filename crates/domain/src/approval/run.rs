use brokerly_core::{Actor, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    ApprovalDecision, ApprovalPlan, ApprovalRunId, ApprovalRunStatus, ApprovalStepStatus,
    ensure_can_decide,
};
use crate::{ApprovalError, PropertyId};

/// One ordered step of an approval run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// 1-based position in the run.
    pub step_order: i32,
    /// Role that owns the decision.
    pub required_role: Role,
    /// Short step label.
    pub step_name: String,
    /// Decision status.
    pub status: ApprovalStepStatus,
    /// Actor that recorded the decision.
    pub approved_by: Option<String>,
    /// Decision timestamp.
    pub approved_at: Option<DateTime<Utc>>,
    /// Optional decision comments.
    pub comments: Option<String>,
    /// Step creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Result of applying one decision to the current step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Step approved and another step is now current.
    StepApproved {
        /// Step that was decided.
        step: ApprovalStep,
        /// New current step.
        next: ApprovalStep,
    },
    /// Final step approved; the run is complete.
    RunApproved {
        /// Step that was decided.
        step: ApprovalStep,
    },
    /// Step rejected; the run is terminated.
    RunRejected {
        /// Step that was decided.
        step: ApprovalStep,
    },
}

impl DecisionOutcome {
    /// Returns the step the decision was recorded on.
    #[must_use]
    pub fn step(&self) -> &ApprovalStep {
        match self {
            Self::StepApproved { step, .. }
            | Self::RunApproved { step }
            | Self::RunRejected { step } => step,
        }
    }
}

/// Lifecycle of one approval attempt for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRun {
    /// Run identifier.
    pub id: ApprovalRunId,
    /// Property under review.
    pub property_id: PropertyId,
    /// Run status.
    pub status: ApprovalRunStatus,
    /// Actor that opened the run.
    pub started_by: String,
    /// Start timestamp.
    pub started_at: DateTime<Utc>,
    /// Terminal timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Steps ordered by `step_order`.
    pub steps: Vec<ApprovalStep>,
}

impl ApprovalRun {
    /// Opens an in-progress run with one pending step per planned step.
    #[must_use]
    pub fn open(
        property_id: PropertyId,
        plan: &ApprovalPlan,
        started_by: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let steps = plan
            .steps()
            .iter()
            .map(|planned| ApprovalStep {
                step_order: planned.step_order,
                required_role: planned.required_role,
                step_name: planned.step_name.to_owned(),
                status: ApprovalStepStatus::Pending,
                approved_by: None,
                approved_at: None,
                comments: None,
                created_at: now,
            })
            .collect();

        Self {
            id: ApprovalRunId::new(),
            property_id,
            status: ApprovalRunStatus::InProgress,
            started_by: started_by.to_owned(),
            started_at: now,
            completed_at: None,
            steps,
        }
    }

    /// Returns the lowest-ordered pending step while the run is in progress.
    #[must_use]
    pub fn current_step(&self) -> Option<&ApprovalStep> {
        self.current_step_index().map(|index| &self.steps[index])
    }

    fn current_step_index(&self) -> Option<usize> {
        if self.status.is_terminal() {
            return None;
        }

        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.status == ApprovalStepStatus::Pending)
            .min_by_key(|(_, step)| step.step_order)
            .map(|(index, _)| index)
    }

    /// Records a decision on the current step.
    pub fn decide(
        &mut self,
        actor: &Actor,
        decision: ApprovalDecision,
        comments: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<DecisionOutcome, ApprovalError> {
        if self.status.is_terminal() {
            return Err(ApprovalError::RunNotActive {
                run_id: self.id.to_string(),
                status: self.status.as_str().to_owned(),
            });
        }

        let index = self
            .current_step_index()
            .ok_or_else(|| ApprovalError::NoPendingSteps(self.id.to_string()))?;
        ensure_can_decide(actor.role(), self.steps[index].required_role)?;

        let step = &mut self.steps[index];
        step.status = match decision {
            ApprovalDecision::Approve => ApprovalStepStatus::Approved,
            ApprovalDecision::Reject => ApprovalStepStatus::Rejected,
        };
        step.approved_by = Some(actor.id().to_owned());
        step.approved_at = Some(now);
        step.comments = comments
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let decided = step.clone();

        if decision == ApprovalDecision::Reject {
            self.status = ApprovalRunStatus::Rejected;
            self.completed_at = Some(now);
            return Ok(DecisionOutcome::RunRejected { step: decided });
        }

        match self.current_step() {
            Some(next) => Ok(DecisionOutcome::StepApproved {
                step: decided,
                next: next.clone(),
            }),
            None => {
                self.status = ApprovalRunStatus::Approved;
                self.completed_at = Some(now);
                Ok(DecisionOutcome::RunApproved { step: decided })
            }
        }
    }
}
