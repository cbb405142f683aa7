use std::fmt::{Display, Formatter};

use brokerly_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod permissions;
mod plan;
mod run;

pub use permissions::{
    DIRECT_REVIEW_ROLES, START_ROLES, can_act_on_step, ensure_can_decide, ensure_can_register,
    ensure_can_review_directly, ensure_can_start,
};
pub use plan::{ApprovalPlan, BUDGET_STEP_NAME, PlannedStep, build_plan};
pub use run::{ApprovalRun, ApprovalStep, DecisionOutcome};

/// Approval run identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApprovalRunId(Uuid);

impl ApprovalRunId {
    /// Creates a random run identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a run identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ApprovalRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ApprovalRunId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle status of one approval run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalRunStatus {
    /// Steps are still being decided.
    InProgress,
    /// Every step was approved.
    Approved,
    /// One step was rejected.
    Rejected,
}

impl ApprovalRunStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "in_progress" => Ok(Self::InProgress),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown approval run status '{value}'"
            ))),
        }
    }

    /// Returns whether no further decisions are accepted.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Decision status of one approval step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStepStatus {
    /// Not decided yet.
    Pending,
    /// Approved by an authorized actor.
    Approved,
    /// Rejected by an authorized actor.
    Rejected,
}

impl ApprovalStepStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses storage value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(AppError::Validation(format!(
                "unknown approval step status '{value}'"
            ))),
        }
    }
}

/// Decision submitted against the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Approve the current step.
    Approve,
    /// Reject the current step and terminate the run.
    Reject,
}

impl ApprovalDecision {
    /// Returns stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    /// Parses transport value.
    pub fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(AppError::Validation(format!(
                "action must be 'approve' or 'reject', got '{value}'"
            ))),
        }
    }
}
