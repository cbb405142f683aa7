use brokerly_domain::{
    ApprovalRun, ApprovalRunId, ApprovalRunStatus, AuditEntryId, PropertyId, PropertyStatus,
};

/// Result of opening a step-wise approval run.
#[derive(Debug, Clone, PartialEq)]
pub struct StartApprovalOutput {
    /// New run identifier.
    pub approval_id: ApprovalRunId,
    /// Human-readable confirmation.
    pub message: String,
    /// Persisted run with its pending steps.
    pub run: ApprovalRun,
}

/// Result of recording one step decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecideApprovalOutput {
    /// Human-readable confirmation.
    pub message: String,
    /// Run status after the decision.
    pub run_status: ApprovalRunStatus,
    /// Property status after the decision.
    pub property_status: PropertyStatus,
    /// Run after the decision.
    pub run: ApprovalRun,
}

/// Optional input for direct approval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectApprovalOptions {
    /// Reviewer notes stored as audit metadata.
    pub notes: Option<String>,
}

/// Result of a direct approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectApprovalOutput {
    /// Approved property.
    pub property_id: PropertyId,
    /// Status after approval.
    pub new_status: PropertyStatus,
    /// Audit entry written for the transition.
    pub audit_log_id: AuditEntryId,
}

/// Result of a direct rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectRejectionOutput {
    /// Rejected property.
    pub property_id: PropertyId,
    /// Status after rejection.
    pub new_status: PropertyStatus,
    /// Reason recorded with the rejection.
    pub rejection_reason: String,
    /// Audit entry written for the transition.
    pub audit_log_id: AuditEntryId,
}
