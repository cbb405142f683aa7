use brokerly_core::{AppError, Role};
use thiserror::Error;

/// Minimum length accepted for a direct-rejection reason.
pub const REJECTION_REASON_MIN_LENGTH: usize = 10;

/// Typed failures surfaced by approval operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    /// Property id is unknown.
    #[error("property '{0}' not found")]
    PropertyNotFound(String),

    /// Property is not in the status the operation requires.
    #[error("property must be pending to be reviewed (current status: {current})")]
    InvalidStatus {
        /// Stored property status.
        current: String,
    },

    /// Actor role does not satisfy the operation.
    #[error("{0}")]
    InsufficientPermissions(String),

    /// Another approval run is already in progress.
    #[error("an approval is already in progress for property '{0}'")]
    ApprovalExists(String),

    /// No approval run exists for the property.
    #[error("no approval in progress for property '{0}'")]
    ApprovalNotFound(String),

    /// Latest approval run has reached a terminal state.
    #[error("approval run '{run_id}' is already {status}")]
    RunNotActive {
        /// Terminal run identifier.
        run_id: String,
        /// Terminal run status.
        status: String,
    },

    /// Stored listing type is not a known value.
    #[error("invalid listing type '{0}'")]
    InvalidListingType(String),

    /// In-progress run without a pending step.
    #[error("approval run '{0}' has no pending steps")]
    NoPendingSteps(String),

    /// Rejection reason is shorter than the accepted minimum.
    #[error("rejection reason must be at least {REJECTION_REASON_MIN_LENGTH} characters")]
    InvalidReason,

    /// Listing-type specific fields are missing.
    #[error("{0}")]
    ValidationFailed(String),

    /// Unexpected storage or infrastructure failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApprovalError {
    /// Builds the permission failure for a step owned by `required`.
    #[must_use]
    pub fn step_requires(required: Role) -> Self {
        Self::InsufficientPermissions(format!("This step requires {required} role"))
    }

    /// Returns a stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PropertyNotFound(_) => "property_not_found",
            Self::InvalidStatus { .. } => "invalid_status",
            Self::InsufficientPermissions(_) => "insufficient_permissions",
            Self::ApprovalExists(_) => "approval_exists",
            Self::ApprovalNotFound(_) => "approval_not_found",
            Self::RunNotActive { .. } => "run_not_active",
            Self::InvalidListingType(_) => "invalid_listing_type",
            Self::NoPendingSteps(_) => "no_pending_steps",
            Self::InvalidReason => "invalid_reason",
            Self::ValidationFailed(_) => "validation_failed",
            Self::Internal(_) => "internal",
        }
    }

    /// Returns whether the failure points at a data or invariant defect.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::InvalidListingType(_) | Self::NoPendingSteps(_) | Self::Internal(_)
        )
    }
}

impl From<AppError> for ApprovalError {
    fn from(value: AppError) -> Self {
        Self::Internal(value.to_string())
    }
}

/// Result type for approval operations.
pub type ApprovalResult<T> = Result<T, ApprovalError>;

#[cfg(test)]
mod tests {
    use brokerly_core::{AppError, Role};

    use super::ApprovalError;

    #[test]
    fn step_requirement_message_names_role() {
        let error = ApprovalError::step_requires(Role::Manager);
        assert_eq!(error.to_string(), "This step requires manager role");
        assert_eq!(error.code(), "insufficient_permissions");
    }

    #[test]
    fn storage_errors_become_internal() {
        let error = ApprovalError::from(AppError::Internal("pool closed".to_owned()));
        assert!(error.is_internal());
        assert!(error.to_string().contains("pool closed"));
    }
}
