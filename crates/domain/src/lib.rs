//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod approval;
mod audit;
mod error;
mod property;

pub use approval::{
    ApprovalDecision, ApprovalPlan, ApprovalRun, ApprovalRunId, ApprovalRunStatus, ApprovalStep,
    ApprovalStepStatus, BUDGET_STEP_NAME, DIRECT_REVIEW_ROLES, DecisionOutcome, PlannedStep,
    START_ROLES, build_plan, can_act_on_step, ensure_can_decide, ensure_can_register,
    ensure_can_review_directly, ensure_can_start,
};
pub use audit::{AuditAction, AuditEntry, AuditEntryId, NewAuditEntry, PROPERTY_ENTITY};
pub use error::{ApprovalError, ApprovalResult, REJECTION_REASON_MIN_LENGTH};
pub use property::{
    ListingType, ListingValidation, NewPropertyInput, Property, PropertyId, PropertyStatus,
    validate_listing_type_requirements,
};
