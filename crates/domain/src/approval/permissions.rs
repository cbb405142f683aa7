use brokerly_core::Role;

use crate::ApprovalError;

/// Roles allowed to open a step-wise approval run.
pub const START_ROLES: &[Role] = &[Role::Agent, Role::Manager, Role::Director, Role::Admin];

/// Roles allowed to use direct approval and to read review queues.
pub const DIRECT_REVIEW_ROLES: &[Role] = &[Role::Manager, Role::Vp, Role::Director, Role::Admin];

const REGISTER_ROLES: &[Role] = &[Role::Agent, Role::Manager, Role::Director, Role::Admin];

/// Returns whether `actor_role` may decide a step owned by `required_role`.
#[must_use]
pub fn can_act_on_step(actor_role: Role, required_role: Role) -> bool {
    actor_role == Role::Admin || actor_role == required_role
}

/// Fails unless the role may open an approval run.
pub fn ensure_can_start(role: Role) -> Result<(), ApprovalError> {
    ensure_one_of(role, START_ROLES, "start an approval")
}

/// Fails unless the role may decide the current step.
pub fn ensure_can_decide(role: Role, required_role: Role) -> Result<(), ApprovalError> {
    if can_act_on_step(role, required_role) {
        return Ok(());
    }

    Err(ApprovalError::step_requires(required_role))
}

/// Fails unless the role may approve or reject a listing directly.
pub fn ensure_can_review_directly(role: Role) -> Result<(), ApprovalError> {
    ensure_one_of(role, DIRECT_REVIEW_ROLES, "review listings")
}

/// Fails unless the role may register listings.
pub fn ensure_can_register(role: Role) -> Result<(), ApprovalError> {
    ensure_one_of(role, REGISTER_ROLES, "register listings")
}

fn ensure_one_of(role: Role, allowed: &[Role], operation: &str) -> Result<(), ApprovalError> {
    if allowed.contains(&role) {
        return Ok(());
    }

    let allowed = allowed
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    Err(ApprovalError::InsufficientPermissions(format!(
        "role '{role}' cannot {operation}; allowed roles: {allowed}"
    )))
}
