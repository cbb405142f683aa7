use brokerly_core::Role;

use crate::ListingType;

/// Name given to the VP step.
pub const BUDGET_STEP_NAME: &str = "budget";

/// One required step in an approval plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
    /// 1-based position in the run.
    pub step_order: i32,
    /// Only role allowed to decide the step (admin aside).
    pub required_role: Role,
    /// Short step label.
    pub step_name: &'static str,
}

/// Ordered steps a listing must pass before it goes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalPlan {
    listing_type: ListingType,
    steps: Vec<PlannedStep>,
}

impl ApprovalPlan {
    /// Returns the listing type the plan was built for.
    #[must_use]
    pub fn listing_type(&self) -> ListingType {
        self.listing_type
    }

    /// Returns the planned steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    /// Returns whether the VP budget step was left out.
    #[must_use]
    pub fn skips_budget_step(&self) -> bool {
        !self
            .steps
            .iter()
            .any(|step| step.required_role == Role::Vp)
    }

    /// Returns the compliance reason recorded when the budget step is skipped.
    #[must_use]
    pub fn budget_skip_reason(&self) -> Option<String> {
        self.skips_budget_step()
            .then(|| format!("SKIPPED_BY_RULE(listing_type={})", self.listing_type))
    }
}

/// Maps a listing type to its ordered approval steps.
#[must_use]
pub fn build_plan(listing_type: ListingType) -> ApprovalPlan {
    let mut roles = vec![(Role::Manager, "manager_review")];
    if listing_type == ListingType::AgencyOwned {
        roles.push((Role::Vp, BUDGET_STEP_NAME));
    }
    roles.push((Role::Director, "director_approval"));
    roles.push((Role::Manager, "publish"));

    let steps = roles
        .into_iter()
        .zip(1..)
        .map(|((required_role, step_name), step_order)| PlannedStep {
            step_order,
            required_role,
            step_name,
        })
        .collect();

    ApprovalPlan {
        listing_type,
        steps,
    }
}
