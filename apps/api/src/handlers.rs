pub mod approvals;
pub mod health;
pub mod properties;
