//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_approval_store;
mod postgres_approval_store;

pub use in_memory_approval_store::InMemoryApprovalStore;
pub use postgres_approval_store::PostgresApprovalStore;
