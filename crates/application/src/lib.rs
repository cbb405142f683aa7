//! Application services and ports.

#![forbid(unsafe_code)]

mod approval_ports;
mod approval_query_service;
mod approval_service;
mod property_service;

#[cfg(test)]
mod test_support;

pub use approval_ports::{
    ApprovalStatusView, ApprovalStore, ApprovalTransaction, DEFAULT_PAGE_LIMIT,
    DecideApprovalOutput, DirectApprovalOptions, DirectApprovalOutput, DirectRejectionOutput,
    Page, PageRequest, Pagination, PendingApprovalItem, PendingApprovalPage,
    PendingApprovalQuery, PendingStepRecord, PendingView, PropertyHistory, StartApprovalOutput,
    days_pending,
};
pub use approval_query_service::{ApprovalQueryService, DEFAULT_MAX_PAGE_SIZE};
pub use approval_service::ApprovalService;
pub use property_service::PropertyService;
