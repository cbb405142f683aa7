mod outputs;
mod queries;
mod store;

pub use outputs::{
    DecideApprovalOutput, DirectApprovalOptions, DirectApprovalOutput, DirectRejectionOutput,
    StartApprovalOutput,
};
pub use queries::{
    ApprovalStatusView, DEFAULT_PAGE_LIMIT, Page, PageRequest, Pagination, PendingApprovalItem,
    PendingApprovalPage, PendingApprovalQuery, PendingStepRecord, PendingView, PropertyHistory,
    days_pending,
};
pub use store::{ApprovalStore, ApprovalTransaction};
