mod conversions;
mod types;

pub use types::{
    ApprovalRunResponse, ApprovalStatusResponse, ApprovalStepResponse, ApprovePropertyRequest,
    AuditEntryResponse, DecisionRequest, DecisionResponse, DirectApprovalResponse,
    DirectRejectionResponse, PaginationResponse, PendingApprovalItemResponse,
    PendingApprovalsQueryRequest, PendingApprovalsResponse, PropertyHistoryResponse,
    RejectPropertyRequest, StartApprovalResponse,
};
