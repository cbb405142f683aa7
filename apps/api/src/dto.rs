mod approvals;
mod common;
mod properties;

pub use approvals::{
    ApprovalRunResponse, ApprovalStatusResponse, ApprovalStepResponse, ApprovePropertyRequest,
    AuditEntryResponse, DecisionRequest, DecisionResponse, DirectApprovalResponse,
    DirectRejectionResponse, PaginationResponse, PendingApprovalItemResponse,
    PendingApprovalsQueryRequest, PendingApprovalsResponse, PropertyHistoryResponse,
    RejectPropertyRequest, StartApprovalResponse,
};
pub use common::HealthResponse;
pub use properties::{PropertyResponse, RegisterPropertyRequest};

#[cfg(test)]
mod tests {
    use super::{
        ApprovalRunResponse, ApprovalStatusResponse, ApprovalStepResponse, ApprovePropertyRequest,
        AuditEntryResponse, DecisionRequest, DecisionResponse, DirectApprovalResponse,
        DirectRejectionResponse, HealthResponse, PaginationResponse, PendingApprovalItemResponse,
        PendingApprovalsResponse, PropertyHistoryResponse, PropertyResponse,
        RegisterPropertyRequest, RejectPropertyRequest, StartApprovalResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        RegisterPropertyRequest::export(&config)?;
        PropertyResponse::export(&config)?;
        ApprovalStepResponse::export(&config)?;
        ApprovalRunResponse::export(&config)?;
        StartApprovalResponse::export(&config)?;
        DecisionRequest::export(&config)?;
        DecisionResponse::export(&config)?;
        ApprovePropertyRequest::export(&config)?;
        DirectApprovalResponse::export(&config)?;
        RejectPropertyRequest::export(&config)?;
        DirectRejectionResponse::export(&config)?;
        ApprovalStatusResponse::export(&config)?;
        PendingApprovalItemResponse::export(&config)?;
        PaginationResponse::export(&config)?;
        PendingApprovalsResponse::export(&config)?;
        AuditEntryResponse::export(&config)?;
        PropertyHistoryResponse::export(&config)?;
        ErrorResponse::export(&config)?;
        HealthResponse::export(&config)?;

        Ok(())
    }
}
