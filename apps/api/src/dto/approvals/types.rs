use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::dto::PropertyResponse;

/// API representation of one approval step.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/approval-step-response.ts"
)]
pub struct ApprovalStepResponse {
    pub step_order: i32,
    pub required_role: String,
    pub step_name: String,
    pub status: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
    pub comments: Option<String>,
}

/// API representation of a step-wise approval run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/approval-run-response.ts"
)]
pub struct ApprovalRunResponse {
    pub approval_id: String,
    pub property_id: String,
    pub status: String,
    pub started_by: String,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub current_step: Option<ApprovalStepResponse>,
    pub steps: Vec<ApprovalStepResponse>,
}

/// Response for a started approval run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/start-approval-response.ts"
)]
pub struct StartApprovalResponse {
    pub approval_id: String,
    pub message: String,
    pub run: ApprovalRunResponse,
}

/// Incoming payload for a step decision.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/decision-request.ts"
)]
pub struct DecisionRequest {
    #[ts(type = "\"approve\" | \"reject\"")]
    pub action: String,
    pub comments: Option<String>,
}

/// Response for a recorded step decision.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/decision-response.ts"
)]
pub struct DecisionResponse {
    pub message: String,
    pub run_status: String,
    pub property_status: String,
    pub run: ApprovalRunResponse,
}

/// Incoming payload for a direct approval.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/approve-property-request.ts"
)]
pub struct ApprovePropertyRequest {
    pub notes: Option<String>,
}

/// Response for a direct approval.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/direct-approval-response.ts"
)]
pub struct DirectApprovalResponse {
    pub property_id: String,
    pub new_status: String,
    pub audit_log_id: String,
}

/// Incoming payload for a direct rejection.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reject-property-request.ts"
)]
pub struct RejectPropertyRequest {
    pub reason: String,
}

/// Response for a direct rejection.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/direct-rejection-response.ts"
)]
pub struct DirectRejectionResponse {
    pub property_id: String,
    pub new_status: String,
    pub rejection_reason: String,
    pub audit_log_id: String,
}

/// Listing with its latest approval run.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/approval-status-response.ts"
)]
pub struct ApprovalStatusResponse {
    pub property: PropertyResponse,
    pub run: Option<ApprovalRunResponse>,
}

/// Query string for the review queue.
#[derive(Debug, Default, Deserialize)]
pub struct PendingApprovalsQueryRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub view: Option<String>,
}

/// One review queue row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/pending-approval-item-response.ts"
)]
pub struct PendingApprovalItemResponse {
    pub property: PropertyResponse,
    pub approval_id: Option<String>,
    pub step: Option<ApprovalStepResponse>,
    #[ts(type = "number")]
    pub days_pending: i64,
}

/// Pagination block of list responses.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/pagination-response.ts"
)]
pub struct PaginationResponse {
    pub page: u32,
    pub limit: u32,
    #[ts(type = "number")]
    pub total: u64,
    #[ts(type = "number")]
    pub total_pages: u64,
}

/// Review queue page.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/pending-approvals-response.ts"
)]
pub struct PendingApprovalsResponse {
    pub items: Vec<PendingApprovalItemResponse>,
    pub pagination: PaginationResponse,
}

/// API representation of one workflow audit entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/audit-entry-response.ts"
)]
pub struct AuditEntryResponse {
    pub id: String,
    pub actor_id: String,
    pub actor_role: String,
    pub action: String,
    #[ts(type = "Record<string, unknown> | null")]
    pub before: Option<Value>,
    #[ts(type = "Record<string, unknown> | null")]
    pub after: Option<Value>,
    #[ts(type = "Record<string, unknown> | null")]
    pub metadata: Option<Value>,
    pub created_at: String,
}

/// Workflow history of a listing, newest first.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/property-history-response.ts"
)]
pub struct PropertyHistoryResponse {
    pub property_id: String,
    pub history: Vec<AuditEntryResponse>,
}
