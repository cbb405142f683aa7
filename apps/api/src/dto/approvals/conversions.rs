use brokerly_application::{
    ApprovalStatusView, DecideApprovalOutput, DirectApprovalOutput, DirectRejectionOutput,
    Pagination, PendingApprovalItem, PendingApprovalPage, PendingApprovalQuery, PendingView,
    PropertyHistory, StartApprovalOutput,
};
use brokerly_core::AppError;
use brokerly_domain::{ApprovalRun, ApprovalStep, AuditEntry};

use super::types::{
    ApprovalRunResponse, ApprovalStatusResponse, ApprovalStepResponse, AuditEntryResponse,
    DecisionResponse, DirectApprovalResponse, DirectRejectionResponse, PaginationResponse,
    PendingApprovalItemResponse, PendingApprovalsQueryRequest, PendingApprovalsResponse,
    PropertyHistoryResponse, StartApprovalResponse,
};
use crate::dto::PropertyResponse;

impl From<&ApprovalStep> for ApprovalStepResponse {
    fn from(value: &ApprovalStep) -> Self {
        Self {
            step_order: value.step_order,
            required_role: value.required_role.as_str().to_owned(),
            step_name: value.step_name.clone(),
            status: value.status.as_str().to_owned(),
            approved_by: value.approved_by.clone(),
            approved_at: value.approved_at.map(|approved_at| approved_at.to_rfc3339()),
            comments: value.comments.clone(),
        }
    }
}

impl From<ApprovalRun> for ApprovalRunResponse {
    fn from(value: ApprovalRun) -> Self {
        Self {
            approval_id: value.id.to_string(),
            property_id: value.property_id.to_string(),
            status: value.status.as_str().to_owned(),
            started_by: value.started_by.clone(),
            started_at: value.started_at.to_rfc3339(),
            completed_at: value
                .completed_at
                .map(|completed_at| completed_at.to_rfc3339()),
            current_step: value.current_step().map(ApprovalStepResponse::from),
            steps: value.steps.iter().map(ApprovalStepResponse::from).collect(),
        }
    }
}

impl From<StartApprovalOutput> for StartApprovalResponse {
    fn from(value: StartApprovalOutput) -> Self {
        Self {
            approval_id: value.approval_id.to_string(),
            message: value.message,
            run: ApprovalRunResponse::from(value.run),
        }
    }
}

impl From<DecideApprovalOutput> for DecisionResponse {
    fn from(value: DecideApprovalOutput) -> Self {
        Self {
            message: value.message,
            run_status: value.run_status.as_str().to_owned(),
            property_status: value.property_status.as_str().to_owned(),
            run: ApprovalRunResponse::from(value.run),
        }
    }
}

impl From<DirectApprovalOutput> for DirectApprovalResponse {
    fn from(value: DirectApprovalOutput) -> Self {
        Self {
            property_id: value.property_id.to_string(),
            new_status: value.new_status.as_str().to_owned(),
            audit_log_id: value.audit_log_id.to_string(),
        }
    }
}

impl From<DirectRejectionOutput> for DirectRejectionResponse {
    fn from(value: DirectRejectionOutput) -> Self {
        Self {
            property_id: value.property_id.to_string(),
            new_status: value.new_status.as_str().to_owned(),
            rejection_reason: value.rejection_reason,
            audit_log_id: value.audit_log_id.to_string(),
        }
    }
}

impl From<ApprovalStatusView> for ApprovalStatusResponse {
    fn from(value: ApprovalStatusView) -> Self {
        Self {
            property: PropertyResponse::from(value.property),
            run: value.run.map(ApprovalRunResponse::from),
        }
    }
}

impl TryFrom<PendingApprovalsQueryRequest> for PendingApprovalQuery {
    type Error = AppError;

    fn try_from(value: PendingApprovalsQueryRequest) -> Result<Self, Self::Error> {
        let view = value
            .view
            .as_deref()
            .map(PendingView::parse)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            page: value.page,
            limit: value.limit,
            view,
        })
    }
}

impl From<PendingApprovalItem> for PendingApprovalItemResponse {
    fn from(value: PendingApprovalItem) -> Self {
        Self {
            property: PropertyResponse::from(value.property),
            approval_id: value.run_id.map(|run_id| run_id.to_string()),
            step: value.step.as_ref().map(ApprovalStepResponse::from),
            days_pending: value.days_pending,
        }
    }
}

impl From<Pagination> for PaginationResponse {
    fn from(value: Pagination) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
            total: value.total,
            total_pages: value.total_pages,
        }
    }
}

impl From<PendingApprovalPage> for PendingApprovalsResponse {
    fn from(value: PendingApprovalPage) -> Self {
        Self {
            items: value
                .items
                .into_iter()
                .map(PendingApprovalItemResponse::from)
                .collect(),
            pagination: PaginationResponse::from(value.pagination),
        }
    }
}

impl From<AuditEntry> for AuditEntryResponse {
    fn from(value: AuditEntry) -> Self {
        Self {
            id: value.id.to_string(),
            actor_id: value.actor_id,
            actor_role: value.actor_role.as_str().to_owned(),
            action: value.action.as_str().to_owned(),
            before: value.before,
            after: value.after,
            metadata: value.metadata,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

impl From<PropertyHistory> for PropertyHistoryResponse {
    fn from(value: PropertyHistory) -> Self {
        Self {
            property_id: value.property_id.to_string(),
            history: value
                .history
                .into_iter()
                .map(AuditEntryResponse::from)
                .collect(),
        }
    }
}
