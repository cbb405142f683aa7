use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use brokerly_application::{DirectApprovalOptions, PendingApprovalQuery};
use brokerly_core::Actor;
use brokerly_domain::{ApprovalDecision, PropertyId};

use crate::dto::{
    ApprovalStatusResponse, ApprovePropertyRequest, DecisionRequest, DecisionResponse,
    DirectApprovalResponse, DirectRejectionResponse, PendingApprovalsQueryRequest,
    PendingApprovalsResponse, PropertyHistoryResponse, RejectPropertyRequest,
    StartApprovalResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn start_approval_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(property_id): Path<String>,
) -> ApiResult<(StatusCode, Json<StartApprovalResponse>)> {
    let property_id = PropertyId::parse(property_id.as_str())?;
    let started = state.approval_service.start(&actor, property_id).await?;

    Ok((StatusCode::CREATED, Json(StartApprovalResponse::from(started))))
}

pub async fn approval_status_handler(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> ApiResult<Json<ApprovalStatusResponse>> {
    let property_id = PropertyId::parse(property_id.as_str())?;
    let status = state.approval_query_service.status(property_id).await?;

    Ok(Json(ApprovalStatusResponse::from(status)))
}

pub async fn decide_approval_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(property_id): Path<String>,
    Json(payload): Json<DecisionRequest>,
) -> ApiResult<Json<DecisionResponse>> {
    let property_id = PropertyId::parse(property_id.as_str())?;
    let decision = ApprovalDecision::parse(payload.action.as_str())?;
    let decided = state
        .approval_service
        .decide(&actor, property_id, decision, payload.comments)
        .await?;

    Ok(Json(DecisionResponse::from(decided)))
}

pub async fn approve_property_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(property_id): Path<String>,
    payload: Option<Json<ApprovePropertyRequest>>,
) -> ApiResult<Json<DirectApprovalResponse>> {
    let property_id = PropertyId::parse(property_id.as_str())?;
    let payload = payload.map(|Json(body)| body).unwrap_or_default();
    let approved = state
        .approval_service
        .approve_property(
            &actor,
            property_id,
            DirectApprovalOptions {
                notes: payload.notes,
            },
        )
        .await?;

    Ok(Json(DirectApprovalResponse::from(approved)))
}

pub async fn reject_property_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(property_id): Path<String>,
    Json(payload): Json<RejectPropertyRequest>,
) -> ApiResult<Json<DirectRejectionResponse>> {
    let property_id = PropertyId::parse(property_id.as_str())?;
    let rejected = state
        .approval_service
        .reject_property(&actor, property_id, payload.reason.as_str())
        .await?;

    Ok(Json(DirectRejectionResponse::from(rejected)))
}

pub async fn property_history_handler(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> ApiResult<Json<PropertyHistoryResponse>> {
    let property_id = PropertyId::parse(property_id.as_str())?;
    let history = state.approval_query_service.history(property_id).await?;

    Ok(Json(PropertyHistoryResponse::from(history)))
}

pub async fn pending_approvals_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<PendingApprovalsQueryRequest>,
) -> ApiResult<Json<PendingApprovalsResponse>> {
    let query = PendingApprovalQuery::try_from(query)?;
    let page = state
        .approval_query_service
        .pending_for_role(&actor, query)
        .await?;

    Ok(Json(PendingApprovalsResponse::from(page)))
}

#[cfg(test)]
mod tests;
