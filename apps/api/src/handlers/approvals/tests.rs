use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use brokerly_core::{Actor, Role};
use brokerly_infrastructure::InMemoryApprovalStore;
use rust_decimal::Decimal;

use super::{
    approval_status_handler, approve_property_handler, decide_approval_handler,
    pending_approvals_handler, property_history_handler, reject_property_handler,
    start_approval_handler,
};
use crate::api_services::build_app_state;
use crate::dto::{
    ApprovePropertyRequest, DecisionRequest, PendingApprovalsQueryRequest,
    RegisterPropertyRequest, RejectPropertyRequest,
};
use crate::error::ApiResult;
use crate::handlers::properties::register_property_handler;
use crate::state::AppState;

fn actor(role: Role) -> Actor {
    Actor::new(format!("{}-http", role.as_str()), role).unwrap_or_else(|_| unreachable!())
}

fn build_state() -> AppState {
    build_app_state(Arc::new(InMemoryApprovalStore::new()), 50)
}

async fn register(state: &AppState, listing_type: &str) -> String {
    let response = register_property_handler(
        State(state.clone()),
        Extension(actor(Role::Agent)),
        Json(RegisterPropertyRequest {
            title: "Loft above the old bakery".to_owned(),
            listing_type: listing_type.to_owned(),
            buy_price: Some(Decimal::new(350_000, 0)),
            owner_first_name: None,
            owner_last_name: None,
            owner_contact: None,
            brokerage_commission_percent: None,
        }),
    )
    .await;

    assert!(response.is_ok());
    let (status, Json(property)) = response.unwrap_or_else(|_| unreachable!());
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(property.status, "pending");
    property.id
}

fn response_status<T>(result: ApiResult<T>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::OK,
        Err(error) => error.into_response().status(),
    }
}

async fn decide(state: &AppState, role: Role, property_id: &str, action: &str) -> StatusCode {
    let result = decide_approval_handler(
        State(state.clone()),
        Extension(actor(role)),
        Path(property_id.to_owned()),
        Json(DecisionRequest {
            action: action.to_owned(),
            comments: None,
        }),
    )
    .await;

    response_status(result)
}

#[tokio::test]
async fn start_returns_created_with_the_full_plan() {
    let state = build_state();
    let property_id = register(&state, "agency_owned").await;

    let response = start_approval_handler(
        State(state.clone()),
        Extension(actor(Role::Manager)),
        Path(property_id.clone()),
    )
    .await;

    assert!(response.is_ok());
    let (status, Json(payload)) = response.unwrap_or_else(|_| unreachable!());
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payload.message, "Approval workflow started with 4 steps");
    assert_eq!(payload.run.steps.len(), 4);
    assert_eq!(
        payload
            .run
            .current_step
            .as_ref()
            .map(|step| step.required_role.as_str()),
        Some("manager")
    );

    let second = start_approval_handler(
        State(state),
        Extension(actor(Role::Manager)),
        Path(property_id),
    )
    .await;
    assert!(matches!(
        second,
        Err(ref error) if format!("{error:?}").contains("ApprovalExists")
    ));
}

#[tokio::test]
async fn wrong_role_decision_is_forbidden_and_unknown_action_is_bad_request() {
    let state = build_state();
    let property_id = register(&state, "branch_owned").await;
    assert!(
        start_approval_handler(
            State(state.clone()),
            Extension(actor(Role::Agent)),
            Path(property_id.clone()),
        )
        .await
        .is_ok()
    );

    assert_eq!(
        decide(&state, Role::Director, &property_id, "approve").await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        decide(&state, Role::Manager, &property_id, "escalate").await,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn rejected_run_answers_later_decisions_with_conflict() {
    let state = build_state();
    let property_id = register(&state, "branch_owned").await;
    assert!(
        start_approval_handler(
            State(state.clone()),
            Extension(actor(Role::Manager)),
            Path(property_id.clone()),
        )
        .await
        .is_ok()
    );

    assert_eq!(
        decide(&state, Role::Manager, &property_id, "reject").await,
        StatusCode::OK
    );
    assert_eq!(
        decide(&state, Role::Manager, &property_id, "approve").await,
        StatusCode::CONFLICT
    );

    let status = approval_status_handler(State(state.clone()), Path(property_id.clone())).await;
    assert!(matches!(
        status,
        Ok(Json(ref payload)) if payload.property.status == "rejected"
            && payload.run.as_ref().map(|run| run.status.as_str()) == Some("rejected")
    ));
}

#[tokio::test]
async fn direct_approval_publishes_and_is_recorded_in_history() {
    let state = build_state();
    let property_id = register(&state, "branch_owned").await;

    let approved = approve_property_handler(
        State(state.clone()),
        Extension(actor(Role::Director)),
        Path(property_id.clone()),
        Some(Json(ApprovePropertyRequest {
            notes: Some("Photos verified".to_owned()),
        })),
    )
    .await;
    assert!(matches!(
        approved,
        Ok(Json(ref payload)) if payload.new_status == "active"
    ));

    let history = property_history_handler(State(state), Path(property_id)).await;
    assert!(matches!(
        history,
        Ok(Json(ref payload)) if payload.history.first().map(|entry| entry.action.as_str())
            == Some("APPROVE")
    ));
}

#[tokio::test]
async fn short_rejection_reason_is_bad_request() {
    let state = build_state();
    let property_id = register(&state, "branch_owned").await;

    let rejected = reject_property_handler(
        State(state),
        Extension(actor(Role::Director)),
        Path(property_id),
        Json(RejectPropertyRequest {
            reason: "too low".to_owned(),
        }),
    )
    .await;

    assert_eq!(response_status(rejected), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pending_queue_rejects_unknown_view_and_lists_properties() {
    let state = build_state();
    let property_id = register(&state, "brokerage").await;

    let unknown = pending_approvals_handler(
        State(state.clone()),
        Extension(actor(Role::Director)),
        Query(PendingApprovalsQueryRequest {
            view: Some("everything".to_owned()),
            ..PendingApprovalsQueryRequest::default()
        }),
    )
    .await;
    assert_eq!(response_status(unknown), StatusCode::BAD_REQUEST);

    let properties = pending_approvals_handler(
        State(state),
        Extension(actor(Role::Director)),
        Query(PendingApprovalsQueryRequest {
            view: Some("properties".to_owned()),
            ..PendingApprovalsQueryRequest::default()
        }),
    )
    .await;
    assert!(matches!(
        properties,
        Ok(Json(ref payload)) if payload.pagination.total == 1
            && payload.items.first().map(|item| item.property.id.as_str())
                == Some(property_id.as_str())
            && payload.items.first().and_then(|item| item.approval_id.as_ref()).is_none()
    ));
}
