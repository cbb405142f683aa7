use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use brokerly_core::Actor;
use brokerly_domain::PropertyId;

use crate::dto::{PropertyResponse, RegisterPropertyRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_property_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<RegisterPropertyRequest>,
) -> ApiResult<(StatusCode, Json<PropertyResponse>)> {
    let property = state
        .property_service
        .register_property(&actor, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(PropertyResponse::from(property))))
}

pub async fn get_property_handler(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> ApiResult<Json<PropertyResponse>> {
    let property_id = PropertyId::parse(property_id.as_str())?;
    let property = state.property_service.get_property(property_id).await?;

    Ok(Json(PropertyResponse::from(property)))
}
