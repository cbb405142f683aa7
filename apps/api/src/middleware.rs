use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use brokerly_core::{Actor, AppError, Role};

use crate::error::ApiResult;

/// Header carrying the caller identifier set by the upstream gateway.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the caller role set by the upstream gateway.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

pub async fn require_actor(mut request: Request, next: Next) -> ApiResult<Response> {
    let actor = actor_from_headers(request.headers())?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, AppError> {
    let actor_id = header_value(headers, ACTOR_ID_HEADER)?;
    let role = Role::parse(header_value(headers, ACTOR_ROLE_HEADER)?)
        .map_err(|error| AppError::Unauthorized(format!("invalid {ACTOR_ROLE_HEADER}: {error}")))?;

    Actor::new(actor_id, role)
        .map_err(|error| AppError::Unauthorized(format!("invalid {ACTOR_ID_HEADER}: {error}")))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("{name} header is required")))
}
