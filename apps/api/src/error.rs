use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use brokerly_core::AppError;
use brokerly_domain::ApprovalError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    code: String,
    message: String,
}

/// HTTP API error wrapper around application and workflow errors.
#[derive(Debug)]
pub enum ApiError {
    App(AppError),
    Approval(ApprovalError),
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<ApprovalError> for ApiError {
    fn from(value: ApprovalError) -> Self {
        Self::Approval(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::App(error) => match error {
                AppError::Validation(_) => StatusCode::BAD_REQUEST,
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::Conflict(_) => StatusCode::CONFLICT,
                AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                AppError::Forbidden(_) => StatusCode::FORBIDDEN,
                AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Approval(error) => match error {
                ApprovalError::PropertyNotFound(_) | ApprovalError::ApprovalNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                ApprovalError::InvalidStatus { .. }
                | ApprovalError::ApprovalExists(_)
                | ApprovalError::RunNotActive { .. } => StatusCode::CONFLICT,
                ApprovalError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
                ApprovalError::InvalidReason => StatusCode::BAD_REQUEST,
                ApprovalError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ApprovalError::InvalidListingType(_)
                | ApprovalError::NoPendingSteps(_)
                | ApprovalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::App(error) => match error {
                AppError::Validation(_) => "validation",
                AppError::NotFound(_) => "not_found",
                AppError::Conflict(_) => "conflict",
                AppError::Unauthorized(_) => "unauthorized",
                AppError::Forbidden(_) => "forbidden",
                AppError::Internal(_) => "internal",
            },
            Self::Approval(error) => error.code(),
        }
    }

    fn is_opaque(&self) -> bool {
        matches!(
            self,
            Self::App(AppError::Internal(_)) | Self::Approval(ApprovalError::Internal(_))
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        if status.is_server_error() {
            match &self {
                Self::App(failure) => error!(code, error = %failure, "request failed"),
                Self::Approval(failure) => error!(code, error = %failure, "request failed"),
            }
        }

        let message = if self.is_opaque() {
            "internal server error".to_owned()
        } else {
            match &self {
                Self::App(failure) => failure.to_string(),
                Self::Approval(failure) => failure.to_string(),
            }
        };

        let payload = Json(ErrorResponse {
            code: code.to_owned(),
            message,
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
