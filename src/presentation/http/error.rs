use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::error::{ResourceType, ServiceError};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub resource_type: Option<ResourceType>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    resource_type: Option<ResourceType>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            resource_type: None,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { resource, message } => Self {
                status: StatusCode::NOT_FOUND,
                message,
                resource_type: Some(resource),
            },
            ServiceError::InvalidArgument(message) => Self::bad_request(message),
            ServiceError::Conflict(message) => Self {
                status: StatusCode::CONFLICT,
                message,
                resource_type: None,
            },
            ServiceError::Internal(err) => {
                tracing::error!(error = ?err, "request_failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal server error".into(),
                    resource_type: None,
                }
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::Internal(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.message,
            resource_type: self.resource_type,
        };
        (self.status, Json(body)).into_response()
    }
}
