use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scribe_core::ScribeError;
use serde::Serialize;
use utoipa::ToResponse;

#[derive(Debug, Serialize, ToResponse)]
pub struct ErrorServer {
    pub message: String,
    pub status: u16,
}

impl std::fmt::Display for ErrorServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ErrorServer {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl From<ScribeError> for ErrorServer {
    fn from(error: ScribeError) -> Self {
        let status = match &error {
            ScribeError::Validation(_) => StatusCode::BAD_REQUEST,
            ScribeError::PayloadTooLarge { .. } | ScribeError::FileTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ScribeError::NotFound(_) => StatusCode::NOT_FOUND,
            ScribeError::NotReady(_) => StatusCode::ACCEPTED,
            ScribeError::Failed(_) => StatusCode::BAD_REQUEST,
            ScribeError::Configuration(_)
            | ScribeError::Engine(_)
            | ScribeError::Storage(_)
            | ScribeError::Queue(_)
            | ScribeError::Serialization(_)
            | ScribeError::Archive(_) => {
                log::error!("Internal error: {}", error);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            message: error.to_string(),
            status: status.into(),
        }
    }
}
