use axum::{ http::StatusCode, response::{ IntoResponse, Response }, Json };
use serde_json::Value;
use thiserror::Error;

use crate::models::chat::ErrorBody;

pub const MISSING_QUESTION: &str = "Missing question in body";
pub const UPSTREAM_FAILURE: &str = "Failed to get response from OpenAI";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Upstream { message: String, details: Value },
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            RelayError::BadRequest(message) => ErrorBody { error: message.clone(), details: None },
            RelayError::Upstream { message, details } =>
                ErrorBody { error: message.clone(), details: Some(details.clone()) },
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
