use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub fields: Vec<FieldError>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "no_fields")]
    fields: &'a [FieldError],
}

fn no_fields(fields: &&[FieldError]) -> bool {
    fields.is_empty()
}

impl AppError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn validation(fields: Vec<FieldError>) -> Self {
        let message = match fields.as_slice() {
            [single] => format!("{}: {}", single.field, single.message),
            _ => format!("{} fields failed validation", fields.len()),
        };
        Self {
            fields,
            ..Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "validation_error", message)
    }

    pub fn invalid_date(field: &str, value: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_date",
            format!("{field} is not a valid date: {value:?}"),
        )
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        error!("store failure: {err}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "store_failure", err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound(_) | StoreError::WalkNotFound(_) => {
                Self::not_found(err.to_string())
            }
            StoreError::Io(_) | StoreError::Encode(_) => Self::internal(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorBody {
            error: self.code,
            message: &self.message,
            fields: &self.fields,
        };
        (self.status, Json(body)).into_response()
    }
}
