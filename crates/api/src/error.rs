use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use datecard_services::dao::base::DaoError;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    InvalidFields(ValidationErrors),
    ServiceUnavailable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::InvalidFields(errors) => (
                StatusCode::BAD_REQUEST,
                "validation",
                "Invalid request".to_string(),
                Some(field_details(&errors)),
            ),
            ApiError::ServiceUnavailable(msg) => {
                warn!(%msg, "Store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    "Could not reach the database. Check that MongoDB is running and the connection URL is correct."
                        .to_string(),
                    None,
                )
            }
            ApiError::Internal(msg) => {
                error!(%msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg, None)
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Per-field messages keyed by the camelCase name the client sent.
fn field_details(errors: &ValidationErrors) -> Value {
    let mut fields = Map::new();
    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|e| {
                Value::String(
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                )
            })
            .collect();
        fields.insert(camel_case(&field), Value::Array(messages));
    }
    Value::Object(fields)
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<DaoError> for ApiError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => ApiError::NotFound("Not found".to_string()),
            DaoError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            DaoError::Internal(msg) => ApiError::Internal(msg),
            e @ DaoError::IdExhausted(_) => ApiError::Internal(e.to_string()),
            DaoError::DuplicateKey(msg) => ApiError::Internal(msg),
            DaoError::Mongo(e) => ApiError::Internal(e.to_string()),
            DaoError::BsonSer(e) => ApiError::Internal(e.to_string()),
            DaoError::BsonDe(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl ApiError {
    /// Maps a store error for routes where an unreachable database is not a
    /// distinct outcome and surfaces as a plain 500.
    pub fn unavailable_as_internal(err: DaoError) -> Self {
        match err {
            DaoError::Unavailable(msg) => ApiError::Internal(msg),
            other => other.into(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::InvalidFields(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
