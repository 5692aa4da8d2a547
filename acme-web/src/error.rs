//! 统一错误响应
//!
//! 响应体：`{"code": "...", "message": "...", "details": ...}`，`details` 可省略。
//!
use acme_application::error::AppError;
use acme_domain::validation::Violations;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
#[error("{status} {code}: {message}")]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// 约束违反，`details` 为 `[{property, message}]`
    pub fn violations(violations: &Violations) -> Self {
        let details = serde_json::to_value(violations).unwrap_or(Value::Null);
        Self::new(
            StatusCode::BAD_REQUEST,
            "CONSTRAINT_VIOLATIONS",
            format!("{} constraint violation(s)", violations.len()),
        )
        .with_details(details)
    }

    /// 唯一字段冲突
    pub fn already_exists(field: &str, value: &str) -> Self {
        let message = match field {
            "email" => format!("Die Emailadresse {value} existiert bereits"),
            "username" => format!("Der Username {value} existiert bereits"),
            other => format!("{other} {value} existiert bereits"),
        };
        Self::new(StatusCode::BAD_REQUEST, "ALREADY_EXISTS", message)
    }

    pub fn invalid_account() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_ACCOUNT", "Ungueltiger Account")
    }

    pub fn invalid_patch(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PATCH", reason)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn forbidden(roles: &[String]) -> Self {
        Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", "Zugriff verweigert")
            .with_details(serde_json::json!({ "roles": roles }))
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Nicht gefunden")
    }

    pub fn precondition_required() -> Self {
        Self::new(
            StatusCode::PRECONDITION_REQUIRED,
            "PRECONDITION_REQUIRED",
            "Versionsnummer fehlt",
        )
    }

    /// 版本号无效或过时
    pub fn precondition_failed(version: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::PRECONDITION_FAILED,
            "PRECONDITION_FAILED",
            format!("Falsche Versionsnummer {version}"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", message)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Timeout { operation, millis } => {
                tracing::error!(operation, millis, "request aborted by store timeout");
                ApiError::gateway_timeout(format!("{operation} exceeded {millis}ms"))
            }
            other => {
                tracing::error!(error = %other, "request failed");
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "malformed request body");
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
            details: self.details.as_ref(),
        };
        let json = serde_json::to_value(&body).unwrap_or(Value::Null);
        (self.status, Json(json)).into_response()
    }
}
