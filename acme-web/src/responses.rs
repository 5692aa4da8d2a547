//! 结果枚举到 HTTP 响应的映射
//!
use acme_application::result::{CreateResult, FindByIdResult, UpdateResult};
use acme_domain::entity::Entity;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::hal::BaseUri;
use crate::headers::etag;

/// 201 + `Location`
pub fn created<E: Entity>(result: CreateResult<E>, base: &BaseUri) -> Result<Response, ApiError> {
    match result {
        CreateResult::Success(entity) => {
            let location = base.item(entity.id());
            Ok((StatusCode::CREATED, [(LOCATION, location)]).into_response())
        }
        CreateResult::ConstraintViolations(v) => Err(ApiError::violations(&v)),
        CreateResult::AlreadyExists { field, value } => Err(ApiError::already_exists(field, &value)),
        CreateResult::InvalidAccount => Err(ApiError::invalid_account()),
    }
}

/// 204 + `ETag`
pub fn updated<E: Entity>(result: UpdateResult<E>) -> Result<Response, ApiError> {
    match result {
        UpdateResult::Success(entity) => {
            Ok((StatusCode::NO_CONTENT, etag(entity.version())).into_response())
        }
        UpdateResult::ConstraintViolations(v) => Err(ApiError::violations(&v)),
        UpdateResult::NotFound => Err(ApiError::not_found()),
        UpdateResult::VersionInvalid(raw) => Err(ApiError::precondition_failed(raw)),
        UpdateResult::VersionOutdated(version) => {
            Err(ApiError::precondition_failed(version.value()))
        }
        UpdateResult::AlreadyExists { field, value } => Err(ApiError::already_exists(field, &value)),
        UpdateResult::InvalidPatch(reason) => Err(ApiError::invalid_patch(reason)),
    }
}

/// 成功时返回实体，其余映射为 404 / 403
pub fn found<E>(result: FindByIdResult<E>) -> Result<E, ApiError> {
    match result {
        FindByIdResult::Success(entity) => Ok(entity),
        FindByIdResult::NotFound => Err(ApiError::not_found()),
        FindByIdResult::AccessForbidden(roles) => Err(ApiError::forbidden(&roles)),
    }
}
