//! 单值查询：姓氏与邮箱的前缀补全、版本号
//!
use acme_application::query::QueryBus;
use acme_web::auth::Ctx;
use acme_web::error::ApiError;
use axum::Json;
use axum::extract::{Path, State};

use super::{AppState, parse_id};
use crate::application::{FindEmailsByPrefix, FindNachnamenByPrefix, FindVersionById};

pub async fn nachnamen(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(prefix): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let nachnamen = state
        .queries
        .dispatch(&ctx, FindNachnamenByPrefix { prefix })
        .await?;
    if nachnamen.is_empty() {
        return Err(ApiError::not_found());
    }
    Ok(Json(nachnamen))
}

pub async fn emails(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(prefix): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let emails = state
        .queries
        .dispatch(&ctx, FindEmailsByPrefix { prefix })
        .await?;
    if emails.is_empty() {
        return Err(ApiError::not_found());
    }
    Ok(Json(emails))
}

/// 纯文本的版本号
pub async fn version(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
) -> Result<String, ApiError> {
    let id = parse_id(&id)?;
    state
        .queries
        .dispatch(&ctx, FindVersionById { id })
        .await?
        .map(|v| v.value().to_string())
        .ok_or_else(ApiError::not_found)
}
