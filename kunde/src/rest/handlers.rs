use acme_application::command::CommandBus;
use acme_application::query::QueryBus;
use acme_domain::entity::Entity;
use acme_domain::patch::PatchOperation;
use acme_web::auth::Ctx;
use acme_web::error::ApiError;
use acme_web::hal::{BaseUri, CollectionModel, EntityModel};
use acme_web::headers::{etag, if_match, not_modified};
use acme_web::responses::{created, found, updated};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::{AppState, parse_id};
use crate::application::{
    CreateKunde, DeleteKunde, DeleteKundeByEmail, FindKundeById, FindKunden, PatchKunde,
    UpdateKunde,
};
use crate::domain::Kunde;

pub async fn find_by_id(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    base: BaseUri,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let kunde = found(state.queries.dispatch(&ctx, FindKundeById { id }).await?)?;

    if not_modified(&headers, kunde.version()) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let version = kunde.version();
    let model = EntityModel::new(kunde, &base, &id);
    Ok((etag(version), Json(model)).into_response())
}

pub async fn find(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    base: BaseUri,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let kunden = state.queries.dispatch(&ctx, FindKunden { params }).await?;
    if kunden.is_empty() {
        return Err(ApiError::not_found());
    }

    let items = kunden.into_iter().map(|k| (*k.id(), k));
    Ok(Json(CollectionModel::new(items, &base)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    base: BaseUri,
    payload: Result<Json<Kunde>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(kunde) = payload?;
    let result = state.commands.dispatch(&ctx, CreateKunde { kunde }).await?;
    created(result, &base)
}

pub async fn update(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<Kunde>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let version = if_match(&headers)
        .ok_or_else(ApiError::precondition_required)?
        .to_string();
    let Json(kunde) = payload?;

    let cmd = UpdateKunde { id, kunde, version };
    updated(state.commands.dispatch(&ctx, cmd).await?)
}

pub async fn patch(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<Vec<PatchOperation>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let version = if_match(&headers)
        .ok_or_else(ApiError::precondition_required)?
        .to_string();
    let Json(operations) = payload?;

    let cmd = PatchKunde {
        id,
        operations,
        version,
    };
    updated(state.commands.dispatch(&ctx, cmd).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Ok(id) = id.parse() {
        state.commands.dispatch(&ctx, DeleteKunde { id }).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct EmailParam {
    email: Option<String>,
}

pub async fn delete_by_email(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Query(param): Query<EmailParam>,
) -> Result<StatusCode, ApiError> {
    if let Some(email) = param.email {
        state
            .commands
            .dispatch(&ctx, DeleteKundeByEmail { email })
            .await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
