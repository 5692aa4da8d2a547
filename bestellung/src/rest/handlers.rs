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

use super::{AppState, parse_id};
use crate::application::{
    CreateBestellung, DeleteBestellung, FindBestellungById, FindBestellungen, PatchBestellung,
    UpdateBestellung,
};
use crate::domain::{Bestellung, KundeId};

pub async fn find_by_id(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    base: BaseUri,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let bestellung = found(
        state
            .queries
            .dispatch(&ctx, FindBestellungById { id })
            .await?,
    )?;

    let version = bestellung.version();
    if not_modified(&headers, version) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let model = EntityModel::new(bestellung, &base, &id);
    Ok((etag(version), Json(model)).into_response())
}

/// 只接受可选的 `kundeId` 参数，其余参数组合一律 404
fn kunde_filter(params: &[(String, String)]) -> Result<Option<KundeId>, ApiError> {
    match params {
        [] => Ok(None),
        [(key, value)] if key == "kundeId" => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::not_found()),
        _ => Err(ApiError::not_found()),
    }
}

pub async fn find(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    base: BaseUri,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let kunde_id = kunde_filter(&params)?;
    let bestellungen = state
        .queries
        .dispatch(&ctx, FindBestellungen { kunde_id })
        .await?;
    if bestellungen.is_empty() {
        return Err(ApiError::not_found());
    }

    let items = bestellungen.into_iter().map(|b| (*b.id(), b));
    Ok(Json(CollectionModel::new(items, &base)).into_response())
}

pub async fn create(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    base: BaseUri,
    payload: Result<Json<Bestellung>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(bestellung) = payload?;
    let result = state
        .commands
        .dispatch(&ctx, CreateBestellung { bestellung })
        .await?;
    created(result, &base)
}

pub async fn update(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<Bestellung>, JsonRejection>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let version = if_match(&headers)
        .ok_or_else(ApiError::precondition_required)?
        .to_string();
    let Json(bestellung) = payload?;

    let cmd = UpdateBestellung {
        id,
        bestellung,
        version,
    };
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

    let cmd = PatchBestellung {
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
        state.commands.dispatch(&ctx, DeleteBestellung { id }).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
