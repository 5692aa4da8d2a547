//! REST 接口（前缀 `/api`）
//!
mod handlers;
mod values;

use std::sync::Arc;

use acme_application::{InMemoryCommandBus, InMemoryQueryBus};
use acme_web::auth::Authenticator;
use acme_web::error::ApiError;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::get;

use crate::domain::KundeId;

#[derive(Clone)]
pub struct AppState {
    pub commands: Arc<InMemoryCommandBus>,
    pub queries: Arc<InMemoryQueryBus>,
    pub auth: Authenticator,
}

impl FromRef<AppState> for Authenticator {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api",
            get(handlers::find)
                .post(handlers::create)
                .delete(handlers::delete_by_email),
        )
        .route(
            "/api/{id}",
            get(handlers::find_by_id)
                .put(handlers::update)
                .patch(handlers::patch)
                .delete(handlers::delete),
        )
        .route("/api/nachname/{prefix}", get(values::nachnamen))
        .route("/api/email/{prefix}", get(values::emails))
        .route("/api/version/{id}", get(values::version))
        .with_state(state)
}

/// 无法解析为标识的路径段视为不存在的资源
fn parse_id(raw: &str) -> Result<KundeId, ApiError> {
    raw.parse().map_err(|_| {
        tracing::debug!(id = raw, "malformed kunde id");
        ApiError::not_found()
    })
}
