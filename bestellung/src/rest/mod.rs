//! REST 接口（前缀 `/api`）
//!
mod handlers;

use std::sync::Arc;

use acme_application::{InMemoryCommandBus, InMemoryQueryBus};
use acme_web::auth::Authenticator;
use acme_web::error::ApiError;
use axum::Router;
use axum::extract::FromRef;
use axum::routing::get;

use crate::domain::BestellungId;

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
        .route("/api", get(handlers::find).post(handlers::create))
        .route(
            "/api/{id}",
            get(handlers::find_by_id)
                .put(handlers::update)
                .patch(handlers::patch)
                .delete(handlers::delete),
        )
        .with_state(state)
}

fn parse_id(raw: &str) -> Result<BestellungId, ApiError> {
    raw.parse().map_err(|_| {
        tracing::debug!(id = raw, "malformed bestellung id");
        ApiError::not_found()
    })
}
