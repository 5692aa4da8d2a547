//! 订单服务（bestellung）
//!
//! 订单的增删改查；读取时通过客户服务补充客户姓氏。
//!
pub mod application;
pub mod config;
pub mod dev;
pub mod domain;
pub mod rest;

use std::sync::Arc;

use acme_application::error::AppError;
use acme_application::{InMemoryCommandBus, InMemoryQueryBus};
use acme_domain::persist::Repository;
use acme_web::auth::Authenticator;
use axum::Router;

use crate::application::KundeClient;
use crate::config::BestellungConfig;
use crate::domain::Bestellung;
use crate::rest::AppState;

/// 按配置组装服务，返回完整路由（含 `/health` 与请求追踪）
pub fn app(
    cfg: &BestellungConfig,
    repo: Arc<dyn Repository<Bestellung>>,
    kunden: Arc<dyn KundeClient>,
) -> Result<Router, AppError> {
    let commands = Arc::new(InMemoryCommandBus::new());
    let queries = Arc::new(InMemoryQueryBus::new());
    application::register(repo, cfg.timeouts.timeouts(), kunden, &commands, &queries)?;

    let state = AppState {
        commands,
        queries,
        auth: Authenticator::new(&cfg.auth),
    };
    Ok(acme_web::server::finish(rest::router(state)))
}
