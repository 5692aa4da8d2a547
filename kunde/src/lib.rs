//! 客户服务（kunde）
//!
//! 客户的增删改查，更新采用基于版本号的乐观并发控制。
//!
pub mod application;
pub mod config;
pub mod dev;
pub mod domain;
pub mod rest;

use std::sync::Arc;

use acme_application::error::AppError;
use acme_application::mail::Mailer;
use acme_application::{InMemoryCommandBus, InMemoryQueryBus};
use acme_domain::persist::Repository;
use acme_web::auth::Authenticator;
use axum::Router;

use crate::application::Notifier;
use crate::config::KundeConfig;
use crate::domain::Kunde;
use crate::rest::AppState;

/// 按配置组装服务，返回完整路由（含 `/health` 与请求追踪）
pub fn app(
    cfg: &KundeConfig,
    repo: Arc<dyn Repository<Kunde>>,
    mailer: Arc<dyn Mailer>,
) -> Result<Router, AppError> {
    let commands = Arc::new(InMemoryCommandBus::new());
    let queries = Arc::new(InMemoryQueryBus::new());
    let notifier = Notifier::new(mailer, cfg.mail.from.clone(), cfg.mail.sales.clone());
    application::register(repo, cfg.timeouts.timeouts(), notifier, &commands, &queries)?;

    let state = AppState {
        commands,
        queries,
        auth: Authenticator::new(&cfg.auth),
    };
    Ok(acme_web::server::finish(rest::router(state)))
}
