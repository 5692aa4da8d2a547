use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

async fn health() -> StatusCode {
    StatusCode::OK
}

/// 追加 `/health` 与请求追踪
pub fn finish(router: Router) -> Router {
    router
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

/// 监听并服务，收到 Ctrl-C 后优雅关闭
pub async fn serve(router: Router, cfg: &ServerConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(cfg.bind_address()).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutdown requested");
}
