use std::sync::Arc;
use std::time::Duration;

use acme_application::mail::{LogMailer, Mailer, SmtpMailer};
use kunde::config::KundeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = KundeConfig::load()?;
    acme_web::telemetry::init(&cfg.log, "info,kunde=debug,acme_application=debug")?;
    tracing::info!(port = cfg.server.port, auth = cfg.auth.jwt_secret.is_some(), "configuration loaded");

    let repo = Arc::new(kunde::application::repository());
    if cfg.dev.populate {
        let n = kunde::dev::populate(repo.as_ref()).await?;
        tracing::info!(count = n, "test data loaded");
    }

    let mailer: Arc<dyn Mailer> = if cfg.mail.enabled {
        Arc::new(SmtpMailer::new(
            cfg.mail.host.clone(),
            cfg.mail.port,
            Duration::from_millis(cfg.mail.timeout_ms),
        ))
    } else {
        Arc::new(LogMailer)
    };

    let router = kunde::app(&cfg, repo, mailer)?;
    acme_web::server::serve(router, &cfg.server).await
}
