use std::sync::Arc;

use acme_domain::persist::InMemoryRepository;
use bestellung::application::HttpKundeClient;
use bestellung::config::BestellungConfig;
use bestellung::domain::Bestellung;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = BestellungConfig::load()?;
    acme_web::telemetry::init(&cfg.log, "info,bestellung=debug,acme_application=debug")?;
    tracing::info!(
        port = cfg.server.port,
        kunde = %cfg.kunde.base_url,
        auth = cfg.auth.jwt_secret.is_some(),
        "configuration loaded"
    );

    let repo = Arc::new(InMemoryRepository::<Bestellung>::new());
    if cfg.dev.populate {
        let n = bestellung::dev::populate(repo.as_ref()).await?;
        tracing::info!(count = n, "test data loaded");
    }

    let kunden = Arc::new(HttpKundeClient::new(
        cfg.kunde.base_url.clone(),
        cfg.kunde.timeout(),
    )?);

    let router = bestellung::app(&cfg, repo, kunden)?;
    acme_web::server::serve(router, &cfg.server).await
}
