use std::collections::HashMap;
use std::sync::Arc;

use acme_application::command::CommandHandler;
use acme_application::context::AppContext;
use acme_application::error::AppError;
use acme_application::query::QueryHandler;
use acme_application::result::{CreateResult, FindByIdResult, UpdateResult};
use acme_application::service::EntityService;
use acme_domain::entity::Entity;
use acme_domain::specification::AnySpecification;
use async_trait::async_trait;

use super::commands::{CreateBestellung, DeleteBestellung, PatchBestellung, UpdateBestellung};
use super::kunde_client::KundeClient;
use super::queries::{FindBestellungById, FindBestellungen};
use crate::domain::{Bestellung, BestellungId, KundeId, by_id, by_kunde_id};

pub struct BestellungCommandHandler {
    service: Arc<EntityService<Bestellung>>,
}

impl BestellungCommandHandler {
    pub fn new(service: Arc<EntityService<Bestellung>>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler<CreateBestellung> for BestellungCommandHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        cmd: CreateBestellung,
    ) -> Result<CreateResult<Bestellung>, AppError> {
        let mut bestellung = cmd.bestellung;
        if bestellung.id().is_nil() {
            bestellung.set_id(BestellungId::generate());
        }
        bestellung.kunde_nachname = None;
        self.service.create(bestellung).await
    }
}

#[async_trait]
impl CommandHandler<UpdateBestellung> for BestellungCommandHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        cmd: UpdateBestellung,
    ) -> Result<UpdateResult<Bestellung>, AppError> {
        let mut bestellung = cmd.bestellung;
        bestellung.kunde_nachname = None;
        self.service.update(&cmd.id, bestellung, &cmd.version).await
    }
}

#[async_trait]
impl CommandHandler<PatchBestellung> for BestellungCommandHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        cmd: PatchBestellung,
    ) -> Result<UpdateResult<Bestellung>, AppError> {
        self.service
            .patch(&cmd.id, &cmd.operations, &cmd.version)
            .await
    }
}

#[async_trait]
impl CommandHandler<DeleteBestellung> for BestellungCommandHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: DeleteBestellung) -> Result<usize, AppError> {
        let count = self.service.delete(by_id(cmd.id).as_ref()).await?;
        tracing::info!(id = %cmd.id, count, "bestellung deleted");
        Ok(count)
    }
}

pub struct BestellungQueryHandler {
    service: Arc<EntityService<Bestellung>>,
    kunden: Arc<dyn KundeClient>,
}

impl BestellungQueryHandler {
    pub fn new(service: Arc<EntityService<Bestellung>>, kunden: Arc<dyn KundeClient>) -> Self {
        Self { service, kunden }
    }

    /// 查询客户姓氏；失败只记录日志
    async fn nachname(&self, ctx: &AppContext, kunde_id: &KundeId) -> Option<String> {
        match self
            .kunden
            .nachname(kunde_id, ctx.authorization.as_deref())
            .await
        {
            Ok(nachname) => nachname,
            Err(e) => {
                tracing::warn!(kunde_id = %kunde_id, error = %e, "kunde lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl QueryHandler<FindBestellungById> for BestellungQueryHandler {
    async fn handle(
        &self,
        ctx: &AppContext,
        q: FindBestellungById,
    ) -> Result<FindByIdResult<Bestellung>, AppError> {
        let Some(mut bestellung) = self.service.find_by_id(&q.id).await? else {
            return Ok(FindByIdResult::NotFound);
        };
        bestellung.kunde_nachname = self.nachname(ctx, &bestellung.kunde_id).await;
        Ok(FindByIdResult::Success(bestellung))
    }
}

#[async_trait]
impl QueryHandler<FindBestellungen> for BestellungQueryHandler {
    async fn handle(
        &self,
        ctx: &AppContext,
        q: FindBestellungen,
    ) -> Result<Vec<Bestellung>, AppError> {
        let mut found = match q.kunde_id {
            Some(kunde_id) => self.service.find(by_kunde_id(kunde_id).as_ref()).await?,
            None => self.service.find(&AnySpecification).await?,
        };
        found.sort_by_key(|b| b.datum);

        // 每个客户只查询一次
        let mut nachnamen: HashMap<KundeId, Option<String>> = HashMap::new();
        for bestellung in &mut found {
            let kunde_id = bestellung.kunde_id;
            if !nachnamen.contains_key(&kunde_id) {
                let nachname = self.nachname(ctx, &kunde_id).await;
                nachnamen.insert(kunde_id, nachname);
            }
            bestellung.kunde_nachname = nachnamen.get(&kunde_id).cloned().flatten();
        }
        tracing::debug!(count = found.len(), "bestellungen found");
        Ok(found)
    }
}
