use std::collections::BTreeSet;
use std::sync::Arc;

use acme_application::command::CommandHandler;
use acme_application::context::AppContext;
use acme_application::error::AppError;
use acme_application::query::QueryHandler;
use acme_application::result::{CreateResult, FindByIdResult, UpdateResult};
use acme_application::service::EntityService;
use acme_domain::entity::Entity;
use acme_domain::validation::Validate;
use acme_domain::specification::Specification;
use acme_domain::value_object::Version;
use async_trait::async_trait;

use super::commands::{CreateKunde, DeleteKunde, DeleteKundeByEmail, PatchKunde, UpdateKunde};
use super::notification::Notifier;
use super::queries::{
    FindEmailsByPrefix, FindKundeById, FindKunden, FindNachnamenByPrefix, FindVersionById,
};
use crate::domain::{
    Kunde, KundeId, by_email, by_id, by_username, email_prefix, kunde_filter, nachname_prefix,
};

pub struct KundeCommandHandler {
    service: Arc<EntityService<Kunde>>,
    notifier: Notifier,
}

impl KundeCommandHandler {
    pub fn new(service: Arc<EntityService<Kunde>>, notifier: Notifier) -> Self {
        Self { service, notifier }
    }
}

#[async_trait]
impl CommandHandler<CreateKunde> for KundeCommandHandler {
    async fn handle(
        &self,
        ctx: &AppContext,
        cmd: CreateKunde,
    ) -> Result<CreateResult<Kunde>, AppError> {
        let mut kunde = cmd.kunde;
        let violations = kunde.validate();
        if !violations.is_empty() {
            return Ok(CreateResult::ConstraintViolations(violations));
        }

        // 非管理员只能为自己的账户创建客户
        if !ctx.is_admin() {
            kunde.username = ctx.username().map(str::to_owned);
        }
        if kunde.username.as_deref().is_none_or(|u| u.trim().is_empty()) {
            tracing::debug!(caller = ?ctx.username(), "create without account");
            return Ok(CreateResult::InvalidAccount);
        }

        if kunde.id().is_nil() {
            kunde.set_id(KundeId::generate());
        }

        let result = self.service.create(kunde).await?;
        if let CreateResult::Success(created) = &result {
            self.notifier.kunde_created(created).await;
        }
        Ok(result)
    }
}

#[async_trait]
impl CommandHandler<UpdateKunde> for KundeCommandHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        cmd: UpdateKunde,
    ) -> Result<UpdateResult<Kunde>, AppError> {
        self.service.update(&cmd.id, cmd.kunde, &cmd.version).await
    }
}

#[async_trait]
impl CommandHandler<PatchKunde> for KundeCommandHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        cmd: PatchKunde,
    ) -> Result<UpdateResult<Kunde>, AppError> {
        self.service
            .patch(&cmd.id, &cmd.operations, &cmd.version)
            .await
    }
}

#[async_trait]
impl CommandHandler<DeleteKunde> for KundeCommandHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: DeleteKunde) -> Result<usize, AppError> {
        let count = self.service.delete(by_id(cmd.id).as_ref()).await?;
        tracing::info!(id = %cmd.id, count, "kunde deleted");
        Ok(count)
    }
}

#[async_trait]
impl CommandHandler<DeleteKundeByEmail> for KundeCommandHandler {
    async fn handle(&self, _ctx: &AppContext, cmd: DeleteKundeByEmail) -> Result<usize, AppError> {
        let count = self.service.delete(by_email(&cmd.email).as_ref()).await?;
        tracing::info!(email = %cmd.email, count, "kunde deleted");
        Ok(count)
    }
}

pub struct KundeQueryHandler {
    service: Arc<EntityService<Kunde>>,
}

impl KundeQueryHandler {
    pub fn new(service: Arc<EntityService<Kunde>>) -> Self {
        Self { service }
    }
}

fn may_read(ctx: &AppContext, kunde: &Kunde) -> bool {
    if ctx.is_admin() {
        return true;
    }
    match (ctx.username(), kunde.username.as_deref()) {
        (Some(caller), Some(owner)) => caller == owner,
        _ => false,
    }
}

#[async_trait]
impl QueryHandler<FindKundeById> for KundeQueryHandler {
    async fn handle(
        &self,
        ctx: &AppContext,
        q: FindKundeById,
    ) -> Result<FindByIdResult<Kunde>, AppError> {
        let Some(kunde) = self.service.find_by_id(&q.id).await? else {
            return Ok(FindByIdResult::NotFound);
        };
        if !may_read(ctx, &kunde) {
            tracing::debug!(id = %q.id, username = ?ctx.username(), "access forbidden");
            return Ok(FindByIdResult::AccessForbidden(ctx.roles().to_vec()));
        }
        Ok(FindByIdResult::Success(kunde))
    }
}

#[async_trait]
impl QueryHandler<FindKunden> for KundeQueryHandler {
    async fn handle(&self, ctx: &AppContext, q: FindKunden) -> Result<Vec<Kunde>, AppError> {
        let filter = kunde_filter(&q.params);
        // 非管理员只能看到自己的客户记录
        let found = if ctx.is_admin() {
            self.service.find(filter.as_ref()).await?
        } else {
            let own = filter.and(by_username(ctx.username()));
            self.service.find(&own).await?
        };
        tracing::debug!(count = found.len(), "kunden found");
        Ok(found)
    }
}

#[async_trait]
impl QueryHandler<FindNachnamenByPrefix> for KundeQueryHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        q: FindNachnamenByPrefix,
    ) -> Result<Vec<String>, AppError> {
        let found = self.service.find(nachname_prefix(&q.prefix).as_ref()).await?;
        let nachnamen: BTreeSet<String> = found.into_iter().map(|k| k.nachname).collect();
        Ok(nachnamen.into_iter().collect())
    }
}

#[async_trait]
impl QueryHandler<FindEmailsByPrefix> for KundeQueryHandler {
    async fn handle(&self, _ctx: &AppContext, q: FindEmailsByPrefix) -> Result<Vec<String>, AppError> {
        let found = self.service.find(email_prefix(&q.prefix).as_ref()).await?;
        let emails: BTreeSet<String> = found.into_iter().map(|k| k.email).collect();
        Ok(emails.into_iter().collect())
    }
}

#[async_trait]
impl QueryHandler<FindVersionById> for KundeQueryHandler {
    async fn handle(
        &self,
        _ctx: &AppContext,
        q: FindVersionById,
    ) -> Result<Option<Version>, AppError> {
        Ok(self.service.find_by_id(&q.id).await?.map(|k| k.version()))
    }
}
