//! 客户的命令、查询及其处理器
//!
mod commands;
mod handlers;
mod notification;
mod queries;

use std::sync::Arc;

use acme_application::error::AppError;
use acme_application::service::EntityService;
use acme_application::timeout::Timeouts;
use acme_application::uniqueness::{UniqueKey, UniquenessChecker};
use acme_application::{InMemoryCommandBus, InMemoryQueryBus};
use acme_domain::persist::{InMemoryRepository, Repository};

use crate::domain::Kunde;

pub use commands::{CreateKunde, DeleteKunde, DeleteKundeByEmail, PatchKunde, UpdateKunde};
pub use handlers::{KundeCommandHandler, KundeQueryHandler};
pub use notification::Notifier;
pub use queries::{
    FindEmailsByPrefix, FindKundeById, FindKunden, FindNachnamenByPrefix, FindVersionById,
};

/// 邮箱与账户名在所有客户中唯一
pub fn unique_keys() -> Vec<UniqueKey<Kunde>> {
    vec![
        UniqueKey::new("email", |k: &Kunde| k.email.clone()),
        UniqueKey::optional("username", |k: &Kunde| k.username.clone()),
    ]
}

pub fn uniqueness() -> UniquenessChecker<Kunde> {
    UniquenessChecker::new(unique_keys())
}

/// 带唯一索引的内存仓储
pub fn repository() -> InMemoryRepository<Kunde> {
    InMemoryRepository::with_unique_keys(unique_keys())
}

/// 账户名只在创建时确定
fn keep_owner(current: &Kunde, incoming: &mut Kunde) {
    incoming.username.clone_from(&current.username);
}

/// 在总线上注册全部处理器
pub fn register(
    repo: Arc<dyn Repository<Kunde>>,
    timeouts: Timeouts,
    notifier: Notifier,
    commands: &InMemoryCommandBus,
    queries: &InMemoryQueryBus,
) -> Result<(), AppError> {
    let service = Arc::new(EntityService::new(repo, uniqueness(), timeouts).with_preserved(keep_owner));

    let command_handler = Arc::new(KundeCommandHandler::new(service.clone(), notifier));
    commands.register::<CreateKunde, _>(command_handler.clone())?;
    commands.register::<UpdateKunde, _>(command_handler.clone())?;
    commands.register::<PatchKunde, _>(command_handler.clone())?;
    commands.register::<DeleteKunde, _>(command_handler.clone())?;
    commands.register::<DeleteKundeByEmail, _>(command_handler)?;

    let query_handler = Arc::new(KundeQueryHandler::new(service));
    queries.register::<FindKundeById, _>(query_handler.clone())?;
    queries.register::<FindKunden, _>(query_handler.clone())?;
    queries.register::<FindNachnamenByPrefix, _>(query_handler.clone())?;
    queries.register::<FindEmailsByPrefix, _>(query_handler.clone())?;
    queries.register::<FindVersionById, _>(query_handler)?;

    tracing::debug!(
        commands = ?commands.registered_commands(),
        queries = ?queries.registered_queries(),
        "kunde handlers registered"
    );
    Ok(())
}
