//! 订单的命令、查询及其处理器
//!
mod commands;
mod handlers;
mod kunde_client;
mod queries;

use std::sync::Arc;

use acme_application::error::AppError;
use acme_application::service::EntityService;
use acme_application::timeout::Timeouts;
use acme_application::uniqueness::UniquenessChecker;
use acme_application::{InMemoryCommandBus, InMemoryQueryBus};
use acme_domain::persist::Repository;

use crate::domain::Bestellung;

pub use commands::{CreateBestellung, DeleteBestellung, PatchBestellung, UpdateBestellung};
pub use handlers::{BestellungCommandHandler, BestellungQueryHandler};
pub use kunde_client::{HttpKundeClient, KundeClient};
pub use queries::{FindBestellungById, FindBestellungen};

/// 在总线上注册全部处理器；订单没有唯一字段
pub fn register(
    repo: Arc<dyn Repository<Bestellung>>,
    timeouts: Timeouts,
    kunden: Arc<dyn KundeClient>,
    commands: &InMemoryCommandBus,
    queries: &InMemoryQueryBus,
) -> Result<(), AppError> {
    let service = Arc::new(EntityService::new(repo, UniquenessChecker::none(), timeouts));

    let command_handler = Arc::new(BestellungCommandHandler::new(service.clone()));
    commands.register::<CreateBestellung, _>(command_handler.clone())?;
    commands.register::<UpdateBestellung, _>(command_handler.clone())?;
    commands.register::<PatchBestellung, _>(command_handler.clone())?;
    commands.register::<DeleteBestellung, _>(command_handler)?;

    let query_handler = Arc::new(BestellungQueryHandler::new(service, kunden));
    queries.register::<FindBestellungById, _>(query_handler.clone())?;
    queries.register::<FindBestellungen, _>(query_handler)?;

    tracing::debug!(
        commands = ?commands.registered_commands(),
        queries = ?queries.registered_queries(),
        "bestellung handlers registered"
    );
    Ok(())
}
