//! 进程内命令/查询总线
//!
//! 两条总线共用一个按消息 `TypeId` 索引的注册表。消息与结果在注册表内以
//! `Box<dyn Any + Send>` 擦除类型，调度端再还原。每种消息只允许一个处理器。
//!
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::command::{Command, CommandBus, CommandHandler};
use crate::context::AppContext;
use crate::error::AppError;
use crate::query::{Query, QueryBus, QueryHandler};

type Erased = Box<dyn Any + Send>;

type ErasedFuture<'a> = Pin<Box<dyn Future<Output = Result<Erased, AppError>> + Send + 'a>>;

type ErasedHandler =
    Arc<dyn for<'a> Fn(Erased, &'a AppContext) -> ErasedFuture<'a> + Send + Sync>;

fn unbox<T: 'static>(value: Erased) -> Result<T, AppError> {
    value
        .downcast::<T>()
        .map(|v| *v)
        .map_err(|_| AppError::TypeMismatch {
            expected: type_name::<T>(),
        })
}

struct HandlerRegistry {
    kind: &'static str,
    handlers: DashMap<TypeId, (&'static str, ErasedHandler)>,
}

impl HandlerRegistry {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            handlers: DashMap::new(),
        }
    }

    fn insert<M: 'static>(&self, name: &'static str, handler: ErasedHandler) -> Result<(), AppError> {
        match self.handlers.entry(TypeId::of::<M>()) {
            Entry::Occupied(_) => Err(AppError::AlreadyRegistered {
                kind: self.kind,
                name,
            }),
            Entry::Vacant(slot) => {
                slot.insert((name, handler));
                Ok(())
            }
        }
    }

    async fn call<M, O>(&self, name: &'static str, ctx: &AppContext, message: M) -> Result<O, AppError>
    where
        M: Send + 'static,
        O: Send + 'static,
    {
        let handler = self
            .handlers
            .get(&TypeId::of::<M>())
            .map(|entry| entry.value().1.clone())
            .ok_or(AppError::HandlerNotFound(name))?;

        tracing::debug!(kind = self.kind, name, "dispatch");
        let out = handler(Box::new(message), ctx).await?;
        unbox(out)
    }

    fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.iter().map(|e| e.value().0).collect();
        names.sort_unstable();
        names
    }
}

pub struct InMemoryCommandBus {
    registry: HandlerRegistry,
}

impl Default for InMemoryCommandBus {
    fn default() -> Self {
        Self {
            registry: HandlerRegistry::new("command"),
        }
    }
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |message, ctx| {
            let handler = handler.clone();
            Box::pin(async move {
                let cmd = unbox::<C>(message)?;
                let out = handler.handle(ctx, cmd).await?;
                Ok(Box::new(out) as Erased)
            })
        });
        self.registry.insert::<C>(C::NAME, erased)
    }

    /// 已注册的命令名（按字母序）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        self.registry.names()
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    async fn dispatch<C: Command>(&self, ctx: &AppContext, cmd: C) -> Result<C::Output, AppError> {
        self.registry.call::<C, C::Output>(C::NAME, ctx, cmd).await
    }
}

pub struct InMemoryQueryBus {
    registry: HandlerRegistry,
}

impl Default for InMemoryQueryBus {
    fn default() -> Self {
        Self {
            registry: HandlerRegistry::new("query"),
        }
    }
}

impl InMemoryQueryBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<Q, H>(&self, handler: Arc<H>) -> Result<(), AppError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |message, ctx| {
            let handler = handler.clone();
            Box::pin(async move {
                let q = unbox::<Q>(message)?;
                let out = handler.handle(ctx, q).await?;
                Ok(Box::new(out) as Erased)
            })
        });
        self.registry.insert::<Q>(Q::NAME, erased)
    }

    pub fn registered_queries(&self) -> Vec<&'static str> {
        self.registry.names()
    }
}

#[async_trait]
impl QueryBus for InMemoryQueryBus {
    async fn dispatch<Q: Query>(&self, ctx: &AppContext, q: Q) -> Result<Q::Output, AppError> {
        self.registry.call::<Q, Q::Output>(Q::NAME, ctx, q).await
    }
}
