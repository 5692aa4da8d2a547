//! HAL 风格的响应包装
//!
//! 单个实体：实体字段 + `_links`（self、list、add、update、remove）。
//! 集合：`_embedded.items`，每项只带 `self` 链接，外层带集合自身的 `self` 链接。
//!
use std::convert::Infallible;
use std::fmt::Display;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::HOST;
use axum::http::request::Parts;
use serde::Serialize;

/// 资源的基础 URI，例如 `https://acme.de/kunden/api`
///
/// 存在 `X-Forwarded-Host` 时取 `X-Forwarded-Proto`、`X-Forwarded-Host`、`X-Forwarded-Prefix`；
/// 否则取 `Host`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUri(pub String);

impl BaseUri {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        let uri = match get("x-forwarded-host") {
            Some(host) => {
                let proto = get("x-forwarded-proto").unwrap_or("http");
                let prefix = get("x-forwarded-prefix").unwrap_or("");
                format!("{proto}://{host}{prefix}/api")
            }
            None => {
                let host = headers
                    .get(HOST)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("localhost");
                format!("http://{host}/api")
            }
        };
        Self(uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn item(&self, id: &impl Display) -> String {
        format!("{}/{id}", self.0)
    }
}

impl<S> FromRequestParts<S> for BaseUri
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub list: Link,
    pub add: Link,
    pub update: Link,
    pub remove: Link,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelfLink {
    #[serde(rename = "self")]
    pub self_link: Link,
}

/// 单个实体
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: EntityLinks,
}

impl<T> EntityModel<T> {
    pub fn new(content: T, base: &BaseUri, id: &impl Display) -> Self {
        let item = base.item(id);
        Self {
            content,
            links: EntityLinks {
                self_link: Link::new(item.clone()),
                list: Link::new(base.as_str()),
                add: Link::new(base.as_str()),
                update: Link::new(item.clone()),
                remove: Link::new(item),
            },
        }
    }
}

/// 集合中的一项
#[derive(Debug, Clone, Serialize)]
pub struct ItemModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: SelfLink,
}

#[derive(Debug, Clone, Serialize)]
pub struct Embedded<T> {
    pub items: Vec<ItemModel<T>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionModel<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
    #[serde(rename = "_links")]
    pub links: SelfLink,
}

impl<T> CollectionModel<T> {
    /// `items` 为（标识，内容）对
    pub fn new<I, Id>(items: I, base: &BaseUri) -> Self
    where
        I: IntoIterator<Item = (Id, T)>,
        Id: Display,
    {
        let items = items
            .into_iter()
            .map(|(id, content)| ItemModel {
                content,
                links: SelfLink {
                    self_link: Link::new(base.item(&id)),
                },
            })
            .collect();
        Self {
            embedded: Embedded { items },
            links: SelfLink {
                self_link: Link::new(base.as_str()),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.embedded.items.is_empty()
    }
}
