//! 客户服务的 HTTP 客户端
//!
//! 读取订单时填充 `kundeNachname`。调用方的 `Authorization` 头部原样转发。
//!
use std::time::Duration;

use acme_application::error::AppError;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

use crate::domain::KundeId;

#[async_trait]
pub trait KundeClient: Send + Sync {
    /// 客户的姓氏；客户不存在时为 `None`
    async fn nachname(
        &self,
        id: &KundeId,
        authorization: Option<&str>,
    ) -> Result<Option<String>, AppError>;
}

#[derive(Deserialize)]
struct KundeView {
    nachname: String,
}

pub struct HttpKundeClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpKundeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Infra(format!("kunde client: {e}")))?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl KundeClient for HttpKundeClient {
    async fn nachname(
        &self,
        id: &KundeId,
        authorization: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        let url = format!("{}/api/{id}", self.base_url);
        tracing::debug!(url = %url, "fetching kunde");

        let mut request = self.http.get(&url);
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Infra(format!("GET {url}: {e}")))?;
        match response.status() {
            StatusCode::OK => {
                let kunde: KundeView = response
                    .json()
                    .await
                    .map_err(|e| AppError::Infra(format!("GET {url}: {e}")))?;
                Ok(Some(kunde.nachname))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(AppError::Infra(format!("GET {url}: {status}"))),
        }
    }
}
