use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use acme_application::error::AppError;
use acme_domain::entity::Entity;
use acme_domain::persist::{InMemoryRepository, Repository};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, ETAG, HOST, IF_MATCH, LOCATION};
use axum::http::{Request, Response, StatusCode};
use bestellung::application::KundeClient;
use bestellung::config::BestellungConfig;
use bestellung::dev::{bestellung_id, kunde_id};
use bestellung::domain::{Bestellung, KundeId};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const B1: &str = "/api/10000000-0000-0000-0000-000000000001";

/// 固定的客户姓氏；记录每次调用转发的 `Authorization`
#[derive(Default)]
struct StubKunden {
    nachnamen: HashMap<KundeId, String>,
    fail: bool,
    calls: Mutex<Vec<(KundeId, Option<String>)>>,
}

impl StubKunden {
    fn with_seed() -> Self {
        let nachnamen = [(1, "Alpha"), (2, "Alpha"), (4, "Delta")]
            .into_iter()
            .map(|(n, name)| (kunde_id(n), name.to_string()))
            .collect();
        Self {
            nachnamen,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<(KundeId, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl KundeClient for StubKunden {
    async fn nachname(
        &self,
        id: &KundeId,
        authorization: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((*id, authorization.map(str::to_string)));
        if self.fail {
            return Err(AppError::Infra("kunde service unavailable".into()));
        }
        Ok(self.nachnamen.get(id).cloned())
    }
}

type Setup = (Router, Arc<InMemoryRepository<Bestellung>>, Arc<StubKunden>);

async fn setup(kunden: StubKunden) -> Setup {
    let repo = Arc::new(InMemoryRepository::<Bestellung>::new());
    bestellung::dev::populate(repo.as_ref()).await.unwrap();
    let kunden = Arc::new(kunden);
    let router =
        bestellung::app(&BestellungConfig::default(), repo.clone(), kunden.clone()).unwrap();
    (router, repo, kunden)
}

fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(HOST, "localhost:8081")
}

async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
    router.clone().oneshot(req).await.unwrap()
}

async fn json_body(resp: Response<Body>) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn find_by_id_fills_kunde_nachname() {
    let (router, _, kunden) = setup(StubKunden::with_seed()).await;

    let req = request("GET", B1)
        .header(AUTHORIZATION, "Bearer abc")
        .body(Body::empty())
        .unwrap();
    let resp = send(&router, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(ETAG).unwrap(), "\"0\"");

    let body = json_body(resp).await;
    assert_eq!(body["kundeNachname"], "Alpha");
    assert_eq!(body["kundeId"], "00000000-0000-0000-0000-000000000001");
    assert_eq!(body["bestellpositionen"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["_links"]["update"]["href"],
        "http://localhost:8081/api/10000000-0000-0000-0000-000000000001"
    );
    assert_eq!(kunden.calls(), vec![(kunde_id(1), Some("Bearer abc".to_string()))]);
}

#[tokio::test]
async fn kunde_service_failure_leaves_nachname_empty() {
    let (router, _, _) = setup(StubKunden {
        fail: true,
        ..StubKunden::default()
    })
    .await;

    let resp = send(&router, request("GET", B1).body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(json_body(resp).await.get("kundeNachname").is_none());
}

#[tokio::test]
async fn find_by_kunde_id() {
    let (router, _, kunden) = setup(StubKunden::with_seed()).await;

    let req = request("GET", "/api?kundeId=00000000-0000-0000-0000-000000000001")
        .body(Body::empty())
        .unwrap();
    let resp = send(&router, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let items = json_body(resp).await["_embedded"]["items"].clone();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|b| b["kundeNachname"] == "Alpha"));
    // 同一客户只查询一次
    assert_eq!(kunden.calls().len(), 1);

    let resp = send(&router, request("GET", "/api").body(Body::empty()).unwrap()).await;
    assert_eq!(json_body(resp).await["_embedded"]["items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn find_rejects_other_parameters() {
    let (router, _, _) = setup(StubKunden::with_seed()).await;

    for uri in [
        "/api?kundeId=keine-uuid",
        "/api?datum=2019-01-01",
        "/api?kundeId=00000000-0000-0000-0000-000000000001&datum=2019-01-01",
        "/api?kundeId=00000000-0000-0000-0000-000000000009",
    ] {
        let resp = send(&router, request("GET", uri).body(Body::empty()).unwrap()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn create_and_validate() {
    let (router, repo, _) = setup(StubKunden::with_seed()).await;

    let body = json!({
        "kundeId": "00000000-0000-0000-0000-000000000002",
        "kundeNachname": "ignoriert",
        "bestellpositionen": [
            {"artikelId": "20000000-0000-0000-0000-000000000003", "einzelpreis": "9.99", "anzahl": 2},
        ],
    });
    let req = request("POST", "/api")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = send(&router, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().get(LOCATION).is_some());
    assert_eq!(repo.len(), 6);

    let invalid = json!({
        "kundeId": "00000000-0000-0000-0000-000000000002",
        "bestellpositionen": [
            {"artikelId": "20000000-0000-0000-0000-000000000003", "einzelpreis": 0, "anzahl": 0},
        ],
    });
    let req = request("POST", "/api")
        .header("content-type", "application/json")
        .body(Body::from(invalid.to_string()))
        .unwrap();
    let resp = send(&router, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(resp).await["details"],
        json!([
            {"property": "bestellpositionen[0].anzahl", "message": "must be greater than or equal to 1"},
            {"property": "bestellpositionen[0].einzelpreis", "message": "must be greater than 0"},
        ])
    );
}

#[tokio::test]
async fn update_protocol() {
    let (router, repo, _) = setup(StubKunden::with_seed()).await;
    let stored = repo.find_by_id(&bestellung_id(1)).await.unwrap().unwrap();
    let body = serde_json::to_string(&stored).unwrap();

    let put = |tag: Option<&str>| {
        let mut builder = request("PUT", B1).header("content-type", "application/json");
        if let Some(tag) = tag {
            builder = builder.header(IF_MATCH, tag);
        }
        builder.body(Body::from(body.clone())).unwrap()
    };

    assert_eq!(send(&router, put(None)).await.status(), StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(send(&router, put(Some("\"x\""))).await.status(), StatusCode::PRECONDITION_FAILED);

    let resp = send(&router, put(Some("\"0\""))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers().get(ETAG).unwrap(), "\"1\"");

    let resp = send(&router, put(Some("\"0\""))).await;
    assert_eq!(resp.status(), StatusCode::PRECONDITION_FAILED);
    assert_eq!(json_body(resp).await["message"], "Falsche Versionsnummer 0");
}

#[tokio::test]
async fn patch_kunde_id_and_datum() {
    let (router, repo, _) = setup(StubKunden::with_seed()).await;
    let ops = json!([
        {"op": "replace", "path": "/kundeId", "value": "00000000-0000-0000-0000-000000000004"},
        {"op": "replace", "path": "/datum", "value": "2020-12-24"},
    ]);
    let req = request("PATCH", B1)
        .header("content-type", "application/json")
        .header(IF_MATCH, "\"0\"")
        .body(Body::from(ops.to_string()))
        .unwrap();
    assert_eq!(send(&router, req).await.status(), StatusCode::NO_CONTENT);

    let saved = repo.find_by_id(&bestellung_id(1)).await.unwrap().unwrap();
    assert_eq!(saved.kunde_id, kunde_id(4));
    assert_eq!(saved.datum.to_string(), "2020-12-24");
    assert_eq!(saved.version().value(), 1);
    assert_eq!(saved.kunde_nachname, None);

    let ops = json!([{"op": "replace", "path": "/bestellpositionen", "value": "x"}]);
    let req = request("PATCH", B1)
        .header("content-type", "application/json")
        .header(IF_MATCH, "\"1\"")
        .body(Body::from(ops.to_string()))
        .unwrap();
    assert_eq!(send(&router, req).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (router, repo, _) = setup(StubKunden::with_seed()).await;
    for _ in 0..2 {
        let resp = send(&router, request("DELETE", B1).body(Body::empty()).unwrap()).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
    assert_eq!(repo.len(), 4);
}
