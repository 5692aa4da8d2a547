use std::sync::{Arc, Mutex};

use acme_application::command::CommandBus;
use acme_application::context::{AppContext, BusinessContext};
use acme_application::mail::{MailMessage, Mailer, SendResult};
use acme_application::query::QueryBus;
use acme_application::result::{CreateResult, FindByIdResult, UpdateResult};
use acme_application::timeout::Timeouts;
use acme_application::{InMemoryCommandBus, InMemoryQueryBus};
use acme_domain::entity::Entity;
use acme_domain::persist::{InMemoryRepository, Repository};
use acme_domain::value_object::Version;
use async_trait::async_trait;
use kunde::application::{
    CreateKunde, FindKundeById, FindKunden, FindVersionById, Notifier, UpdateKunde,
};
use kunde::dev::kunde_id;
use kunde::domain::{Adresse, Kunde, KundeId};

struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    outcome: SendResult,
}

impl RecordingMailer {
    fn new(outcome: SendResult) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            outcome,
        }
    }

    fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> SendResult {
        self.sent.lock().unwrap().push(message.clone());
        self.outcome.clone()
    }
}

struct Fixture {
    commands: InMemoryCommandBus,
    queries: InMemoryQueryBus,
    repo: Arc<InMemoryRepository<Kunde>>,
    mailer: Arc<RecordingMailer>,
}

async fn fixture(outcome: SendResult) -> Fixture {
    let repo = Arc::new(kunde::application::repository());
    kunde::dev::populate(repo.as_ref()).await.unwrap();

    let mailer = Arc::new(RecordingMailer::new(outcome));
    let notifier = Notifier::new(mailer.clone(), "shop@acme.de", "sales@acme.de");
    let commands = InMemoryCommandBus::new();
    let queries = InMemoryQueryBus::new();
    kunde::application::register(
        repo.clone(),
        Timeouts::default(),
        notifier,
        &commands,
        &queries,
    )
    .unwrap();

    Fixture {
        commands,
        queries,
        repo,
        mailer,
    }
}

fn neu() -> Kunde {
    let mut k = Kunde::default();
    k.nachname = "Neu".into();
    k.email = "neu@acme.de".into();
    k.adresse = Adresse::new("76133", "Karlsruhe");
    k.username = Some("neu".into());
    k
}

fn user(name: &str) -> AppContext {
    AppContext {
        biz: BusinessContext::builder()
            .actor_id(name.to_string())
            .roles(vec!["kunde".to_string()])
            .build(),
        authorization: None,
    }
}

#[tokio::test]
async fn create_generates_id_and_sends_mail() {
    let f = fixture(SendResult::Success).await;
    let ctx = AppContext::admin();

    let result = f
        .commands
        .dispatch(&ctx, CreateKunde { kunde: neu() })
        .await
        .unwrap();
    let CreateResult::Success(created) = result else {
        panic!("expected success, got {result:?}");
    };
    assert!(!created.id().is_nil());
    assert!(created.version().is_new());

    let sent = f.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, format!("Neuer Kunde {}", created.id()));
    assert_eq!(sent[0].html_body, "<b>Neuer Kunde:</b> <i>Neu</i>");
    assert_eq!(sent[0].to, "sales@acme.de");
}

#[tokio::test]
async fn mail_failure_does_not_fail_create() {
    let f = fixture(SendResult::SendError("connection refused".into())).await;

    let result = f
        .commands
        .dispatch(&AppContext::admin(), CreateKunde { kunde: neu() })
        .await
        .unwrap();
    assert!(matches!(result, CreateResult::Success(_)));
    assert_eq!(f.repo.len(), 8);
}

#[tokio::test]
async fn rejected_create_sends_no_mail() {
    let f = fixture(SendResult::Success).await;
    let mut kunde = neu();
    kunde.email = "alpha@acme.edu".into();

    let result = f
        .commands
        .dispatch(&AppContext::admin(), CreateKunde { kunde })
        .await
        .unwrap();
    assert_eq!(
        result,
        CreateResult::AlreadyExists {
            field: "email",
            value: "alpha@acme.edu".into()
        }
    );
    assert!(f.mailer.sent().is_empty());
}

#[tokio::test]
async fn find_by_id_checks_ownership() {
    let f = fixture(SendResult::Success).await;
    let ctx = user("alpha1");

    let own = f
        .queries
        .dispatch(&ctx, FindKundeById { id: kunde_id(1) })
        .await
        .unwrap();
    assert!(matches!(own, FindByIdResult::Success(k) if k.username.as_deref() == Some("alpha1")));

    let other = f
        .queries
        .dispatch(&ctx, FindKundeById { id: kunde_id(2) })
        .await
        .unwrap();
    assert_eq!(other, FindByIdResult::AccessForbidden(vec!["kunde".into()]));

    let missing = f
        .queries
        .dispatch(&ctx, FindKundeById { id: KundeId::generate() })
        .await
        .unwrap();
    assert_eq!(missing, FindByIdResult::NotFound);
}

#[tokio::test]
async fn find_with_filter_and_version() {
    let f = fixture(SendResult::Success).await;
    let ctx = AppContext::admin();

    let params = vec![("plz".to_string(), "4".to_string())];
    let found = f.queries.dispatch(&ctx, FindKunden { params }).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].nachname, "Delta");

    let version = f
        .queries
        .dispatch(&ctx, FindVersionById { id: kunde_id(4) })
        .await
        .unwrap();
    assert_eq!(version, Some(Version::new()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_from_same_version() {
    let f = Arc::new(fixture(SendResult::Success).await);
    let base = f.repo.find_by_id(&kunde_id(3)).await.unwrap().unwrap();

    let mut tasks = Vec::new();
    for n in 0..8 {
        let f = f.clone();
        let mut kunde = base.clone();
        kunde.kategorie = n;
        tasks.push(tokio::spawn(async move {
            let cmd = UpdateKunde {
                id: kunde_id(3),
                kunde,
                version: "\"0\"".into(),
            };
            f.commands.dispatch(&AppContext::admin(), cmd).await.unwrap()
        }));
    }

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            UpdateResult::Success(k) => {
                successes += 1;
                assert_eq!(k.version(), Version::from_value(1));
            }
            UpdateResult::VersionOutdated(v) => assert_eq!(v, Version::new()),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(successes, 1);
    let stored = f.repo.find_by_id(&kunde_id(3)).await.unwrap().unwrap();
    assert_eq!(stored.version(), Version::from_value(1));
}

#[tokio::test]
async fn create_without_account_is_invalid() {
    let f = fixture(SendResult::Success).await;
    let mut kunde = neu();
    kunde.username = None;

    let result = f
        .commands
        .dispatch(&AppContext::admin(), CreateKunde { kunde })
        .await
        .unwrap();
    assert_eq!(result, CreateResult::InvalidAccount);
    assert!(f.mailer.sent().is_empty());
    assert_eq!(f.repo.len(), 7);

    // 约束违反优先于账户检查
    let mut kunde = neu();
    kunde.username = None;
    kunde.email = "kaputt".into();
    let result = f
        .commands
        .dispatch(&AppContext::admin(), CreateKunde { kunde })
        .await
        .unwrap();
    assert!(matches!(result, CreateResult::ConstraintViolations(_)));
}

#[tokio::test]
async fn create_with_taken_username() {
    let f = fixture(SendResult::Success).await;
    let mut kunde = neu();
    kunde.username = Some("alpha1".into());

    let result = f
        .commands
        .dispatch(&AppContext::admin(), CreateKunde { kunde })
        .await
        .unwrap();
    assert_eq!(
        result,
        CreateResult::AlreadyExists {
            field: "username",
            value: "alpha1".into()
        }
    );
    assert_eq!(f.repo.len(), 7);
}

#[tokio::test]
async fn non_admin_creates_for_own_account() {
    let f = fixture(SendResult::Success).await;
    let mut kunde = neu();
    kunde.username = Some("alpha2".into());

    let result = f
        .commands
        .dispatch(&user("neukunde"), CreateKunde { kunde })
        .await
        .unwrap();
    let CreateResult::Success(created) = result else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(created.username.as_deref(), Some("neukunde"));

    // 调用者没有账户名
    let anonymous = AppContext {
        biz: BusinessContext::builder().roles(vec!["kunde".to_string()]).build(),
        authorization: None,
    };
    let mut kunde = neu();
    kunde.email = "anonym@acme.de".into();
    let result = f
        .commands
        .dispatch(&anonymous, CreateKunde { kunde })
        .await
        .unwrap();
    assert_eq!(result, CreateResult::InvalidAccount);
}

#[tokio::test]
async fn update_keeps_owner() {
    let f = fixture(SendResult::Success).await;
    let mut kunde = f.repo.find_by_id(&kunde_id(2)).await.unwrap().unwrap();
    kunde.username = Some("alpha1".into());
    kunde.nachname = "Umbenannt".into();

    let cmd = UpdateKunde {
        id: kunde_id(2),
        kunde,
        version: "\"0\"".into(),
    };
    let result = f.commands.dispatch(&user("alpha1"), cmd).await.unwrap();
    assert!(result.is_success(), "{result:?}");

    let stored = f.repo.find_by_id(&kunde_id(2)).await.unwrap().unwrap();
    assert_eq!(stored.nachname, "Umbenannt");
    assert_eq!(stored.username.as_deref(), Some("alpha2"));

    let other = f
        .queries
        .dispatch(&user("alpha1"), FindKundeById { id: kunde_id(2) })
        .await
        .unwrap();
    assert!(matches!(other, FindByIdResult::AccessForbidden(_)));
}

#[tokio::test]
async fn non_admin_finds_only_own_records() {
    let f = fixture(SendResult::Success).await;

    let found = f
        .queries
        .dispatch(&user("alpha1"), FindKunden::default())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username.as_deref(), Some("alpha1"));

    let all = f
        .queries
        .dispatch(&AppContext::admin(), FindKunden::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 7);
}
