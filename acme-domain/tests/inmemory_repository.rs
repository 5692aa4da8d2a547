use acme_domain::entity::Entity;
use acme_domain::error::DomainError;
use acme_domain::persist::{InMemoryRepository, Repository, UniqueKey};
use acme_domain::specification::{AnySpecification, spec};
use acme_domain::value_object::Version;
use acme_macros::{entity, entity_id};
use std::sync::Arc;

#[entity_id(copy = true, generate = uuid::Uuid::new_v4)]
struct NoteId(uuid::Uuid);

#[entity(id = NoteId)]
struct Note {
    title: String,
}

fn note(title: &str) -> Note {
    let mut n = Note::new(NoteId::generate(), Version::new());
    n.title = title.to_string();
    n
}

#[tokio::test]
async fn insert_sets_version_zero_and_rejects_duplicates() {
    let repo = InMemoryRepository::<Note>::new();
    let mut n = note("a");
    n.set_version(Version::from_value(9));

    let stored = repo.insert(n.clone()).await.unwrap();
    assert_eq!(stored.version(), Version::new());

    let err = repo.insert(n).await.unwrap_err();
    assert!(matches!(err, DomainError::DuplicateId { .. }));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn save_is_compare_and_swap_on_version() {
    let repo = InMemoryRepository::<Note>::new();
    let stored = repo.insert(note("a")).await.unwrap();

    let mut changed = stored.clone();
    changed.title = "b".into();
    let saved = repo.save(changed.clone(), Version::new()).await.unwrap();
    assert_eq!(saved.version(), Version::from_value(1));

    // 以过期版本再次写入
    let err = repo.save(changed, Version::new()).await.unwrap_err();
    match err {
        DomainError::VersionConflict { expected, actual } => {
            assert_eq!(expected, Version::new());
            assert_eq!(actual, Version::from_value(1));
        }
        other => panic!("unexpected {other:?}"),
    }

    let current = repo.find_by_id(stored.id()).await.unwrap().unwrap();
    assert_eq!(current.title, "b");
    assert_eq!(current.version(), Version::from_value(1));
}

#[tokio::test]
async fn save_unknown_id_is_not_found() {
    let repo = InMemoryRepository::<Note>::new();
    let err = repo.save(note("x"), Version::new()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn find_exists_and_delete_by_specification() {
    let repo = InMemoryRepository::<Note>::new();
    for t in ["alpha", "alpine", "beta"] {
        repo.insert(note(t)).await.unwrap();
    }

    let al = spec(|n: &Note| n.title.starts_with("al"));
    assert_eq!(repo.find(al.as_ref()).await.unwrap().len(), 2);
    assert!(repo.exists(al.as_ref()).await.unwrap());
    assert!(
        !repo
            .exists(spec(|n: &Note| n.title == "gamma").as_ref())
            .await
            .unwrap()
    );

    assert_eq!(repo.delete(al.as_ref()).await.unwrap(), 2);
    assert_eq!(repo.delete(al.as_ref()).await.unwrap(), 0);
    assert_eq!(repo.find(&AnySpecification).await.unwrap().len(), 1);
}

// 同一版本上的并发写入至多一个成功
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_from_same_version() {
    let repo = Arc::new(InMemoryRepository::<Note>::new());
    let stored = repo.insert(note("start")).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let repo = repo.clone();
        let mut n = stored.clone();
        n.title = format!("writer-{i}");
        tasks.push(tokio::spawn(
            async move { repo.save(n, Version::new()).await },
        ));
    }

    let mut ok = 0;
    let mut conflicts = 0;
    for t in tasks {
        match t.await.unwrap() {
            Ok(_) => ok += 1,
            Err(e) if e.is_version_conflict() => conflicts += 1,
            Err(e) => panic!("unexpected {e:?}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(conflicts, 15);

    let current = repo.find_by_id(stored.id()).await.unwrap().unwrap();
    assert_eq!(current.version(), Version::from_value(1));
}

fn titled() -> InMemoryRepository<Note> {
    InMemoryRepository::with_unique_keys(vec![UniqueKey::new("title", |n: &Note| n.title.clone())])
}

#[tokio::test]
async fn unique_key_rejects_insert_and_save() {
    let repo = titled();
    let a = repo.insert(note("a")).await.unwrap();
    repo.insert(note("b")).await.unwrap();

    let err = repo.insert(note("a")).await.unwrap_err();
    assert!(matches!(err, DomainError::UniqueViolation { field: "title", ref value } if value == "a"));

    let mut renamed = a.clone();
    renamed.title = "b".into();
    let err = repo.save(renamed, Version::new()).await.unwrap_err();
    assert!(matches!(err, DomainError::UniqueViolation { field: "title", .. }));

    // 自身保留原值不算冲突
    let saved = repo.save(a, Version::new()).await.unwrap();
    assert_eq!(saved.version(), Version::from_value(1));
    assert_eq!(repo.len(), 2);
}

#[tokio::test]
async fn optional_unique_key_ignores_unset_values() {
    let repo = InMemoryRepository::with_unique_keys(vec![UniqueKey::optional("title", |n: &Note| {
        (!n.title.is_empty()).then(|| n.title.clone())
    })]);
    repo.insert(note("")).await.unwrap();
    repo.insert(note("")).await.unwrap();
    assert!(repo.insert(note("x")).await.is_ok());
    assert!(repo.insert(note("x")).await.is_err());
    assert_eq!(repo.len(), 3);
}

// 并发插入相同唯一值时只有一个成功
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_with_same_unique_value() {
    let repo = Arc::new(titled());
    let mut tasks = Vec::new();
    for _ in 0..16 {
        let repo = repo.clone();
        tasks.push(tokio::spawn(async move { repo.insert(note("same")).await }));
    }

    let mut ok = 0;
    for t in tasks {
        match t.await.unwrap() {
            Ok(_) => ok += 1,
            Err(DomainError::UniqueViolation { .. }) => {}
            Err(e) => panic!("unexpected {e:?}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(repo.len(), 1);
}
