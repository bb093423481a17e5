use folio::config::{ContentBackend, ContentConfig, DatabaseConfig};
use folio::content::types::{Contact, Project, SkillCategory};
use folio::content::ContentStore;
use folio::error::AppError;
use serde_json::json;

async fn open_store(backend: ContentBackend) -> (ContentStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = DatabaseConfig {
        path: dir.path().join("folio.db"),
        pool_size: 4,
    };
    let pool = folio::storage::sqlite::create_pool(&db).unwrap();
    folio::storage::sqlite::init_pool(&pool).await.unwrap();

    let config = ContentConfig {
        backend,
        document_path: dir.path().join("content.json"),
    };
    let store = ContentStore::open(&config, pool).await.unwrap();
    (store, dir)
}

fn projects(ids: &[&str]) -> Vec<Project> {
    ids.iter()
        .map(|id| {
            serde_json::from_value(json!({
                "id": id,
                "title": {"ru": "Проект", "en": "Project"},
                "order": 100,
            }))
            .unwrap()
        })
        .collect()
}

fn categories(value: serde_json::Value) -> Vec<SkillCategory> {
    serde_json::from_value(value).unwrap()
}

const BACKENDS: [ContentBackend; 2] = [ContentBackend::Sqlite, ContentBackend::Document];

#[tokio::test]
async fn test_seed_runs_once() {
    for backend in BACKENDS {
        let dir = tempfile::tempdir().unwrap();
        let db = DatabaseConfig {
            path: dir.path().join("folio.db"),
            pool_size: 2,
        };
        let pool = folio::storage::sqlite::create_pool(&db).unwrap();
        folio::storage::sqlite::init_pool(&pool).await.unwrap();
        let config = ContentConfig {
            backend,
            document_path: dir.path().join("content.json"),
        };

        let store = ContentStore::open(&config, pool.clone()).await.unwrap();
        store.update_projects(Vec::new()).await.unwrap();
        drop(store);

        // Reopening must not re-seed over edited content
        let store = ContentStore::open(&config, pool).await.unwrap();
        assert!(store.get_projects().await.unwrap().is_empty(), "{backend:?}");
        assert_eq!(store.get_contacts().await.unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_projects_empty_then_three() {
    for backend in BACKENDS {
        let (store, _dir) = open_store(backend).await;

        assert!(store.update_projects(Vec::new()).await.unwrap().is_empty());
        assert!(store.get_projects().await.unwrap().is_empty());

        let stored = store
            .update_projects(projects(&["x", "y", "z"]))
            .await
            .unwrap();
        let fetched = store.get_projects().await.unwrap();
        assert_eq!(fetched, stored, "{backend:?}");

        let ids: Vec<&str> = fetched.iter().map(|p| p.id.as_str()).collect();
        let orders: Vec<i64> = fetched.iter().map(|p| p.order).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
        assert_eq!(orders, vec![1, 2, 3]);
    }
}

#[tokio::test]
async fn test_skills_replace_drops_old_skills() {
    for backend in BACKENDS {
        let (store, _dir) = open_store(backend).await;

        let next = categories(json!([
            {
                "id": "backend",
                "title": {"ru": "Бэкенд", "en": "Backend"},
                "badge": {"ru": "Основное", "en": "Main"},
                "skills": [
                    {"id": "rust", "name": "Rust"},
                    {"id": "go", "name": "Go"}
                ]
            },
            {
                "id": "learning",
                "title": {"ru": "Изучаю", "en": "Learning"},
                "is_learning": true,
                "skills": [{"id": "zig", "name": "Zig"}]
            }
        ]));
        store.update_skills(next).await.unwrap();

        let fetched = store.get_skills().await.unwrap();
        assert_eq!(fetched.len(), 2, "{backend:?}");
        assert_eq!(fetched[0].order, 1);
        assert_eq!(fetched[1].order, 2);
        assert!(fetched[1].is_learning);
        assert_eq!(fetched[0].badge.as_ref().map(|b| b.en.as_str()), Some("Main"));
        let names: Vec<&str> = fetched[0].skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "Go"]);
        assert!(fetched
            .iter()
            .flat_map(|c| c.skills.iter())
            .all(|s| s.id != "typescript"));
    }
}

#[tokio::test]
async fn test_duplicate_ids_rejected_before_write() {
    for backend in BACKENDS {
        let (store, _dir) = open_store(backend).await;

        let dup_skills = categories(json!([
            {"id": "a", "title": {"ru": "А", "en": "A"}, "skills": [{"id": "rust", "name": "Rust"}]},
            {"id": "b", "title": {"ru": "Б", "en": "B"}, "skills": [{"id": "rust", "name": "Rust"}]}
        ]));
        let err = store.update_skills(dup_skills).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{backend:?}");

        let err = store
            .update_projects(projects(&["p", "p"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let contacts: Vec<Contact> = serde_json::from_value(json!([
            {"id": "", "label": {"ru": "x", "en": "x"}, "value": "v"}
        ]))
        .unwrap();
        assert!(store.update_contacts(contacts).await.is_err());

        // Seeded content untouched
        assert_eq!(store.get_projects().await.unwrap().len(), 1);
        assert_eq!(store.get_skills().await.unwrap()[0].skills.len(), 3);
        assert_eq!(store.get_contacts().await.unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_about_update_normalizes_id_and_timestamp() {
    for backend in BACKENDS {
        let (store, _dir) = open_store(backend).await;

        let mut about = store.get_about().await.unwrap();
        about.id = 7;
        about.updated_at = -1;
        about.stats.truncate(2);

        let stored = store.update_about(about).await.unwrap();
        assert_eq!(stored.id, 1);
        assert!(stored.updated_at > 0);

        let all = store.get_all().await.unwrap();
        assert_eq!(all.about, stored, "{backend:?}");
        assert_eq!(all.about.stats.len(), 2);
    }
}
