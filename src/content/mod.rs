pub mod defaults;
pub mod document;
pub mod handler;
pub mod sqlite;
pub mod types;

use crate::config::{ContentBackend, ContentConfig};
use crate::error::{AppError, AppResult};
use deadpool_sqlite::Pool;
use document::DocumentContentStore;
use sqlite::SqliteContentStore;
use std::collections::HashSet;
use std::sync::Arc;
use types::{renumber, AboutContent, Contact, Project, SiteContent, SkillCategory};

/// Content storage selected by `content.backend`.
///
/// Payloads are validated and normalized here, so both backends persist
/// the same shape: dense 1..N `order`, `about.id = 1`, and a fresh
/// `updated_at` on every about write.
pub enum ContentStore {
    Sqlite(SqliteContentStore),
    Document(DocumentContentStore),
}

impl ContentStore {
    /// Open the configured backend and seed the default dataset on first run.
    pub async fn open(config: &ContentConfig, pool: Pool) -> AppResult<Self> {
        match config.backend {
            ContentBackend::Sqlite => {
                let store = SqliteContentStore::new(pool);
                if store.seed_if_empty().await? {
                    tracing::info!("seeded default content");
                }
                Ok(ContentStore::Sqlite(store))
            }
            ContentBackend::Document => {
                let store = DocumentContentStore::open(&config.document_path).await?;
                Ok(ContentStore::Document(store))
            }
        }
    }

    pub fn backend(&self) -> ContentBackend {
        match self {
            ContentStore::Sqlite(_) => ContentBackend::Sqlite,
            ContentStore::Document(_) => ContentBackend::Document,
        }
    }

    pub async fn get_all(&self) -> AppResult<SiteContent> {
        match self {
            ContentStore::Sqlite(s) => s.get_all().await,
            ContentStore::Document(d) => Ok(d.get_all().await),
        }
    }

    pub async fn get_about(&self) -> AppResult<AboutContent> {
        match self {
            ContentStore::Sqlite(s) => s.get_about().await,
            ContentStore::Document(d) => Ok(d.get_about().await),
        }
    }

    pub async fn get_projects(&self) -> AppResult<Vec<Project>> {
        match self {
            ContentStore::Sqlite(s) => s.get_projects().await,
            ContentStore::Document(d) => Ok(d.get_projects().await),
        }
    }

    pub async fn get_skills(&self) -> AppResult<Vec<SkillCategory>> {
        match self {
            ContentStore::Sqlite(s) => s.get_skills().await,
            ContentStore::Document(d) => Ok(d.get_skills().await),
        }
    }

    pub async fn get_contacts(&self) -> AppResult<Vec<Contact>> {
        match self {
            ContentStore::Sqlite(s) => s.get_contacts().await,
            ContentStore::Document(d) => Ok(d.get_contacts().await),
        }
    }

    pub async fn update_about(&self, mut about: AboutContent) -> AppResult<AboutContent> {
        about.id = 1;
        about.updated_at = chrono::Utc::now().timestamp_millis();
        match self {
            ContentStore::Sqlite(s) => s.update_about(about).await,
            ContentStore::Document(d) => d.update_about(about).await,
        }
    }

    pub async fn update_projects(&self, mut projects: Vec<Project>) -> AppResult<Vec<Project>> {
        check_ids("project", projects.iter().map(|p| p.id.as_str()))?;
        renumber(&mut projects);
        match self {
            ContentStore::Sqlite(s) => s.update_projects(projects).await,
            ContentStore::Document(d) => d.update_projects(projects).await,
        }
    }

    pub async fn update_skills(
        &self,
        mut skills: Vec<SkillCategory>,
    ) -> AppResult<Vec<SkillCategory>> {
        check_ids("skill category", skills.iter().map(|c| c.id.as_str()))?;
        // Skill ids are a table primary key, so they must be unique across categories.
        check_ids(
            "skill",
            skills.iter().flat_map(|c| c.skills.iter().map(|s| s.id.as_str())),
        )?;
        renumber(&mut skills);
        match self {
            ContentStore::Sqlite(s) => s.update_skills(skills).await,
            ContentStore::Document(d) => d.update_skills(skills).await,
        }
    }

    pub async fn update_contacts(&self, mut contacts: Vec<Contact>) -> AppResult<Vec<Contact>> {
        check_ids("contact", contacts.iter().map(|c| c.id.as_str()))?;
        renumber(&mut contacts);
        match self {
            ContentStore::Sqlite(s) => s.update_contacts(contacts).await,
            ContentStore::Document(d) => d.update_contacts(contacts).await,
        }
    }
}

/// Reject empty or repeated ids before anything is written.
fn check_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> AppResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(AppError::Validation(format!("{kind} id must not be empty")));
        }
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("duplicate {kind} id: {id}")));
        }
    }
    Ok(())
}

/// Shared state for content endpoints.
pub struct ContentState {
    pub store: ContentStore,
}

impl ContentState {
    pub fn new(store: ContentStore) -> Arc<Self> {
        Arc::new(Self { store })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_ids_accepts_distinct() {
        assert!(check_ids("project", ["a", "b", "c"].into_iter()).is_ok());
        assert!(check_ids("project", std::iter::empty()).is_ok());
    }

    #[test]
    fn test_check_ids_rejects_duplicates_and_blanks() {
        let dup = check_ids("contact", ["tg", "gh", "tg"].into_iter());
        assert!(matches!(dup, Err(AppError::Validation(msg)) if msg.contains("tg")));

        let blank = check_ids("contact", ["tg", "  "].into_iter());
        assert!(matches!(blank, Err(AppError::Validation(_))));
    }
}
