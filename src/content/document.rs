use crate::content::defaults::default_content;
use crate::content::types::{AboutContent, Contact, Project, SiteContent, SkillCategory};
use crate::error::AppResult;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Content kept as one JSON document on disk with an in-memory copy.
///
/// Readers clone out of the cache under the shared lock. A writer holds the
/// exclusive lock across copy, serialize, write and swap, so the cache only
/// changes after the file on disk has been replaced.
pub struct DocumentContentStore {
    path: PathBuf,
    doc: RwLock<SiteContent>,
}

impl DocumentContentStore {
    /// Load the document at `path`, seeding the default dataset when the
    /// file does not exist yet. A file that exists but does not parse is an
    /// error and is left untouched.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut content = default_content();
                content.about.updated_at = chrono::Utc::now().timestamp_millis();
                persist(&path, &content).await?;
                tracing::info!(path = %path.display(), "seeded default content document");
                content
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            doc: RwLock::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get_all(&self) -> SiteContent {
        self.doc.read().await.clone()
    }

    pub async fn get_about(&self) -> AboutContent {
        self.doc.read().await.about.clone()
    }

    pub async fn get_projects(&self) -> Vec<Project> {
        self.doc.read().await.projects.clone()
    }

    pub async fn get_skills(&self) -> Vec<SkillCategory> {
        self.doc.read().await.skills.clone()
    }

    pub async fn get_contacts(&self) -> Vec<Contact> {
        self.doc.read().await.contacts.clone()
    }

    pub async fn update_about(&self, about: AboutContent) -> AppResult<AboutContent> {
        self.mutate(|doc| doc.about = about.clone()).await?;
        Ok(about)
    }

    pub async fn update_projects(&self, projects: Vec<Project>) -> AppResult<Vec<Project>> {
        self.mutate(|doc| doc.projects = projects.clone()).await?;
        Ok(projects)
    }

    pub async fn update_skills(&self, skills: Vec<SkillCategory>) -> AppResult<Vec<SkillCategory>> {
        self.mutate(|doc| doc.skills = skills.clone()).await?;
        Ok(skills)
    }

    pub async fn update_contacts(&self, contacts: Vec<Contact>) -> AppResult<Vec<Contact>> {
        self.mutate(|doc| doc.contacts = contacts.clone()).await?;
        Ok(contacts)
    }

    async fn mutate<F>(&self, apply: F) -> AppResult<()>
    where
        F: FnOnce(&mut SiteContent),
    {
        let mut guard = self.doc.write().await;
        let mut next = guard.clone();
        apply(&mut next);
        persist(&self.path, &next).await?;
        *guard = next;
        Ok(())
    }
}

/// Serialize `content` and atomically replace the file at `path`:
/// write a sibling temp file, fsync it, then rename over the target.
async fn persist(path: &Path, content: &SiteContent) -> AppResult<()> {
    let bytes = serde_json::to_vec_pretty(content)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let tmp = path.with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4().simple()));
    let written = async {
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&tmp).await;
        tracing::error!(error = %e, path = %path.display(), "failed to persist content document");
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::Localized;

    #[tokio::test]
    async fn test_open_seeds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");

        let store = DocumentContentStore::open(&path).await.unwrap();
        assert!(path.exists());
        let about = store.get_about().await;
        assert!(!about.name.ru.is_empty());
        assert!(!about.name.en.is_empty());
    }

    #[tokio::test]
    async fn test_reopen_reads_persisted_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");

        let store = DocumentContentStore::open(&path).await.unwrap();
        let mut about = store.get_about().await;
        about.username = "@someone".to_string();
        store.update_about(about).await.unwrap();
        drop(store);

        let reopened = DocumentContentStore::open(&path).await.unwrap();
        assert_eq!(reopened.get_about().await.username, "@someone");
    }

    #[tokio::test]
    async fn test_corrupt_document_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(&path, b"{ not json").unwrap();

        assert!(DocumentContentStore::open(&path).await.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), b"{ not json");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let store = DocumentContentStore::open(&path).await.unwrap();

        // A directory in place of the file makes the rename fail.
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let replacement = vec![Contact {
            id: "mail".to_string(),
            kind: "email".to_string(),
            label: Localized::new("Почта", "Email"),
            value: "me@example.com".to_string(),
            link: "mailto:me@example.com".to_string(),
            icon: String::new(),
            color: String::new(),
            order: 1,
        }];
        assert!(store.update_contacts(replacement).await.is_err());
        assert_eq!(store.get_contacts().await.len(), 3);
    }
}
