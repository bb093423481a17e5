use crate::content::types::{AboutContent, Contact, Project, SiteContent, SkillCategory};
use crate::content::ContentState;
use crate::error::{AppResult, LoggedJson};
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// GET /api/content - Everything the site renders.
pub async fn get_content(State(state): State<Arc<ContentState>>) -> AppResult<Json<SiteContent>> {
    Ok(Json(state.store.get_all().await?))
}

/// GET /api/content/about
pub async fn get_about(State(state): State<Arc<ContentState>>) -> AppResult<Json<AboutContent>> {
    Ok(Json(state.store.get_about().await?))
}

/// GET /api/content/projects
pub async fn get_projects(
    State(state): State<Arc<ContentState>>,
) -> AppResult<Json<Vec<Project>>> {
    Ok(Json(state.store.get_projects().await?))
}

/// GET /api/content/skills
pub async fn get_skills(
    State(state): State<Arc<ContentState>>,
) -> AppResult<Json<Vec<SkillCategory>>> {
    Ok(Json(state.store.get_skills().await?))
}

/// GET /api/content/contacts
pub async fn get_contacts(
    State(state): State<Arc<ContentState>>,
) -> AppResult<Json<Vec<Contact>>> {
    Ok(Json(state.store.get_contacts().await?))
}

/// PUT /api/content/about - Replace the about section (admin).
pub async fn update_about(
    State(state): State<Arc<ContentState>>,
    LoggedJson(about): LoggedJson<AboutContent>,
) -> AppResult<Json<AboutContent>> {
    let stored = state.store.update_about(about).await?;
    tracing::info!(section = "about", "content updated");
    Ok(Json(stored))
}

/// PUT /api/content/projects - Replace all projects (admin).
pub async fn update_projects(
    State(state): State<Arc<ContentState>>,
    LoggedJson(projects): LoggedJson<Vec<Project>>,
) -> AppResult<Json<Vec<Project>>> {
    let stored = state.store.update_projects(projects).await?;
    tracing::info!(section = "projects", count = stored.len(), "content updated");
    Ok(Json(stored))
}

/// PUT /api/content/skills - Replace all skill categories (admin).
pub async fn update_skills(
    State(state): State<Arc<ContentState>>,
    LoggedJson(skills): LoggedJson<Vec<SkillCategory>>,
) -> AppResult<Json<Vec<SkillCategory>>> {
    let stored = state.store.update_skills(skills).await?;
    tracing::info!(section = "skills", count = stored.len(), "content updated");
    Ok(Json(stored))
}

/// PUT /api/content/contacts - Replace all contacts (admin).
pub async fn update_contacts(
    State(state): State<Arc<ContentState>>,
    LoggedJson(contacts): LoggedJson<Vec<Contact>>,
) -> AppResult<Json<Vec<Contact>>> {
    let stored = state.store.update_contacts(contacts).await?;
    tracing::info!(section = "contacts", count = stored.len(), "content updated");
    Ok(Json(stored))
}
