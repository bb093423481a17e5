use crate::analytics::recorder;
use crate::analytics::reporter;
use crate::analytics::types::{AnalyticsData, TrackEvent, TrackResponse};
use crate::analytics::AnalyticsState;
use crate::config::AnalyticsConfig;
use crate::error::{AppError, AppResult, LoggedJson};
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

fn check_field(name: &str, value: &str, max_bytes: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} is required")));
    }
    if value.len() > max_bytes {
        return Err(AppError::Validation(format!(
            "{name} exceeds {max_bytes} bytes"
        )));
    }
    Ok(())
}

/// Validate a decoded event against field limits.
fn validate_event(event: &TrackEvent, config: &AnalyticsConfig) -> AppResult<()> {
    match event {
        TrackEvent::PageView {
            page, visitor_id, ..
        } => {
            check_field("visitor_id", visitor_id, config.max_field_bytes)?;
            check_field("page", page, config.max_field_bytes)?;
        }
        TrackEvent::Session {
            visitor_id,
            duration,
            pages,
            ..
        } => {
            check_field("visitor_id", visitor_id, config.max_field_bytes)?;
            if *duration < 0 {
                return Err(AppError::Validation("duration must not be negative".into()));
            }
            if *pages < 0 {
                return Err(AppError::Validation("pages must not be negative".into()));
            }
        }
    }
    Ok(())
}

/// POST /api/analytics/track - Record a page view or session report.
pub async fn track(
    State(state): State<Arc<AnalyticsState>>,
    LoggedJson(event): LoggedJson<TrackEvent>,
) -> AppResult<Json<TrackResponse>> {
    validate_event(&event, &state.config)?;
    let kind = event.kind();

    match event {
        TrackEvent::PageView {
            page,
            visitor_id,
            device,
        } => {
            let is_new = recorder::record_page_view(&state.pool, page, visitor_id, device).await?;
            tracing::debug!(event = kind, device = %device, new_visitor = is_new, "tracked");
        }
        TrackEvent::Session {
            visitor_id,
            duration,
            pages,
            theme,
            language,
        } => {
            let created = recorder::record_session(
                &state.pool,
                visitor_id,
                duration,
                pages,
                theme,
                language,
            )
            .await?;
            tracing::debug!(event = kind, new_session = created, "tracked");
        }
    }

    Ok(Json(TrackResponse { success: true }))
}

/// GET /api/analytics - Aggregated report (admin).
pub async fn get_analytics(
    State(state): State<Arc<AnalyticsState>>,
) -> AppResult<Json<AnalyticsData>> {
    if let Some(cached) = state.cache.get() {
        return Ok(Json(cached.as_ref().clone()));
    }

    let report = Arc::new(reporter::get_analytics(&state.pool).await?);
    state.cache.insert(report.clone());
    Ok(Json(report.as_ref().clone()))
}
