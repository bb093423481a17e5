use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

pub const ADMIN_HEADER: &str = "x-admin-password";

/// Shared admin secret, injected as a request extension on admin routes.
#[derive(Clone)]
pub struct AdminSecret(pub String);

/// Constant-time comparison of a presented password against the secret.
/// An empty secret matches nothing.
pub fn password_matches(secret: &str, presented: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    secret.as_bytes().ct_eq(presented.as_bytes()).into()
}

fn unauthorized(message: &'static str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        axum::Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Middleware: requires `X-Admin-Password` to equal the configured secret.
/// Rejects before the handler, so no store is touched on failure.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, Response> {
    let secret = request
        .extensions()
        .get::<AdminSecret>()
        .cloned()
        .ok_or_else(|| {
            tracing::error!("admin auth: AdminSecret not configured");
            (StatusCode::INTERNAL_SERVER_ERROR, "auth not configured").into_response()
        })?;

    let path = request.uri().path().to_string();
    let method = request.method().clone();

    let Some(presented) = request
        .headers()
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        tracing::warn!(
            path = %path,
            method = %method,
            "auth rejected: missing X-Admin-Password header"
        );
        return Err(unauthorized("unauthorized"));
    };

    if !password_matches(&secret.0, presented) {
        tracing::warn!(path = %path, method = %method, "auth rejected: wrong admin password");
        return Err(unauthorized("unauthorized"));
    }

    Ok(next.run(request).await)
}
