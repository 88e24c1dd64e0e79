pub mod bookings;
pub mod courts;
pub mod health;
pub mod schedules;

use axum::http::HeaderMap;

use crate::config::AppConfig;
use crate::errors::AppError;

/// Rejects the request unless it carries the configured admin bearer token.
/// With no token configured every caller is treated as admin.
pub(crate) fn require_admin(headers: &HeaderMap, config: &AppConfig) -> Result<(), AppError> {
    let Some(expected) = config.admin_token.as_deref() else {
        return Ok(());
    };

    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
