use axum::{extract::Request, middleware::Next, response::Response};
use sqlx::Row;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;

/// Authenticated user confirmed to still exist and be active in the store.
/// Handlers receive this via Extension; there is no ambient request state.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
}

/// Middleware that re-validates the user from JWT claims against the users
/// table. Tokens are never revoked server-side, so deactivating or removing
/// an account must take effect here, on the next request.
pub async fn validate_user_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::unauthorized("Not authorized, no token provided"))?;

    let pool = DatabaseManager::pool().await?;

    let row = sqlx::query("SELECT email, is_active FROM users WHERE id = $1")
        .bind(auth_user.user_id)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error validating user {}: {}", auth_user.user_id, e);
            ApiError::internal_server_error("Failed to validate user")
        })?;

    let row = row.ok_or_else(|| {
        tracing::warn!("Token for missing user: {}", auth_user.user_id);
        ApiError::unauthorized("User no longer exists")
    })?;

    let is_active: bool = row.get("is_active");
    if !is_active {
        tracing::warn!("Token for deactivated user: {}", auth_user.user_id);
        return Err(ApiError::unauthorized("User account is deactivated"));
    }

    let email: String = row.get("email");
    request.extensions_mut().insert(CurrentUser {
        id: auth_user.user_id,
        email,
    });

    Ok(next.run(request).await)
}
