// Profile handlers. The authenticated user arrives via Extension, injected by
// the middleware chain.

use axum::{Extension, Json};
use serde::Deserialize;

use crate::database::models::user::normalize_email;
use crate::database::models::PublicUser;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::CurrentUser;
use crate::services::auth_service::{AuthService, ProfileChanges};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(email) = &self.email {
            normalize_email(email).map_err(|e| ApiError::validation(e.to_string()))?;
        }
        if matches!(&self.first_name, Some(v) if v.trim().is_empty()) {
            return Err(ApiError::validation("First name cannot be empty"));
        }
        if matches!(&self.last_name, Some(v) if v.trim().is_empty()) {
            return Err(ApiError::validation("Last name cannot be empty"));
        }
        Ok(())
    }
}

/// GET /api/auth/profile - public view of the authenticated user
pub async fn profile_get(Extension(user): Extension<CurrentUser>) -> ApiResult<PublicUser> {
    let service = AuthService::new().await?;
    let profile = service.get_profile(user.id).await?;

    Ok(ApiResponse::success(profile))
}

/// PUT /api/auth/profile - partial update of name/email
pub async fn profile_put(
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<PublicUser> {
    payload.validate()?;

    let service = AuthService::new().await?;
    let profile = service
        .update_profile(
            user.id,
            ProfileChanges {
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
            },
        )
        .await?;

    Ok(ApiResponse::success(profile).with_message("Profile updated successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_pass_validation() {
        let request = UpdateProfileRequest {
            first_name: None,
            last_name: None,
            email: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn provided_fields_are_checked() {
        let request = UpdateProfileRequest {
            first_name: Some("  ".to_string()),
            last_name: None,
            email: None,
        };
        assert!(request.validate().is_err());

        let request = UpdateProfileRequest {
            first_name: None,
            last_name: None,
            email: Some("not-an-email".to_string()),
        };
        assert!(request.validate().is_err());
    }
}
