// Public authentication handlers: signup and login, the two endpoints that
// mint tokens without requiring one.

use axum::Json;
use serde::Deserialize;

use crate::database::models::user::normalize_email;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::auth_service::{AuthPayload, AuthService};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), ApiError> {
        normalize_email(&self.email).map_err(|e| ApiError::validation(e.to_string()))?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(
                "Password must be at least 8 characters",
            ));
        }
        if self.first_name.trim().is_empty() {
            return Err(ApiError::validation("First name is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ApiError::validation("Last name is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        normalize_email(&self.email).map_err(|e| ApiError::validation(e.to_string()))?;
        if self.password.is_empty() {
            return Err(ApiError::validation("Password is required"));
        }
        Ok(())
    }
}

/// POST /api/auth/signup - register a new account and receive a JWT
pub async fn signup_post(Json(payload): Json<SignupRequest>) -> ApiResult<AuthPayload> {
    payload.validate()?;

    let service = AuthService::new().await?;
    let result = service
        .signup(
            &payload.email,
            &payload.password,
            &payload.first_name,
            &payload.last_name,
        )
        .await?;

    Ok(ApiResponse::created(result).with_message("User registered successfully"))
}

/// POST /api/auth/login - authenticate and receive a JWT
pub async fn login_post(Json(payload): Json<LoginRequest>) -> ApiResult<AuthPayload> {
    payload.validate()?;

    let service = AuthService::new().await?;
    let result = service.login(&payload.email, &payload.password).await?;

    Ok(ApiResponse::success(result).with_message("Login successful"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str, first: &str, last: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[test]
    fn signup_validation_accepts_well_formed_input() {
        assert!(signup("a@x.com", "Test@1234", "A", "B").validate().is_ok());
    }

    #[test]
    fn signup_validation_rejects_bad_fields() {
        assert!(signup("nope", "Test@1234", "A", "B").validate().is_err());
        assert!(signup("a@x.com", "short", "A", "B").validate().is_err());
        assert!(signup("a@x.com", "Test@1234", " ", "B").validate().is_err());
        assert!(signup("a@x.com", "Test@1234", "A", "").validate().is_err());
    }

    #[test]
    fn login_validation_requires_password() {
        let request = LoginRequest {
            email: "a@x.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
