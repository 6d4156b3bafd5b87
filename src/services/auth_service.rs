use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{self, Claims, JwtError};
use crate::database::manager::{is_unique_violation, DatabaseError, DatabaseManager};
use crate::database::models::user::{normalize_email, validate_name};
use crate::database::models::{PublicUser, User, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,
    #[error("Email already in use")]
    EmailInUse,
    // One message for missing user, inactive account and bad password, so a
    // caller cannot probe which accounts exist
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<ValidationError> for AuthError {
    fn from(err: ValidationError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(DatabaseError::Sqlx(err))
    }
}

/// Result of a successful signup or login
#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: PublicUser,
}

/// Fields a profile update may change; absent fields are left untouched
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub async fn new() -> Result<Self, AuthError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user and mint a token for the fresh account
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AuthPayload, AuthError> {
        let email_norm = normalize_email(email)?;

        if self.find_by_email(&email_norm).await?.is_some() {
            tracing::warn!("Signup attempt with existing email: {}", email_norm);
            return Err(AuthError::EmailTaken);
        }

        let password_hash = auth::hash_password(password)?;
        let user = User::create(email, &password_hash, first_name, last_name)?;

        let insert = sqlx::query(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await;

        if let Err(err) = insert {
            // Lost a race with a concurrent signup for the same email
            if is_unique_violation(&err) {
                tracing::warn!("Signup attempt with existing email: {}", user.email);
                return Err(AuthError::EmailTaken);
            }
            return Err(err.into());
        }

        tracing::info!("New user registered: {}", user.email);

        let token = auth::generate_jwt(Claims::new(user.id, user.email.clone()))?;
        Ok(AuthPayload {
            token,
            user: user.public_view(),
        })
    }

    /// Authenticate an existing user
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, AuthError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.find_by_email(&email).await? else {
            tracing::warn!("Login attempt with non-existent email: {}", email);
            return Err(AuthError::InvalidCredentials);
        };

        if !user.is_active {
            tracing::warn!("Login attempt with deactivated account: {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        if !auth::verify_password(password, &user.password_hash)? {
            tracing::warn!("Failed login attempt for: {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!("User logged in: {}", user.email);

        let token = auth::generate_jwt(Claims::new(user.id, user.email.clone()))?;
        Ok(AuthPayload {
            token,
            user: user.public_view(),
        })
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<PublicUser, AuthError> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user.public_view())
    }

    /// Apply a partial profile update and return the new public view
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        changes: ProfileChanges,
    ) -> Result<PublicUser, AuthError> {
        let mut user = self
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(first_name) = &changes.first_name {
            user.first_name = validate_name(first_name, "First name")?;
        }
        if let Some(last_name) = &changes.last_name {
            user.last_name = validate_name(last_name, "Last name")?;
        }
        if let Some(email) = &changes.email {
            let email = normalize_email(email)?;
            if email != user.email {
                if self.email_owned_by_other(&email, user.id).await? {
                    return Err(AuthError::EmailInUse);
                }
                user.email = email;
            }
        }

        user.updated_at = chrono::Utc::now();

        let update = sqlx::query(
            "UPDATE users SET email = $1, first_name = $2, last_name = $3, updated_at = $4 WHERE id = $5",
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.updated_at)
        .bind(user.id)
        .execute(&self.pool)
        .await;

        if let Err(err) = update {
            if is_unique_violation(&err) {
                return Err(AuthError::EmailInUse);
            }
            return Err(err.into());
        }

        tracing::info!("User profile updated: {}", user.email);
        Ok(user.public_view())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn email_owned_by_other(&self, email: &str, user_id: Uuid) -> Result<bool, AuthError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1 AND id <> $2")
                .bind(email)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count.0 > 0)
    }
}
