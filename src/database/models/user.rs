use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::ValidationError;

/// Internal user record. Holds the password hash and deliberately does not
/// implement Serialize; clients only ever see [`PublicUser`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection of a user safe to return to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a new user with a fresh id. Fields are validated and normalized
    /// here, before any insert is attempted.
    pub fn create(
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, ValidationError> {
        let email = normalize_email(email)?;
        let first_name = validate_name(first_name, "First name")?;
        let last_name = validate_name(last_name, "Last name")?;
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            email,
            password_hash: password_hash.to_string(),
            first_name,
            last_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Trim, lowercase and shape-check an email address. Emails are compared and
/// stored in this normalized form so uniqueness is case-insensitive.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if !is_email_shaped(&email) {
        return Err(ValidationError("Please provide a valid email".to_string()));
    }
    Ok(email)
}

fn is_email_shaped(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // Domain needs a dot with something on both sides
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

pub fn validate_name(value: &str, field: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_lowercased_and_trimmed() {
        assert_eq!(normalize_email("  A@X.Com ").unwrap(), "a@x.com");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for email in ["", "plain", "@x.com", "a@", "a@nodot", "a@.com", "a@x.", "a b@x.com", "a@x@y.com"] {
            assert!(normalize_email(email).is_err(), "accepted {:?}", email);
        }
    }

    #[test]
    fn well_formed_emails_are_accepted() {
        for email in ["a@x.com", "first.last@sub.example.org", "a+tag@x.co"] {
            assert!(normalize_email(email).is_ok(), "rejected {:?}", email);
        }
    }

    #[test]
    fn constructor_validates_names() {
        assert!(User::create("a@x.com", "hash", "  ", "B").is_err());
        assert!(User::create("a@x.com", "hash", "A", "").is_err());

        let user = User::create("A@X.com", "hash", " A ", "B").unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.first_name, "A");
        assert!(user.is_active);
    }

    #[test]
    fn public_view_carries_no_hash() {
        let user = User::create("a@x.com", "hash", "A", "B").unwrap();
        let json = serde_json::to_value(user.public_view()).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["firstName"], "A");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
