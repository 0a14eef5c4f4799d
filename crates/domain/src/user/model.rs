use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use super::UserError;

/// A role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
    Seller,
}

/// Registration request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl RegisterUser {
    /// Creates a registration request with no name.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
        }
    }

    /// Sets the user's first and last name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Checks required fields and returns the normalized email.
    pub fn validate(&self) -> Result<String, UserError> {
        let email = normalize_email(&self.email);
        if email.is_empty() {
            return Err(UserError::EmailRequired);
        }
        if !is_plausible_email(&email) {
            return Err(UserError::InvalidEmail(self.email.clone()));
        }
        if self.password.is_empty() {
            return Err(UserError::PasswordRequired);
        }
        Ok(email)
    }
}

/// Login request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A registered user.
///
/// The password hash never leaves the domain: it is skipped when the user is
/// serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    email: String,
    #[serde(skip_serializing)]
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    roles: Vec<Role>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new customer from a validated registration.
    pub(crate) fn register(
        id: UserId,
        email: String,
        password_hash: String,
        request: RegisterUser,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            roles: vec![Role::Customer],
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy of this user with `roles` replacing the current ones.
    pub(crate) fn with_roles(&self, roles: Vec<Role>) -> Self {
        let mut unique = Vec::with_capacity(roles.len());
        for role in roles {
            if !unique.contains(&role) {
                unique.push(role);
            }
        }
        Self {
            roles: unique,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// The normalized (trimmed, lowercase) email.
    pub fn email(&self) -> &str {
        &self.email
    }

    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Trims and lowercases an email so lookups are case-insensitive.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
