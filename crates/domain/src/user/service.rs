//! User directory service.

use common::UserId;

use super::model::normalize_email;
use super::password::{hash_password, reject_unknown_account, verify_password};
use super::{Credentials, RegisterUser, Role, User, UserError, UserStore};

/// Registers users and checks their credentials.
#[derive(Clone)]
pub struct UserDirectory<S: UserStore> {
    store: S,
}

impl<S: UserStore> UserDirectory<S> {
    /// Creates a new directory over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new customer.
    ///
    /// Emails are compared case-insensitively; registering an address that
    /// is already taken fails with `AlreadyExists`.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterUser) -> Result<User, UserError> {
        let email = request.validate()?;
        let password_hash = hash_password(&request.password)?;

        let user = User::register(UserId::generate(), email, password_hash, request);
        self.store.save(user.clone()).await?;

        metrics::counter!("users_registered_total").increment(1);
        tracing::info!(user_id = %user.id(), "user registered");

        Ok(user)
    }

    /// Verifies an email and password.
    ///
    /// Unknown emails and wrong passwords fail with the same
    /// `InvalidCredentials` error, and both run an argon2 verification.
    #[tracing::instrument(skip(self, credentials))]
    pub async fn authenticate(&self, credentials: Credentials) -> Result<User, UserError> {
        let email = normalize_email(&credentials.email);
        if email.is_empty() {
            return Err(UserError::EmailRequired);
        }
        if credentials.password.is_empty() {
            return Err(UserError::PasswordRequired);
        }

        let user = self.store.find_by_email(&email).await?;
        let verified = match &user {
            Some(user) => verify_password(&credentials.password, user.password_hash()),
            None => {
                reject_unknown_account(&credentials.password);
                false
            }
        };

        match user {
            Some(user) if verified => {
                tracing::debug!(user_id = %user.id(), "user authenticated");
                Ok(user)
            }
            _ => {
                metrics::counter!("user_authentication_failures_total").increment(1);
                tracing::info!("authentication failed");
                Err(UserError::InvalidCredentials)
            }
        }
    }

    /// Loads a user by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.clone()))
    }

    /// Returns true if the user holds `role`.
    pub async fn has_role(&self, id: &UserId, role: Role) -> Result<bool, UserError> {
        Ok(self.get_user(id).await?.has_role(role))
    }

    /// Replaces a user's roles.
    #[tracing::instrument(skip(self))]
    pub async fn set_roles(&self, id: &UserId, roles: Vec<Role>) -> Result<User, UserError> {
        let user = self.store.set_roles(id, roles).await?;
        tracing::info!(user_id = %id, roles = ?user.roles(), "user roles updated");
        Ok(user)
    }
}
