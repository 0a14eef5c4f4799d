use async_trait::async_trait;
use common::UserId;
use storage::{InMemoryStore, KeyValueStore};

use super::{Role, User, UserError};

/// Persistence boundary for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Saves a new user. Fails with `AlreadyExists` if the email is taken.
    async fn save(&self, user: User) -> Result<(), UserError>;

    /// Looks a user up by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Looks a user up by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Replaces a user's roles.
    async fn set_roles(&self, id: &UserId, roles: Vec<Role>) -> Result<User, UserError>;
}

/// In-memory user store keyed by normalized email.
///
/// Keying by email makes the uniqueness check and the insert one atomic
/// step. Lookups by id scan.
#[derive(Clone)]
pub struct InMemoryUserStore {
    users: InMemoryStore<String, User>,
}

impl InMemoryUserStore {
    /// Creates a new empty user store.
    pub fn new() -> Self {
        Self {
            users: InMemoryStore::new("user"),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, user: User) -> Result<(), UserError> {
        Ok(self.users.insert(user.email().to_string(), user).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.users.get(&email.to_string()).await?)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let mut matches = self.users.scan(|user| user.id() == id).await?;
        Ok(matches.pop())
    }

    async fn set_roles(&self, id: &UserId, roles: Vec<Role>) -> Result<User, UserError> {
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.clone()))?;

        self.users
            .update(&user.email().to_string(), |current| {
                Ok::<_, UserError>(current.with_roles(roles))
            })
            .await
            .map_err(|e| match e {
                UserError::AlreadyExists(_) | UserError::NotFound(_) => {
                    UserError::NotFound(id.clone())
                }
                other => other,
            })
    }
}
