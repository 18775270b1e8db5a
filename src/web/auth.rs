//! Credential store trait and the in-memory lab user table.
//!
//! Passwords are stored and compared in plaintext. This is one of the
//! lab's intentional weaknesses.

use async_trait::async_trait;
use std::collections::HashMap;

/// A single account in the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(username: &str, password: &str, email: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
        }
    }
}

#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    async fn find(&self, username: &str) -> Option<UserRecord>;

    /// Exact-match password check. Returns the record on success.
    async fn authenticate(&self, username: &str, password: &str) -> Option<UserRecord> {
        self.find(username).await.filter(|user| user.password == password)
    }
}

/// Read-only user table, populated once at startup.
pub struct InMemoryCredentialStore {
    users: HashMap<String, UserRecord>,
}

impl InMemoryCredentialStore {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.username.clone(), user))
            .collect();
        Self { users }
    }

    /// The two accounts every lab instance ships with.
    pub fn with_lab_users() -> Self {
        Self::new([
            UserRecord::new("admin", "password123", "admin@example.com"),
            UserRecord::new("user", "password123", "user@example.com"),
        ])
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).cloned()
    }
}
