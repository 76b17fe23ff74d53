use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{RepositoryError, UserRepository};
use crate::domain::{User, UserSlug};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.insert(user);
        self
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.slug.as_str().to_string(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_slug(&self, slug: &UserSlug) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.get(slug.as_str()).map(|u| u.value().clone()))
    }

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.value().api_key.as_deref() == Some(api_key))
            .map(|entry| entry.value().clone()))
    }
}
