use async_trait::async_trait;

use crate::domain::{User, UserSlug};

use super::RepositoryError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &UserSlug) -> Result<Option<User>, RepositoryError>;

    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, RepositoryError>;
}
