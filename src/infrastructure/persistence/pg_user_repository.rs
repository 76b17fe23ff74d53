use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{RepositoryError, UserRepository};
use crate::domain::{EnhancementKinds, User, UserId, UserSlug};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        column: &'static str,
        value: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "SELECT id, email, slug, approved, enhancement_kinds, api_key FROM users WHERE {} = $1",
            column
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(user_from_row).transpose()
    }
}

fn user_from_row(row: &PgRow) -> Result<User, RepositoryError> {
    let get_err = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());
    let slug: String = row.try_get("slug").map_err(get_err)?;
    let kinds: String = row.try_get("enhancement_kinds").map_err(get_err)?;

    Ok(User {
        id: UserId::from_uuid(row.try_get("id").map_err(get_err)?),
        email: row.try_get("email").map_err(get_err)?,
        slug: UserSlug::parse(&slug)
            .ok_or_else(|| RepositoryError::CorruptRow(format!("Invalid slug: {}", slug)))?,
        approved: row.try_get("approved").map_err(get_err)?,
        enhancement_kinds: EnhancementKinds::parse(&kinds).map_err(RepositoryError::CorruptRow)?,
        api_key: row.try_get("api_key").map_err(get_err)?,
    })
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self), fields(slug = %slug))]
    async fn find_by_slug(&self, slug: &UserSlug) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("slug", slug.as_str()).await
    }

    #[instrument(skip_all)]
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("api_key", api_key).await
    }
}
