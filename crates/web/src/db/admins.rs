//! `PostgreSQL` admin identity repository.

use async_trait::async_trait;
use sqlx::PgPool;

use wfa_core::{AdminId, Username};

use super::{AdminStore, RepositoryError, conflict_on_unique};
use crate::models::AdminIdentity;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` admin identity queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    username: String,
    password_hash: String,
}

impl TryFrom<AdminRow> for AdminIdentity {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;

        Ok(Self {
            id: AdminId::new(row.id),
            username,
            password_hash: row.password_hash,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Admin identities stored in `catalog.admin_user`.
#[derive(Debug, Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for PgAdminStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<AdminIdentity>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            SELECT id, username, password_hash
            FROM catalog.admin_user
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<AdminIdentity, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            INSERT INTO catalog.admin_user (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            ",
        )
        .bind(username.as_str())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "username already exists"))?;

        row.try_into()
    }

    async fn set_password_hash(
        &self,
        id: AdminId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE catalog.admin_user
            SET password_hash = $1, updated_at = NOW()
            WHERE id = $2
            ",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
