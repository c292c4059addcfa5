//! Postgres storage

use std::time::Duration;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use crate::notices::Notice;

use super::CreateNoticeValues;
use super::Error;
use super::Result;
use super::Storage;
use super::connection_error;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage from a connection string
    ///
    /// Migrations will be run
    pub async fn connect(database_connection_string: &str) -> Result<Self> {
        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_connection_string)
            .await
            .map_err(connection_error)?;

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Result<Self> {
        MIGRATOR
            .run(&connection_pool)
            .await
            .map_err(|err| Error::Connection(format!("Migrations could not run: {err}")))?;

        Ok(Self { connection_pool })
    }
}

impl Storage for Postgres {
    async fn find_all_notices(&self) -> Result<Vec<Notice>> {
        let notices = sqlx::query_as::<_, Notice>(
            r"
            SELECT *
            FROM notices
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(notices)
    }

    async fn find_single_notice_by_id(&self, id: i64) -> Result<Option<Notice>> {
        let notice = sqlx::query_as::<_, Notice>(
            r"
            SELECT *
            FROM notices
            WHERE id = $1
            LIMIT 1
            ",
        )
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(notice)
    }

    async fn create_notice(&self, values: &CreateNoticeValues<'_>) -> Result<Notice> {
        let notice = sqlx::query_as::<_, Notice>(
            r"
            INSERT INTO notices (title, content, is_pinned, is_published, author, published_at)
            VALUES ($1, $2, $3, $4, $5, CASE WHEN $4 THEN CURRENT_TIMESTAMP END)
            RETURNING *
            ",
        )
        .bind(values.title)
        .bind(values.content)
        .bind(values.is_pinned)
        .bind(values.is_published)
        .bind(values.author)
        .fetch_one(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(notice)
    }

    async fn update_notice(&self, notice: &Notice) -> Result<Notice> {
        let updated_notice = sqlx::query_as::<_, Notice>(
            r"
            UPDATE notices
            SET title = $1,
                content = $2,
                is_pinned = $3,
                is_published = $4,
                author = $5,
                published_at = $6,
                updated_at = GREATEST(CURRENT_TIMESTAMP, created_at)
            WHERE id = $7
            RETURNING *
            ",
        )
        .bind(&notice.title)
        .bind(&notice.content)
        .bind(notice.is_pinned)
        .bind(notice.is_published)
        .bind(notice.author.as_deref())
        .bind(notice.published_at)
        .bind(notice.id)
        .fetch_optional(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        updated_notice.ok_or(Error::NotFound(notice.id))
    }

    async fn delete_notice(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM notices
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&self.connection_pool)
        .await
        .map_err(connection_error)?;

        Ok(result.rows_affected() > 0)
    }
}
