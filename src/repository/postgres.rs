//! PostgreSQL-backed client repository.
//!
//! Each call acquires its own pooled connection, runs one parameterized statement and returns
//! the connection to the pool when the guard drops, on success and on error alike.

use super::ClientRepository;
use crate::error::AppError;
use crate::model::{Client, ClientDraft, Pagination};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_PAGE: &str = r#"
    SELECT id, name, surname, email, birthdate, isactive, created_at, updated_at
    FROM clients
    WHERE isactive = true
    ORDER BY created_at DESC, id DESC
    LIMIT $1 OFFSET $2
"#;

const SELECT_BY_ID: &str = r#"
    SELECT id, name, surname, email, birthdate, isactive, created_at, updated_at
    FROM clients
    WHERE id = $1 AND isactive = true
"#;

const INSERT: &str = r#"
    INSERT INTO clients (id, name, surname, email, birthdate, isactive, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, true, NOW(), NOW())
    RETURNING id, name, surname, email, birthdate, isactive, created_at, updated_at
"#;

const UPDATE: &str = r#"
    UPDATE clients
    SET name = $2, surname = $3, email = $4, birthdate = $5, updated_at = NOW()
    WHERE id = $1 AND isactive = true
"#;

const SOFT_DELETE: &str = r#"
    UPDATE clients
    SET isactive = false, updated_at = NOW()
    WHERE id = $1 AND isactive = true
"#;

#[derive(Clone)]
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    pub fn new(pool: PgPool) -> Self {
        PgClientRepository { pool }
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    async fn list(&self, pagination: Pagination) -> Result<Vec<Client>, AppError> {
        let mut conn = self.pool.acquire().await?;
        tracing::debug!(sql = %SELECT_PAGE, limit = pagination.limit(), offset = pagination.offset(), "query");
        let clients = sqlx::query_as::<_, Client>(SELECT_PAGE)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&mut *conn)
            .await?;
        tracing::info!(
            count = clients.len(),
            page = pagination.page,
            page_size = pagination.page_size,
            "listed clients"
        );
        Ok(clients)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let mut conn = self.pool.acquire().await?;
        tracing::debug!(sql = %SELECT_BY_ID, %id, "query");
        let client = sqlx::query_as::<_, Client>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(client)
    }

    async fn create(&self, id: Uuid, draft: &ClientDraft) -> Result<Client, AppError> {
        let mut conn = self.pool.acquire().await?;
        tracing::debug!(sql = %INSERT, %id, "query");
        let client = sqlx::query_as::<_, Client>(INSERT)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.surname)
            .bind(&draft.email)
            .bind(draft.birthdate)
            .fetch_one(&mut *conn)
            .await?;
        tracing::info!(%id, "client created");
        Ok(client)
    }

    async fn update(&self, id: Uuid, draft: &ClientDraft) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        tracing::debug!(sql = %UPDATE, %id, "query");
        let rows = sqlx::query(UPDATE)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.surname)
            .bind(&draft.email)
            .bind(draft.birthdate)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        tracing::info!(%id, rows, "client updated");
        Ok(rows > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        tracing::debug!(sql = %SOFT_DELETE, %id, "query");
        let rows = sqlx::query(SOFT_DELETE)
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        tracing::info!(%id, rows, "client marked inactive");
        Ok(rows > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
