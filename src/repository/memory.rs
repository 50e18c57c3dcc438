//! In-process client repository with the same visibility rules as the SQL one.
//! Used when no database is configured, and by the HTTP tests.

use super::ClientRepository;
use crate::error::AppError;
use crate::model::{Client, ClientDraft, Pagination};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Rows in insertion order. Soft-deleted rows stay in place.
#[derive(Default)]
pub struct MemoryClientRepository {
    rows: RwLock<Vec<Client>>,
}

impl MemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Client>>, AppError> {
        self.rows
            .read()
            .map_err(|_| AppError::Internal("client store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Client>>, AppError> {
        self.rows
            .write()
            .map_err(|_| AppError::Internal("client store lock poisoned".into()))
    }
}

#[async_trait]
impl ClientRepository for MemoryClientRepository {
    async fn list(&self, pagination: Pagination) -> Result<Vec<Client>, AppError> {
        let rows = self.read()?;
        // Reverse first so the stable sort keeps later inserts ahead on equal timestamps.
        let mut active: Vec<&Client> = rows.iter().rev().filter(|c| c.is_active).collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let offset = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let clients: Vec<Client> = active
            .into_iter()
            .skip(offset)
            .take(pagination.page_size as usize)
            .cloned()
            .collect();
        tracing::info!(
            count = clients.len(),
            page = pagination.page,
            page_size = pagination.page_size,
            "listed clients"
        );
        Ok(clients)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let rows = self.read()?;
        Ok(rows.iter().find(|c| c.id == id && c.is_active).cloned())
    }

    async fn create(&self, id: Uuid, draft: &ClientDraft) -> Result<Client, AppError> {
        let mut rows = self.write()?;
        if rows.iter().any(|c| c.id == id) {
            return Err(AppError::Conflict(format!("client {} already exists", id)));
        }
        let now = Utc::now();
        let client = Client {
            id,
            name: draft.name.clone(),
            surname: draft.surname.clone(),
            email: draft.email.clone(),
            birthdate: draft.birthdate,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        rows.push(client.clone());
        tracing::info!(%id, "client created");
        Ok(client)
    }

    async fn update(&self, id: Uuid, draft: &ClientDraft) -> Result<bool, AppError> {
        let mut rows = self.write()?;
        let Some(client) = rows.iter_mut().find(|c| c.id == id && c.is_active) else {
            tracing::info!(%id, rows = 0, "client updated");
            return Ok(false);
        };
        client.name = draft.name.clone();
        client.surname = draft.surname.clone();
        client.email = draft.email.clone();
        client.birthdate = draft.birthdate;
        client.updated_at = Utc::now().max(client.created_at);
        tracing::info!(%id, rows = 1, "client updated");
        Ok(true)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut rows = self.write()?;
        let Some(client) = rows.iter_mut().find(|c| c.id == id && c.is_active) else {
            tracing::info!(%id, rows = 0, "client marked inactive");
            return Ok(false);
        };
        client.is_active = false;
        client.updated_at = Utc::now().max(client.created_at);
        tracing::info!(%id, rows = 1, "client marked inactive");
        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
