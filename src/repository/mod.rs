//! Persistence seam for client records.
//!
//! Every read and mutation only considers active rows; `soft_delete` is the only way a row
//! leaves the active set and nothing brings it back.

mod memory;
mod postgres;

pub use memory::MemoryClientRepository;
pub use postgres::PgClientRepository;

use crate::error::AppError;
use crate::model::{Client, ClientDraft, Pagination};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Active clients, newest first, windowed by `pagination`.
    async fn list(&self, pagination: Pagination) -> Result<Vec<Client>, AppError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError>;

    /// Insert an active row under `id`. A taken id is a uniqueness violation.
    async fn create(&self, id: Uuid, draft: &ClientDraft) -> Result<Client, AppError>;

    /// Returns `false` when no active row has `id`.
    async fn update(&self, id: Uuid, draft: &ClientDraft) -> Result<bool, AppError>;

    /// Returns `false` when no active row has `id`.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
