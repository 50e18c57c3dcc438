//! ClientService: delegation to the configured repository.

use crate::error::AppError;
use crate::model::{Client, ClientDraft, Pagination};
use crate::repository::ClientRepository;
use std::sync::Arc;
use uuid::Uuid;

/// Mirrors [`ClientRepository`]; the only thing it adds is the id for new clients.
#[derive(Clone)]
pub struct ClientService {
    repository: Arc<dyn ClientRepository>,
}

impl ClientService {
    pub fn new(repository: Arc<dyn ClientRepository>) -> Self {
        ClientService { repository }
    }

    pub async fn list(&self, pagination: Pagination) -> Result<Vec<Client>, AppError> {
        self.repository.list(pagination).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        self.repository.get_by_id(id).await
    }

    /// Insert under a fresh v4 id.
    pub async fn create(&self, draft: &ClientDraft) -> Result<Client, AppError> {
        let id = Uuid::new_v4();
        self.repository.create(id, draft).await
    }

    pub async fn update(&self, id: Uuid, draft: &ClientDraft) -> Result<bool, AppError> {
        self.repository.update(id, draft).await
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, AppError> {
        self.repository.soft_delete(id).await
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryClientRepository;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let service = ClientService::new(Arc::new(MemoryClientRepository::new()));
        let draft = ClientDraft {
            name: "Ana".into(),
            surname: "Silva".into(),
            email: "ana@x.com".into(),
            birthdate: Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap(),
        };
        let a = service.create(&draft).await.unwrap();
        let b = service.create(&draft).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(service.get_by_id(a.id).await.unwrap(), Some(a));
    }
}
