//! Shared application state for all routes.

use crate::service::ClientService;

#[derive(Clone)]
pub struct AppState {
    pub clients: ClientService,
    /// Upper bound applied to `pageSize` on list requests.
    pub max_page_size: u32,
}

impl AppState {
    pub fn new(clients: ClientService, max_page_size: u32) -> Self {
        AppState {
            clients,
            max_page_size,
        }
    }
}
