//! Client records: REST CRUD over a soft-deletable `clients` table in PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Settings, StoreKind};
pub use error::{AppError, ConfigError, ErrorBody, FieldError};
pub use model::{Client, ClientDraft, ClientPayload, ListParams, Pagination};
pub use repository::{ClientRepository, MemoryClientRepository, PgClientRepository};
pub use routes::{app_router, client_routes, common_routes_with_ready};
pub use service::{ClientService, RequestValidator};
pub use state::AppState;
pub use store::{connect_pool, ensure_clients_table, ensure_database_exists};
