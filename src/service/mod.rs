//! ClientService and request validation.

mod clients;
mod validation;
pub use clients::ClientService;
pub use validation::{RequestValidator, EMAIL_MAX_CHARS, NAME_MAX_CHARS};
