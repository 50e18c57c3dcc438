//! HTTP handlers for the client resource.

pub mod clients;
pub use clients::*;
