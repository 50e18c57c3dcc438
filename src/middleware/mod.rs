//! Request middleware: trace ids and panic recovery.

mod panic;
mod trace;

pub use panic::panic_response;
pub use trace::{current_trace_id, trace_request, with_trace_id, REQUEST_ID_HEADER};
