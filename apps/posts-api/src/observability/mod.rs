//! Observability module - request correlation.

mod request_id;

pub use request_id::{RequestId, attach_request_id};
