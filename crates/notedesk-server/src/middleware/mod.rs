//! Tower middleware applied to every console request.
//!
//! - `RequestIdLayer`: generates or propagates `x-request-id`
//! - `LoggingLayer`: request start/completion inside an `http_request` span

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{MAX_REQUEST_ID_LEN, REQUEST_ID_HEADER, RequestIdLayer, RequestIdMiddleware};
