//! An Actix-web middleware that writes one access log line per request.
//!
//! Every request whose path is not excluded gets a [`RequestId`], taken from the
//! `x-request-id` header or freshly generated. While the request is handled the
//! ID is available through [`context::current_request_id`], so log formatters
//! can attach it to every record, including the access line itself:
//!
//! ```text
//! GET /api/hello?x=1 200 5ms
//! ```

mod core;

#[cfg(feature = "client")]
mod client;
#[cfg(feature = "logger")]
pub mod logger;

pub(crate) use crate::core::{access_log::AccessRecord, config::Config};
pub(crate) use crate::core::request_id::UuidRequestIdGenerator;

pub use crate::core::{
    config::DEFAULT_EXCLUDED_PATH_PREFIXES,
    context,
    middleware::{AccessLog, AccessLogMiddleware},
    extract::{RequestIdExtract, RequestIdHeader, RequestIdHeaderPropagate, RequestIdVariable},
    request_id::{RequestId, RequestIdError, RequestIdGenerator},
};
