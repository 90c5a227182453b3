pub(crate) mod access_log;
pub(crate) mod config;
pub mod context;
pub(crate) mod extract;
pub(crate) mod middleware;
pub(crate) mod request_id;
