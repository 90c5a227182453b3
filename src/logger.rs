//! `env_logger` and actix-web `Logger` integration.
//!
//! The formatter reads the request ID from the ambient context, so callers never
//! interpolate it into their messages.

use std::{fmt::Display, io::Write};

use actix_web::middleware::Logger;
use env_logger::{fmt::Formatter, Builder, Env};
use log::{Record, SetLoggerError};

use crate::{context::current_request_id, RequestIdExtract, RequestIdVariable};

const NO_REQUEST_ID: &str = "-";

/// `env_logger` format writing `[timestamp LEVEL target request_id=<id>] message`.
pub fn format_with_request_id(buf: &mut Formatter, record: &Record<'_>) -> std::io::Result<()> {
    let timestamp = buf.timestamp();
    write_line(buf, timestamp, record)
}

fn write_line<W, T>(out: &mut W, timestamp: T, record: &Record<'_>) -> std::io::Result<()>
where
    W: Write,
    T: Display,
{
    let request_id = current_request_id();

    writeln!(
        out,
        "[{} {:<5} {} request_id={}] {}",
        timestamp,
        record.level(),
        record.target(),
        request_id.as_deref().unwrap_or(NO_REQUEST_ID),
        record.args()
    )
}

/// An `env_logger` builder configured from `RUST_LOG` (default `info`) using
/// [`format_with_request_id`].
pub fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(format_with_request_id);
    builder
}

pub fn init() {
    builder().init();
}

pub fn try_init() -> Result<(), SetLoggerError> {
    builder().try_init()
}

impl RequestIdVariable for Logger {
    /// Registers the `%{request-id}xi` replacement; `-` for excluded paths.
    fn add_request_id(self) -> Self {
        self.custom_request_replace("request-id", |req| {
            req.request_id()
                .map_or_else(|| NO_REQUEST_ID.to_owned(), |id| id.to_string())
        })
    }
}
