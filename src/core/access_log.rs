use std::{fmt, time::Instant};

use actix_web::{dev::ServiceRequest, http::StatusCode};

use crate::{context::sync_scope_request_id, RequestId};

/// One access log line in the making.
///
/// The line is written when the record is dropped, so it is emitted exactly once
/// whether the request completes, fails, panics or is cancelled. The record's
/// request ID is published while the line is written, wherever the drop happens.
pub(crate) struct AccessRecord {
    request_id: RequestId,
    method: String,
    path: String,
    status: Option<StatusCode>,
    start: Instant,
    target: &'static str,
}

impl AccessRecord {
    pub(crate) fn new(
        request: &ServiceRequest,
        request_id: RequestId,
        start: Instant,
        target: &'static str,
    ) -> Self {
        Self {
            request_id,
            method: request.method().to_string(),
            path: display_path(request.path(), request.uri().query()),
            status: None,
            start,
            target,
        }
    }

    pub(crate) fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

impl Drop for AccessRecord {
    fn drop(&mut self) {
        sync_scope_request_id(self.request_id.clone(), || {
            log::info!(
                target: self.target,
                "{} {} {} {}ms",
                self.method,
                self.path,
                DisplayStatus(self.status),
                self.elapsed_ms()
            )
        });
    }
}

/// Status as logged; `0` when no status was ever determined.
struct DisplayStatus(Option<StatusCode>);

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(status) => write!(f, "{}", status.as_u16()),
            None => f.write_str("0"),
        }
    }
}

/// `path?query` whenever the URI has a query part, even an empty one.
pub(crate) fn display_path(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::{display_path, DisplayStatus};

    #[test]
    fn path_without_query() {
        assert_eq!(display_path("/api/hello", None), "/api/hello");
    }

    #[test]
    fn path_with_empty_query_keeps_separator() {
        assert_eq!(display_path("/api/hello", Some("")), "/api/hello?");
    }

    #[test]
    fn path_with_query() {
        assert_eq!(display_path("/api/hello", Some("x=1&y=2")), "/api/hello?x=1&y=2");
    }

    #[test]
    fn unset_status_is_zero() {
        assert_eq!(DisplayStatus(None).to_string(), "0");
        assert_eq!(DisplayStatus(Some(StatusCode::NOT_FOUND)).to_string(), "404");
    }
}
