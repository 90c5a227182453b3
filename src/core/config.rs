use std::borrow::Cow;

use actix_web::http::header::HeaderName;

use crate::{RequestIdGenerator, UuidRequestIdGenerator};

const DEFAULT_HEADER_NAME: &str = "x-request-id";

pub(crate) const DEFAULT_LOG_TARGET: &str = "actix_web_access_log";

/// Path prefixes that bypass access logging and request ID handling by default.
pub const DEFAULT_EXCLUDED_PATH_PREFIXES: [&str; 3] = ["/actuator", "/swagger", "/v3/api-docs"];

pub(crate) struct Config {
    pub(crate) header_name: HeaderName,
    pub(crate) excluded_prefixes: Vec<Cow<'static, str>>,
    pub(crate) resp_header_name: HeaderName,
    pub(crate) include_in_resp: bool,
    pub(crate) request_id_generator: Box<dyn RequestIdGenerator>,
    pub(crate) log_target: &'static str,
}

impl Config {
    pub(crate) fn is_excluded(&self, path: &str) -> bool {
        self.excluded_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_ref()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_name: HeaderName::from_static(DEFAULT_HEADER_NAME),
            excluded_prefixes: DEFAULT_EXCLUDED_PATH_PREFIXES
                .iter()
                .map(|prefix| Cow::Borrowed(*prefix))
                .collect(),
            resp_header_name: HeaderName::from_static(DEFAULT_HEADER_NAME),
            include_in_resp: false,
            request_id_generator: Box::new(UuidRequestIdGenerator),
            log_target: DEFAULT_LOG_TARGET,
        }
    }
}
