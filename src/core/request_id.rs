use std::{fmt, ops::Deref, str::FromStr, sync::Arc};

use actix_web::http::header::HeaderValue;
use uuid::Uuid;

/// Identifier grouping every log record produced while one request is handled.
///
/// Any non-blank text is accepted and kept as given, so an inbound
/// `x-request-id` shows up in the logs exactly as the caller sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(Arc<str>);

impl RequestId {
    pub fn new<T>(value: T) -> Result<Self, RequestIdError>
    where
        T: Into<String>,
    {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(RequestIdError::Blank);
        }
        Ok(Self(value.into()))
    }

    /// A fresh hyphenated v4 UUID.
    pub fn random() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string().into())
    }

    /// Reads the ID from a header value, which must be UTF-8 and not blank.
    pub fn from_header(header_value: &HeaderValue) -> Result<Self, RequestIdError> {
        let value = std::str::from_utf8(header_value.as_bytes()).map_err(|e| {
            RequestIdError::NotUtf8 {
                valid_up_to: e.valid_up_to(),
            }
        })?;
        Self::new(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for RequestId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for RequestId {
    type Err = RequestIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum RequestIdError {
    Blank,
    NotUtf8 { valid_up_to: usize },
}

impl fmt::Display for RequestIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestIdError::Blank => f.write_str("request ID is blank"),
            RequestIdError::NotUtf8 { valid_up_to } => {
                write!(f, "request ID is not UTF-8 after byte {valid_up_to}")
            }
        }
    }
}

impl std::error::Error for RequestIdError {}

/// Source of request IDs for requests arriving without one.
pub trait RequestIdGenerator {
    fn generate_request_id(&self) -> Result<RequestId, RequestIdError>;
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct UuidRequestIdGenerator;

impl RequestIdGenerator for UuidRequestIdGenerator {
    fn generate_request_id(&self) -> Result<RequestId, RequestIdError> {
        Ok(RequestId::random())
    }
}
