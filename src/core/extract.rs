use std::future::{ready, Ready};

use actix_web::{
    dev::Payload,
    error::ErrorInternalServerError,
    http::header::{HeaderName, HeaderValue, InvalidHeaderValue, TryIntoHeaderPair},
    Error, FromRequest, HttpMessage, HttpRequest,
};

use crate::RequestId;

/// Extracts the request ID assigned by the access log middleware.
///
/// Fails with 500 for paths the middleware leaves alone; take an
/// `Option<RequestId>` in handlers that also serve excluded paths.
impl FromRequest for RequestId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(req.request_id().ok_or_else(|| {
            ErrorInternalServerError(format!(
                "no request ID assigned to '{}'; is the path excluded from the access log?",
                req.path()
            ))
        }))
    }
}

pub trait RequestIdExtract {
    /// The request ID, `None` when the middleware skipped the request.
    fn request_id(&self) -> Option<RequestId>;
}

impl<T> RequestIdExtract for T
where
    T: HttpMessage,
{
    fn request_id(&self) -> Option<RequestId> {
        self.extensions().get::<RequestId>().cloned()
    }
}

/// A request ID paired with the header it travels in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdHeader {
    pub name: HeaderName,
    pub request_id: RequestId,
}

impl From<(HeaderName, RequestId)> for RequestIdHeader {
    fn from((name, request_id): (HeaderName, RequestId)) -> Self {
        Self { name, request_id }
    }
}

impl TryIntoHeaderPair for RequestIdHeader {
    type Error = InvalidHeaderValue;

    fn try_into_pair(self) -> Result<(HeaderName, HeaderValue), Self::Error> {
        let value = HeaderValue::from_str(&self.request_id)?;
        Ok((self.name, value))
    }
}

/// Adds the request ID as a format variable of a request logger.
pub trait RequestIdVariable {
    fn add_request_id(self) -> Self;
}

/// Carries a request ID on outgoing requests.
pub trait RequestIdHeaderPropagate {
    fn with_request_id_header<T>(self, request_id_header: T) -> Self
    where
        T: Into<RequestIdHeader>;

    /// Propagates the request ID of the request currently being handled, if any.
    fn with_current_request_id(self) -> Self;
}
