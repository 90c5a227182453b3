use actix_web::http::header::HeaderName;
use awc::ClientRequest;

use crate::{context::current_request_id, RequestIdHeader, RequestIdHeaderPropagate};

const DEFAULT_HEADER_NAME: HeaderName = HeaderName::from_static("x-request-id");

impl RequestIdHeaderPropagate for ClientRequest {
    fn with_request_id_header<T>(self, request_id_header: T) -> Self
    where
        T: Into<RequestIdHeader>,
    {
        self.insert_header(request_id_header.into())
    }

    fn with_current_request_id(self) -> Self {
        match current_request_id() {
            Some(request_id) => {
                self.with_request_id_header((DEFAULT_HEADER_NAME, request_id))
            }
            None => self,
        }
    }
}
