use std::{
    borrow::Cow,
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
    time::Instant,
};

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error, HttpMessage,
};
use futures::{
    future::{Either, LocalBoxFuture},
    FutureExt,
};

use crate::{
    context, AccessRecord, Config, RequestId, RequestIdError, RequestIdGenerator,
};

/// Middleware writing one access log line per request, with the request ID
/// published to the ambient context while the request is handled.
pub struct AccessLog {
    config: Rc<Config>,
}

impl AccessLog {
    /// Sets the name of the header from which the request ID is read from the request.
    pub fn request_header_name<T>(mut self, header_name: T) -> Self
    where
        T: Into<HeaderName>,
    {
        self.modify_config(|cfg| cfg.header_name = header_name.into());
        self
    }

    fn modify_config<M>(&mut self, modification: M)
    where
        M: FnOnce(&mut Config),
    {
        if let Some(cfg) = Rc::get_mut(&mut self.config) {
            modification(cfg);
        }
    }

    /// Adds a path prefix for which neither the access line is written nor a
    /// request ID is handled.
    pub fn exclude_path_prefix<T>(mut self, prefix: T) -> Self
    where
        T: Into<Cow<'static, str>>,
    {
        self.modify_config(|cfg| cfg.excluded_prefixes.push(prefix.into()));
        self
    }

    /// Replaces the excluded path prefixes.
    pub fn excluded_path_prefixes<I, T>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'static, str>>,
    {
        self.modify_config(|cfg| {
            cfg.excluded_prefixes = prefixes.into_iter().map(Into::into).collect()
        });
        self
    }

    /// The name of the header to which the request ID is written for the response.
    pub fn response_header_name<T>(mut self, header_name: T) -> Self
    where
        T: Into<HeaderName>,
    {
        self.modify_config(|cfg| cfg.resp_header_name = header_name.into());
        self
    }

    /// Controls whether the request ID is returned in the response headers.
    pub fn include_in_response(mut self, include_in_response: bool) -> Self {
        self.modify_config(|cfg| cfg.include_in_resp = include_in_response);
        self
    }

    /// Use the provided generator for creating a `RequestId` instead of
    /// the default one.
    pub fn with_id_generator(mut self, id_generator: Box<dyn RequestIdGenerator>) -> Self {
        self.modify_config(|cfg| cfg.request_id_generator = id_generator);
        self
    }

    /// Sets the `log` target of the access lines.
    pub fn log_target(mut self, target: &'static str) -> Self {
        self.modify_config(|cfg| cfg.log_target = target);
        self
    }
}

impl Default for AccessLog {
    /// Creates the default instance of `AccessLog` with the following configuration:
    ///
    /// * request header name: `"x-request-id"`,
    /// * excluded path prefixes: `"/actuator"`, `"/swagger"`, `"/v3/api-docs"`,
    /// * response header name: `"x-request-id"`,
    /// * include in response: `false`,
    /// * ID generator: hyphenated UUID (v4),
    /// * log target: `"actix_web_access_log"`.
    fn default() -> Self {
        Self {
            config: Rc::new(Config::default()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessLogMiddleware {
            service,
            config: Rc::clone(&self.config),
        }))
    }
}

pub struct AccessLogMiddleware<S> {
    service: S,
    config: Rc<Config>,
}

impl<S, B> Service<ServiceRequest> for AccessLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Either<S::Future, LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, request: ServiceRequest) -> Self::Future {
        if self.config.is_excluded(request.path()) {
            return Either::Left(self.service.call(request));
        }

        let start = Instant::now();
        let request_id = obtain_request_id(&self.config, &request);
        let mut record =
            AccessRecord::new(&request, request_id.clone(), start, self.config.log_target);

        request.extensions_mut().insert(request_id.clone());

        let fut = context::sync_scope_request_id(request_id.clone(), || {
            self.service.call(request)
        });
        let config = Rc::clone(&self.config);

        Either::Right(
            context::scope_request_id(request_id.clone(), async move {
                let result = fut.await;

                match &result {
                    Ok(response) => record.set_status(response.status()),
                    Err(e) => record.set_status(e.as_response_error().status_code()),
                }
                drop(record);

                let mut response = result?;

                if config.include_in_resp {
                    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
                        response
                            .headers_mut()
                            .insert(config.resp_header_name.clone(), header_value);
                    }
                }

                Ok::<_, Error>(response)
            })
            .boxed_local(),
        )
    }
}

/// The inbound header value when usable, otherwise a generated ID.
///
/// A failing generator falls back to a random UUID so the request is still
/// handled and logged.
fn obtain_request_id(config: &Config, req: &ServiceRequest) -> RequestId {
    let header_name = &config.header_name;

    if let Some(header_value) = req.headers().get(header_name) {
        match RequestId::from_header(header_value) {
            Ok(request_id) => return request_id,
            Err(RequestIdError::Blank) => {}
            Err(e) => log::debug!(
                target: config.log_target,
                "ignoring value of header '{header_name}': {e}"
            ),
        }
    }

    config
        .request_id_generator
        .generate_request_id()
        .unwrap_or_else(|e| {
            log::warn!(
                target: config.log_target,
                "request ID generator failed, using a random UUID: {e}"
            );
            RequestId::random()
        })
}

#[cfg(test)]
mod access_log_tests {
    use actix_web::http::header::HeaderName;

    use crate::AccessLog;

    #[test]
    fn test_default_access_log_config() {
        let access_log = AccessLog::default();
        let default_config = access_log.config;

        assert_eq!(
            HeaderName::from_static("x-request-id"),
            default_config.header_name
        );
        assert_eq!(
            vec!["/actuator", "/swagger", "/v3/api-docs"],
            default_config
                .excluded_prefixes
                .iter()
                .map(|prefix| prefix.as_ref())
                .collect::<Vec<_>>()
        );
        assert!(!default_config.include_in_resp);
        assert_eq!("actix_web_access_log", default_config.log_target);
    }

    #[test]
    fn test_set_request_header_name() {
        let header_name_str = "x-correlation-id";
        let access_log =
            AccessLog::default().request_header_name(HeaderName::from_static(header_name_str));

        assert_eq!(header_name_str, access_log.config.header_name.as_str());
    }

    #[test]
    fn test_add_excluded_path_prefix() {
        let access_log = AccessLog::default().exclude_path_prefix("/metrics");

        assert!(access_log.config.is_excluded("/metrics/prometheus"));
        assert!(access_log.config.is_excluded("/actuator/health"));
    }

    #[test]
    fn test_replace_excluded_path_prefixes() {
        let access_log = AccessLog::default().excluded_path_prefixes(["/internal"]);

        assert!(access_log.config.is_excluded("/internal/status"));
        assert!(!access_log.config.is_excluded("/actuator/health"));
    }

    #[test]
    fn test_set_response_header_name() {
        let header_name_str = "x-transaction-id";
        let access_log =
            AccessLog::default().response_header_name(HeaderName::from_static(header_name_str));

        assert_eq!(
            header_name_str,
            access_log.config.resp_header_name.as_str()
        );
    }

    #[test]
    fn test_set_include_in_response_to_true() {
        let access_log = AccessLog::default().include_in_response(true);

        assert!(access_log.config.include_in_resp);
    }

    #[test]
    fn test_set_log_target() {
        let access_log = AccessLog::default().log_target("http");

        assert_eq!("http", access_log.config.log_target);
    }
}
