//! Request-scoped ambient storage for the [`RequestId`].
//!
//! The value lives in a task-local slot that is set only while the future of
//! the owning request is being polled, so concurrent requests on the same
//! worker never observe each other's ID and nothing survives the request.

use std::future::Future;

use crate::RequestId;

tokio::task_local! {
    static ACTIVE_REQUEST_ID: RequestId;
}

/// Returns the request ID of the request currently being handled.
///
/// `None` outside of a scope set up by the access log middleware (or by
/// [`scope_request_id`]).
pub fn current_request_id() -> Option<RequestId> {
    ACTIVE_REQUEST_ID.try_with(RequestId::clone).ok()
}

/// Runs `fut` with `request_id` published as the ambient request ID.
pub async fn scope_request_id<F>(request_id: RequestId, fut: F) -> F::Output
where
    F: Future,
{
    ACTIVE_REQUEST_ID.scope(request_id, fut).await
}

/// Runs `f` with `request_id` published as the ambient request ID.
pub fn sync_scope_request_id<F, R>(request_id: RequestId, f: F) -> R
where
    F: FnOnce() -> R,
{
    ACTIVE_REQUEST_ID.sync_scope(request_id, f)
}
