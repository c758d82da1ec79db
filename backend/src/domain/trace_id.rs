//! Correlation id stamped on every API request.
//!
//! The trace middleware opens a [`TraceId::scope`] around each handler, so
//! domain errors and log lines emitted while listing a product or running its
//! alert fan-out can read the id through [`TraceId::current`] and clients see
//! the same value in the `trace-id` response header.
//!
//! The id lives in a Tokio task-local. Work moved onto a `tokio::spawn`ed task
//! sees `None` unless it is wrapped in its own scope.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// UUID naming one API request.
///
/// # Examples
/// ```
/// use marketplace::TraceId;
///
/// async fn log_listing_created() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(trace_id = %id, "product created");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh id for a request that arrived without one.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the request being served, or `None` outside a request.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` as part of the request named by `trace_id`.
    ///
    /// # Examples
    /// ```
    /// use marketplace::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
    ///     .parse()
    ///     .expect("valid UUID");
    /// let observed = TraceId::scope(trace_id, async move { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async move { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn spawned_task_needs_its_own_scope() {
        let request = TraceId::generate();
        let (unscoped, rescoped) = TraceId::scope(request, async move {
            let unscoped = tokio::spawn(async { TraceId::current() });
            let rescoped = tokio::spawn(TraceId::scope(request, async { TraceId::current() }));
            (
                unscoped.await.expect("task joins"),
                rescoped.await.expect("task joins"),
            )
        })
        .await;
        assert_eq!(unscoped, None);
        assert_eq!(rescoped, Some(request));
    }

    #[test]
    fn parses_header_value() {
        let uuid = Uuid::nil();
        let trace_id: TraceId = uuid.to_string().parse().expect("parse uuid");
        assert_eq!(trace_id.to_string(), uuid.to_string());
        assert_eq!(trace_id.as_uuid(), &uuid);
    }
}
