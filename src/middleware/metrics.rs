use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::Middleware;
use crate::adapter::{HandlerRequest, Reply};

/// Middleware collecting request statistics for the `/metrics` endpoint.
///
/// All counters use atomic operations with `Ordering::Relaxed`, so the
/// numbers are eventually consistent and extremely cheap to record. The
/// middleware is passive: it never blocks or rewrites a request.
///
/// Tracked:
/// - total handled requests and average latency
/// - requests that matched no route
/// - built-in endpoint hits that bypass the route table
/// - coroutine stack size, for capacity tuning
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    total_latency_ns: AtomicU64,
    not_found: AtomicUsize,
    top_level_requests: AtomicUsize,
    stack_size: AtomicUsize,
}

impl Default for MetricsMiddleware {
    fn default() -> Self {
        Self {
            request_count: AtomicUsize::new(0),
            total_latency_ns: AtomicU64::new(0),
            not_found: AtomicUsize::new(0),
            top_level_requests: AtomicUsize::new(0),
            stack_size: AtomicUsize::new(0),
        }
    }
}

impl MetricsMiddleware {
    /// Create a metrics middleware with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of requests that reached a handler.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Mean handler latency across all requests, zero when none were
    /// processed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.request_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::from_nanos(0)
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }

    /// Count a request that matched no route.
    pub fn inc_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    /// Total number of requests that matched no route.
    #[must_use]
    pub fn not_found_count(&self) -> usize {
        self.not_found.load(Ordering::Relaxed)
    }

    /// Count a hit on a built-in endpoint (`/health`, `/metrics`) that
    /// bypassed the route table.
    pub fn inc_top_level_request(&self) {
        self.top_level_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Total number of built-in endpoint hits.
    #[must_use]
    pub fn top_level_request_count(&self) -> usize {
        self.top_level_requests.load(Ordering::Relaxed)
    }

    /// Configured coroutine stack size observed on the last request.
    #[must_use]
    pub fn stack_size(&self) -> usize {
        self.stack_size.load(Ordering::Relaxed)
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, _req: &HandlerRequest) -> Option<Reply> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn after(&self, _req: &HandlerRequest, _reply: &mut Reply, latency: Duration) {
        self.total_latency_ns
            .fetch_add(latency.as_nanos() as u64, Ordering::Relaxed);
        // record the stack size for the current coroutine when available
        if may::coroutine::is_coroutine() {
            let co = may::coroutine::current();
            self.stack_size.store(co.stack_size(), Ordering::Relaxed);
        } else {
            self.stack_size
                .store(may::config().get_stack_size(), Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{HeaderVec, ParamVec};
    use crate::ids::RequestId;
    use http::Method;

    fn request() -> HandlerRequest {
        HandlerRequest {
            request_id: RequestId::new(),
            method: Method::GET,
            path: "/".to_string(),
            query_params: ParamVec::new(),
            headers: HeaderVec::new(),
            cookies: HeaderVec::new(),
            body: None,
        }
    }

    #[test]
    fn test_counts_requests_and_latency() {
        let metrics = MetricsMiddleware::new();
        let req = request();
        let mut reply = Reply::new();

        assert!(metrics.before(&req).is_none());
        metrics.after(&req, &mut reply, Duration::from_millis(4));
        assert!(metrics.before(&req).is_none());
        metrics.after(&req, &mut reply, Duration::from_millis(2));

        assert_eq!(metrics.request_count(), 2);
        assert_eq!(metrics.average_latency(), Duration::from_millis(3));
    }

    #[test]
    fn test_not_found_counter() {
        let metrics = MetricsMiddleware::new();
        assert_eq!(metrics.not_found_count(), 0);
        metrics.inc_not_found();
        metrics.inc_not_found();
        assert_eq!(metrics.not_found_count(), 2);
    }
}
