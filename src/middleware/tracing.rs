use std::time::Duration;

use tracing::{debug, info};

use super::Middleware;
use crate::adapter::{HandlerRequest, Reply};

/// Middleware emitting one event when a request enters dispatch and one
/// when its reply is ready, both carrying the request id for correlation.
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<Reply> {
        debug!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            "Request dispatched"
        );
        None
    }

    fn after(&self, req: &HandlerRequest, reply: &mut Reply, latency: Duration) {
        info!(
            request_id = %req.request_id,
            method = %req.method,
            path = %req.path,
            status = reply.status_code(),
            latency_ms = latency.as_millis() as u64,
            "Request completed"
        );
    }
}
