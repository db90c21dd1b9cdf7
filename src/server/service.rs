use super::request::{parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error};
use crate::adapter::HandlerRequest;
use crate::ids::RequestId;
use crate::middleware::{MetricsMiddleware, Middleware};
use crate::router::RouteTable;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

/// HTTP service dispatching requests against a compiled route table.
///
/// One clone of the service runs per connection coroutine; the table and
/// middleware chain are shared behind `Arc` and never mutated after
/// bootstrap.
#[derive(Clone)]
pub struct AppService {
    pub table: Arc<RouteTable>,
    pub middlewares: Vec<Arc<dyn Middleware>>,
    pub metrics: Option<Arc<MetricsMiddleware>>,
}

impl AppService {
    /// Create a service over a compiled route table with no middleware.
    #[must_use]
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            middlewares: Vec::new(),
            metrics: None,
        }
    }

    /// Append a middleware to the chain. Order is invocation order for
    /// `before` hooks and `after` hooks alike.
    pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Point the built-in `/metrics` endpoint at a metrics middleware.
    pub fn set_metrics_middleware(&mut self, metrics: Arc<MetricsMiddleware>) {
        self.metrics = Some(metrics);
    }

    /// Answer requests that matched no registered route.
    ///
    /// Built-in endpoints live here on purpose: a module that exports a
    /// route at `/health` or `/metrics` shadows the built-in.
    fn handle_unrouted(&self, res: &mut Response, method: &Method, path: &str) -> io::Result<()> {
        if *method == Method::GET && path == "/health" {
            if let Some(metrics) = &self.metrics {
                metrics.inc_top_level_request();
            }
            return health_endpoint(res);
        }
        if *method == Method::GET && path == "/metrics" {
            if let Some(metrics) = &self.metrics {
                metrics.inc_top_level_request();
                return metrics_endpoint(res, metrics);
            }
        }
        if let Some(metrics) = &self.metrics {
            metrics.inc_not_found();
        }
        write_json_error(
            res,
            404,
            &json!({ "error": "Not Found", "method": method.as_str(), "path": path }),
        );
        Ok(())
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    res.status_code(200, "OK");
    res.header("Content-Type: application/json");
    res.body_vec(serde_json::to_vec(&json!({ "status": "ok" })).unwrap_or_default());
    Ok(())
}

/// Metrics endpoint returning Prometheus text format statistics.
pub fn metrics_endpoint(res: &mut Response, metrics: &MetricsMiddleware) -> io::Result<()> {
    let body = format!(
        "# HELP trellis_requests_total Total number of routed requests\n\
         # TYPE trellis_requests_total counter\n\
         trellis_requests_total {}\n\
         # HELP trellis_request_latency_seconds Average request latency in seconds\n\
         # TYPE trellis_request_latency_seconds gauge\n\
         trellis_request_latency_seconds {}\n\
         # HELP trellis_not_found_total Requests that matched no route\n\
         # TYPE trellis_not_found_total counter\n\
         trellis_not_found_total {}\n\
         # HELP trellis_top_level_requests_total Requests answered by built-in endpoints\n\
         # TYPE trellis_top_level_requests_total counter\n\
         trellis_top_level_requests_total {}\n\
         # HELP trellis_coroutine_stack_bytes Configured coroutine stack size\n\
         # TYPE trellis_coroutine_stack_bytes gauge\n\
         trellis_coroutine_stack_bytes {}\n",
        metrics.request_count(),
        metrics.average_latency().as_secs_f64(),
        metrics.not_found_count(),
        metrics.top_level_request_count(),
        metrics.stack_size()
    );
    res.status_code(200, "OK");
    res.header("Content-Type: text/plain; version=0.0.4");
    res.body_vec(body.into_bytes());
    Ok(())
}

fn panic_message(err: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let ParsedRequest {
            method,
            path,
            headers,
            cookies,
            query_params,
            body,
        } = parse_request(req);

        let Ok(verb) = method.parse::<Method>() else {
            write_json_error(
                res,
                400,
                &json!({ "error": "Unsupported method", "method": method }),
            );
            return Ok(());
        };

        let request_id = RequestId::from_header_or_new(
            headers
                .iter()
                .find(|(name, _)| name.as_ref() == "x-request-id")
                .map(|(_, value)| value.as_str()),
        );

        let Some(route) = self.table.lookup(&verb, &path) else {
            return self.handle_unrouted(res, &verb, &path);
        };

        let handler_request = HandlerRequest {
            request_id,
            method: verb,
            path,
            query_params,
            headers,
            cookies,
            body,
        };

        for middleware in &self.middlewares {
            if let Some(reply) = middleware.before(&handler_request) {
                let (status, reply_headers, reply_body) = reply.into_parts();
                write_handler_response(res, status, &reply_headers, reply_body, &request_id);
                return Ok(());
            }
        }

        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (route.handler)(&handler_request)));
        let latency = start.elapsed();

        match outcome {
            Ok(Ok(mut reply)) => {
                for middleware in &self.middlewares {
                    middleware.after(&handler_request, &mut reply, latency);
                }
                let (status, reply_headers, reply_body) = reply.into_parts();
                write_handler_response(res, status, &reply_headers, reply_body, &request_id);
            }
            Ok(Err(err)) => {
                error!(
                    request_id = %request_id,
                    handler = %route.handler_name(),
                    error = %err,
                    "Handler failed"
                );
                write_json_error(
                    res,
                    500,
                    &json!({
                        "error": "Handler failed",
                        "method": handler_request.method.as_str(),
                        "path": handler_request.path,
                    }),
                );
            }
            Err(panic_err) => {
                let message = panic_message(panic_err.as_ref());
                error!(
                    request_id = %request_id,
                    handler = %route.handler_name(),
                    panic = %message,
                    "Handler panicked"
                );
                write_json_error(
                    res,
                    500,
                    &json!({
                        "error": "Handler panicked",
                        "method": handler_request.method.as_str(),
                        "path": handler_request.path,
                    }),
                );
            }
        }
        Ok(())
    }
}
