//! # Middleware
//!
//! Hooks the server facade runs around handler dispatch. A middleware can
//! observe the request before the handler runs (and short-circuit it by
//! producing a reply) and amend the reply afterwards. Middleware only runs
//! for requests that matched a route; built-in endpoints and 404s bypass
//! the chain.

mod core;
mod metrics;
mod tracing;

pub use self::core::Middleware;
pub use self::metrics::MetricsMiddleware;
pub use self::tracing::TracingMiddleware;
