//! # HTTP Server Facade
//!
//! Everything between the wire and the route table: request parsing,
//! response writing, the [`AppService`] dispatch loop, and the coroutine
//! server wrapper. Handlers never touch raw sockets; they see a
//! [`crate::HandlerRequest`] and write a [`crate::Reply`], and this module
//! does the rest.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_cookies, parse_query_params, parse_request, ParsedRequest};
pub use service::{health_endpoint, metrics_endpoint, AppService};
