use ::http::Method;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use trellis::middleware::{Middleware, TracingMiddleware};
use trellis::{App, ComponentBuilder, HandlerRequest, Module, Reply};

mod common;
use common::http;

/// Rejects requests carrying an `x-block` header; counts what it sees.
struct Gate {
    seen: Arc<AtomicUsize>,
}

impl Middleware for Gate {
    fn before(&self, req: &HandlerRequest) -> Option<Reply> {
        self.seen.fetch_add(1, Ordering::SeqCst);
        if req.get_header("x-block").is_some() {
            return Some(Reply::error(403, "blocked"));
        }
        None
    }
}

/// Stamps every reply with the observed handler latency.
struct Stamp;

impl Middleware for Stamp {
    fn after(&self, _req: &HandlerRequest, reply: &mut Reply, latency: Duration) {
        reply.header("x-elapsed-us", latency.as_micros().to_string());
    }
}

fn guarded_app(handled: &Arc<AtomicUsize>) -> App {
    let handled = Arc::clone(handled);
    let component = ComponentBuilder::new("guarded", || ())
        .route("show", Method::GET, "", move |_, _req, reply| {
            handled.fetch_add(1, Ordering::SeqCst);
            reply.body(json!({ "ok": true }));
            Ok(())
        })
        .build();
    App::build(&Module::builder().path("guarded").export(component).build())
}

#[test]
fn test_before_hook_short_circuits_the_handler() {
    let handled = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(AtomicUsize::new(0));
    let mut app = guarded_app(&handled);
    app.add_middleware(Arc::new(Gate {
        seen: Arc::clone(&seen),
    }));
    let (addr, handle) = http::start(app.service());

    let blocked = http::send_request(
        &addr,
        "GET /guarded HTTP/1.1\r\nHost: localhost\r\nx-block: 1\r\n\r\n",
    );
    let allowed = http::get(&addr, "/guarded");
    handle.stop();

    let (status, body) = http::parse_response(&blocked);
    assert_eq!(status, 403);
    assert_eq!(body["error"], "blocked");

    let (status, body) = http::parse_response(&allowed);
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);

    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert_eq!(handled.load(Ordering::SeqCst), 1);
}

#[test]
fn test_after_hook_can_mutate_the_reply() {
    let handled = Arc::new(AtomicUsize::new(0));
    let mut app = guarded_app(&handled);
    app.add_middleware(Arc::new(Stamp));
    let (addr, handle) = http::start(app.service());

    let resp = http::get(&addr, "/guarded");
    handle.stop();

    let (status, _) = http::parse_response(&resp);
    assert_eq!(status, 200);
    let stamped = http::response_header(&resp, "x-elapsed-us").unwrap();
    assert!(stamped.parse::<u128>().is_ok(), "{stamped}");
}

#[test]
fn test_middleware_skipped_for_unmatched_routes() {
    let handled = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(AtomicUsize::new(0));
    let mut app = guarded_app(&handled);
    app.add_middleware(Arc::new(Gate {
        seen: Arc::clone(&seen),
    }));
    app.add_middleware(Arc::new(TracingMiddleware));
    let (addr, handle) = http::start(app.service());

    let resp = http::get(&addr, "/missing");
    handle.stop();

    let (status, _) = http::parse_response(&resp);
    assert_eq!(status, 404);
    assert_eq!(seen.load(Ordering::SeqCst), 0);
    assert_eq!(handled.load(Ordering::SeqCst), 0);
}
