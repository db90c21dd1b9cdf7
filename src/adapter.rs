//! # Request Handler Adapter
//!
//! Bridges bound component methods and the server facade. The adapter wraps
//! each bound method into a [`RouteHandler`]: on every invocation it loads
//! the method's metadata bundle from the store, seeds a [`Reply`] with the
//! bundle's response defaults, invokes the method, and hands the reply back
//! to the facade. Method errors pass through unmodified; mapping them to a
//! status code is the facade's job, not the adapter's.

use crate::ids::RequestId;
use crate::metadata::{self, MetadataStore};
use crate::module::BoundMethod;
use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the request hot path.
///
/// Names are `Arc<str>` so repeated parameter names clone in O(1); values
/// remain `String` as they are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Maximum inline headers/cookies before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header/cookie storage for the request hot path.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to component methods.
///
/// Carries everything extracted from the raw HTTP request. Methods receive
/// it by shared reference; all per-request mutation happens on the
/// [`Reply`].
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for correlation across log lines.
    pub request_id: RequestId,
    /// HTTP verb of the request.
    pub method: Method,
    /// Request path without the query string.
    pub path: String,
    /// Query string parameters (stack-allocated for ≤8 params).
    pub query_params: ParamVec,
    /// HTTP headers with lowercase names (stack-allocated for ≤16 headers).
    pub headers: HeaderVec,
    /// Cookies parsed from the Cookie header.
    pub cookies: HeaderVec,
    /// Request body parsed as JSON, when present and parseable.
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// Get a query parameter by name.
    ///
    /// Uses "last write wins" semantics: for `?limit=10&limit=20` the last
    /// occurrence is returned.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Get a cookie by name.
    #[inline]
    #[must_use]
    pub fn get_cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert query params to a HashMap.
    /// Note: this allocates, prefer `get_query_param` in hot paths.
    #[must_use]
    pub fn query_params_map(&self) -> HashMap<String, String> {
        self.query_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Convert headers to a HashMap.
    /// Note: this allocates, prefer `get_header` in hot paths.
    #[must_use]
    pub fn headers_map(&self) -> HashMap<String, String> {
        self.headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Mutable response a component method writes into.
///
/// A reply starts out seeded with the method's metadata defaults: a
/// `status` record becomes the default status, a `headers` record the
/// default header set. Anything the method sets explicitly wins over a
/// default, and the rest of the metadata bundle stays readable through
/// [`Reply::meta`].
#[derive(Debug, Clone)]
pub struct Reply {
    status: Option<u16>,
    headers: HeaderVec,
    body: Option<Value>,
    default_status: u16,
    default_headers: HeaderVec,
    meta: HashMap<String, Value>,
}

impl Default for Reply {
    fn default() -> Self {
        Self {
            status: None,
            headers: HeaderVec::new(),
            body: None,
            default_status: 200,
            default_headers: HeaderVec::new(),
            meta: HashMap::new(),
        }
    }
}

impl Reply {
    /// Create an empty reply with no metadata defaults (status falls back
    /// to 200).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a reply from a method's metadata bundle.
    pub(crate) fn with_defaults(bundle: HashMap<String, Value>) -> Self {
        let default_status = bundle
            .get(metadata::STATUS)
            .and_then(Value::as_u64)
            .map(|s| s as u16)
            .unwrap_or(200);
        let mut default_headers = HeaderVec::new();
        if let Some(map) = bundle.get(metadata::HEADERS).and_then(Value::as_object) {
            for (name, value) in map {
                let value = value
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string());
                default_headers.push((Arc::from(name.as_str()), value));
            }
        }
        Self {
            status: None,
            headers: HeaderVec::new(),
            body: None,
            default_status,
            default_headers,
            meta: bundle,
        }
    }

    /// Create a JSON reply with an explicit status.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut reply = Self::new();
        reply.status(status).body(body);
        reply
    }

    /// Create an error reply with a JSON `{ "error": message }` body.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Set the response status, overriding any metadata default.
    pub fn status(&mut self, status: u16) -> &mut Self {
        self.status = Some(status);
        self
    }

    /// Add or replace a response header, overriding any metadata default
    /// with the same name.
    pub fn header(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Set a JSON response body.
    pub fn body(&mut self, body: Value) -> &mut Self {
        self.body = Some(body);
        self
    }

    /// Set a plain-text response body.
    pub fn text(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = Some(Value::String(body.into()));
        self
    }

    /// Read a value from the method's metadata bundle.
    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    /// The body set so far, if any. Bodies have no metadata default.
    #[must_use]
    pub fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The status this reply resolves to: explicitly set, else the
    /// metadata default, else 200.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.unwrap_or(self.default_status)
    }

    /// Look up a header, caller-set values first, then metadata defaults.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .chain(self.default_headers.iter())
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Resolve the reply into `(status, headers, body)` with caller-set
    /// headers overriding metadata defaults.
    pub(crate) fn into_parts(self) -> (u16, HeaderVec, Option<Value>) {
        let status = self.status.unwrap_or(self.default_status);
        let mut headers = self.default_headers;
        for (name, value) in self.headers {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }
        (status, headers, self.body)
    }
}

/// Handler registered on the route table: one invocation produces one
/// reply or one error.
pub type RouteHandler = Arc<dyn Fn(&HandlerRequest) -> anyhow::Result<Reply> + Send + Sync>;

/// Wrap a bound method into a registered handler.
///
/// The metadata bundle is loaded per invocation, not captured at
/// registration time, so records share the store's lifetime semantics.
pub(crate) fn adapt(
    store: Arc<MetadataStore>,
    component: Arc<str>,
    action: Arc<str>,
    call: BoundMethod,
) -> RouteHandler {
    Arc::new(move |req: &HandlerRequest| {
        let bundle = store.get_all(&component, &action);
        let mut reply = Reply::with_defaults(bundle);
        call(req, &mut reply)?;
        Ok(reply)
    })
}
