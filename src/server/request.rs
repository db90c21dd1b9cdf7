use crate::adapter::{HeaderVec, ParamVec};
use may_minihttp::Request;
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, info};

/// Parsed HTTP request data used by `AppService`.
///
/// Header names are lowercased at parse time so downstream lookups can
/// compare exactly.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method token as received.
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// HTTP headers (lowercase names).
    pub headers: HeaderVec,
    /// Cookies parsed from the Cookie header.
    pub cookies: HeaderVec,
    /// Parsed query string parameters.
    pub query_params: ParamVec,
    /// Request body parsed as JSON, when present and parseable.
    pub body: Option<Value>,
}

/// Split the Cookie header into name/value pairs.
#[must_use]
pub fn parse_cookies(headers: &HeaderVec) -> HeaderVec {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("cookie"))
        .map(|(_, value)| {
            value
                .split(';')
                .filter_map(|pair| {
                    let mut parts = pair.trim().splitn(2, '=');
                    let name = parts.next()?.trim();
                    let value = parts.next().unwrap_or("").trim();
                    Some((Arc::from(name), value.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Parse query string parameters from a URL path.
///
/// Everything after `?` is URL-decoded; duplicate names are kept in order
/// so "last write wins" accessors see the final occurrence.
#[must_use]
pub fn parse_query_params(path: &str) -> ParamVec {
    if let Some(pos) = path.find('?') {
        let query_str = &path[pos + 1..];
        url::form_urlencoded::parse(query_str.as_bytes())
            .map(|(k, v)| (Arc::from(k.as_ref()), v.to_string()))
            .collect()
    } else {
        ParamVec::new()
    }
}

/// Extract method, path, headers, cookies, query params, and a JSON body
/// peek from a raw `may_minihttp::Request`.
///
/// A body that is present but not valid JSON parses to `None`; body
/// semantics belong to handlers, the facade only carries the value.
#[must_use]
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();
    let http_version = format!("{:?}", req.version());

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase().as_str()),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    debug!(
        header_count = headers.len(),
        size_bytes = headers.iter().map(|(k, v)| k.len() + v.len()).sum::<usize>(),
        "Headers extracted"
    );

    let cookies = parse_cookies(&headers);
    debug!(cookie_count = cookies.len(), "Cookies extracted");

    let query_params = parse_query_params(&raw_path);
    debug!(param_count = query_params.len(), "Query params parsed");

    let body = {
        let mut body_str = String::new();
        match req.body().read_to_string(&mut body_str) {
            Ok(size) if size > 0 => {
                debug!(body_size_bytes = size, "Request body read");
                serde_json::from_str(&body_str).ok()
            }
            _ => None,
        }
    };

    info!(
        method = %method,
        path = %path,
        http_version = %http_version,
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        cookies,
        query_params,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cookies() {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("cookie"), "a=b; c=d".to_string()));
        let cookies = parse_cookies(&headers);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0], (Arc::from("a"), "b".to_string()));
        assert_eq!(cookies[1], (Arc::from("c"), "d".to_string()));
    }

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("/p?x=1&y=2");
        assert_eq!(q.len(), 2);
        assert_eq!(q[0], (Arc::from("x"), "1".to_string()));
        assert_eq!(q[1], (Arc::from("y"), "2".to_string()));
    }

    #[test]
    fn test_parse_query_params_keeps_duplicates_in_order() {
        let q = parse_query_params("/p?x=1&x=2");
        assert_eq!(q.len(), 2);
        assert_eq!(q[1], (Arc::from("x"), "2".to_string()));
    }
}
