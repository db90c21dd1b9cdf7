use crate::adapter::HeaderVec;
use crate::ids::RequestId;
use may_minihttp::Response;
use serde_json::Value;
use tracing::debug;

/// Map common status codes to reason phrases.
fn status_reason(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Write a handler reply onto the wire.
///
/// Content type follows the body shape: a JSON string becomes `text/plain`,
/// any other JSON value is serialized as `application/json`. Caller-set
/// `content-type` headers win over either default. Every response carries
/// an `x-request-id` header unless the handler set one itself.
pub fn write_handler_response(
    res: &mut Response,
    status: u16,
    headers: &HeaderVec,
    body: Option<Value>,
    request_id: &RequestId,
) {
    res.status_code(status as usize, status_reason(status));

    let mut has_content_type = false;
    let mut has_request_id = false;
    for (name, value) in headers.iter() {
        if name.eq_ignore_ascii_case("content-type") {
            has_content_type = true;
        }
        if name.eq_ignore_ascii_case("x-request-id") {
            has_request_id = true;
        }
        // may_minihttp wants 'static header strings; responses are
        // short-lived so the leak is bounded per response.
        res.header(&*Box::leak(format!("{name}: {value}").into_boxed_str()));
    }
    if !has_request_id {
        res.header(&*Box::leak(
            format!("x-request-id: {request_id}").into_boxed_str(),
        ));
    }

    match body {
        Some(Value::String(text)) => {
            if !has_content_type {
                res.header("Content-Type: text/plain");
            }
            debug!(status, body_bytes = text.len(), "Writing text response");
            res.body_vec(text.into_bytes());
        }
        Some(value) => {
            if !has_content_type {
                res.header("Content-Type: application/json");
            }
            let bytes = serde_json::to_vec(&value).unwrap_or_default();
            debug!(status, body_bytes = bytes.len(), "Writing JSON response");
            res.body_vec(bytes);
        }
        None => {
            debug!(status, "Writing empty response");
            res.body_vec(Vec::new());
        }
    }
}

/// Write a JSON error response with the given status code.
pub fn write_json_error(res: &mut Response, status: u16, body: &Value) {
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(serde_json::to_vec(body).unwrap_or_default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason_known_codes() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(201), "Created");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(500), "Internal Server Error");
    }

    #[test]
    fn test_status_reason_unknown_code() {
        assert_eq!(status_reason(299), "Unknown");
    }
}
