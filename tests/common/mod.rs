pub mod test_server {
    use std::sync::Once;

    /// Ensures may coroutines are configured only once per test binary
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }
}

#[allow(dead_code)]
pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener, TcpStream};
    use std::time::Duration;
    use trellis::server::{AppService, HttpServer, ServerHandle};

    /// Reserve a free localhost port by binding and dropping a listener.
    pub fn reserve_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    /// Start a service on a reserved port and wait until it accepts.
    pub fn start(service: AppService) -> (SocketAddr, ServerHandle) {
        super::test_server::setup_may_runtime();
        let addr = reserve_addr();
        let handle = HttpServer(service).start(addr).unwrap();
        handle.wait_ready().unwrap();
        (addr, handle)
    }

    /// Send a raw HTTP request and collect the whole response.
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(100)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&tmp[..n]),
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {:?}", e),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// GET a path.
    pub fn get(addr: &SocketAddr, path: &str) -> String {
        send_request(
            addr,
            &format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n"),
        )
    }

    /// POST a JSON body to a path.
    pub fn post_json(addr: &SocketAddr, path: &str, body: &serde_json::Value) -> String {
        let payload = body.to_string();
        send_request(
            addr,
            &format!(
                "POST {path} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{payload}",
                payload.len()
            ),
        )
    }

    /// Split a raw response into status code and JSON body.
    pub fn parse_response(resp: &str) -> (u16, serde_json::Value) {
        let mut parts = resp.split("\r\n\r\n");
        let headers = parts.next().unwrap_or("");
        let body = parts.next().unwrap_or("");
        let mut status = 0;
        for line in headers.lines() {
            if line.starts_with("HTTP/1.1") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("0")
                    .parse()
                    .unwrap();
            }
        }
        let json: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
        (status, json)
    }

    /// Read a response header value, case-insensitively.
    pub fn response_header(resp: &str, name: &str) -> Option<String> {
        let headers = resp.split("\r\n\r\n").next().unwrap_or("");
        headers.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case(name) {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
    }
}
