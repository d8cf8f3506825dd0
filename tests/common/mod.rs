//! Shared helpers for integration tests: a minimal mock HTTP server.

use std::sync::Arc;
use std::thread;

/// Spawn a mock server on an ephemeral port. The handler runs for every
/// incoming request; the server lives until the test process exits.
pub fn spawn_server<F>(handler: F) -> String
where
    F: Fn(tiny_http::Request) + Send + Sync + 'static,
{
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind mock server");
    let port = server.server_addr().to_ip().expect("ip addr").port();
    let server = Arc::new(server);
    let handler = Arc::new(handler);
    let srv = Arc::clone(&server);
    thread::spawn(move || {
        for request in srv.incoming_requests() {
            handler(request);
        }
    });
    format!("http://127.0.0.1:{port}")
}

/// Respond with a JSON body and status code.
pub fn respond_json(request: tiny_http::Request, status: u16, body: &str) {
    let response = tiny_http::Response::from_string(body)
        .with_status_code(status)
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("header"),
        );
    request.respond(response).expect("respond");
}
