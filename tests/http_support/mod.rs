//! Raw HTTP/1.1 client helpers for API tests.

use std::net::SocketAddr;
use std::sync::Arc;

use gorex::http::{ACTOR_HEADER, AppState, start_server};
use gorex::project::adapters::memory::InMemoryProjectRepository;
use gorex::task::adapters::memory::InMemoryTaskRepository;
use mockable::DefaultClock;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

/// Parsed response: status code and JSON body (`Null` when empty).
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// Starts an in-memory server on an ephemeral port.
pub async fn spawn_server() -> eyre::Result<SocketAddr> {
    let state = Arc::new(AppState::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(InMemoryProjectRepository::new()),
        Arc::new(DefaultClock),
    ));
    let (addr, _handle) = start_server("127.0.0.1:0", state).await?;
    Ok(addr)
}

/// Sends one request and reads the full response.
pub async fn send_raw_with_method(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> eyre::Result<ApiResponse> {
    let mut stream = tokio::net::TcpStream::connect(addr).await?;
    let mut request = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(payload) = body {
        request.push_str("Content-Type: application/json\r\n");
        request.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    } else if method != "GET" {
        request.push_str("Content-Length: 0\r\n");
    }
    for (name, value) in headers {
        request.push_str(&format!("{name}: {value}\r\n"));
    }
    request.push_str("\r\n");
    if let Some(payload) = body {
        request.push_str(payload);
    }
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    let (head, raw_body) = response
        .split_once("\r\n\r\n")
        .ok_or_else(|| eyre::eyre!("response has no header separator"))?;
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| eyre::eyre!("response has no status line"))?;
    let body = if raw_body.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(raw_body)
            .unwrap_or_else(|_| serde_json::Value::String(raw_body.to_owned()))
    };
    Ok(ApiResponse { status, body })
}

/// Sends a request as `user`.
pub async fn send_as(
    addr: SocketAddr,
    user: Uuid,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> eyre::Result<ApiResponse> {
    let user_header = user.to_string();
    send_raw_with_method(addr, method, path, &[(ACTOR_HEADER, &user_header)], body).await
}

/// Reads a string field from a JSON object.
pub fn field<'a>(value: &'a serde_json::Value, name: &str) -> eyre::Result<&'a str> {
    value
        .get(name)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| eyre::eyre!("missing string field `{name}` in {value}"))
}
