//! Loopback HTTP server standing in for the hosted OCR and image search
//! endpoints in tests.

use crate::models::config::ServerConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Canned reply for one request
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl StubResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the reply back, to let a test race something against it
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: mpsc::UnboundedReceiver<String>,
}

impl StubServer {
    /// Bind an ephemeral port and answer every request with `handler`.
    ///
    /// The handler sees the raw request (request line, headers, body).
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> StubResponse + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, requests) = mpsc::unbounded_channel();
        let handler = Arc::new(handler);

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let handler = Arc::clone(&handler);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let _ = serve(stream, handler.as_ref(), &tx).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    /// Server settings pointing every endpoint at this stub
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
            ..ServerConfig::default()
        }
    }

    /// Next request received, in arrival order
    pub async fn next_request(&mut self) -> String {
        self.requests.recv().await.unwrap()
    }
}

async fn serve<F>(
    mut stream: TcpStream,
    handler: &F,
    tx: &mpsc::UnboundedSender<String>,
) -> std::io::Result<()>
where
    F: Fn(&str) -> StubResponse,
{
    let request = read_request(&mut stream).await?;
    let reply = handler(&request);
    let _ = tx.send(request);

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let head = format!(
        "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        reply.status,
        reply.body.len()
    );
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(reply.body.as_bytes()).await?;
    stream.shutdown().await
}

/// Read headers plus a `content-length` or chunked body
async fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&chunk[..n]);

        let Some(head_end) = find(&raw, b"\r\n\r\n").map(|i| i + 4) else {
            continue;
        };
        let head = String::from_utf8_lossy(&raw[..head_end]).to_ascii_lowercase();
        let body = &raw[head_end..];

        let complete = if let Some(length) = header_value(&head, "content-length") {
            body.len() >= length.parse::<usize>().unwrap_or(0)
        } else if head.contains("transfer-encoding: chunked") {
            find(body, b"0\r\n\r\n").is_some()
        } else {
            true
        };
        if complete {
            break;
        }
    }

    Ok(String::from_utf8_lossy(&raw).into_owned())
}

fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == name).then(|| value.trim())
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
