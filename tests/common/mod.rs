//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tether::config::{Config, ObservabilityConfig, ProbeConfig, TimeoutConfig};
use tether::health::{HealthHandle, HealthProber};
use tether::http::ProxyServer;
use tether::lifecycle::Shutdown;
use tether::upstream::UpstreamTarget;

/// Test configuration pointing at a loopback upstream, with short timeouts
/// and a 1s probe interval.
pub fn test_config(listen_port: u16, upstream_port: u16) -> Config {
    Config {
        upstream_host: "127.0.0.1".to_string(),
        upstream_port,
        listen_port,
        probe: ProbeConfig {
            interval_secs: 1,
            timeout_secs: 1,
            path: "/kaithhealthcheck".to_string(),
        },
        timeouts: TimeoutConfig {
            connect_secs: 1,
            upstream_secs: 3,
            shutdown_grace_secs: 1,
        },
        observability: ObservabilityConfig::default(),
    }
}

/// Spawn the full proxy (server + prober) against the given config.
///
/// Returns the shutdown coordinator and the shared health handle so tests
/// can observe probe transitions directly.
pub async fn spawn_proxy(config: Config) -> (Shutdown, HealthHandle) {
    let upstream = UpstreamTarget::from_config(&config);
    let shutdown = Shutdown::new();
    let health = HealthHandle::new();

    let prober = HealthProber::new(upstream.clone(), config.probe.clone(), health.clone());
    tokio::spawn(prober.run(shutdown.subscribe()));

    let listener = TcpListener::bind(("127.0.0.1", config.listen_port))
        .await
        .unwrap();
    let server = ProxyServer::new(&config, upstream, health.clone());
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(Duration::from_millis(200)).await;
    (shutdown, health)
}

/// Start a mock upstream that returns a fixed response to every request.
pub async fn start_mock_upstream(addr: SocketAddr, content_type: &'static str, body: &'static str) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            content_type,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a programmable mock upstream whose status and body are decided per
/// request by the supplied closure.
#[allow(dead_code)]
pub async fn start_programmable_upstream<F>(addr: SocketAddr, f: F)
where
    F: Fn() -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let (status, body) = f();
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}

/// Start a mock upstream that records the raw request head and body it
/// receives, sending each captured request through the returned channel.
#[allow(dead_code)]
pub async fn start_capture_upstream(addr: SocketAddr) -> mpsc::UnboundedReceiver<String> {
    let listener = TcpListener::bind(addr).await.unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let raw = read_http_request(&mut socket).await;
                        let _ = tx.send(raw);
                        let _ = socket
                            .write_all(
                                b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                            )
                            .await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    rx
}

/// Read one HTTP/1.1 request (head plus content-length body) as a string.
#[allow(dead_code)]
async fn read_http_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        match socket.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                data.extend_from_slice(&buf[..n]);
                if let Some(head_end) = find_head_end(&data) {
                    let head = String::from_utf8_lossy(&data[..head_end]).to_lowercase();
                    let content_length: usize = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse().ok())
                        .unwrap_or(0);
                    if data.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }
            Err(_) => break,
        }
    }

    String::from_utf8_lossy(&data).to_string()
}

#[allow(dead_code)]
fn find_head_end(data: &[u8]) -> Option<usize> {
    data.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Start a mock upstream that streams a chunked response, one chunk at a
/// time with a pause between them.
#[allow(dead_code)]
pub async fn start_streaming_upstream(addr: SocketAddr, chunks: &'static [&'static str]) {
    let listener = TcpListener::bind(addr).await.unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket
                            .write_all(
                                b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nTransfer-Encoding: chunked\r\n\r\n",
                            )
                            .await;
                        for chunk in chunks {
                            let framed = format!("{:x}\r\n{}\r\n", chunk.len(), chunk);
                            if socket.write_all(framed.as_bytes()).await.is_err() {
                                return;
                            }
                            let _ = socket.flush().await;
                            tokio::time::sleep(Duration::from_millis(50)).await;
                        }
                        let _ = socket.write_all(b"0\r\n\r\n").await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
