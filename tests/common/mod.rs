//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Counts backend hits so tests can assert a backend was (or was not)
/// reached.
#[derive(Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Start a mock backend that returns a fixed 200 response.
#[allow(dead_code)]
pub async fn start_mock_backend(addr: SocketAddr, body: &'static str) -> CallCounter {
    start_programmable_backend(addr, move || async move { (200, body.to_string()) }).await
}

/// Start a programmable mock backend with async support.
pub async fn start_programmable_backend<F, Fut>(addr: SocketAddr, f: F) -> CallCounter
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let counter = CallCounter::default();
    let handle = counter.clone();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        counter.bump();
                        // Drain the request head so the client finishes writing.
                        let mut buf = [0u8; 8192];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
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

    handle
}

/// Start a backend that accepts connections but never replies.
#[allow(dead_code)]
pub async fn start_hanging_backend(addr: SocketAddr) -> CallCounter {
    start_programmable_backend(addr, || async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        (200, String::new())
    })
    .await
}

/// Build a reqwest client suited for hitting local test servers.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Register a template pair via the multipart upload endpoint.
#[allow(dead_code)]
pub async fn register_templates(
    client: &reqwest::Client,
    gateway: &str,
    route: &str,
    request_template: &str,
    response_template: &str,
) -> reqwest::Response {
    let form = reqwest::multipart::Form::new()
        .text("soapRoute", route.to_string())
        .text("requestTemplate", request_template.to_string())
        .text("responseTemplate", response_template.to_string());

    client
        .post(format!("{gateway}/soap-call/add-soap-call"))
        .multipart(form)
        .send()
        .await
        .expect("Gateway unreachable")
}
