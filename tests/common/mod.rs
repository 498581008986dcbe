//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use cep_race::provider::ProviderKind;
use cep_race::{LookupError, LookupProvider, LookupQuery, LookupRecord};

#[allow(dead_code)]
pub const VIACEP_BODY: &str = r#"{
    "cep": "22621-252",
    "logradouro": "Rua Professor Hermes Lima",
    "complemento": "",
    "bairro": "Barra da Tijuca",
    "localidade": "Rio de Janeiro",
    "uf": "RJ",
    "ibge": "3304557",
    "gia": "",
    "ddd": "21",
    "siafi": "6001"
}"#;

#[allow(dead_code)]
pub const APICEP_BODY: &str = r#"{
    "code": "22260-003",
    "state": "RJ",
    "city": "Rio de Janeiro",
    "district": "Botafogo",
    "address": "Rua Sorocaba",
    "status": 200,
    "ok": true,
    "statusText": "ok"
}"#;

/// What a [`MockProvider`] does once its delay has elapsed.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Status(u16),
    Malformed,
    Panic,
}

/// Deterministic in-process provider.
pub struct MockProvider {
    name: String,
    delay: Duration,
    behavior: Behavior,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn new(name: &str, delay_ms: u64, behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            delay: Duration::from_millis(delay_ms),
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LookupProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(
        &self,
        query: &LookupQuery,
        _deadline: Duration,
    ) -> Result<LookupRecord, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        match self.behavior {
            Behavior::Succeed => {
                let mut record = LookupRecord::new(&self.name);
                record.postal_code = Some(query.hyphenated());
                record.locality = Some("Rio de Janeiro".into());
                Ok(record)
            }
            Behavior::Status(status) => Err(LookupError::Status {
                provider: self.name.clone(),
                status,
            }),
            Behavior::Malformed => ProviderKind::ViaCep.decode(&self.name, b"<html>busy</html>"),
            Behavior::Panic => panic!("mock provider {} crashed", self.name),
        }
    }
}

/// Erase the concrete type for handing to the coordinator.
#[allow(dead_code)]
pub fn providers(list: Vec<Arc<MockProvider>>) -> Vec<Arc<dyn LookupProvider>> {
    list.into_iter().map(|p| p as Arc<dyn LookupProvider>).collect()
}

/// Start a mock HTTP backend on an ephemeral port.
///
/// Every request is answered with `status` and `body` after `delay`.
#[allow(dead_code)]
pub async fn start_backend(status: u16, body: &'static str, delay: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        tokio::time::sleep(delay).await;

                        let reason = match status {
                            200 => "OK",
                            404 => "Not Found",
                            429 => "Too Many Requests",
                            500 => "Internal Server Error",
                            502 => "Bad Gateway",
                            503 => "Service Unavailable",
                            _ => "Mock",
                        };
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
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

    addr
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}

/// HTTP client that ignores proxy settings from the environment.
#[allow(dead_code)]
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
