#![allow(dead_code)]

use axum::extract::ConnectInfo;
use cep_lookup::application::services::CepService;
use cep_lookup::domain::entities::AddressRecord;
use cep_lookup::domain::providers::{AddressProvider, UpstreamError, UpstreamPayload};
use cep_lookup::infrastructure::cache::{CacheService, InMemoryCache};
use cep_lookup::state::AppState;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::Layer;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

pub const TTL: Duration = Duration::from_secs(300);

type Responder = Box<dyn Fn(&str) -> Result<UpstreamPayload, UpstreamError> + Send + Sync>;

/// Provider answering from a closure and counting its calls.
pub struct StubProvider {
    respond: Responder,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(
        respond: impl Fn(&str) -> Result<UpstreamPayload, UpstreamError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn returning_json(value: Value) -> Arc<Self> {
        let payload = as_object(value);
        Self::new(move |_| Ok(payload.clone()))
    }

    pub fn not_found() -> Arc<Self> {
        Self::new(|_| Err(UpstreamError::NotFound))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressProvider for StubProvider {
    async fn fetch(&self, cep: &str) -> Result<UpstreamPayload, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(cep)
    }
}

/// Provider that fails the test if it is ever called.
pub struct UnreachableProvider;

#[async_trait::async_trait]
impl AddressProvider for UnreachableProvider {
    async fn fetch(&self, cep: &str) -> Result<UpstreamPayload, UpstreamError> {
        panic!("upstream must not be called (cep {cep})");
    }
}

pub fn as_object(value: Value) -> UpstreamPayload {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

pub fn barretos_json() -> Value {
    json!({
        "cep": "14784478",
        "logradouro": "Avenida Ranulfo Prata",
        "bairro": "Jardim Universitário",
        "localidade": "Barretos",
        "uf": "SP"
    })
}

pub fn create_test_state(provider: Arc<dyn AddressProvider>) -> (AppState, Arc<InMemoryCache>) {
    let cache = Arc::new(InMemoryCache::default());
    let cep_service = Arc::new(CepService::new(cache.clone(), provider, TTL));
    let state = AppState::new(cep_service, cache.clone());

    (state, cache)
}

pub async fn seed_cache(cache: &InMemoryCache, record: &AddressRecord) {
    let key = format!("cep:{}", record.postal_code);
    cache
        .set(&key, &Value::Object(record.to_map()).to_string(), TTL)
        .await
        .unwrap();
}

/// Inserts a fixed `ConnectInfo` so the rate limiter can identify the client.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// Buffer collecting formatted log lines emitted while a guard is held.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<parking_lot::Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Routes events on the current thread into the buffer until the guard drops.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines at `level` (`"WARN"`, `"ERROR"`, ...).
    pub fn at_level(&self, level: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.contains(&format!(" {level} ")))
            .collect()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
