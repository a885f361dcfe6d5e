use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{HeaderName, Request, Response, StatusCode};
use axum::response::IntoResponse;
use dashmap::DashMap;
use tower::{Layer, Service};
use tracing::{debug, warn};

const LOG_INTERVAL: Duration = Duration::from_secs(60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const FORWARDED_FOR: &str = "x-forwarded-for";
pub const DEFAULT_CLIENT_HEADER: &str = "fly-client-ip";

/// Per-client token bucket limiter.
///
/// Clients are keyed by a configurable header, then the first
/// `X-Forwarded-For` hop. Requests carrying neither are not limited.
#[derive(Clone)]
pub struct RateLimiter<S> {
    inner: S,
    state: SharedState,
    config: Arc<LimiterConfig>,
}

#[derive(Clone)]
struct SharedState {
    buckets: Arc<DashMap<String, Bucket>>,
    dropped_since_log: Arc<AtomicU64>,
    last_log: Arc<Mutex<Instant>>,
    last_sweep: Arc<Mutex<Instant>>,
}

#[derive(Debug)]
struct LimiterConfig {
    rate_per_sec: f64,
    burst: f64,
    client_header: HeaderName,
    idle_ttl: Duration,
}

impl LimiterConfig {
    fn new(rate_per_sec: f64, burst: f64, client_header: HeaderName) -> Self {
        // A bucket idle this long has refilled completely, so dropping it
        // loses no state.
        let refill_secs = if rate_per_sec > 0.0 {
            burst / rate_per_sec
        } else {
            0.0
        };
        Self {
            rate_per_sec,
            burst,
            client_header,
            idle_ttl: Duration::from_secs_f64(refill_secs.max(SWEEP_INTERVAL.as_secs_f64())),
        }
    }
}

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Bucket {
    fn full(burst: f64, now: Instant) -> Self {
        Self {
            tokens: burst,
            last_refill: now,
        }
    }

    /// Refill for the time since the last call, then take one token if available.
    fn try_take(&mut self, now: Instant, rate_per_sec: f64, burst: f64) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * rate_per_sec).min(burst);
            self.last_refill = now;
        }
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug)]
pub struct RateLimiterLayer {
    config: Arc<LimiterConfig>,
}

impl RateLimiterLayer {
    pub fn new(rate_per_sec: u32, burst: u32) -> Self {
        Self {
            config: Arc::new(LimiterConfig::new(
                rate_per_sec as f64,
                burst as f64,
                HeaderName::from_static(DEFAULT_CLIENT_HEADER),
            )),
        }
    }

    /// Key clients by `header` instead of the default proxy header.
    ///
    /// Invalid header names keep the current one.
    pub fn with_client_header(self, header: &str) -> Self {
        match HeaderName::try_from(header.trim()) {
            Ok(client_header) => Self {
                config: Arc::new(LimiterConfig::new(
                    self.config.rate_per_sec,
                    self.config.burst,
                    client_header,
                )),
            },
            Err(err) => {
                warn!("ignoring invalid client header {header:?}: {err}");
                self
            }
        }
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            state: SharedState {
                buckets: Arc::new(DashMap::new()),
                dropped_since_log: Arc::new(AtomicU64::new(0)),
                last_log: Arc::new(Mutex::new(Instant::now())),
                last_sweep: Arc::new(Mutex::new(Instant::now())),
            },
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, ReqBody> Service<Request<ReqBody>> for RateLimiter<S>
where
    S: Service<Request<ReqBody>, Response = Response<Body>> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        sweep_if_needed(&self.state, self.config.idle_ttl);
        if let Some(client) = client_id(&req, &self.config.client_header)
            && !self.check_and_consume(&client)
        {
            self.state.dropped_since_log.fetch_add(1, Ordering::Relaxed);
            log_drops_if_needed(&self.state);
            return Box::pin(async move {
                Ok((StatusCode::TOO_MANY_REQUESTS, "rate limited").into_response())
            });
        }

        let fut = self.inner.call(req);
        Box::pin(fut)
    }
}

fn client_id<B>(req: &Request<B>, header: &HeaderName) -> Option<String> {
    let headers = req.headers();
    let direct = headers
        .get(header)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let forwarded = || {
        headers
            .get(FORWARDED_FOR)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    direct.or_else(forwarded).map(str::to_string)
}

impl<S> RateLimiter<S> {
    fn check_and_consume(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut entry = self
            .state
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| Bucket::full(self.config.burst, now));
        entry.try_take(now, self.config.rate_per_sec, self.config.burst)
    }
}

fn sweep_if_needed(state: &SharedState, idle_ttl: Duration) {
    let now = Instant::now();
    let Ok(mut last) = state.last_sweep.lock() else {
        return;
    };
    if now.saturating_duration_since(*last) >= SWEEP_INTERVAL {
        *last = now;
        drop(last);
        let evicted = evict_idle(&state.buckets, now, idle_ttl);
        if evicted > 0 {
            debug!("rate limiter evicted {evicted} idle clients");
        }
    }
}

/// Remove buckets untouched for at least `idle_ttl`, returning how many went.
fn evict_idle(buckets: &DashMap<String, Bucket>, now: Instant, idle_ttl: Duration) -> usize {
    let before = buckets.len();
    buckets.retain(|_, bucket| now.saturating_duration_since(bucket.last_refill) < idle_ttl);
    before.saturating_sub(buckets.len())
}

fn log_drops_if_needed(state: &SharedState) {
    let now = Instant::now();
    let Ok(mut last) = state.last_log.lock() else {
        return;
    };
    if now.saturating_duration_since(*last) >= LOG_INTERVAL {
        let dropped = state.dropped_since_log.swap(0, Ordering::Relaxed);
        if dropped > 0 {
            warn!("rate limiter dropped {dropped} requests in the last minute");
        }
        *last = now;
    }
}
