//! Test utilities for photo sources.
//!
//! [`StubFetcher`] is a deterministic [`JsonFetcher`] that answers from
//! canned replies keyed by URL prefix and records every request and cache
//! eviction, so tests can assert which providers were contacted.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use featurephoto_core::{FetchError, JsonFetcher};
use serde_json::Value;

#[derive(Debug, Clone)]
enum StubReply {
    Json(Value),
    Error(FetchError),
}

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    delay: Duration,
    once: bool,
    reply: StubReply,
}

/// Stub `JsonFetcher` for testing.
///
/// Routes registered later take precedence over earlier ones sharing a
/// prefix. Unmatched URLs fail with an HTTP 404 error.
///
/// # Example
///
/// ```
/// use featurephoto_core::JsonFetcher;
/// use featurephoto_data::test_support::{StubFetcher, block_on_for_tests};
/// use serde_json::json;
///
/// let stub = StubFetcher::new();
/// stub.respond("https://a.mapillary.com/", json!({ "features": [] }));
///
/// let body = block_on_for_tests(stub.fetch_json("https://a.mapillary.com/v3/images"));
/// assert_eq!(body, Ok(json!({ "features": [] })));
/// assert_eq!(stub.requests().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StubFetcher {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<String>>,
    evictions: Mutex<Vec<String>>,
}

impl StubFetcher {
    /// Create a stub with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs starting with `prefix` with `body`.
    pub fn respond(&self, prefix: impl Into<String>, body: Value) {
        self.push(prefix.into(), Duration::ZERO, false, StubReply::Json(body));
    }

    /// Answer the next URL starting with `prefix` with `body`, then fall
    /// back to earlier routes.
    pub fn respond_once(&self, prefix: impl Into<String>, body: Value) {
        self.push(prefix.into(), Duration::ZERO, true, StubReply::Json(body));
    }

    /// Answer URLs starting with `prefix` with `body` after `delay`.
    pub fn respond_after(&self, prefix: impl Into<String>, delay: Duration, body: Value) {
        self.push(prefix.into(), delay, false, StubReply::Json(body));
    }

    /// Fail URLs starting with `prefix` with `error`.
    pub fn fail(&self, prefix: impl Into<String>, error: FetchError) {
        self.push(prefix.into(), Duration::ZERO, false, StubReply::Error(error));
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    /// Number of requests whose URL starts with `prefix`.
    pub fn request_count(&self, prefix: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|url| url.starts_with(prefix))
            .count()
    }

    /// Every URL passed to `remove_fetch_cache`, in order.
    pub fn evictions(&self) -> Vec<String> {
        lock(&self.evictions).clone()
    }

    fn push(&self, prefix: String, delay: Duration, once: bool, reply: StubReply) {
        lock(&self.routes).push(Route {
            prefix,
            delay,
            once,
            reply,
        });
    }

    fn route_for(&self, url: &str) -> Option<Route> {
        let mut routes = lock(&self.routes);
        let index = routes
            .iter()
            .rposition(|route| url.starts_with(&route.prefix))?;
        let route = routes.get(index)?.clone();
        if route.once {
            routes.remove(index);
        }
        Some(route)
    }
}

#[async_trait]
impl JsonFetcher for StubFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        lock(&self.requests).push(url.to_owned());
        let Some(route) = self.route_for(url) else {
            return Err(FetchError::Http {
                url: url.to_owned(),
                status: 404,
                message: "no stub route".to_owned(),
            });
        };
        if !route.delay.is_zero() {
            tokio::time::sleep(route.delay).await;
        }
        match route.reply {
            StubReply::Json(body) => Ok(body),
            StubReply::Error(error) => Err(error),
        }
    }

    fn remove_fetch_cache(&self, url: &str) {
        lock(&self.evictions).push(url.to_owned());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be built.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build Tokio runtime")
        .block_on(future)
}
