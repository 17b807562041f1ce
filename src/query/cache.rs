//! Keyed query cache with single-flight fetching.
//!
//! Entries are type-erased and live in one map behind a `std::sync::Mutex`
//! that is never held across an await. Each fetch runs as its own tokio task
//! wrapped in a `Shared` future, so every reader of a key joins the same
//! request. A fetch carries the generation of its entry at start; when the
//! last observer detaches (or the entry is removed) the generation moves on
//! and the late result is discarded instead of written.
//!
//! An entry left with no observers gets an eviction timer for its strategy's
//! GC time. The timer evicts only if the entry is still unobserved and idle
//! when it fires; `collect_garbage` sweeps the same condition on demand.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::error::{ApiError, TransportError};
use crate::keys::QueryKey;
use crate::i18n::Language;
use crate::query::handle::{self, Binding, QueryHandle};
use crate::query::metrics::{MetricsReport, QueryMetrics};
use crate::query::state::{QueryState, QueryStatus};
use crate::query::strategy::QueryStrategy;
use crate::retry::with_retry_if;

type AnyData = Arc<dyn Any + Send + Sync>;
type FetchOutcome = Result<AnyData, ApiError>;
pub(crate) type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;
type Fetcher = Arc<dyn Fn() -> BoxFuture<'static, FetchOutcome> + Send + Sync>;

/// Per-read options.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub strategy: QueryStrategy,
    /// When false the read stays idle and never calls its fetcher.
    pub enabled: bool,
}

impl QueryOptions {
    pub fn new(strategy: QueryStrategy) -> Self {
        Self {
            strategy,
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::new(QueryStrategy::default())
    }
}

struct CacheEntry {
    /// Identity of this entry; survives refetches, not removal.
    epoch: u64,
    /// Bumped whenever in-flight work for the entry is abandoned.
    generation: u64,
    data: Option<AnyData>,
    error: Option<ApiError>,
    updated_at: Option<Instant>,
    invalidated: bool,
    in_flight: Option<SharedFetch>,
    observers: usize,
    inactive_since: Option<Instant>,
    strategy: QueryStrategy,
    fetcher: Option<Fetcher>,
    status: watch::Sender<QueryStatus>,
}

impl CacheEntry {
    fn new(strategy: QueryStrategy, epoch: u64) -> Self {
        let (status, _rx) = watch::channel(QueryStatus::Idle);
        Self {
            epoch,
            generation: epoch,
            data: None,
            error: None,
            updated_at: None,
            invalidated: false,
            in_flight: None,
            observers: 0,
            inactive_since: Some(Instant::now()),
            strategy,
            fetcher: None,
            status,
        }
    }

    fn status(&self) -> QueryStatus {
        if self.in_flight.is_some() {
            QueryStatus::Fetching
        } else if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }

    fn publish(&self) {
        self.status.send_replace(self.status());
    }

    fn is_fresh(&self, now: Instant) -> bool {
        match (&self.data, self.updated_at) {
            (Some(_), Some(updated_at)) => {
                !self.invalidated && !self.strategy.is_stale(updated_at, now)
            }
            _ => false,
        }
    }

    fn data<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.data.clone().and_then(|data| data.downcast::<T>().ok())
    }

    fn state<T: Send + Sync + 'static>(&self) -> QueryState<T> {
        let previous = self.data::<T>();
        if self.in_flight.is_some() {
            QueryState::Fetching { previous }
        } else if let Some(error) = &self.error {
            QueryState::Error {
                error: error.clone(),
                previous,
            }
        } else if let Some(data) = previous {
            QueryState::Success(data)
        } else {
            QueryState::Idle
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.observers == 0
            && self.in_flight.is_none()
            && self
                .inactive_since
                .is_some_and(|since| now.saturating_duration_since(since) >= self.strategy.gc_time)
    }
}

#[derive(Default)]
struct Inner {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
    metrics: QueryMetrics,
    generations: AtomicU64,
}

/// Shared handle to one cache. Cloning is cheap and every clone sees the
/// same entries.
#[derive(Clone, Default)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("entries", &self.len())
            .finish()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<QueryKey, CacheEntry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn next_generation(&self) -> u64 {
        self.inner.generations.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Observe `key`. Fetches when there is no fresh data and no fetch
    /// already in flight; the returned handle keeps the entry active until
    /// dropped. Must be called from within a tokio runtime.
    pub fn query<T, F, Fut>(&self, key: QueryKey, options: QueryOptions, fetch: F) -> QueryHandle<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let binding = self.bind(key, &options, erase(fetch));
        QueryHandle::new(self.clone(), binding)
    }

    /// Observe the key `resolve` derives from the current `language`, and move
    /// to the new key on every change. Moving releases the old key exactly
    /// as dropping its handle would, so a fetch still running for it is
    /// abandoned when no one else observes it.
    pub fn query_following<T, B, F, Fut>(
        &self,
        mut language: watch::Receiver<Language>,
        options: QueryOptions,
        resolve: B,
    ) -> QueryHandle<T>
    where
        T: Send + Sync + 'static,
        B: Fn(Language) -> (QueryKey, F) + Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let current = *language.borrow_and_update();
        let (key, fetch) = resolve(current);
        let binding = Arc::new(Mutex::new(self.bind(key, &options, erase(fetch))));

        let client = self.clone();
        let shared = Arc::clone(&binding);
        let follower = tokio::spawn(async move {
            while language.changed().await.is_ok() {
                let lang = *language.borrow_and_update();
                let (key, fetch) = resolve(lang);
                client.rebind(&shared, key, &options, erase(fetch));
            }
        });

        QueryHandle::following(self.clone(), binding, Some(follower))
    }

    fn bind(&self, key: QueryKey, options: &QueryOptions, fetcher: Fetcher) -> Binding {
        if !options.enabled {
            debug!("Query {} is disabled", key);
            return Binding::disabled(key);
        }

        let now = Instant::now();
        let mut entries = self.entries();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(options.strategy.clone(), self.next_generation()));

        entry.observers += 1;
        entry.inactive_since = None;
        entry.strategy = options.strategy.clone();
        entry.fetcher = Some(Arc::clone(&fetcher));

        if entry.is_fresh(now) {
            self.inner.metrics.record_hit();
            debug!("Cache hit for {}", key);
        } else {
            self.inner.metrics.record_miss();
            debug!("Cache miss for {}", key);
            let _ = self.start_fetch(&key, entry, fetcher);
        }
        entry.publish();

        Binding {
            epoch: Some(entry.epoch),
            status: entry.status.subscribe(),
            closed: false,
            key,
        }
    }

    /// Attach `binding` to `key` and release the key it held before.
    fn rebind(&self, binding: &Mutex<Binding>, key: QueryKey, options: &QueryOptions, fetcher: Fetcher) {
        let previous = {
            let mut current = handle::lock(binding);
            if current.closed || current.key == key {
                return;
            }
            debug!("Rebinding {} -> {}", current.key, key);
            let next = self.bind(key, options, fetcher);
            std::mem::replace(&mut *current, next)
        };

        if let Some(epoch) = previous.epoch {
            self.detach(&previous.key, epoch);
        }
    }

    /// One-shot cached read with no observer attached. Returns fresh cached
    /// data when present, otherwise joins or starts a fetch.
    pub async fn fetch_query<T, F, Fut>(
        &self,
        key: QueryKey,
        strategy: QueryStrategy,
        fetch: F,
    ) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let in_flight = {
            let now = Instant::now();
            let mut entries = self.entries();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| CacheEntry::new(strategy.clone(), self.next_generation()));

            if entry.is_fresh(now) {
                if let Some(data) = entry.data::<T>() {
                    self.inner.metrics.record_hit();
                    debug!("Cache hit for {}", key);
                    return Ok(data);
                }
            }

            self.inner.metrics.record_miss();
            if entry.observers == 0 {
                entry.strategy = strategy;
            }
            let in_flight = self.start_fetch(&key, entry, erase(fetch));
            entry.publish();
            in_flight
        };

        let data = in_flight.await?;
        data.downcast::<T>().map_err(|_| type_mismatch(&key))
    }

    fn start_fetch(&self, key: &QueryKey, entry: &mut CacheEntry, fetcher: Fetcher) -> SharedFetch {
        if let Some(in_flight) = &entry.in_flight {
            return in_flight.clone();
        }

        self.inner.metrics.record_fetch();
        debug!("Fetching {} ({} strategy)", key, entry.strategy.name());

        let generation = entry.generation;
        let retry = entry.strategy.retry.clone();
        let client = self.clone();
        let key = key.clone();

        let fetch = async move {
            let label = key.to_string();
            let result = with_retry_if(
                &retry,
                &label,
                || (*fetcher)(),
                |_| client.is_current(&key, generation),
            )
            .await;
            client.complete(&key, generation, &result);
            result
        }
        .boxed()
        .shared();

        entry.in_flight = Some(fetch.clone());
        tokio::spawn(fetch.clone());
        fetch
    }

    fn is_current(&self, key: &QueryKey, generation: u64) -> bool {
        self.entries()
            .get(key)
            .is_some_and(|entry| entry.generation == generation)
    }

    fn complete(&self, key: &QueryKey, generation: u64, result: &FetchOutcome) {
        let mut entries = self.entries();
        let Some(entry) = entries
            .get_mut(key)
            .filter(|entry| entry.generation == generation)
        else {
            self.inner.metrics.record_discarded();
            info!("Discarding result for {}: no longer observed", key);
            return;
        };

        entry.in_flight = None;
        match result {
            Ok(data) => {
                entry.data = Some(Arc::clone(data));
                entry.error = None;
                entry.updated_at = Some(Instant::now());
                entry.invalidated = false;
                debug!("Fetched {}", key);
            }
            Err(error) => {
                self.inner.metrics.record_failure();
                entry.error = Some(error.clone());
                debug!("Fetch for {} failed: {}", key, error);
            }
        }
        entry.publish();
        if entry.observers == 0 {
            self.schedule_eviction(key, entry);
        }
    }

    pub(crate) fn detach(&self, key: &QueryKey, epoch: u64) {
        let mut entries = self.entries();
        let Some(entry) = entries.get_mut(key).filter(|entry| entry.epoch == epoch) else {
            return;
        };

        entry.observers = entry.observers.saturating_sub(1);
        if entry.observers > 0 {
            return;
        }

        entry.inactive_since = Some(Instant::now());
        entry.fetcher = None;
        if entry.in_flight.take().is_some() {
            entry.generation = self.next_generation();
            debug!("Abandoning in-flight fetch for {}", key);
        }
        entry.publish();
        self.schedule_eviction(key, entry);
    }

    /// Evict `key` once its GC time has passed, unless it was observed or
    /// refetched in the meantime. The timer holds the cache weakly.
    fn schedule_eviction(&self, key: &QueryKey, entry: &CacheEntry) {
        let Ok(runtime) = Handle::try_current() else {
            debug!("No runtime to schedule eviction of {}", key);
            return;
        };

        let cache = Arc::downgrade(&self.inner);
        let key = key.clone();
        let epoch = entry.epoch;
        let gc_time = entry.strategy.gc_time;

        runtime.spawn(async move {
            sleep(gc_time).await;
            if let Some(inner) = cache.upgrade() {
                QueryClient { inner }.evict_if_expired(&key, epoch);
            }
        });
    }

    fn evict_if_expired(&self, key: &QueryKey, epoch: u64) {
        let now = Instant::now();
        let mut entries = self.entries();
        let expired = entries
            .get(key)
            .is_some_and(|entry| entry.epoch == epoch && entry.is_expired(now));
        if expired {
            entries.remove(key);
            debug!("Evicted {} after its GC time", key);
        }
    }

    pub(crate) fn refetch_key(&self, key: &QueryKey) -> Option<SharedFetch> {
        let mut entries = self.entries();
        let entry = entries.get_mut(key)?;
        let fetcher = entry.fetcher.clone()?;
        let in_flight = self.start_fetch(key, entry, fetcher);
        entry.publish();
        Some(in_flight)
    }

    pub(crate) fn in_flight(&self, key: &QueryKey) -> Option<SharedFetch> {
        self.entries().get(key).and_then(|entry| entry.in_flight.clone())
    }

    pub(crate) fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        self.entries()
            .get(key)
            .map_or(QueryState::Idle, |entry| entry.state())
    }

    /// Mark every entry under `prefix` stale and refetch the observed ones.
    /// Returns how many entries matched.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries();
        let mut matched = 0;

        for (key, entry) in entries.iter_mut() {
            if !key.starts_with(prefix) {
                continue;
            }
            matched += 1;
            entry.invalidated = true;
            if entry.observers > 0 {
                if let Some(fetcher) = entry.fetcher.clone() {
                    let _ = self.start_fetch(key, entry, fetcher);
                }
            }
            entry.publish();
        }

        info!("Invalidated {} entries under {}", matched, prefix);
        matched
    }

    /// Drop every entry under `prefix`. In-flight results for them are
    /// discarded when they land.
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        debug!("Removed {} entries under {}", removed, prefix);
        removed
    }

    /// Evict unobserved entries whose GC horizon has passed.
    pub fn collect_garbage(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, entry| {
            let expired = entry.is_expired(now);
            if expired {
                debug!("Evicting {}", key);
            }
            !expired
        });
        before - entries.len()
    }

    /// Seed `key` with `data`, as if it had just been fetched.
    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: QueryKey, data: T) {
        let mut entries = self.entries();
        let entry = entries
            .entry(key.clone())
            .or_insert_with(|| CacheEntry::new(QueryStrategy::default(), self.next_generation()));
        entry.data = Some(Arc::new(data));
        entry.error = None;
        entry.updated_at = Some(Instant::now());
        entry.invalidated = false;
        entry.publish();
        if entry.observers == 0 {
            self.schedule_eviction(&key, entry);
        }
    }

    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.entries().get(key).and_then(|entry| entry.data::<T>())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries().contains_key(key)
    }

    pub fn observer_count(&self, key: &QueryKey) -> usize {
        self.entries().get(key).map_or(0, |entry| entry.observers)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics(&self) -> MetricsReport {
        self.inner.metrics.report()
    }
}

fn erase<T, F, Fut>(fetch: F) -> Fetcher
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    Arc::new(move || {
        let fut = fetch();
        async move { fut.await.map(|data| Arc::new(data) as AnyData) }.boxed()
    })
}

fn type_mismatch(key: &QueryKey) -> ApiError {
    ApiError::Transport(TransportError::TypeMismatch {
        key: key.to_string(),
    })
}
