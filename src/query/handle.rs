use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::keys::QueryKey;
use crate::query::cache::{QueryClient, SharedFetch};
use crate::query::state::{QueryState, QueryStatus};

/// The key a handle currently observes.
pub(crate) struct Binding {
    pub key: QueryKey,
    /// `None` for a disabled read, which never touches the cache.
    pub epoch: Option<u64>,
    pub status: watch::Receiver<QueryStatus>,
    /// Set once the handle is dropped; a closed binding is never rebound.
    pub closed: bool,
}

impl Binding {
    pub(crate) fn disabled(key: QueryKey) -> Self {
        let (_tx, status) = watch::channel(QueryStatus::Idle);
        Self {
            key,
            epoch: None,
            status,
            closed: false,
        }
    }
}

/// An observer of one cache key.
///
/// While a handle is alive its key counts as active. Dropping the last
/// handle for a key abandons any fetch still in flight for it. A handle that
/// follows the active language moves to the new language's key on every
/// change, which releases the old key the same way.
pub struct QueryHandle<T> {
    client: QueryClient,
    binding: Arc<Mutex<Binding>>,
    follower: Option<JoinHandle<()>>,
    _data: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> QueryHandle<T> {
    pub(crate) fn new(client: QueryClient, binding: Binding) -> Self {
        Self::following(client, Arc::new(Mutex::new(binding)), None)
    }

    pub(crate) fn following(
        client: QueryClient,
        binding: Arc<Mutex<Binding>>,
        follower: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            client,
            binding,
            follower,
            _data: PhantomData,
        }
    }

    fn binding(&self) -> MutexGuard<'_, Binding> {
        lock(&self.binding)
    }

    /// Key currently observed.
    pub fn key(&self) -> QueryKey {
        self.binding().key.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.binding().epoch.is_some()
    }

    pub fn state(&self) -> QueryState<T> {
        let binding = self.binding();
        if binding.epoch.is_none() {
            return QueryState::Idle;
        }
        self.client.snapshot(&binding.key)
    }

    /// Latest value, including one kept through a failed revalidation.
    pub fn data(&self) -> Option<Arc<T>> {
        self.state().data().cloned()
    }

    /// Wait until no fetch is in flight for the observed key and return the
    /// state.
    pub async fn settled(&self) -> QueryState<T> {
        while let Some(in_flight) = self.current_in_flight() {
            let _ = in_flight.await;
        }
        self.state()
    }

    fn current_in_flight(&self) -> Option<SharedFetch> {
        let binding = self.binding();
        if binding.epoch.is_none() {
            return None;
        }
        self.client.in_flight(&binding.key)
    }

    /// Fetch again regardless of freshness, joining a fetch already in
    /// flight. A disabled read stays idle.
    pub async fn refetch(&self) -> QueryState<T> {
        let in_flight = {
            let binding = self.binding();
            match binding.epoch {
                Some(_) => self.client.refetch_key(&binding.key),
                None => None,
            }
        };
        if let Some(in_flight) = in_flight {
            let _ = in_flight.await;
        }
        self.settled().await
    }

    /// Status transitions for the key observed when this is called.
    pub fn subscribe(&self) -> watch::Receiver<QueryStatus> {
        self.binding().status.clone()
    }
}

impl<T> Drop for QueryHandle<T> {
    fn drop(&mut self) {
        if let Some(follower) = self.follower.take() {
            follower.abort();
        }
        let mut binding = lock(&self.binding);
        binding.closed = true;
        if let Some(epoch) = binding.epoch.take() {
            self.client.detach(&binding.key, epoch);
        }
    }
}

pub(crate) fn lock(binding: &Mutex<Binding>) -> MutexGuard<'_, Binding> {
    binding.lock().unwrap_or_else(PoisonError::into_inner)
}
