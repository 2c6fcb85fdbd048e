//! Keyed async query for backend lookups with state management.
//!
//! Modeled on client-side data-fetching hooks: a `LookupQuery<T>` owns a
//! keyed fetcher, exposes `{idle, loading, success, error}` state, and
//! discards in-flight results whenever its key changes, so a stale
//! response can never overwrite the state belonging to a newer key.
//!
//! # Example
//!
//! ```ignore
//! let client = store_client.clone();
//! let mut query = LookupQuery::new(move |id: String| {
//!     let client = client.clone();
//!     async move { client.lookup("products", &id).await.map_err(|e| e.to_string()) }
//! });
//!
//! query.set_key(Some("p-1"));
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, re-render
//! }
//! ```

use futures::future::BoxFuture;
use std::future::Future;
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// No key is set; nothing has been requested
  Idle,
  /// A fetch for the current key is in flight
  Loading,
  /// The fetch for the current key settled successfully
  Success(T),
  /// The fetch for the current key failed
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A factory function that creates a fetch future for a given key
type KeyedFetcher<T> = Box<dyn Fn(String) -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

/// Async lookup keyed by an opaque identifier.
///
/// Exactly one fetch sequence is live at a time. Changing or clearing the
/// key drops the in-flight receiver: the superseded task's send fails and
/// its result is discarded, never reaching `poll`.
pub struct LookupQuery<T> {
  key: Option<String>,
  state: QueryState<T>,
  fetcher: KeyedFetcher<T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
}

impl<T: Send + 'static> LookupQuery<T> {
  /// Create a new query with the given keyed fetcher.
  ///
  /// The fetcher is called with the current key each time the key changes
  /// or `refetch()` is invoked. The query starts idle; no request is
  /// issued until a non-empty key is set.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      key: None,
      state: QueryState::Idle,
      fetcher: Box::new(move |key| Box::pin(fetcher(key))),
      receiver: None,
    }
  }

  /// Get the current key, if any.
  pub fn key(&self) -> Option<&str> {
    self.key.as_deref()
  }

  /// Get the current state of the query.
  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Get the data if the lookup succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  /// Check if a fetch is currently in flight.
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// Get the error message if the lookup failed.
  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Point the query at a new identifier.
  ///
  /// None or an empty/whitespace key settles the query to idle with no
  /// request issued. An unchanged key is a no-op. A new key cancels any
  /// in-flight fetch and starts one for the new key.
  pub fn set_key(&mut self, key: Option<&str>) {
    let normalized = key.map(str::trim).filter(|k| !k.is_empty());
    if self.key.as_deref() == normalized {
      return;
    }

    // Cancellation guard: drop the receiver so the stale task's send fails
    self.receiver = None;
    self.key = normalized.map(String::from);

    match self.key.clone() {
      Some(k) => self.start_fetch(k),
      None => self.state = QueryState::Idle,
    }
  }

  /// Re-run the fetcher for the current key, cancelling in-flight work.
  ///
  /// No-op while idle.
  pub fn refetch(&mut self) {
    self.receiver = None;
    if let Some(k) = self.key.clone() {
      self.start_fetch(k);
    }
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending - treat as error
        self.state = QueryState::Error("Lookup was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }

  /// Internal: start the fetch operation for a key
  fn start_fetch(&mut self, key: String) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)(key);
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - the query may have moved on to another key
      let _ = tx.send(result);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LookupQuery<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LookupQuery")
      .field("key", &self.key)
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}
