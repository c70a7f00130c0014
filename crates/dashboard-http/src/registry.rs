//! In-flight request registry
//!
//! Every dispatched request owns exactly one entry, keyed by its
//! [`Fingerprint`]. Registering a fingerprint that is already present aborts
//! the older request: the newest call wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::CancelReason;
use crate::fingerprint::Fingerprint;

/// Cancellation handle shared between the registry and one dispatch
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    token: CancellationToken,
    reason: Arc<OnceLock<CancelReason>>,
}

impl AbortSignal {
    /// Fresh, not yet aborted signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the request; the first reason recorded wins
    pub fn abort(&self, reason: CancelReason) {
        let _ = self.reason.set(reason);
        self.token.cancel();
    }

    /// Whether [`AbortSignal::abort`] has been called
    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Reason recorded by the abort, if any
    pub fn reason(&self) -> Option<CancelReason> {
        self.reason.get().copied()
    }

    /// Resolves once the signal is aborted
    pub async fn aborted(&self) -> CancelReason {
        self.token.cancelled().await;
        self.reason().unwrap_or(CancelReason::User)
    }
}

#[derive(Debug)]
struct InFlightEntry {
    id: u64,
    url: String,
    signal: AbortSignal,
}

type Entries = HashMap<Fingerprint, InFlightEntry>;

#[derive(Debug, Default)]
struct RegistryInner {
    entries: Mutex<Entries>,
    next_id: AtomicU64,
}

/// Map of outstanding requests, owned by one client
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    inner: Arc<RegistryInner>,
}

impl InFlightRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        // Entries hold no invariants a panicking holder could break halfway
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a request, aborting any older request with the same fingerprint
    pub fn register(&self, fingerprint: Fingerprint, url: impl Into<String>) -> InFlightGuard {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let signal = AbortSignal::new();
        let entry = InFlightEntry {
            id,
            url: url.into(),
            signal: signal.clone(),
        };

        if let Some(previous) = self.entries().insert(fingerprint.clone(), entry) {
            tracing::debug!("Aborting duplicate in-flight request {}", fingerprint);
            previous.signal.abort(CancelReason::Duplicate);
        }

        InFlightGuard {
            registry: self.clone(),
            fingerprint,
            id,
            signal,
        }
    }

    /// Abort and remove the request with `fingerprint`; no-op if absent
    pub fn cancel(&self, fingerprint: &Fingerprint) {
        if let Some(entry) = self.entries().remove(fingerprint) {
            tracing::debug!("Cancelling in-flight request {}", fingerprint);
            entry.signal.abort(CancelReason::User);
        }
    }

    /// Abort and remove every request registered under the bare `url`
    ///
    /// Query params and bodies are ignored: all outstanding calls to `url` are
    /// cancelled. Returns how many were aborted.
    pub fn cancel_url(&self, url: &str) -> usize {
        let removed: Vec<InFlightEntry> = {
            let mut entries = self.entries();
            let keys: Vec<Fingerprint> = entries
                .iter()
                .filter(|(_, entry)| entry.url == url)
                .map(|(key, _)| key.clone())
                .collect();
            keys.iter().filter_map(|key| entries.remove(key)).collect()
        };

        for entry in &removed {
            entry.signal.abort(CancelReason::User);
        }

        if !removed.is_empty() {
            tracing::debug!("Cancelled {} in-flight request(s) for {}", removed.len(), url);
        }

        removed.len()
    }

    /// Abort and remove every entry
    pub fn cancel_all(&self) {
        let drained: Vec<InFlightEntry> = self.entries().drain().map(|(_, entry)| entry).collect();

        for entry in &drained {
            entry.signal.abort(CancelReason::User);
        }

        if !drained.is_empty() {
            tracing::debug!("Cancelled all {} in-flight request(s)", drained.len());
        }
    }

    /// Remove the guard's entry without aborting it
    ///
    /// Only removes the entry if it still belongs to `guard`; an entry that
    /// was replaced by a newer duplicate is left alone.
    pub fn release(&self, guard: InFlightGuard) {
        drop(guard);
    }

    fn release_entry(&self, fingerprint: &Fingerprint, id: u64) {
        let mut entries = self.entries();
        if entries.get(fingerprint).is_some_and(|entry| entry.id == id) {
            entries.remove(fingerprint);
        }
    }

    /// Number of outstanding entries
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing is in flight
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Whether `fingerprint` has an outstanding entry
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entries().contains_key(fingerprint)
    }
}

/// Ownership of one registry entry
///
/// Dropping the guard releases the entry, so a request future dropped by its
/// caller does not leak a registration.
pub struct InFlightGuard {
    registry: InFlightRegistry,
    fingerprint: Fingerprint,
    id: u64,
    signal: AbortSignal,
}

impl InFlightGuard {
    /// Fingerprint this guard was registered under
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Abort signal of this request
    pub fn signal(&self) -> &AbortSignal {
        &self.signal
    }
}

impl fmt::Debug for InFlightGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlightGuard")
            .field("fingerprint", &self.fingerprint)
            .field("id", &self.id)
            .field("aborted", &self.signal.is_aborted())
            .finish()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.release_entry(&self.fingerprint, self.id);
    }
}
