use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::channel::oneshot;
use futures::future;

use crate::signature::RequestSignature;

/// Reason handed to a request cancelled by an identical later one.
pub const SUPERSEDED_REASON: &str = "superseded by duplicate request";

/// Identifies one registration, so a settling request can tell whether the
/// entry under its signature is still its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(u64);

/// Sending half, kept in the registry.
#[derive(Debug)]
struct CancelHandle {
    id: HandleId,
    tx: oneshot::Sender<String>,
}

impl CancelHandle {
    fn cancel(self, reason: &str) {
        // The receiver is gone once its request settled; nothing to abort then.
        let _ = self.tx.send(reason.to_string());
    }
}

/// Receiving half, raced against the transport by the dispatcher.
#[derive(Debug)]
pub struct CancelSignal {
    rx: oneshot::Receiver<String>,
}

impl CancelSignal {
    /// Resolves with the cancellation reason. Never resolves if the handle is
    /// dropped without cancelling.
    pub async fn cancelled(self) -> String {
        match self.rx.await {
            Ok(reason) => reason,
            Err(_) => future::pending().await,
        }
    }
}

/// Signature to cancellation-handle map of in-flight requests.
///
/// Holds at most one entry per signature. The lock is only taken inside
/// synchronous sections, never across an `.await`.
#[derive(Debug, Default)]
pub struct PendingRegistry {
    next_id: AtomicU64,
    entries: Mutex<HashMap<RequestSignature, CancelHandle>>,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<RequestSignature, CancelHandle>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new in-flight request under `signature`, cancelling and
    /// replacing whatever was registered there before.
    pub fn register(&self, signature: &RequestSignature) -> (HandleId, CancelSignal) {
        let id = HandleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();

        let mut entries = self.entries();
        if let Some(previous) = entries.remove(signature) {
            log::info!("Cancelling in-flight duplicate: {signature}");
            previous.cancel(SUPERSEDED_REASON);
        }
        entries.insert(signature.clone(), CancelHandle { id, tx });

        (id, CancelSignal { rx })
    }

    /// Remove the entry for `signature` if it still belongs to `id`.
    ///
    /// Returns whether an entry was removed.
    pub fn release(&self, signature: &RequestSignature, id: HandleId) -> bool {
        let mut entries = self.entries();
        match entries.get(signature) {
            Some(handle) if handle.id == id => {
                entries.remove(signature);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, signature: &RequestSignature) -> bool {
        self.entries().contains_key(signature)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Releases a registration when dropped, whether its request settled or its
/// future was abandoned.
pub(crate) struct PendingGuard {
    registry: Arc<PendingRegistry>,
    signature: RequestSignature,
    id: HandleId,
}

impl PendingGuard {
    pub(crate) fn new(
        registry: Arc<PendingRegistry>,
        signature: RequestSignature,
        id: HandleId,
    ) -> Self {
        Self {
            registry,
            signature,
            id,
        }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if !self.registry.release(&self.signature, self.id) {
            log::debug!("Entry for {} already replaced, left in place", self.signature);
        }
    }
}
