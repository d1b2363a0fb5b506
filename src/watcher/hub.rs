//! Subscription hub: fan-out of change notifications to viewer mailboxes.
//!
//! The hub owns the set of active subscribers. Each subscriber is a bounded
//! mailbox representing one connected viewer; `notify` performs a
//! non-blocking send to every mailbox and drops the event for any that is
//! full. Slow viewers lose freshness, fast viewers are unaffected, and the
//! notifier never stalls regardless of subscriber count or speed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

use crate::debug_event;

/// Identity of a subscriber within a hub, unique for the hub's lifetime.
pub type SubscriberId = u64;

/// One viewer's subscription: its id plus the receiving half of its mailbox.
///
/// The sending half stays inside the hub; when the hub removes the
/// subscriber (unsubscribe or shutdown) the channel closes and `recv`
/// returns `None`.
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<PathBuf>,
}

impl Subscription {
    /// Identity to pass back to [`SubscriberHub::unsubscribe`].
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Receive the next changed path, or `None` once the hub has closed
    /// this subscription.
    pub async fn recv(&mut self) -> Option<PathBuf> {
        self.receiver.recv().await
    }

    /// Non-blocking receive, for callers polling the mailbox.
    pub fn try_recv(&mut self) -> Result<PathBuf, TryRecvError> {
        self.receiver.try_recv()
    }
}

/// Thread-safe set of subscriber mailboxes with non-blocking fan-out.
///
/// All three operations are linearizable with respect to each other: the
/// set is guarded by a single reader/writer lock, held only for the set
/// mutation or iteration itself, never across a send that could block.
#[derive(Debug)]
pub struct SubscriberHub {
    subscribers: RwLock<Vec<(SubscriberId, mpsc::Sender<PathBuf>)>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl SubscriberHub {
    /// Create a hub whose subscriber mailboxes hold `capacity` events.
    ///
    /// The capacity absorbs a short burst of changes while the viewer
    /// connection is busy flushing; overflow beyond it is dropped.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Register a new subscriber and return its mailbox. Never blocks.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.capacity);
        self.subscribers.write().push((id, tx));
        debug_event!("hub", "subscribed", "viewer {id}");
        Subscription { id, receiver: rx }
    }

    /// Remove a subscriber and close its mailbox.
    ///
    /// Removal and close happen under the same lock acquisition: the sender
    /// is dropped while still holding the write lock, so the channel closes
    /// exactly once and no concurrent notify can observe a half-removed
    /// entry. Unsubscribing an id that is not in the set is a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = self.subscribers.write();
        if let Some(pos) = subscribers.iter().position(|(sid, _)| *sid == id) {
            subscribers.remove(pos);
            debug_event!("hub", "unsubscribed", "viewer {id}");
        }
    }

    /// Fan a changed path out to every current subscriber.
    ///
    /// Uses a non-blocking send per mailbox; a full mailbox drops the event
    /// for that subscriber only (at-most-once delivery). With an empty set
    /// this is a no-op. Never blocks.
    pub fn notify(&self, path: &Path) {
        let subscribers = self.subscribers.read();
        for (id, tx) in subscribers.iter() {
            match tx.try_send(path.to_path_buf()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    debug_event!("hub", "dropped", "viewer {id} mailbox full");
                }
                Err(TrySendError::Closed(_)) => {
                    // Receiver gone but not yet unsubscribed; the adapter
                    // will remove it on its next I/O error.
                    debug_event!("hub", "dropped", "viewer {id} mailbox closed");
                }
            }
        }
    }

    /// Close every subscriber mailbox and empty the set.
    ///
    /// Called once from watcher shutdown. Each sender is dropped here,
    /// closing its channel; a subscriber removed earlier via `unsubscribe`
    /// was already closed then, so no channel ever closes twice.
    pub fn close_all(&self) {
        let mut subscribers = self.subscribers.write();
        let count = subscribers.len();
        subscribers.clear();
        if count > 0 {
            debug_event!("hub", "closed", "{count} subscribers");
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}
