// ── Reactive notification stream ──
//
// Read-only subscription handle vended by the store. The rendering
// surface consumes this; it cannot mutate the sequence through it.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use super::model::Notification;

type Snapshot = Arc<Vec<Arc<Notification>>>;

/// A subscription to the notification sequence.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via `changed()` or by converting to a `Stream`.
pub struct NotificationStream {
    current: Snapshot,
    receiver: watch::Receiver<Snapshot>,
}

impl NotificationStream {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> NotificationWatchStream {
        NotificationWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new snapshot each time the sequence is mutated.
pub struct NotificationWatchStream {
    inner: WatchStream<Snapshot>,
}

impl Stream for NotificationWatchStream {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures_util::StreamExt;

    use crate::notify::NotificationStore;

    #[tokio::test]
    async fn watch_stream_yields_snapshots_on_mutation() {
        let store = NotificationStore::new();
        let mut stream = store.subscribe().into_stream();

        // The first item is the snapshot at subscription time.
        let initial = stream.next().await.unwrap();
        assert!(initial.is_empty());

        store.info("hello", None);
        let next = stream.next().await.unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].title, "hello");
    }

    #[tokio::test]
    async fn latest_reflects_mutations_after_subscription() {
        let store = NotificationStore::new();
        let stream = store.subscribe();

        store.warning("later", None);
        assert!(stream.current().is_empty());
        assert_eq!(stream.latest().len(), 1);
    }
}
