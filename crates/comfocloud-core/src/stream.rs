// ── Reactive snapshot stream ──
//
// Subscription handle for consuming snapshot publications from a
// coordinator without polling it.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::snapshot::Snapshot;

/// A subscription to one device's snapshot.
///
/// Provides both point-in-time access and reactive change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct SnapshotStream {
    current: Option<Arc<Snapshot>>,
    receiver: watch::Receiver<Option<Arc<Snapshot>>>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<Option<Arc<Snapshot>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at subscription time.
    pub fn current(&self) -> Option<&Arc<Snapshot>> {
        self.current.as_ref()
    }

    /// Get the latest snapshot (may have changed since subscription).
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publication, returning the new snapshot.
    /// Returns `None` if the coordinator has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Snapshot>> {
        loop {
            self.receiver.changed().await.ok()?;
            let snap = self.receiver.borrow_and_update().clone();
            if let Some(snap) = snap {
                self.current = Some(Arc::clone(&snap));
                return Some(snap);
            }
        }
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current value immediately, then a new item on each
/// publication. `None` items mark the not-yet-available state.
pub struct SnapshotWatchStream {
    inner: WatchStream<Option<Arc<Snapshot>>>,
}

impl Stream for SnapshotWatchStream {
    type Item = Option<Arc<Snapshot>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin when the inner type is Unpin, which
        // Option<Arc<Snapshot>> always is.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
