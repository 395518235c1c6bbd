// ── Per-device update coordinator ──
//
// Owns one device's polling lifecycle: a fixed-interval fetch cycle,
// a single-in-flight guard, snapshot publication, and error
// classification. There is deliberately no retry or backoff here --
// a failed cycle keeps the previous snapshot and leaves rescheduling
// to whoever drives the coordinator.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard, watch};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use comfocloud_api::{CloudClient, DeviceId};

use crate::error::CoreError;
use crate::snapshot::Snapshot;
use crate::stream::SnapshotStream;

/// Upper bound for each of the two network calls in a fetch cycle.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

// ── Cycle outcome ────────────────────────────────────────────────────

/// Result of the most recently completed fetch cycle.
///
/// Kept cheap to clone so concurrent `refresh_now()` callers can await
/// the in-flight cycle's outcome instead of starting their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CycleOutcome {
    /// No cycle has completed yet.
    #[default]
    NotYetRun,
    Success {
        at: DateTime<Utc>,
    },
    AuthenticationRequired {
        message: String,
    },
    Failed {
        message: String,
    },
}

impl CycleOutcome {
    fn into_result(self) -> Result<(), CoreError> {
        match self {
            Self::NotYetRun => Err(CoreError::NotYetAvailable),
            Self::Success { .. } => Ok(()),
            Self::AuthenticationRequired { message } => {
                Err(CoreError::AuthenticationRequired { message })
            }
            Self::Failed { message } => Err(CoreError::UpdateFailed { message }),
        }
    }
}

// ── Coordinator ──────────────────────────────────────────────────────

/// Maintains the freshest known [`Snapshot`] for one device and
/// guarantees at most one fetch in flight at a time.
pub struct UpdateCoordinator {
    device_id: DeviceId,
    client: CloudClient,
    interval: Duration,

    /// Held for the duration of a fetch cycle. The timer skips a tick
    /// when it can't take the lock; `refresh_now()` awaits the running
    /// cycle's outcome instead.
    in_flight: Mutex<()>,

    /// Last published snapshot. Replaced by single assignment --
    /// readers holding the previous `Arc` keep a consistent view.
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,

    /// `(sequence, outcome)` of the last completed cycle. The sequence
    /// number lets waiters distinguish "the cycle I saw start" from
    /// older results.
    outcome_tx: watch::Sender<(u64, CycleOutcome)>,
}

impl UpdateCoordinator {
    pub fn new(client: CloudClient, device_id: DeviceId, interval: Duration) -> Self {
        let (snapshot_tx, _) = watch::channel(None);
        let (outcome_tx, _) = watch::channel((0, CycleOutcome::NotYetRun));

        Self {
            device_id,
            client,
            interval,
            in_flight: Mutex::new(()),
            snapshot_tx,
            outcome_tx,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn client(&self) -> &CloudClient {
        &self.client
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The last successfully fetched snapshot, or `None` before the
    /// first successful cycle.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot_tx.borrow().clone()
    }

    /// Like [`snapshot()`](Self::snapshot) but "not yet available" is
    /// an error, which is the shape entity reads want.
    pub fn require_snapshot(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.snapshot().ok_or(CoreError::NotYetAvailable)
    }

    /// The last snapshot's state ("not yet available" before the
    /// first successful fetch).
    pub fn state(&self) -> Result<comfocloud_api::DeviceState, CoreError> {
        Ok(self.require_snapshot()?.state.clone())
    }

    /// The last snapshot's details.
    pub fn details(&self) -> Result<comfocloud_api::DeviceDetails, CoreError> {
        Ok(self.require_snapshot()?.details.clone())
    }

    /// Outcome of the most recently completed cycle.
    pub fn last_outcome(&self) -> CycleOutcome {
        self.outcome_tx.borrow().1.clone()
    }

    /// Subscribe to snapshot publications.
    pub fn subscribe(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot_tx.subscribe())
    }

    // ── Refresh entry points ─────────────────────────────────────────

    /// Run the initial fetch cycle. Setup blocks on this: an
    /// authentication failure (or any other first-cycle failure)
    /// propagates to the caller and no snapshot is stored.
    pub async fn first_refresh(&self) -> Result<(), CoreError> {
        let guard = self.in_flight.lock().await;
        self.run_cycle(&guard).await
    }

    /// Refresh immediately, bypassing the timer.
    ///
    /// If a fetch is already in flight, awaits its completion and
    /// returns that cycle's outcome rather than starting a duplicate.
    pub async fn refresh_now(&self) -> Result<(), CoreError> {
        let seq_before = self.outcome_tx.borrow().0;

        match self.in_flight.try_lock() {
            Ok(guard) => self.run_cycle(&guard).await,
            Err(_) => {
                let mut rx = self.outcome_tx.subscribe();
                loop {
                    {
                        let current = rx.borrow_and_update();
                        if current.0 > seq_before {
                            return current.1.clone().into_result();
                        }
                    }
                    if rx.changed().await.is_err() {
                        return Err(CoreError::Internal(
                            "coordinator dropped while a refresh was awaited".into(),
                        ));
                    }
                }
            }
        }
    }

    // ── Fetch cycle ──────────────────────────────────────────────────

    /// Run one fetch cycle while holding the in-flight guard, publish
    /// the result, and record the outcome for concurrent waiters.
    async fn run_cycle(&self, _guard: &MutexGuard<'_, ()>) -> Result<(), CoreError> {
        let result = self.fetch_cycle().await;

        let outcome = match &result {
            Ok(snapshot) => {
                self.snapshot_tx
                    .send_modify(|current| *current = Some(Arc::clone(snapshot)));
                CycleOutcome::Success {
                    at: snapshot.fetched_at,
                }
            }
            Err(CoreError::AuthenticationRequired { message }) => {
                CycleOutcome::AuthenticationRequired {
                    message: message.clone(),
                }
            }
            Err(e) => CycleOutcome::Failed {
                message: e.to_string(),
            },
        };

        self.outcome_tx.send_modify(|(seq, last)| {
            *seq += 1;
            *last = outcome;
        });

        result.map(|_| ())
    }

    /// The two-call fetch: state, then details, each under its own
    /// timeout. A state response without a timestamp fails the cycle
    /// even though both transport calls succeeded.
    async fn fetch_cycle(&self) -> Result<Arc<Snapshot>, CoreError> {
        let state = timeout(FETCH_TIMEOUT, self.client.get_device_state(self.device_id))
            .await
            .map_err(|_| CoreError::UpdateFailed {
                message: format!(
                    "state fetch timed out after {}s",
                    FETCH_TIMEOUT.as_secs()
                ),
            })??;
        debug!(device = %self.device_id, ?state, "fetched state");

        let details = timeout(
            FETCH_TIMEOUT,
            self.client.get_device_details(self.device_id),
        )
        .await
        .map_err(|_| CoreError::UpdateFailed {
            message: format!(
                "details fetch timed out after {}s",
                FETCH_TIMEOUT.as_secs()
            ),
        })??;
        debug!(device = %self.device_id, ?details, "fetched details");

        if state.timestamp().is_none() {
            return Err(CoreError::UpdateFailed {
                message: "update did not contain a timestamp".into(),
            });
        }

        Ok(Arc::new(Snapshot {
            state,
            details,
            fetched_at: Utc::now(),
        }))
    }
}

// ── Poll task ────────────────────────────────────────────────────────

/// Timer loop for one coordinator. A tick that finds a cycle already
/// in flight skips instead of queueing, so manual refreshes and the
/// timer never stack.
pub(crate) async fn poll_task(coordinator: Arc<UpdateCoordinator>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(coordinator.interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                match coordinator.in_flight.try_lock() {
                    Ok(guard) => {
                        if let Err(e) = coordinator.run_cycle(&guard).await {
                            warn!(device = %coordinator.device_id(), error = %e, "periodic refresh failed");
                        }
                    }
                    Err(_) => {
                        debug!(device = %coordinator.device_id(), "refresh already in flight; skipping tick");
                    }
                }
            }
        }
    }
}
