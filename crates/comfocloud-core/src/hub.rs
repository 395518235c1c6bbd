// ── Hub: account-level lifecycle ──
//
// Explicit context object owning device discovery, one coordinator per
// device, and teardown. Consumers hold a Hub instead of reaching into
// any process-wide registry.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use comfocloud_api::{CloudClient, DeviceId, TransportConfig};

use crate::config::HubConfig;
use crate::coordinator::{UpdateCoordinator, poll_task};
use crate::descriptor::{BINARY_SENSORS, BYPASS_SELECT, SENSORS};
use crate::entity::{BinarySensor, Fan, Select, Sensor};
use crate::error::CoreError;

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<HubInner>`. Manages the account
/// lifecycle: [`connect()`](Self::connect) discovers devices, blocks on
/// each device's first fetch, then spawns one poll task per device.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

struct HubInner {
    config: HubConfig,
    client: CloudClient,
    coordinators: DashMap<DeviceId, Arc<UpdateCoordinator>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Hub {
    /// Create a new Hub from configuration. Does NOT talk to the cloud --
    /// call [`connect()`](Self::connect) to discover devices and start
    /// polling.
    pub fn new(config: HubConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: config.tls.clone(),
            timeout: config.timeout,
        };
        let client =
            CloudClient::from_token(config.api_url.as_str(), &config.access_token, &transport)?;
        Ok(Self::from_client(client, config))
    }

    /// Build a Hub around an existing client (caller manages auth).
    pub fn from_client(client: CloudClient, config: HubConfig) -> Self {
        Self {
            inner: Arc::new(HubInner {
                config,
                client,
                coordinators: DashMap::new(),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the underlying API client.
    pub fn client(&self) -> &CloudClient {
        &self.inner.client
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Discover devices and start polling each one.
    ///
    /// Initialization blocks on every device's first fetch: an
    /// authentication failure anywhere aborts setup as a hard error,
    /// and a device whose first cycle fails is not half-registered.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let devices = self.inner.client.get_devices().await?;
        info!(count = devices.len(), "discovered devices");

        let mut handles = self.inner.task_handles.lock().await;
        for id in devices {
            let coordinator = Arc::new(UpdateCoordinator::new(
                self.inner.client.clone(),
                id,
                self.inner.config.poll_interval,
            ));

            coordinator.first_refresh().await?;

            let cancel = self.inner.cancel.child_token();
            handles.push(tokio::spawn(poll_task(Arc::clone(&coordinator), cancel)));
            self.inner.coordinators.insert(id, coordinator);
            debug!(device = %id, "coordinator started");
        }

        Ok(())
    }

    /// Stop all poll timers and wait for them to finish. In-flight
    /// fetches complete or time out naturally rather than being
    /// interrupted mid-call.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("hub shut down");
    }

    // ── Device access ────────────────────────────────────────────────

    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.inner.coordinators.iter().map(|e| *e.key()).collect()
    }

    pub fn coordinator(&self, id: DeviceId) -> Option<Arc<UpdateCoordinator>> {
        self.inner.coordinators.get(&id).map(|e| Arc::clone(e.value()))
    }

    fn require_coordinator(&self, id: DeviceId) -> Result<Arc<UpdateCoordinator>, CoreError> {
        self.coordinator(id).ok_or(CoreError::DeviceNotFound { id })
    }

    // ── Entity builders ──────────────────────────────────────────────

    /// All sensors for one device, one per descriptor table entry.
    pub fn sensors(&self, id: DeviceId) -> Result<Vec<Sensor>, CoreError> {
        let coordinator = self.require_coordinator(id)?;
        Ok(SENSORS
            .iter()
            .map(|d| Sensor::new(Arc::clone(&coordinator), d))
            .collect())
    }

    /// All binary sensors for one device.
    pub fn binary_sensors(&self, id: DeviceId) -> Result<Vec<BinarySensor>, CoreError> {
        let coordinator = self.require_coordinator(id)?;
        Ok(BINARY_SENSORS
            .iter()
            .map(|d| BinarySensor::new(Arc::clone(&coordinator), d))
            .collect())
    }

    /// The device as a 3-speed fan.
    pub fn fan(&self, id: DeviceId) -> Result<Fan, CoreError> {
        Ok(Fan::new(self.require_coordinator(id)?))
    }

    /// The bypass-override select.
    pub fn bypass_select(&self, id: DeviceId) -> Result<Select, CoreError> {
        Ok(Select::new(self.require_coordinator(id)?, &BYPASS_SELECT))
    }
}
