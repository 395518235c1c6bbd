//! Polling data layer between `comfocloud-api` and UI consumers.
//!
//! This crate owns the device lifecycle and the reactive data
//! infrastructure for the comfocloud workspace:
//!
//! - **[`Hub`]** — Explicit context object managing one account:
//!   [`connect()`](Hub::connect) discovers devices, blocks on each
//!   device's first fetch, then spawns one poll task per device;
//!   [`shutdown()`](Hub::shutdown) cancels the timers and lets
//!   in-flight fetches drain.
//!
//! - **[`UpdateCoordinator`]** — One per device. Runs the fixed-order
//!   state-then-details fetch cycle under per-call timeouts, guarantees
//!   a single in-flight fetch, classifies failures
//!   (authentication-required vs. transient), and publishes immutable
//!   [`Snapshot`]s through a watch channel. No internal retry or
//!   backoff: a failed cycle retains the previous snapshot.
//!
//! - **Descriptor tables** ([`descriptor`]) — Declarative
//!   key → (metadata, transform) mapping defining every exposed field.
//!   Extraction is pure; a missing key fails one entity, not its
//!   siblings.
//!
//! - **Entities** ([`entity`]) — Thin sensor / binary-sensor / fan /
//!   select views. Commands patch device settings and then request an
//!   immediate refresh.
//!
//! - **[`SnapshotStream`]** — Subscription handle for reacting to
//!   snapshot publications (`current()` / `latest()` / `changed()`).

pub mod config;
pub mod coordinator;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod hub;
pub mod snapshot;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_POLL_INTERVAL, HubConfig};
pub use coordinator::{CycleOutcome, UpdateCoordinator};
pub use descriptor::{
    BINARY_SENSORS, BYPASS_SELECT, BinarySensorDescriptor, EntityCategory, SENSORS,
    SelectDescriptor, SensorDescriptor, Transform,
};
pub use entity::{
    BinarySensor, Fan, SPEED_COUNT, Select, Sensor, percentage_to_speed, speed_to_percentage,
};
pub use error::CoreError;
pub use hub::Hub;
pub use snapshot::{DeviceInfo, Snapshot};
pub use stream::SnapshotStream;

// Re-export the API types consumers need at the crate root.
pub use comfocloud_api::client::DEFAULT_BASE_URL;
pub use comfocloud_api::{DeviceDetails, DeviceId, DeviceState, TlsMode};
