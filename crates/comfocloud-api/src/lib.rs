// comfocloud-api: Async Rust client for the Zehnder ComfoAirQ cloud API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::CloudClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{DeviceDetails, DeviceId, DeviceProperty, DeviceState};
