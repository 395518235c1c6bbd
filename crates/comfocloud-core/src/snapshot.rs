// ── Device snapshot ──
//
// The combined state+details result of one successful fetch cycle.
// Snapshots are immutable once published: the coordinator replaces the
// current one by single assignment through a watch channel, so readers
// holding an old `Arc<Snapshot>` keep a consistent view.

use chrono::{DateTime, Utc};

use comfocloud_api::{DeviceDetails, DeviceId, DeviceState};

/// One device's data as of a single successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Live telemetry and settings.
    pub state: DeviceState,
    /// Identity and capability metadata.
    pub details: DeviceDetails,
    /// When the fetch cycle completed.
    pub fetched_at: DateTime<Utc>,
}

/// Identity metadata block derived from a snapshot's details.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DeviceInfo {
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub manufacturer: &'static str,
    pub sw_version: Option<String>,
    pub hw_version: Option<String>,
    pub configuration_url: String,
}

impl DeviceInfo {
    pub fn from_snapshot(device_id: DeviceId, snapshot: &Snapshot) -> Self {
        let details = &snapshot.details;
        Self {
            serial_number: details
                .value("serialNumber")
                .and_then(|v| v.as_str())
                .map(String::from),
            model: details
                .value("deviceType")
                .and_then(|v| v.get("name"))
                .and_then(|v| v.as_str())
                .map(String::from),
            manufacturer: "Zehnder",
            sw_version: details.property("swVersion").map(String::from),
            hw_version: details.property("hwVersion").map(String::from),
            configuration_url: format!(
                "https://my.zehnder-systems.com/customer/devices/{device_id}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comfocloud_api::DeviceProperty;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        let state: DeviceState =
            serde_json::from_value(json!({"timestamp": 111})).expect("state deserializes");
        let details = DeviceDetails::new(
            serde_json::from_value::<serde_json::Map<_, _>>(json!({
                "serialNumber": "BEA004185031910",
                "deviceType": {"name": "ComfoAirQ"}
            }))
            .expect("details map deserializes"),
            vec![
                DeviceProperty {
                    name: "swVersion".into(),
                    value: "R1.4.0".into(),
                },
                DeviceProperty {
                    name: "hwVersion".into(),
                    value: "2".into(),
                },
            ],
        );
        Snapshot {
            state,
            details,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn device_info_from_details() {
        let info = DeviceInfo::from_snapshot(DeviceId(12345), &snapshot());

        assert_eq!(info.serial_number.as_deref(), Some("BEA004185031910"));
        assert_eq!(info.model.as_deref(), Some("ComfoAirQ"));
        assert_eq!(info.sw_version.as_deref(), Some("R1.4.0"));
        assert_eq!(info.hw_version.as_deref(), Some("2"));
        assert!(info.configuration_url.ends_with("/devices/12345"));
    }
}
