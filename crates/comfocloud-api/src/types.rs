// Response types for the Zehnder cloud API.
//
// The cloud reports device data as loosely-schemed JSON objects: `state`
// is a flat key/value map of live telemetry, `details` mixes top-level
// identity fields with a `properties` name/value list. Both are kept as
// opaque maps with lookup accessors -- the descriptor tables in
// comfocloud-core decide which keys matter.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Device id ────────────────────────────────────────────────────────

/// Opaque numeric device identifier assigned by the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DeviceId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<u32> for DeviceId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

// ── Device list ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    pub devices: Vec<DeviceId>,
}

// ── Device state ─────────────────────────────────────────────────────

/// Live telemetry and settings for one device, refreshed every poll.
///
/// Values are JSON primitives keyed by the cloud's property names
/// (`"exhaustAirTemp"`, `"ventilationPreset"`, ...). A well-formed
/// state always carries a `"timestamp"` field; its absence marks an
/// incomplete upstream update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    #[serde(flatten)]
    values: serde_json::Map<String, Value>,
}

impl DeviceState {
    pub fn new(values: serde_json::Map<String, Value>) -> Self {
        Self { values }
    }

    /// Look up a raw value by its cloud property name.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The update timestamp, if the cloud included one.
    pub fn timestamp(&self) -> Option<i64> {
        self.values.get("timestamp").and_then(Value::as_i64)
    }

    /// Iterate over all `(key, value)` pairs in the state.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

// ── Device details ───────────────────────────────────────────────────

/// One entry in the details `properties` list. The cloud stringifies
/// every property value, including numbers and booleans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProperty {
    pub name: String,
    pub value: String,
}

/// Identity and capability metadata for one device.
///
/// Largely static (serial numbers, versions, installed options) but
/// refreshed on every poll alongside the state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDetails {
    #[serde(default)]
    pub properties: Vec<DeviceProperty>,

    #[serde(flatten)]
    fields: serde_json::Map<String, Value>,
}

impl DeviceDetails {
    pub fn new(
        fields: serde_json::Map<String, Value>,
        properties: Vec<DeviceProperty>,
    ) -> Self {
        Self { properties, fields }
    }

    /// Look up a top-level details field (e.g. `"serialNumber"`).
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a named entry in the `properties` list (e.g. `"swVersion"`).
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_value_and_timestamp() {
        let state: DeviceState =
            serde_json::from_value(json!({"timestamp": 111, "ventilationPreset": 2}))
                .expect("state should deserialize");

        assert_eq!(state.timestamp(), Some(111));
        assert_eq!(state.value("ventilationPreset"), Some(&json!(2)));
        assert!(state.value("missing").is_none());
    }

    #[test]
    fn state_without_timestamp() {
        let state: DeviceState = serde_json::from_value(json!({"exhaustDuty": 21}))
            .expect("state should deserialize");

        assert_eq!(state.timestamp(), None);
    }

    #[test]
    fn details_property_lookup() {
        let details: DeviceDetails = serde_json::from_value(json!({
            "serialNumber": "BEA004185031910",
            "deviceType": {"name": "ComfoAirQ"},
            "properties": [
                {"name": "swVersion", "value": "R1.4.0"},
                {"name": "hwVersion", "value": "2"}
            ]
        }))
        .expect("details should deserialize");

        assert_eq!(details.property("swVersion"), Some("R1.4.0"));
        assert_eq!(details.property("absent"), None);
        assert_eq!(
            details.value("serialNumber"),
            Some(&json!("BEA004185031910"))
        );
    }

    #[test]
    fn device_id_round_trips_through_str() {
        let id: DeviceId = "12345".parse().expect("numeric id should parse");
        assert_eq!(id, DeviceId(12345));
        assert_eq!(id.to_string(), "12345");
    }
}
