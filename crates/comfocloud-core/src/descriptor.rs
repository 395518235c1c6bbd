// ── Entity descriptor tables ──
//
// Declarative mapping from cloud property keys to display metadata and
// a pure extraction rule. The tables are the single source of truth for
// which fields the entities expose; the coordinator knows nothing about
// individual keys. Extraction is side-effect free: a missing key fails
// only the entity reading it.

use serde_json::Value;

use crate::error::CoreError;
use crate::snapshot::Snapshot;

// ── Display metadata ─────────────────────────────────────────────────

/// Where an entity belongs in a frontend's grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum EntityCategory {
    /// Read-only operational detail.
    Diagnostic,
    /// User-adjustable setting.
    Config,
}

/// Units of measurement used by the sensor table.
pub mod unit {
    pub const CELSIUS: &str = "°C";
    pub const PERCENTAGE: &str = "%";
    pub const WATT: &str = "W";
    pub const RPM: &str = "rpm";
    pub const CUBIC_METERS_PER_HOUR: &str = "m³/h";
    pub const VOLT: &str = "V";
    pub const DAYS: &str = "d";
}

// ── Value transforms ─────────────────────────────────────────────────

/// How a raw JSON value becomes an entity value.
///
/// A tagged variant instead of per-field closures keeps the tables
/// purely declarative and `'static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Raw value unchanged.
    Identity,
    /// Integer division by a fixed constant (e.g. tenths of a degree
    /// to whole degrees).
    Scale { divisor: i64 },
    /// Truthy cast: JSON bool, non-zero number, or `"true"`/`"True"`.
    Bool,
}

impl Transform {
    /// Apply this transform to a raw value found under `key`.
    pub fn apply(self, key: &'static str, raw: &Value) -> Result<Value, CoreError> {
        match self {
            Self::Identity => Ok(raw.clone()),
            Self::Scale { divisor } => {
                let n = raw.as_i64().ok_or(CoreError::InvalidValue { key })?;
                Ok(Value::from(n / divisor))
            }
            Self::Bool => truthy(raw)
                .map(Value::from)
                .ok_or(CoreError::InvalidValue { key }),
        }
    }
}

/// Truthy interpretation across the cloud's value encodings: state
/// reports real booleans, details stringify them ("True"/"False"),
/// and a few flags arrive as 0/1 numbers.
fn truthy(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.as_str() {
            "true" | "True" => Some(true),
            "false" | "False" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

// ── Descriptors ──────────────────────────────────────────────────────

/// Describes one numeric/text sensor backed by a state field.
#[derive(Debug, Clone, Copy)]
pub struct SensorDescriptor {
    /// Cloud property name in the device state.
    pub key: &'static str,
    /// Human-readable entity name.
    pub name: &'static str,
    pub category: EntityCategory,
    pub unit: Option<&'static str>,
    /// Whether a frontend should surface this entity without opt-in.
    pub enabled_by_default: bool,
    pub transform: Transform,
}

impl SensorDescriptor {
    /// Pure extraction: `Snapshot -> value`.
    pub fn extract(&self, snapshot: &Snapshot) -> Result<Value, CoreError> {
        let raw = snapshot
            .state
            .value(self.key)
            .ok_or(CoreError::FieldMissing { key: self.key })?;
        self.transform.apply(self.key, raw)
    }
}

/// Describes one on/off sensor backed by a state field.
#[derive(Debug, Clone, Copy)]
pub struct BinarySensorDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub category: EntityCategory,
    pub enabled_by_default: bool,
}

impl BinarySensorDescriptor {
    /// Pure extraction: `Snapshot -> bool`.
    pub fn extract(&self, snapshot: &Snapshot) -> Result<bool, CoreError> {
        let raw = snapshot
            .state
            .value(self.key)
            .ok_or(CoreError::FieldMissing { key: self.key })?;
        truthy(raw).ok_or(CoreError::InvalidValue { key: self.key })
    }
}

/// Describes one select entity: an option list, a pure read of the
/// current option from state, and a per-option settings patch.
#[derive(Debug, Clone, Copy)]
pub struct SelectDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub category: EntityCategory,
    pub options: &'static [&'static str],
    /// Map the raw state value to one of `options`.
    pub current: fn(&Value) -> &'static str,
    /// Build the settings patch for an option; `None` for unknown options.
    pub command: fn(&str) -> Option<Value>,
}

// ── Sensor table ─────────────────────────────────────────────────────

pub static SENSORS: &[SensorDescriptor] = &[
    // Temperature and humidity
    SensorDescriptor {
        key: "exhaustAirTemp",
        name: "Exhaust air temperature",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::CELSIUS),
        enabled_by_default: true,
        transform: Transform::Scale { divisor: 10 },
    },
    SensorDescriptor {
        key: "exhaustAirHumidity",
        name: "Exhaust air humidity",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::PERCENTAGE),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "extractAirTemp",
        name: "Extract air temperature",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::CELSIUS),
        enabled_by_default: true,
        transform: Transform::Scale { divisor: 10 },
    },
    SensorDescriptor {
        key: "extractAirHumidity",
        name: "Extract air humidity",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::PERCENTAGE),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "systemOutdoorTemp",
        name: "Outdoor air temperature",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::CELSIUS),
        enabled_by_default: true,
        transform: Transform::Scale { divisor: 10 },
    },
    SensorDescriptor {
        key: "systemOutdoorHumidity",
        name: "Outdoor air humidity",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::PERCENTAGE),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "systemSupplyTemp",
        name: "Supply air temperature",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::CELSIUS),
        enabled_by_default: true,
        transform: Transform::Scale { divisor: 10 },
    },
    SensorDescriptor {
        key: "systemSupplyHumidity",
        name: "Supply air humidity",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::PERCENTAGE),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    // Fans
    SensorDescriptor {
        key: "exhaustSpeed",
        name: "Exhaust fan speed",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::RPM),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "systemSupplySpeed",
        name: "Supply fan speed",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::RPM),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "exhaustDuty",
        name: "Exhaust fan duty",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::PERCENTAGE),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "systemSupplyDuty",
        name: "Supply fan duty",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::PERCENTAGE),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "exhaustFanAirFlow",
        name: "Exhaust fan airflow",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::CUBIC_METERS_PER_HOUR),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "supplyFanAirFlow",
        name: "Supply fan airflow",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::CUBIC_METERS_PER_HOUR),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    // Power consumption
    SensorDescriptor {
        key: "currentVentilationPower",
        name: "Power usage",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::WATT),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    // Analog inputs
    SensorDescriptor {
        key: "analogInput1",
        name: "Analog input 1",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::VOLT),
        enabled_by_default: false,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "analogInput2",
        name: "Analog input 2",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::VOLT),
        enabled_by_default: false,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "analogInput3",
        name: "Analog input 3",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::VOLT),
        enabled_by_default: false,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "analogInput4",
        name: "Analog input 4",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::VOLT),
        enabled_by_default: false,
        transform: Transform::Identity,
    },
    // Bypass
    SensorDescriptor {
        // Percentage of air currently routed past the heat exchanger.
        key: "bypassDuty",
        name: "Bypass state",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::PERCENTAGE),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "bypassMode",
        name: "Bypass mode",
        category: EntityCategory::Diagnostic,
        unit: None,
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    // Ventilation
    SensorDescriptor {
        // AUTO = airflow follows the schedule, MANUAL = set by the user.
        key: "ventilationMode",
        name: "Ventilation mode",
        category: EntityCategory::Diagnostic,
        unit: None,
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    SensorDescriptor {
        key: "ventilationPreset",
        name: "Ventilation preset",
        category: EntityCategory::Diagnostic,
        unit: None,
        enabled_by_default: true,
        transform: Transform::Identity,
    },
    // Other
    SensorDescriptor {
        key: "remainingFilterDuration",
        name: "Days to replace filter",
        category: EntityCategory::Diagnostic,
        unit: Some(unit::DAYS),
        enabled_by_default: true,
        transform: Transform::Identity,
    },
];

// ── Binary sensor table ──────────────────────────────────────────────

pub static BINARY_SENSORS: &[BinarySensorDescriptor] = &[
    BinarySensorDescriptor {
        key: "awayEnabled",
        name: "Away mode",
        category: EntityCategory::Diagnostic,
        enabled_by_default: true,
    },
    BinarySensorDescriptor {
        key: "manualMode",
        name: "Manual mode",
        category: EntityCategory::Diagnostic,
        enabled_by_default: true,
    },
    BinarySensorDescriptor {
        key: "boostTimerEnabled",
        name: "Boost timer enabled",
        category: EntityCategory::Diagnostic,
        enabled_by_default: true,
    },
    BinarySensorDescriptor {
        key: "coolingSeason",
        name: "Cooling season",
        category: EntityCategory::Diagnostic,
        enabled_by_default: false,
    },
    BinarySensorDescriptor {
        key: "heatingSeason",
        name: "Heating season",
        category: EntityCategory::Diagnostic,
        enabled_by_default: false,
    },
    BinarySensorDescriptor {
        key: "hoodIsOn",
        name: "Hood on",
        category: EntityCategory::Diagnostic,
        enabled_by_default: false,
    },
    BinarySensorDescriptor {
        key: "hoodPresence",
        name: "Hood presence",
        category: EntityCategory::Diagnostic,
        enabled_by_default: false,
    },
    BinarySensorDescriptor {
        key: "postHeaterPresence",
        name: "Post-heater presence",
        category: EntityCategory::Diagnostic,
        enabled_by_default: false,
    },
];

// ── Select table ─────────────────────────────────────────────────────

/// The cloud only exposes a *timed* bypass override (`forceBypass`), so
/// the commandable options are "auto" (no override) and "open" (force
/// the bypass open for an hour). The current option is read from the
/// device's reported `bypassMode`.
pub static BYPASS_SELECT: SelectDescriptor = SelectDescriptor {
    key: "bypassMode",
    name: "Bypass override",
    category: EntityCategory::Config,
    options: &["auto", "open"],
    current: |raw| {
        if raw.as_i64() == Some(1) {
            "open"
        } else {
            "auto"
        }
    },
    command: |option| match option {
        "open" => Some(serde_json::json!({"forceBypass": {"seconds": 3600}})),
        "auto" => Some(serde_json::json!({"forceBypass": {"seconds": 0}})),
        _ => None,
    },
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use comfocloud_api::{DeviceDetails, DeviceState};
    use serde_json::json;

    fn snapshot_with(state: serde_json::Value) -> Snapshot {
        Snapshot {
            state: serde_json::from_value::<DeviceState>(state).expect("state deserializes"),
            details: DeviceDetails::default(),
            fetched_at: Utc::now(),
        }
    }

    fn sensor(key: &str) -> &'static SensorDescriptor {
        SENSORS
            .iter()
            .find(|d| d.key == key)
            .expect("descriptor exists")
    }

    #[test]
    fn scale_applies_integer_division() {
        let snap = snapshot_with(json!({"timestamp": 1, "exhaustAirTemp": 264}));
        let value = sensor("exhaustAirTemp").extract(&snap).expect("extracts");
        assert_eq!(value, json!(26));
    }

    #[test]
    fn identity_passes_value_through() {
        let snap = snapshot_with(json!({"timestamp": 1, "ventilationPreset": 2}));
        let value = sensor("ventilationPreset").extract(&snap).expect("extracts");
        assert_eq!(value, json!(2));
    }

    #[test]
    fn missing_key_fails_only_that_descriptor() {
        // exhaustAirTemp absent, sibling ventilationPreset present
        let snap = snapshot_with(json!({"timestamp": 1, "ventilationPreset": 2}));

        let missing = sensor("exhaustAirTemp").extract(&snap);
        assert!(matches!(
            missing,
            Err(CoreError::FieldMissing {
                key: "exhaustAirTemp"
            })
        ));

        let sibling = sensor("ventilationPreset").extract(&snap);
        assert_eq!(sibling.expect("sibling extracts"), json!(2));
    }

    #[test]
    fn scale_rejects_non_numeric_value() {
        let snap = snapshot_with(json!({"timestamp": 1, "exhaustAirTemp": "warm"}));
        assert!(matches!(
            sensor("exhaustAirTemp").extract(&snap),
            Err(CoreError::InvalidValue {
                key: "exhaustAirTemp"
            })
        ));
    }

    #[test]
    fn binary_sensor_accepts_bool_number_and_string() {
        let desc = BINARY_SENSORS
            .iter()
            .find(|d| d.key == "manualMode")
            .expect("descriptor exists");

        for (raw, expected) in [
            (json!(true), true),
            (json!(0), false),
            (json!(1), true),
            (json!("True"), true),
            (json!("False"), false),
        ] {
            let snap = snapshot_with(json!({"timestamp": 1, "manualMode": raw}));
            assert_eq!(desc.extract(&snap).expect("extracts"), expected);
        }
    }

    #[test]
    fn bypass_select_maps_state_and_commands() {
        assert_eq!((BYPASS_SELECT.current)(&json!(1)), "open");
        assert_eq!((BYPASS_SELECT.current)(&json!(0)), "auto");
        assert_eq!((BYPASS_SELECT.current)(&json!(2)), "auto");

        let patch = (BYPASS_SELECT.command)("open").expect("known option");
        assert_eq!(patch, json!({"forceBypass": {"seconds": 3600}}));
        assert!((BYPASS_SELECT.command)("closed").is_none());
    }
}
