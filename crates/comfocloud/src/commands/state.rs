//! Live telemetry handler: every descriptor-backed reading for one device.

use tabled::Tabled;
use tracing::debug;

use comfocloud_core::{CoreError, DeviceId, Hub};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(serde::Serialize)]
struct StateEntry {
    key: &'static str,
    name: &'static str,
    value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'static str>,
}

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: &'static str,
}

pub fn handle(hub: &Hub, global: &GlobalOpts, device: DeviceId) -> Result<(), CliError> {
    let mut entries = Vec::new();

    for sensor in hub.sensors(device)? {
        match sensor.value() {
            Ok(value) => entries.push(StateEntry {
                key: sensor.descriptor().key,
                name: sensor.name(),
                value,
                unit: sensor.descriptor().unit,
            }),
            // A field the device doesn't report only skips its own row.
            Err(CoreError::FieldMissing { key }) => {
                debug!(device = %device, key, "field not reported");
            }
            Err(e) => return Err(e.into()),
        }
    }

    for binary in hub.binary_sensors(device)? {
        match binary.is_on() {
            Ok(on) => entries.push(StateEntry {
                key: binary.descriptor().key,
                name: binary.name(),
                value: serde_json::Value::Bool(on),
                unit: None,
            }),
            Err(CoreError::FieldMissing { key }) => {
                debug!(device = %device, key, "field not reported");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let out = output::render_list(
        &global.output,
        &entries,
        |e| StateRow {
            name: e.name,
            value: render_value(&e.value),
            unit: e.unit.unwrap_or(""),
        },
        |e| format!("{}={}", e.key, render_value(&e.value)),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
