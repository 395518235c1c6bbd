//! Device list handler.

use tabled::Tabled;

use comfocloud_core::{DeviceInfo, Hub};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "SW Version")]
    sw_version: String,
}

#[derive(serde::Serialize)]
struct DeviceEntry {
    id: u32,
    #[serde(flatten)]
    info: Option<DeviceInfo>,
}

pub fn handle(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    let mut entries: Vec<DeviceEntry> = hub
        .device_ids()
        .into_iter()
        .map(|id| DeviceEntry {
            id: id.0,
            info: hub
                .coordinator(id)
                .and_then(|c| c.snapshot())
                .map(|snap| DeviceInfo::from_snapshot(id, &snap)),
        })
        .collect();
    entries.sort_by_key(|e| e.id);

    let out = output::render_list(
        &global.output,
        &entries,
        |e| DeviceRow {
            id: e.id.to_string(),
            model: e
                .info
                .as_ref()
                .and_then(|i| i.model.clone())
                .unwrap_or_else(|| "-".into()),
            serial: e
                .info
                .as_ref()
                .and_then(|i| i.serial_number.clone())
                .unwrap_or_else(|| "-".into()),
            sw_version: e
                .info
                .as_ref()
                .and_then(|i| i.sw_version.clone())
                .unwrap_or_else(|| "-".into()),
        },
        |e| e.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
