//! Follow snapshot updates for one device as the coordinator polls.

use owo_colors::OwoColorize;

use comfocloud_core::{DeviceId, Hub, Snapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    hub: &Hub,
    global: &GlobalOpts,
    device: DeviceId,
    count: Option<u64>,
) -> Result<(), CliError> {
    let coordinator = hub
        .coordinator(device)
        .ok_or_else(|| CliError::DeviceNotFound {
            identifier: device.to_string(),
        })?;
    let mut stream = coordinator.subscribe();

    // The first fetch already happened during connect -- print it.
    if let Some(snapshot) = stream.latest() {
        print_update(global, device, &snapshot);
    }

    let mut seen: u64 = 1;
    while count.is_none_or(|n| seen < n) {
        let Some(snapshot) = stream.changed().await else {
            break;
        };
        print_update(global, device, &snapshot);
        seen += 1;
    }

    Ok(())
}

fn print_update(global: &GlobalOpts, device: DeviceId, snapshot: &Snapshot) {
    let line = match global.output {
        crate::cli::OutputFormat::Json | crate::cli::OutputFormat::JsonCompact => {
            output::render_json_compact(&snapshot.state)
        }
        _ => {
            let preset = field(snapshot, "ventilationPreset");
            let extract = field(snapshot, "extractAirTemp");
            let outdoor = field(snapshot, "systemOutdoorTemp");
            let stamp = snapshot.fetched_at.format("%H:%M:%S");
            if output::should_color(&global.color) {
                format!(
                    "{} device={device} preset={preset} extractAirTemp={extract} outdoorTemp={outdoor}",
                    stamp.to_string().dimmed()
                )
            } else {
                format!(
                    "{stamp} device={device} preset={preset} extractAirTemp={extract} outdoorTemp={outdoor}"
                )
            }
        }
    };
    output::print_output(&line, global.quiet);
}

fn field(snapshot: &Snapshot, key: &str) -> String {
    snapshot
        .state
        .value(key)
        .map_or_else(|| "-".into(), ToString::to_string)
}
