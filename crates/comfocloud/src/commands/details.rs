//! Device identity details handler.

use comfocloud_core::{DeviceId, DeviceInfo, Hub};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub fn handle(hub: &Hub, global: &GlobalOpts, device: DeviceId) -> Result<(), CliError> {
    let coordinator = hub
        .coordinator(device)
        .ok_or_else(|| CliError::DeviceNotFound {
            identifier: device.to_string(),
        })?;
    let snapshot = coordinator.require_snapshot().map_err(CliError::from)?;
    let info = DeviceInfo::from_snapshot(device, &snapshot);

    let out = output::render_single(&global.output, &info, detail, |i| {
        i.serial_number.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(info: &DeviceInfo) -> String {
    [
        format!("Model:        {}", info.model.as_deref().unwrap_or("-")),
        format!("Manufacturer: {}", info.manufacturer),
        format!(
            "Serial:       {}",
            info.serial_number.as_deref().unwrap_or("-")
        ),
        format!(
            "SW version:   {}",
            info.sw_version.as_deref().unwrap_or("-")
        ),
        format!(
            "HW version:   {}",
            info.hw_version.as_deref().unwrap_or("-")
        ),
        format!("Manage at:    {}", info.configuration_url),
    ]
    .join("\n")
}
