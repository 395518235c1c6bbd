//! Bypass override handler.

use comfocloud_core::{DeviceId, Hub};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(serde::Serialize)]
struct BypassStatus {
    device: u32,
    current: &'static str,
    options: &'static [&'static str],
}

pub async fn handle(
    hub: &Hub,
    global: &GlobalOpts,
    device: DeviceId,
    option: Option<&str>,
) -> Result<(), CliError> {
    let select = hub.bypass_select(device)?;

    if let Some(option) = option {
        select.select_option(option).await?;
    }

    let status = BypassStatus {
        device: device.0,
        current: select.current_option()?,
        options: select.options(),
    };

    let out = output::render_single(
        &global.output,
        &status,
        |s| format!("Bypass: {} (options: {})", s.current, s.options.join(", ")),
        |s| s.current.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
