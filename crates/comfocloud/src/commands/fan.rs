//! Ventilation speed handler.

use comfocloud_core::{DeviceId, Hub, speed_to_percentage};

use crate::cli::{FanArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(serde::Serialize)]
struct FanStatus {
    device: u32,
    preset: u8,
    percentage: u8,
    on: bool,
}

pub async fn handle(
    hub: &Hub,
    global: &GlobalOpts,
    device: DeviceId,
    args: &FanArgs,
) -> Result<(), CliError> {
    let fan = hub.fan(device)?;

    let target = if args.off {
        Some(0)
    } else if let Some(pct) = args.percentage {
        Some(pct)
    } else {
        args.speed.map(speed_to_percentage)
    };

    if let Some(pct) = target {
        fan.set_percentage(pct).await?;
    }

    let preset = fan.preset()?;
    let status = FanStatus {
        device: device.0,
        preset,
        percentage: fan.percentage()?,
        on: preset > 0,
    };

    let out = output::render_single(
        &global.output,
        &status,
        |s| {
            if s.on {
                format!("Preset {} ({}%)", s.preset, s.percentage)
            } else {
                "Off (away)".into()
            }
        },
        |s| s.percentage.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
