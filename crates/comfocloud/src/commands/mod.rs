//! Command handlers, one module per subcommand.

pub mod bypass;
pub mod config_cmd;
pub mod details;
pub mod devices;
pub mod fan;
pub mod login;
pub mod state;
pub mod watch;

use comfocloud_core::{DeviceId, Hub};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a connected-hub command to its handler.
pub async fn dispatch(
    cmd: Command,
    hub: &Hub,
    global: &GlobalOpts,
    default_device: Option<DeviceId>,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices => devices::handle(hub, global),
        Command::State(args) => state::handle(hub, global, resolve(hub, args.device, default_device)?),
        Command::Details(args) => {
            details::handle(hub, global, resolve(hub, args.device, default_device)?)
        }
        Command::Fan(args) => {
            let device = resolve(hub, args.device, default_device)?;
            fan::handle(hub, global, device, &args).await
        }
        Command::Bypass(args) => {
            let device = resolve(hub, args.device, default_device)?;
            bypass::handle(hub, global, device, args.option.as_deref()).await
        }
        Command::Watch(args) => {
            let device = resolve(hub, args.device, default_device)?;
            watch::handle(hub, global, device, args.count).await
        }

        // Handled before a hub exists
        Command::Login(_)
        | Command::Logout
        | Command::Config(_)
        | Command::Completions(_) => unreachable!("handled without a hub"),
    }
}

/// Resolve the target device: explicit argument, then the profile's
/// default, then the account's only device.
fn resolve(
    hub: &Hub,
    arg: Option<DeviceId>,
    default_device: Option<DeviceId>,
) -> Result<DeviceId, CliError> {
    if let Some(id) = arg.or(default_device) {
        if hub.coordinator(id).is_none() {
            return Err(CliError::DeviceNotFound {
                identifier: id.to_string(),
            });
        }
        return Ok(id);
    }

    let ids = hub.device_ids();
    match ids.as_slice() {
        [only] => Ok(*only),
        _ => Err(CliError::AmbiguousDevice { count: ids.len() }),
    }
}
