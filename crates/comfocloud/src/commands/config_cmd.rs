//! Config inspection handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(
                &comfocloud_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }
        ConfigCommand::Show => {
            let cfg = comfocloud_config::load_config_or_default();
            let rendered = toml_to_string(&cfg)?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}

fn toml_to_string(cfg: &comfocloud_config::Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Config {
        message: format!("could not render config: {e}"),
    })
}
