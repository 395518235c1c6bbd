mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use comfocloud_core::Hub;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut cfg = comfocloud_config::load_config_or_default();
    let profile_name = config::active_profile_name(&cli.global, &cfg);

    match cli.command {
        // Config inspection doesn't need credentials
        Command::Config(args) => commands::config_cmd::handle(&args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "comfocloud", &mut std::io::stdout());
            Ok(())
        }

        // Auth flows talk to the token endpoint, not the API
        Command::Login(args) => {
            let profile = config::take_profile(&mut cfg, &profile_name)?;
            commands::login::handle(&args, &profile, &profile_name, &cli.global).await
        }
        Command::Logout => {
            comfocloud_config::clear_refresh_token(&profile_name)?;
            output::print_output(
                &format!("Refresh token for profile '{profile_name}' removed"),
                cli.global.quiet,
            );
            Ok(())
        }

        // All other commands need a connected hub
        cmd => {
            let profile = config::take_profile(&mut cfg, &profile_name)?;
            let access_token =
                config::resolve_access_token(&cli.global, &profile, &profile_name).await?;
            let hub_config =
                config::build_hub_config(&cli.global, &profile, &cfg.defaults, access_token)?;

            let hub = Hub::new(hub_config)?;
            hub.connect().await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result =
                commands::dispatch(cmd, &hub, &cli.global, config::profile_device(&profile)).await;

            hub.shutdown().await;
            result
        }
    }
}
