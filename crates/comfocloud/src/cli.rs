//! Clap derive structures for the `comfocloud` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use comfocloud_core::DeviceId;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// comfocloud -- control Zehnder ComfoAirQ ventilation units from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "comfocloud",
    version,
    about = "Monitor and control cloud-connected ComfoAirQ ventilation units",
    long_about = "Talks to the Zehnder cloud API: lists your devices, reads their\n\
        live telemetry, and adjusts ventilation speed and bypass override.\n\n\
        Run `comfocloud login` once to authorize; the refresh token is kept\n\
        in your system keyring.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Account profile to use
    #[arg(long, short = 'p', env = "COMFO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Cloud API base URL (overrides profile)
    #[arg(long, env = "COMFO_API_URL", global = true)]
    pub api_url: Option<String>,

    /// OAuth2 access token (skips the stored refresh token)
    #[arg(long, env = "COMFO_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "COMFO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "COMFO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authorize with the Zehnder cloud and store a refresh token
    Login(LoginArgs),

    /// Forget the stored refresh token
    Logout,

    /// List registered devices
    #[command(alias = "dev", alias = "d")]
    Devices,

    /// Show live telemetry for a device
    #[command(alias = "st")]
    State(DeviceArg),

    /// Show identity details for a device
    Details(DeviceArg),

    /// Read or set the ventilation speed
    Fan(FanArgs),

    /// Read or set the bypass override
    Bypass(BypassArgs),

    /// Follow snapshot updates as they are polled
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Inspect the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Per-command args ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArg {
    /// Device id (defaults to the profile's device, or the only one)
    pub device: Option<DeviceId>,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Print the authorization URL without prompting (for scripts)
    #[arg(long)]
    pub url_only: bool,
}

#[derive(Debug, Args)]
pub struct FanArgs {
    /// Device id (defaults to the profile's device, or the only one)
    pub device: Option<DeviceId>,

    /// Target speed as a percentage (0 turns the unit off)
    #[arg(long, conflicts_with_all = ["speed", "off"], value_parser = clap::value_parser!(u8).range(0..=100))]
    pub percentage: Option<u8>,

    /// Target preset speed (1-3)
    #[arg(long, conflicts_with = "off", value_parser = clap::value_parser!(u8).range(1..=3))]
    pub speed: Option<u8>,

    /// Turn the unit off (away)
    #[arg(long)]
    pub off: bool,
}

#[derive(Debug, Args)]
pub struct BypassArgs {
    /// Device id (defaults to the profile's device, or the only one)
    pub device: Option<DeviceId>,

    /// Option to apply ("auto" or "open"); omit to show the current one
    pub option: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Device id (defaults to the profile's device, or the only one)
    pub device: Option<DeviceId>,

    /// Stop after this many updates (default: run until interrupted)
    #[arg(long, short = 'n')]
    pub count: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
