//! Command-line interface definitions.
//!
//! Defines the CLI structure for the nodelaunch front end using `clap`:
//! `run` drives the resilient launch loop, `config` inspects a
//! configuration file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Config file used when `-c` is not given.
pub const DEFAULT_CONFIG: &str = "nodelaunch.toml";

/// Resilient multi-node launch front end
#[derive(Parser, Debug)]
#[command(name = "nodelaunch")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Apply the choice to styled output process-wide.
    pub fn apply(self) {
        match self {
            Self::Auto => owo_colors::unset_override(),
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch onto the configured nodes, retrying on failure
    Run(RunArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `nodelaunch config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file.
    Validate(ConfigPathArg),
}

#[derive(clap::Args, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Arguments for `nodelaunch run`. Flags override the config file.
#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override the number of worker nodes per attempt.
    #[arg(long = "nodes")]
    pub node_count: Option<usize>,

    /// Retry failed attempts on the remaining healthy nodes.
    #[arg(long)]
    pub resilient: bool,

    /// Keep retrying until no healthy node is left.
    #[arg(long)]
    pub exhaust_resources: bool,

    /// Give up after this many attempts.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Override log level (e.g. debug, info, nodelaunch=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty-printed logs.
    #[arg(long)]
    pub json_logs: bool,

    /// Write the final network configuration to this file as JSON.
    #[arg(long)]
    pub netconf_out: Option<PathBuf>,
}
