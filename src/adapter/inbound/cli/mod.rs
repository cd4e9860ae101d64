//! CLI module graph.

pub mod command;
pub mod config;
pub mod output;
pub mod run;

use crate::domain::ExitStatus;
use command::{Cli, Commands, ConfigCommand};
use output::OutputConfig;

/// Execute a parsed command line and return the process exit status.
///
/// Errors are printed here; only the status leaves the CLI.
pub async fn execute(cli: Cli) -> ExitStatus {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    cli.color.apply();

    let result = match cli.command {
        Commands::Run(args) => run::execute(&args).await,
        Commands::Config(ConfigCommand::Validate(arg)) => {
            config::execute_validate(&arg.config).map(|()| ExitStatus::Success)
        }
        Commands::Config(ConfigCommand::Show(arg)) => {
            config::execute_show(&arg.config).map(|()| ExitStatus::Success)
        }
    };

    result.unwrap_or_else(|err| {
        output::error(&err.to_string());
        ExitStatus::Fail
    })
}
