use std::process::ExitCode;

use clap::Parser;
use nodelaunch::adapter::inbound::cli::{self, command::Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    cli::execute(cli).await.into()
}
