use channel_studio::cli::{Cli, Command};
use channel_studio::commands;
use channel_studio::error::CliError;
use channel_studio::logger::initialize as LoggerInitialize;
use channel_studio::state::{AppPaths, AppState, load_config};

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {}", e.user_message());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;
    let paths = AppPaths::resolve(&cli, &config)?;

    // Logger first so everything after lands in the log file
    LoggerInitialize(&paths.log_dir(), cli.terminal_level())?;
    info!("Channel Studio starting");
    info!("Config directory: {}", paths.config_dir.display());
    info!("Data directory: {}", paths.data_dir.display());

    let state = AppState::open(config, paths).await?;

    match &cli.command {
        Command::Generate(args) => commands::generate::run(&state, args).await,
        Command::History { action } => commands::history::run(&state, action).await,
    }
}
