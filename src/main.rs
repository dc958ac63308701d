use std::path::PathBuf;

use clap::Parser;
use colored::*;

use crate::{
    cli::{Commands, ListArgs, Session, execute, report_error},
    config::{Config, Overrides},
    storage::file::FileStorage,
};

mod cli;
mod config;
mod models;
mod services;
mod shell;
mod storage;
mod store;
mod ui;

#[derive(Parser)]
#[command(
    name = "taskflow",
    version,
    about = "A small task list for your terminal, with undo"
)]
struct Cli {
    /// Config file (defaults to <config dir>/taskflow/config.toml)
    #[arg(long, global = true, env = "TASKFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Directory where tasks and preferences are stored
    #[arg(long, global = true, env = "TASKFLOW_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "TASKFLOW_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(
        cli.config.as_deref(),
        Overrides {
            data_dir: cli.data_dir,
            log_level: cli.log_level,
        },
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);
    tracing::debug!(data_dir = %config.data_dir.display(), "starting session");

    let storage = FileStorage::new(config.data_dir.clone());
    let mut session = Session::open(storage, config.initial_sort);

    let result = match cli.command.unwrap_or(Commands::List(ListArgs::default())) {
        Commands::Shell => shell::run(&mut session),
        command => execute(&mut session, command),
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
