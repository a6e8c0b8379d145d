//! Command-line client for the todo tracker
//!
//! Tasks live in a file-backed key-value store under the data directory.

mod commands;
mod config;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_core::{FileStorage, TaskPersistence, TaskStore};

use crate::commands::Cli;
use crate::config::Config;

fn main() -> ExitCode {
    // Initialize tracing on stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_cli=warn,todo_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.data_dir.clone(), cli.json);
    let storage = FileStorage::new(&config.data_dir);
    tracing::debug!("Using data directory: {:?}", storage.dir());

    let persistence = TaskPersistence::with_key(storage, config.storage_key.as_str());
    let mut store = TaskStore::open(persistence);

    let mut stdout = std::io::stdout().lock();
    match commands::run(&mut store, cli.cmd, config.json, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
