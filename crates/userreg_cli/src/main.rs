//! Terminal front end for the user registry.
//!
//! # Responsibility
//! - Resolve configuration from environment and flags.
//! - Open the chosen storage and hand it to the registry controller.

mod cli;
mod command;
mod session;
mod terminal;

use clap::Parser;
use cli::Cli;
use log::info;
use std::io::{self, BufReader};
use std::process::ExitCode;
use terminal::TerminalView;
use userreg_core::{
    init_logging, BlobStore, MemoryBlobStore, RegistryConfig, RegistryController,
    SqliteBlobStore, UserStore,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.apply(RegistryConfig::from_env());

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, &log_dir.to_string_lossy()) {
            eprintln!("userreg: logging disabled: {err}");
        }
    }

    if cli.memory {
        info!("event=cli_start module=cli storage=memory");
        run_with(MemoryBlobStore::new());
        return ExitCode::SUCCESS;
    }

    match SqliteBlobStore::open(&config.db_path) {
        Ok(blob) => {
            info!(
                "event=cli_start module=cli storage=sqlite path={}",
                config.db_path.display()
            );
            run_with(blob);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!(
                "userreg: cannot open `{}`: {err}",
                config.db_path.display()
            );
            ExitCode::FAILURE
        }
    }
}

fn run_with<S: BlobStore>(blob: S) {
    let view = TerminalView::new(BufReader::new(io::stdin()), io::stdout());
    let mut controller = RegistryController::new(UserStore::new(blob), view);
    session::run(&mut controller);
}
