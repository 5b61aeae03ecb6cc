//! Main application entry point (CLI binary).
//!
//! Thin wrapper around the `dealer_contact` library: loads `.env`, parses the
//! command line, initializes logging and hands over to [`dealer_contact::cli::run`].

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use dealer_contact::cli::{self, Cli};
use dealer_contact::initialization::init_logger_with;

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(env_path) = exe_path.parent().map(|dir| dir.join(".env")) {
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let args = Cli::parse();
    init_logger_with(args.log_level.clone().into(), args.log_format.clone())
        .context("Failed to initialize logger")?;

    match cli::run(args).await {
        Ok(true) => Ok(()),
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("dealer_contact error: {:#}", e);
            process::exit(1);
        }
    }
}
