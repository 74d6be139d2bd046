use std::ffi::OsString;
use std::process::ExitCode;

use clap::Parser;
use config::Config;
use log::{error, info, warn};
use submitter::SubmitOutcome;

mod auth;
mod config;
mod core;
mod error;
mod instance;
mod metadata;
mod providers;
mod submitter;
mod sync;

/// Keep a Cloud DNS A record in step with this instance's lifecycle.
#[derive(Parser, Debug)]
#[command(name = "gce-dns-sync")]
#[command(override_usage = "gce-dns-sync <startup|shutdown>")]
#[command(disable_help_flag = true)]
struct Cli {
    /// `startup` adds the instance's A record, `shutdown` deletes it
    #[arg(allow_hyphen_values = true)]
    command: String,
}

fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Wrong arity prints usage and does nothing else
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            return ExitCode::SUCCESS;
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match sync::run(&cli.command, &config).await {
        Ok(SubmitOutcome::Done { change_id }) => {
            info!("Change {} complete", change_id);
            ExitCode::SUCCESS
        }
        Ok(SubmitOutcome::Failed { reason }) => {
            warn!("DNS record was not updated: {}", reason);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
