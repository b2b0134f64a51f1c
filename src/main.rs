//! bricks-backend entry point.

use std::process::ExitCode;

use clap::Parser;

use bricks_backend::config::{load_config, Cli};
use bricks_backend::lifecycle::startup::{self, EXIT_CONFIG, EXIT_RUNTIME, EXIT_USAGE};
use bricks_backend::observability::init_logging;
use bricks_backend::BuildInfo;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // `--help` is not an error.
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if cli.version {
        println!("{}", BuildInfo::current().version);
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("error: {e}");
        return ExitCode::from(EXIT_CONFIG);
    }

    for url in &config.backend_urls {
        tracing::info!(backend_url = %url, "Backend configured");
    }

    match startup::run(config, BuildInfo::current()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::from(EXIT_RUNTIME)
        }
    }
}
