use crate::cli::Cli;
use crate::config::{AppConfig, PartialClassifyConfig};
use crate::error::{CliError, Result};
use crate::output::format_report;
use crate::utils::progress::CliProgressHandler;
use glnconf::engine::progress::ProgressReporter;
use glnconf::workflows;
use tracing::{info, warn};

pub fn run(args: &Cli) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialClassifyConfig::from_file(path)?,
        None => PartialClassifyConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let AppConfig { request, precision } = partial_config.merge_with_cli(args)?;

    let progress_handler = if args.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core classification workflow...");
    let report = workflows::classify::run(&request, &reporter)?;

    for line in format_report(&report, precision) {
        println!("{}", line);
    }

    let failed: Vec<String> = report
        .failures()
        .map(|failure| {
            warn!("{}", failure);
            failure.copy.clone()
        })
        .collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::PartialResults { failed })
    }
}
