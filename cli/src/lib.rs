pub mod clap_app;
pub mod cli;
pub mod metrics;
pub mod stakes;

use {
    crate::{
        cli::{CliCommand, CliConfig, CliError, ProcessResult},
        metrics::{parse_metrics_command, process_metrics_command},
        stakes::{parse_stakes_command, process_stakes_command},
    },
    clap::ArgMatches,
};

/// Value of a global argument, given before or after the subcommand.
pub fn global_value<'a>(matches: &'a ArgMatches<'_>, name: &str) -> Option<&'a str> {
    matches
        .value_of(name)
        .or_else(|| matches.subcommand().1.and_then(|sub| sub.value_of(name)))
}

pub fn global_present(matches: &ArgMatches<'_>, name: &str) -> bool {
    matches.is_present(name) || matches.subcommand().1.is_some_and(|sub| sub.is_present(name))
}

pub fn parse_command(matches: &ArgMatches<'_>) -> Result<CliCommand, CliError> {
    match matches.subcommand() {
        (name @ ("duration" | "apr" | "tvl"), Some(sub)) => parse_metrics_command(name, sub),
        (name @ ("stakes" | "penalty" | "simulate-claim"), Some(sub)) => {
            parse_stakes_command(name, sub)
        }
        (name, _) => Err(CliError::BadParameter(format!("unknown command '{name}'"))),
    }
}

pub async fn process_command(config: &CliConfig, command: &CliCommand) -> ProcessResult {
    match command {
        CliCommand::Metrics(command) => process_metrics_command(config, command).await,
        CliCommand::Stakes(command) => process_stakes_command(config, command).await,
    }
}
