mod cli;
mod dispatch;
mod output;

use std::process::ExitCode;

use cardwise_engine::EngineError;
use clap::{Parser, error::ErrorKind};

const ROOT_HELP: &str = "Cardwise - card reward calculator and two-card optimizer

Usage:
  cardwise <command>

Start here:
  cardwise demo rank
  cardwise catalog list
  cardwise rank --help
";

const TOP_LEVEL_HELP: &str = "Cardwise — card reward calculator and two-card optimizer

USAGE: cardwise <command>

Try it:
  cardwise demo rank                                  Rank the built-in catalog against sample spending
  cardwise demo pairs                                 Preview the best sample two-card combinations

Rank your own spending:
  1. cardwise rank --help                             Read the spending file schema
  2. cardwise rank <spend-path>                       Rank every product, best first
  3. cardwise breakdown <product-id> <spend-path>     Inspect one product's full breakdown

Split spending across two cards:
  cardwise pairs <spend-path>                         Search every product pair for the best split

Work with the catalog:
  cardwise catalog list                               List the loaded products
  cardwise catalog show <product-id>                  Show one product's tiers and rates
  Use --catalog <path> on any command to load your own catalog file.

Machine output:
  Add --json to any rank/pairs/breakdown/catalog command.

Having issues? Run `cardwise <command> --help` for command usage.
";

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        println!("{ROOT_HELP}");
        return Ok(ExitCode::SUCCESS);
    }

    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) && is_top_level_help_request(&raw_args)
                {
                    println!("{TOP_LEVEL_HELP}");
                } else {
                    println!("{err}");
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = command_path_from_args(&raw_args);
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                EngineError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information"
/// hint) so the recovery steps are the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Builds the subcommand path from raw CLI args for use in help hints.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();
    if non_flags.is_empty() {
        return None;
    }

    let hint = match non_flags.as_slice() {
        ["catalog", "list", ..] => Some("catalog list"),
        ["catalog", "show", ..] => Some("catalog show"),
        ["catalog", ..] => Some("catalog"),
        ["rank", ..] => Some("rank"),
        ["pairs", ..] => Some("pairs"),
        ["breakdown", ..] => Some("breakdown"),
        ["demo", "rank", ..] => Some("demo rank"),
        ["demo", "pairs", ..] => Some("demo pairs"),
        ["demo", ..] => Some("demo"),
        _ => None,
    };
    hint.map(std::string::ToString::to_string)
}

fn exit_code_for_error(error: &EngineError) -> ExitCode {
    if error.code.starts_with("internal_") {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}
