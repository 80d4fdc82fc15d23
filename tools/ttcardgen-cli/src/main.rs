//! ttcardgen CLI: render tabletop RPG cards from config files.
//!
//! Usage:
//!   ttcardgen [OPTIONS] <CONFIG> <OUTPUT>   Render a card to a PNG file
//!   ttcardgen --example                     Print an annotated example config

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use ttcardgen_common::config::LoggingConfig;
use ttcardgen_common::error::CardgenError;
use ttcardgen_common::logging::{init_logging, level_for_flags};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "ttcardgen",
    about = "Generate tabletop RPG cards from config files",
    version,
    author
)]
struct Cli {
    /// Print an example config and exit
    #[arg(long)]
    example: bool,

    /// Overwrite the output file
    #[arg(short = 'f')]
    force: bool,

    /// Print only error messages
    #[arg(short = 'q', help_heading = "Output")]
    quiet: bool,

    /// Verbose messages
    #[arg(short = 'v', help_heading = "Output")]
    verbose: bool,

    /// Debug messages
    #[arg(short = 'd', help_heading = "Output")]
    debug: bool,

    /// Settings file with search paths [default: ~/.rpgcardgen.cfg]
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Card config file
    #[arg(required_unless_present = "example")]
    config: Option<PathBuf>,

    /// Output PNG file
    #[arg(required_unless_present = "example")]
    output: Option<PathBuf>,
}

impl Cli {
    fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: level_for_flags(self.quiet, self.verbose, self.debug).to_string(),
            json: self.log_json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.example {
        return exit_code(commands::example::run());
    }

    init_logging(&cli.logging());

    let (Some(config), Some(output)) = (cli.config, cli.output) else {
        eprintln!("Error: CONFIG and OUTPUT are required");
        return ExitCode::FAILURE;
    };

    exit_code(commands::generate::run(commands::generate::GenerateArgs {
        config,
        output,
        force: cli.force,
        settings: cli.settings,
    }))
}

fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_message(&err));
            ExitCode::FAILURE
        }
    }
}

/// `Config Error: ...` for problems in the card or template files,
/// `Error: ...` for everything else.
fn error_message(err: &anyhow::Error) -> String {
    let is_config = err
        .downcast_ref::<CardgenError>()
        .is_some_and(CardgenError::is_config);
    if is_config {
        format!("Config Error: {err}")
    } else {
        format!("Error: {err}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positional_args() {
        let cli = Cli::try_parse_from(["ttcardgen", "-f", "-v", "card.cfg", "card.png"]).unwrap();
        assert!(cli.force);
        assert_eq!(cli.config, Some(PathBuf::from("card.cfg")));
        assert_eq!(cli.output, Some(PathBuf::from("card.png")));
        assert_eq!(cli.logging().level, "debug");
        assert!(!cli.logging().json);
    }

    #[test]
    fn test_example_needs_no_positionals() {
        let cli = Cli::try_parse_from(["ttcardgen", "--example"]).unwrap();
        assert!(cli.example);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_positionals_required_without_example() {
        assert!(Cli::try_parse_from(["ttcardgen", "card.cfg"]).is_err());
        assert!(Cli::try_parse_from(["ttcardgen"]).is_err());
    }

    #[test]
    fn test_debug_flag_wins() {
        let cli = Cli::try_parse_from(["ttcardgen", "-q", "-d", "a", "b"]).unwrap();
        assert_eq!(cli.logging().level, "trace");
    }

    #[test]
    fn test_error_message_prefix() {
        let config = anyhow::Error::new(CardgenError::field(
            "title",
            CardgenError::config("'area' undefined"),
        ));
        assert_eq!(error_message(&config), "Config Error: title: 'area' undefined");

        let render = anyhow::Error::new(CardgenError::render("failed to create image: boom"));
        assert_eq!(error_message(&render), "Error: failed to create image: boom");

        let plain = anyhow::anyhow!("output already exists");
        assert_eq!(error_message(&plain), "Error: output already exists");
    }
}
