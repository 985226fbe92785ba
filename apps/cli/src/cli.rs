//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "fhir-json")]
#[command(version, about = "Decode, inspect and re-encode FHIR R4 JSON resources")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every subcommand; they override the config file and
/// environment
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Reject codes outside closed value sets instead of warning
    #[arg(long, global = true)]
    pub strict: bool,

    /// Maximum nesting depth of objects and arrays
    #[arg(long, global = true, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Configuration file (defaults to ./fhir-json.toml when present)
    #[arg(long, global = true, value_name = "PATH", env = "FHIR_JSON_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode one resource and print its type, id and warnings
    Decode {
        /// Input file, or `-` for stdin
        input: PathBuf,
    },
    /// Decode one resource and write it back out as JSON
    Roundtrip {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Decode a Bundle and print one line per entry
    Bundle {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Print an OperationOutcome for every failed entry
        #[arg(long)]
        outcomes: bool,
    },
    /// List the registered resource types
    Types,
}

/// Whether an input argument names stdin
pub fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fhir-json",
            "bundle",
            "bundle.json",
            "--outcomes",
            "--strict",
            "--max-depth",
            "12",
        ])
        .unwrap();
        assert!(cli.global.strict);
        assert_eq!(cli.global.max_depth, Some(12));
        match cli.command {
            Command::Bundle { input, outcomes } => {
                assert_eq!(input, PathBuf::from("bundle.json"));
                assert!(outcomes);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_stdin_marker() {
        let cli = Cli::try_parse_from(["fhir-json", "roundtrip", "-", "--pretty"]).unwrap();
        match cli.command {
            Command::Roundtrip { input, pretty } => {
                assert!(is_stdin(&input));
                assert!(pretty);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!is_stdin(Path::new("patient.json")));
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["fhir-json", "--strict"]).is_err());
    }
}
