//! `fhir-json`: decode, inspect and re-encode FHIR R4 JSON
//!
//! Exit status is 0 on success, 1 when the input cannot be decoded, and 2
//! when a Bundle decodes but some of its entries fail.

use anyhow::Context;
use clap::Parser;
use ferrum_models::FhirJsonCodec;
use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod logging;

use cli::Cli;
use config::Config;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = Config::load(&cli.global).context("Failed to load configuration")?;
    logging::init_logging(&config.logging)?;

    tracing::debug!(
        strict_codes = config.decode.strict_codes,
        max_depth = config.decode.max_depth,
        max_document_bytes = config.decode.max_document_bytes,
        "Configuration loaded"
    );

    let codec = FhirJsonCodec::r4().with_options(config.decode);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&codec, &cli.command, &mut out)
}
