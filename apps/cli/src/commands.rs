//! Subcommand implementations
//!
//! Each command writes its report to `out`; diagnostics go through `tracing`.

use anyhow::{Context, Result};
use ferrum_models::{Bundle, DecodeWarning, EntryResource, FhirJsonCodec, Resource};
use std::io::{Read, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::cli::{is_stdin, Command};

/// Exit status of `bundle` when at least one entry failed to decode
const ENTRY_FAILURE_EXIT: u8 = 2;

pub fn run(codec: &FhirJsonCodec, command: &Command, out: &mut impl Write) -> Result<ExitCode> {
    match command {
        Command::Decode { input } => {
            let bytes = read_input(input)?;
            decode(codec, &bytes, out)
                .with_context(|| format!("Failed to decode {}", input.display()))
        }
        Command::Roundtrip { input, pretty } => {
            let bytes = read_input(input)?;
            roundtrip(codec, &bytes, *pretty, out)
                .with_context(|| format!("Failed to round-trip {}", input.display()))
        }
        Command::Bundle { input, outcomes } => {
            let bytes = read_input(input)?;
            bundle(codec, &bytes, *outcomes, out)
                .with_context(|| format!("Failed to decode bundle {}", input.display()))
        }
        Command::Types => types(codec, out),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if is_stdin(path) {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        return Ok(bytes);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn describe(resource: &dyn Resource) -> String {
    match resource.id() {
        Some(id) => format!("{}/{}", resource.resource_type(), id),
        None => format!("{} (no id)", resource.resource_type()),
    }
}

fn write_warnings(warnings: &[DecodeWarning], out: &mut impl Write) -> Result<()> {
    for warning in warnings {
        writeln!(out, "warning: {warning}")?;
    }
    Ok(())
}

pub fn decode(codec: &FhirJsonCodec, input: &[u8], out: &mut impl Write) -> Result<ExitCode> {
    let decoded = codec.decode_slice(input)?;
    writeln!(out, "{}", describe(&*decoded.value))?;
    write_warnings(&decoded.warnings, out)?;
    Ok(ExitCode::SUCCESS)
}

pub fn roundtrip(
    codec: &FhirJsonCodec,
    input: &[u8],
    pretty: bool,
    out: &mut impl Write,
) -> Result<ExitCode> {
    let raw = codec.parse(input)?;
    let decoded = codec.decode_value(raw.clone())?;

    let encoded = codec.encode_value(&*decoded.value);
    if encoded != raw {
        tracing::warn!(
            resource = %describe(&*decoded.value),
            "Re-encoded document differs from the input"
        );
    }

    if pretty {
        writeln!(out, "{encoded:#}")?;
    } else {
        writeln!(out, "{encoded}")?;
    }
    Ok(ExitCode::SUCCESS)
}

pub fn bundle(
    codec: &FhirJsonCodec,
    input: &[u8],
    outcomes: bool,
    out: &mut impl Write,
) -> Result<ExitCode> {
    let raw = codec.parse(input)?;
    let decoded = codec.decode_value_as::<Bundle>(raw)?;
    let bundle = &decoded.value;

    let mut failed = 0usize;
    for (index, entry) in bundle.entries().iter().enumerate() {
        match &entry.resource {
            Some(EntryResource::Decoded(resource)) => {
                writeln!(out, "[{index}] {}", describe(&**resource))?;
            }
            Some(EntryResource::Failed { error, .. }) => {
                failed += 1;
                writeln!(out, "[{index}] error: {error}")?;
                if outcomes {
                    let outcome = error.to_operation_outcome();
                    writeln!(out, "{}", codec.encode_string(&outcome))?;
                }
            }
            None => writeln!(out, "[{index}] (no resource)")?,
        }
    }
    write_warnings(&decoded.warnings, out)?;

    tracing::info!(entries = bundle.entry_count(), failed, "Bundle decoded");

    if failed > 0 {
        Ok(ExitCode::from(ENTRY_FAILURE_EXIT))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

pub fn types(codec: &FhirJsonCodec, out: &mut impl Write) -> Result<ExitCode> {
    for name in codec.registry().resource_types() {
        writeln!(out, "{name}")?;
    }
    Ok(ExitCode::SUCCESS)
}
