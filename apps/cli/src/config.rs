//! Layered configuration for the `fhir-json` tool
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `fhir-json.toml` in the working directory, or the file given by
//!    `--config`
//! 3. `FHIR_JSON_*` environment variables (a `.env` file is loaded first),
//!    with `__` separating sections, e.g. `FHIR_JSON_DECODE__MAX_DEPTH=32`
//! 4. command-line flags

use anyhow::{anyhow, Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat, Map};
use ferrum_models::DecodeOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "fhir-json.toml";
const ENV_PREFIX: &str = "FHIR_JSON";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decode: DecodeOptions,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is not set
    pub level: String,
    /// JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration from every source and apply the command-line
    /// overrides
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        // A missing .env is fine
        dotenvy::dotenv().ok();

        let mut config = Self::from_sources(args.config.as_deref(), None)?;
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    /// Build from defaults, the config file and the environment.
    ///
    /// `env` replaces the process environment when given.
    fn from_sources(path: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
        let mut builder =
            ConfigBuilder::builder().add_source(ConfigBuilder::try_from(&Config::default())?);

        builder = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(anyhow!("Config file not found: {}", path.display()));
                }
                builder.add_source(File::from(path))
            }
            None => builder
                .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Toml).required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    fn apply_overrides(&mut self, args: &GlobalArgs) {
        if args.strict {
            self.decode.strict_codes = true;
        }
        if let Some(max_depth) = args.max_depth {
            self.decode.max_depth = max_depth;
        }
        if args.json_logs {
            self.logging.json = true;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.decode.max_depth == 0 {
            return Err(anyhow!("decode.max_depth must be at least 1"));
        }
        if self.decode.max_document_bytes == 0 {
            return Err(anyhow!("decode.max_document_bytes must be at least 1"));
        }
        if self.logging.level.trim().is_empty() {
            return Err(anyhow!("logging.level must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "fhir-json-{}-{name}.toml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(None, env(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.decode.strict_codes);
        assert_eq!(config.decode.max_depth, 64);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_temp_config(
            "file",
            "[decode]\nstrict_codes = true\nmax_depth = 20\n\n[logging]\nlevel = \"debug\"\n",
        );
        let config = Config::from_sources(Some(&path), env(&[])).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(config.decode.strict_codes);
        assert_eq!(config.decode.max_depth, 20);
        assert_eq!(
            config.decode.max_document_bytes,
            DecodeOptions::default().max_document_bytes
        );
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = write_temp_config("env", "[decode]\nmax_depth = 20\n");
        let config = Config::from_sources(
            Some(&path),
            env(&[
                ("FHIR_JSON_DECODE__MAX_DEPTH", "8"),
                ("FHIR_JSON_LOGGING__JSON", "true"),
            ]),
        )
        .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.decode.max_depth, 8);
        assert!(config.logging.json);
    }

    #[test]
    fn test_flags_override_everything() {
        let mut config =
            Config::from_sources(None, env(&[("FHIR_JSON_DECODE__MAX_DEPTH", "8")])).unwrap();
        config.apply_overrides(&GlobalArgs {
            strict: true,
            max_depth: Some(3),
            config: None,
            json_logs: true,
        });
        assert!(config.decode.strict_codes);
        assert_eq!(config.decode.max_depth, 3);
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::from_sources(Some(Path::new("/nonexistent/fhir-json.toml")), env(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = Config::default();
        config.decode.max_depth = 0;
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }
}
