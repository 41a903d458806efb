use crate::config::LookupConfig;
use crate::core::codes::CodeKind;
use crate::core::report::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "lei-lookup")]
#[command(about = "Validate financial identifiers and look up LEI records in the GLEIF registry")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the registry base URL from the configuration
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines on stderr")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check identifiers offline, without contacting the registry
    Validate {
        #[arg(value_enum)]
        kind: CodeKind,
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Look up entities by LEI code; several codes are resolved as a batch
    Lei {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    /// Look up the entity behind a BIC
    Bic { bic: String },
    /// Look up the issuer behind an ISIN
    Isin { isin: String },
    /// Search entities by legal name
    Name { name: String },
}

impl CliConfig {
    /// Builds the client configuration: file (or defaults), then flag overrides.
    pub fn resolve(&self) -> Result<LookupConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                LookupConfig::from_file(path)?
            }
            None => LookupConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::DEFAULT_BASE_URL;
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::LeiError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_validate_command() {
        let cli = CliConfig::try_parse_from([
            "lei-lookup",
            "validate",
            "isin",
            "US0378331005",
            "US0378331006",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Validate { kind, codes } => {
                assert_eq!(kind, CodeKind::Isin);
                assert_eq!(codes.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::try_parse_from([
            "lei-lookup",
            "lei",
            "7LTWFZYICNSX8D621K86",
            "--format",
            "csv",
            "--base-url",
            "http://localhost:8080/api/v1",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Csv);

        let config = cli.resolve().unwrap();
        assert_eq!(config.base_url(), "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(CliConfig::try_parse_from(["lei-lookup", "lei"]).is_err());
        assert!(CliConfig::try_parse_from(["lei-lookup", "validate", "iban", "X"]).is_err());
    }

    #[test]
    fn test_resolve_defaults_without_file() {
        let cli = CliConfig::try_parse_from(["lei-lookup", "name", "Deutsche Bank"]).unwrap();
        let config = cli.resolve().unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_resolve_reads_file_and_applies_override() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[lookup]\nbatch_size = 10\n")
            .unwrap();
        let path = temp_file.path().to_string_lossy().into_owned();

        let cli = CliConfig::try_parse_from([
            "lei-lookup",
            "--config",
            path.as_str(),
            "--base-url",
            "https://mirror.example.org/v1",
            "bic",
            "DEUTDEFFXXX",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.batch_size(), 10);
        assert_eq!(config.base_url(), "https://mirror.example.org/v1");
    }

    #[test]
    fn test_resolve_rejects_bad_override() {
        let cli = CliConfig::try_parse_from([
            "lei-lookup",
            "--base-url",
            "ftp://registry.example.org",
            "isin",
            "US0378331005",
        ])
        .unwrap();

        let err = cli.resolve().unwrap_err();
        assert!(matches!(err, LeiError::InvalidConfigValueError { .. }));
    }
}
