use clap::Parser;
use lei_lookup::config::{CliConfig, Command};
use lei_lookup::core::report;
use lei_lookup::utils::error::ErrorSeverity;
use lei_lookup::utils::logger;
use lei_lookup::{CodeKind, LeiLookup, Result};
use std::io;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    match run(&cli).await {
        Ok(true) => {}
        // something requested was invalid or not in the registry
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(
                "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 1,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

/// Writes the command's result to stdout. `Ok(false)` means the command ran
/// but at least one identifier was invalid or not found.
async fn run(cli: &CliConfig) -> Result<bool> {
    if let Command::Validate { kind, codes } = &cli.command {
        report::write_validations(io::stdout().lock(), *kind, codes, cli.format)?;
        return Ok(codes.iter().all(|code| kind.is_valid(code)));
    }

    let config = cli.resolve()?;
    let lookup = LeiLookup::new(&config)?;

    match &cli.command {
        Command::Lei { codes } if codes.len() > 1 => {
            let batch = lookup.get_lei_by_lei_codes(codes).await;
            report::write_batch(io::stdout().lock(), &batch, cli.format)?;
            Ok(batch.is_complete())
        }
        Command::Lei { codes } => {
            let code = codes.first().map(String::as_str).unwrap_or_default();
            warn_if_invalid(CodeKind::Lei, code);
            let record = lookup.get_lei_by_lei_code(code).await?;
            write_single(cli, code, record)
        }
        Command::Bic { bic } => {
            warn_if_invalid(CodeKind::Bic, bic);
            let record = lookup.get_lei_by_bic(bic).await?;
            write_single(cli, bic, record)
        }
        Command::Isin { isin } => {
            warn_if_invalid(CodeKind::Isin, isin);
            let record = lookup.get_lei_by_isin(isin).await?;
            write_single(cli, isin, record)
        }
        Command::Name { name } => {
            let records = lookup.get_lei_by_legal_name(name).await?;
            tracing::info!("Found {} entities named like '{}'", records.len(), name);
            report::write_records(io::stdout().lock(), &records, cli.format)?;
            Ok(!records.is_empty())
        }
        Command::Validate { .. } => Ok(true),
    }
}

fn write_single(
    cli: &CliConfig,
    code: &str,
    record: Option<lei_lookup::EntityRecord>,
) -> Result<bool> {
    if record.is_none() {
        eprintln!("No LEI record found for {}", code);
    }
    report::write_records(io::stdout().lock(), record.as_slice(), cli.format)?;
    Ok(record.is_some())
}

fn warn_if_invalid(kind: CodeKind, code: &str) {
    if !kind.is_valid(code) {
        eprintln!("⚠️  '{}' is not a valid {}; skipping the registry", code, kind.as_str().to_uppercase());
    }
}
