use crate::core::codes::CodeKind;
use crate::domain::model::{BatchReport, EntityRecord};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

const RECORD_HEADERS: [&str; 16] = [
    "outcome",
    "lei",
    "legal_name",
    "entity_status",
    "entity_category",
    "legal_jurisdiction",
    "legal_form",
    "city",
    "country",
    "postal_code",
    "registration_status",
    "initial_registration_date",
    "last_update_date",
    "next_renewal_date",
    "managing_lou",
    "error",
];

/// Flat CSV shape of a record, or of an identifier that produced none.
#[derive(Debug, Serialize)]
struct RecordRow<'a> {
    outcome: &'static str,
    lei: &'a str,
    legal_name: Option<&'a str>,
    entity_status: Option<&'static str>,
    entity_category: Option<&'static str>,
    legal_jurisdiction: Option<&'a str>,
    legal_form: Option<&'a str>,
    city: Option<&'a str>,
    country: Option<&'a str>,
    postal_code: Option<&'a str>,
    registration_status: Option<&'static str>,
    initial_registration_date: Option<String>,
    last_update_date: Option<String>,
    next_renewal_date: Option<String>,
    managing_lou: Option<&'a str>,
    error: Option<String>,
}

impl<'a> RecordRow<'a> {
    fn found(record: &'a EntityRecord) -> Self {
        let registration = record.registration();
        let address = record.legal_address();

        Self {
            outcome: "found",
            lei: record.code(),
            legal_name: Some(record.legal_name()),
            entity_status: Some(record.entity_status().as_str()),
            entity_category: record.entity_category().map(|c| c.as_str()),
            legal_jurisdiction: record.legal_jurisdiction(),
            legal_form: record.legal_form_code(),
            city: address.city(),
            country: address.country(),
            postal_code: address.postal_code(),
            registration_status: Some(registration.status().as_str()),
            initial_registration_date: Some(registration.initial_registration_date().to_rfc3339()),
            last_update_date: Some(registration.last_update_date().to_rfc3339()),
            next_renewal_date: registration.next_renewal_date().map(|d| d.to_rfc3339()),
            managing_lou: registration.managing_lou(),
            error: None,
        }
    }

    fn missing(code: &'a str, outcome: &'static str, error: Option<String>) -> Self {
        Self {
            outcome,
            lei: code,
            legal_name: None,
            entity_status: None,
            entity_category: None,
            legal_jurisdiction: None,
            legal_form: None,
            city: None,
            country: None,
            postal_code: None,
            registration_status: None,
            initial_registration_date: None,
            last_update_date: None,
            next_renewal_date: None,
            managing_lou: None,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
struct FailedEntry<'a> {
    code: &'a str,
    error: String,
    retryable: bool,
}

#[derive(Debug, Serialize)]
struct BatchDocument<'a> {
    found: &'a [EntityRecord],
    not_found: &'a [String],
    invalid: &'a [String],
    failed: Vec<FailedEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ValidationRow<'a> {
    code: &'a str,
    kind: CodeKind,
    valid: bool,
    /// What the check digits should be, for invalid codes with a sound body.
    expected_check: Option<String>,
}

pub fn write_records<W: Write>(mut out: W, records: &[EntityRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(&mut out, &records),
        OutputFormat::Csv => write_rows(out, records.iter().map(RecordRow::found)),
    }
}

pub fn write_batch<W: Write>(mut out: W, report: &BatchReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let document = BatchDocument {
                found: &report.found,
                not_found: &report.not_found,
                invalid: &report.invalid,
                failed: report
                    .failed
                    .iter()
                    .map(|(code, error)| FailedEntry {
                        code,
                        error: error.to_string(),
                        retryable: error.is_retryable(),
                    })
                    .collect(),
            };
            write_json(&mut out, &document)
        }
        OutputFormat::Csv => {
            let rows = report
                .found
                .iter()
                .map(RecordRow::found)
                .chain(report.not_found.iter().map(|c| RecordRow::missing(c, "not_found", None)))
                .chain(report.invalid.iter().map(|c| RecordRow::missing(c, "invalid", None)))
                .chain(
                    report
                        .failed
                        .iter()
                        .map(|(c, e)| RecordRow::missing(c, "failed", Some(e.to_string()))),
                );
            write_rows(out, rows)
        }
    }
}

pub fn write_validations<W: Write, S: AsRef<str>>(
    mut out: W,
    kind: CodeKind,
    codes: &[S],
    format: OutputFormat,
) -> Result<()> {
    let rows: Vec<ValidationRow> = codes
        .iter()
        .map(|code| {
            let code = code.as_ref();
            let valid = kind.is_valid(code);
            ValidationRow {
                code,
                kind,
                valid,
                expected_check: if valid {
                    None
                } else {
                    kind.expected_check_digits(code)
                },
            }
        })
        .collect();

    match format {
        OutputFormat::Json => write_json(&mut out, &rows),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for row in &rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            Ok(())
        }
    }
}

pub fn render_records(records: &[EntityRecord], format: OutputFormat) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records, format)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn render_batch(report: &BatchReport, format: OutputFormat) -> Result<String> {
    let mut buffer = Vec::new();
    write_batch(&mut buffer, report, format)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

// header is written up front so an empty result still yields a valid file
fn write_rows<'a, W, I>(out: W, rows: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = RecordRow<'a>>,
{
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(RECORD_HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
