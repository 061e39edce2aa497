// fastmask-cli/src/export.rs
use anyhow::{Context, Result};
use fastmask_client::{Field, MaskedEmail};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// `.json` selects JSON, anything else CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// One exported record; field order is the column order
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    email: &'a str,
    #[serde(rename = "forDomain")]
    for_domain: &'a str,
    description: &'a str,
    state: &'a str,
    #[serde(rename = "lastMessageAt")]
    last_message_at: Option<&'a str>,
    url: Option<&'a str>,
    id: &'a str,
    #[serde(rename = "createdAt")]
    created_at: &'a str,
    #[serde(rename = "createdBy")]
    created_by: &'a str,
}

impl<'a> From<&'a MaskedEmail> for ExportRow<'a> {
    fn from(record: &'a MaskedEmail) -> Self {
        Self {
            email: &record.email,
            for_domain: &record.for_domain,
            description: &record.description,
            state: record.state.as_str(),
            last_message_at: record.last_message_at.as_deref(),
            url: record.url.as_deref(),
            id: &record.id,
            created_at: &record.created_at,
            created_by: &record.created_by,
        }
    }
}

pub fn export(records: &[MaskedEmail], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let writer = BufWriter::new(file);
    match ExportFormat::from_path(path) {
        ExportFormat::Csv => write_csv(records, writer),
        ExportFormat::Json => write_json(records, writer),
    }
}

/// Header row is always written, even for an empty list
pub fn write_csv<W: Write>(records: &[MaskedEmail], writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(Field::EXPORT_ORDER.iter().map(|f| f.name()))?;
    for record in records {
        wtr.serialize(ExportRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(records: &[MaskedEmail], mut writer: W) -> Result<()> {
    let rows: Vec<ExportRow<'_>> = records.iter().map(ExportRow::from).collect();
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
