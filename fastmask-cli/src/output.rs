// fastmask-cli/src/output.rs
use crate::export;
use comfy_table::{presets, Attribute, Cell, Color, Table};
use fastmask_client::masked_email::parse_timestamp;
use fastmask_client::{MaskedEmail, MaskedEmailState};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Standard JSON response envelope
#[derive(Debug, Serialize)]
pub struct Response<T> {
    ok: bool,
    result: T,
}

impl<T> Response<T> {
    pub fn ok(result: T) -> Self {
        Self { ok: true, result }
    }
}

/// Exit codes for scripts deciding whether to retry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    TransientError = 1,
    PermanentError = 2,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransientError => write!(f, "transient_error"),
            Self::PermanentError => write!(f, "permanent_error"),
        }
    }
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Network and HTTP status failures may succeed on a later run
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<fastmask_client::Error>() {
            Some(fastmask_client::Error::Transport(_)) => Self::TransientError,
            _ => Self::PermanentError,
        }
    }
}

// Print response to stdout
pub fn print_response<T: Serialize>(resp: &Response<T>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(resp)?);
    Ok(())
}

/// Print a styled success message
pub fn print_success(message: &str) {
    let term = console::Term::stdout();
    let _ = term.write_str(&format!("{}\n", console::style(message).green()));
}

/// Print a styled error message
pub fn print_error(message: &str) {
    let term = console::Term::stderr();
    let _ = term.write_str(&format!("{} {}\n", console::style("Error:").red().bold(), message));
}

/// Print a styled info/header
pub fn print_header(title: &str) {
    let term = console::Term::stdout();
    let _ = term.write_str(&format!("\n{}\n", console::style(title).bold()));
}

/// Write records to `out` if given, otherwise print them as JSON or a table
pub fn emit_records(
    records: &[MaskedEmail],
    title: &str,
    out: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(path) = out {
        export::export(records, path)?;
        print_success(&format!(
            "Wrote {} masked emails to {}",
            records.len(),
            path.display()
        ));
    } else if json {
        print_response(&Response::ok(records))?;
    } else {
        print_header(title);
        println!("{}", render_table(records));
    }
    Ok(())
}

/// Table with Description, Email, ID, Created, Last Msg, State and URL columns
pub fn render_table(records: &[MaskedEmail]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_HORIZONTAL_ONLY);
    table.set_header(
        ["Description", "Email", "ID", "Created", "Last Msg", "State", "URL"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Italic)),
    );

    for record in records {
        let description = if record.description.is_empty() {
            Cell::new("n/a").add_attribute(Attribute::Dim)
        } else {
            Cell::new(&record.description).fg(Color::Blue)
        };
        let last_message = match &record.last_message_at {
            Some(ts) => Cell::new(short_date(ts)).add_attribute(Attribute::Italic),
            None => Cell::new("Never").add_attribute(Attribute::Dim),
        };

        table.add_row(vec![
            description,
            Cell::new(&record.email).fg(Color::Cyan),
            Cell::new(&record.id),
            Cell::new(short_date(&record.created_at)).add_attribute(Attribute::Italic),
            last_message,
            state_cell(record.state),
            Cell::new(record.url.as_deref().unwrap_or("")).fg(Color::Cyan),
        ]);
    }

    table
}

fn state_cell(state: MaskedEmailState) -> Cell {
    let cell = Cell::new(state.as_str());
    match state {
        MaskedEmailState::Enabled => cell.fg(Color::Green),
        MaskedEmailState::Disabled => cell.fg(Color::Red),
        MaskedEmailState::Deleted => cell.add_attribute(Attribute::Dim),
        MaskedEmailState::Pending => cell.fg(Color::Yellow),
    }
}

/// `%m/%d/%y`, or the raw value if it is not a timestamp
fn short_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|ts| ts.format("%m/%d/%y").to_string())
        .unwrap_or_else(|| value.to_string())
}
