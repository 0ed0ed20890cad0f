//! Patron file line format.
//!
//! One patron per line, fields `id,name,address,fine` joined by a comma. There
//! is no quoting: delimiters and line breaks inside text fields are replaced
//! with spaces when writing, so reading never has to unescape anything.

use crate::error::RowRejection;
use crate::fine::{self, Fine};
use crate::patron::Patron;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Field delimiter.
pub const DELIMITER: u8 = b',';

/// Header line written at the top of every file this crate creates.
pub const HEADER: [&str; 4] = ["patronId", "name", "address", "overdueFine"];

/// Number of fields on a data line.
pub const FIELD_COUNT: usize = HEADER.len();

/// Line terminator used when writing.
pub const LINE_TERMINATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Raw patron line as read from the file.
///
/// All fields stay textual until [`PatronRecord::parse`] so that each kind of
/// malformed input can be reported separately.
#[derive(Debug, Deserialize)]
pub struct PatronRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub fine: String,
}

impl PatronRecord {
    /// Builds a raw record from a line that has already been split.
    pub fn from_fields(fields: &StringRecord) -> Result<Self, RowRejection> {
        if fields.len() != FIELD_COUNT {
            return Err(RowRejection::FieldCount(fields.len()));
        }
        fields
            .deserialize(None)
            .map_err(|_| RowRejection::FieldCount(fields.len()))
    }

    /// Parses the raw fields into a validated patron.
    pub fn parse(&self) -> Result<Patron, RowRejection> {
        let id = self
            .id
            .trim()
            .parse::<u32>()
            .map_err(|_| RowRejection::UnparsableId(self.id.clone()))?;
        let amount = fine::parse_amount(&self.fine)?;

        Ok(Patron::new(id, &self.name, &self.address, amount)?)
    }
}

/// A patron as written to the file, with text fields sanitized.
#[derive(Debug, Serialize)]
pub struct PatronRow<'a> {
    pub id: u32,
    pub name: Cow<'a, str>,
    pub address: Cow<'a, str>,
    pub fine: Fine,
}

impl<'a> From<&'a Patron> for PatronRow<'a> {
    fn from(patron: &'a Patron) -> Self {
        PatronRow {
            id: patron.id(),
            name: sanitize_field(patron.name()),
            address: sanitize_field(patron.address()),
            fine: patron.fine(),
        }
    }
}

/// Replaces the delimiter, `\n` and `\r` with a space and trims the result.
pub fn sanitize_field(value: &str) -> Cow<'_, str> {
    let needs_cleaning = |c: char| c == DELIMITER as char || c == '\n' || c == '\r';

    if value.contains(needs_cleaning) {
        Cow::Owned(value.replace(needs_cleaning, " ").trim().to_string())
    } else {
        Cow::Borrowed(value.trim())
    }
}

/// Returns `true` if the first field of `fields` is not a 32-bit signed
/// integer. Wider numbers such as `3000000000` count as header text.
pub fn looks_like_header(fields: &StringRecord) -> bool {
    fields
        .get(0)
        .map(|first| first.trim().parse::<i32>().is_err())
        .unwrap_or(false)
}

/// Returns `true` for a line that held nothing but whitespace.
pub fn is_blank(fields: &StringRecord) -> bool {
    fields.iter().all(|f| f.trim().is_empty()) && fields.len() <= 1
}

/// Reader configuration for patron files.
///
/// Headers are detected by content rather than position, so the reader never
/// consumes a header row itself. Field counts vary on malformed lines and
/// quotes are ordinary characters.
pub fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All);
    builder
}

/// Writer configuration for patron files, using the platform line terminator.
pub fn writer_builder() -> WriterBuilder {
    let terminator = match LINE_TERMINATOR {
        "\r\n" => Terminator::CRLF,
        _ => Terminator::Any(b'\n'),
    };

    let mut builder = WriterBuilder::new();
    builder
        .delimiter(DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(terminator);
    builder
}
