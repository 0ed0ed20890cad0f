//! Mirrors the roster to a delimited text file.
//!
//! Three operations keep the file in step with memory: [`load`] reads a file
//! into a roster, [`append_one`] adds a single line after an add, and
//! [`rewrite_all`] replaces the whole file after a removal. Malformed lines are
//! counted and skipped; only unopenable or unwritable files are errors.

use crate::error::{Result, RosterError, RowRejection};
use crate::patron::Patron;
use crate::record::{self, PatronRecord, PatronRow, HEADER};
use crate::roster::PatronRoster;
use csv::{ErrorKind, StringRecord};
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Outcome of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Lines that became patrons in the roster.
    pub loaded: usize,

    /// Non-blank, non-header lines that were rejected.
    pub skipped: usize,
}

/// Loads patrons from the file at `path` into `roster`.
///
/// Fails only if the file cannot be opened or read. Malformed lines, invalid
/// field values and IDs already in the roster are counted in
/// [`LoadSummary::skipped`].
pub fn load(path: impl AsRef<Path>, roster: &mut PatronRoster) -> Result<LoadSummary> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| RosterError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let summary = load_from_reader(BufReader::new(file), roster)?;
    info!(
        "Loaded {} patrons from {}, skipped {} rows",
        summary.loaded,
        path.display(),
        summary.skipped
    );
    Ok(summary)
}

/// Loads patrons from any reader. See [`load`].
///
/// A header is recognized only on line 1, by its first field not being an
/// integer. A header-like line anywhere else is a skipped row. Blank lines are
/// ignored and not counted.
pub fn load_from_reader<R: Read>(reader: R, roster: &mut PatronRoster) -> Result<LoadSummary> {
    let mut reader = BufReader::new(reader);
    // The csv reader drops empty lines, so line 1 is only its first record when
    // the input does not open with a line break.
    let mut on_first_line = !matches!(reader.fill_buf()?.first().copied(), Some(b'\n' | b'\r'));

    let mut csv_reader = record::reader_builder().from_reader(reader);
    let mut summary = LoadSummary::default();

    for result in csv_reader.records() {
        let header_allowed = std::mem::replace(&mut on_first_line, false);
        let fields = match result {
            Ok(fields) => fields,
            Err(e) if matches!(e.kind(), ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                warn!("Line {}: {}", line, RowRejection::Encoding);
                summary.skipped += 1;
                continue;
            }
        };

        if record::is_blank(&fields) {
            continue;
        }

        let line = fields.position().map(|p| p.line()).unwrap_or_default();

        if header_allowed && record::looks_like_header(&fields) {
            debug!("Line {}: skipping header", line);
            continue;
        }

        match ingest(&fields, roster) {
            Ok(id) => {
                debug!("Line {}: loaded patron {}", line, id);
                summary.loaded += 1;
            }
            Err(reason) => {
                warn!("Line {}: skipped, {}", line, reason);
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Parses one line and adds the patron, returning its ID.
fn ingest(fields: &StringRecord, roster: &mut PatronRoster) -> std::result::Result<u32, RowRejection> {
    let patron = PatronRecord::from_fields(fields)?.parse()?;
    let id = patron.id();

    if !roster.add(patron) {
        return Err(RowRejection::DuplicateId(id));
    }
    Ok(id)
}

/// Appends one patron line to the file at `path`.
///
/// The file is created if missing. A header is written first when the file
/// is new or empty. If the last line lacks a terminator, one is written
/// before the new line so the two never share a line.
pub fn append_one(path: impl AsRef<Path>, patron: &Patron) -> Result<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| RosterError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let len = file.metadata()?.len();
    let write_header = len == 0;

    if !write_header && !ends_with_line_break(&mut file)? {
        debug!("Terminating last line of {}", path.display());
        file.write_all(record::LINE_TERMINATOR.as_bytes())?;
    }

    let mut writer = record::writer_builder().from_writer(file);
    if write_header {
        writer.write_record(HEADER)?;
    }
    writer.serialize(PatronRow::from(patron))?;
    writer.flush()?;

    debug!("Appended patron {} to {}", patron.id(), path.display());
    Ok(())
}

/// Replaces the file at `path` with a header and one line per patron, in
/// the given order.
///
/// Content goes to a sibling `.tmp` file that is synced and then renamed over
/// `path`. On failure the previous file is left as it was.
pub fn rewrite_all(path: impl AsRef<Path>, patrons: &[Patron]) -> Result<()> {
    let path = path.as_ref();
    let temp_path = temp_path_for(path);
    let file = File::create(&temp_path).map_err(|source| RosterError::Open {
        path: temp_path.clone(),
        source,
    })?;

    let result = write_and_sync(file, patrons)
        .and_then(|()| fs::rename(&temp_path, path).map_err(RosterError::from));

    if let Err(e) = result {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            warn!("Could not remove {}: {}", temp_path.display(), cleanup);
        }
        return Err(e);
    }

    debug!("Rewrote {} with {} patrons", path.display(), patrons.len());
    Ok(())
}

/// Writes the header and every patron to `writer`.
pub fn write_records<W: Write>(writer: W, patrons: &[Patron]) -> Result<()> {
    let mut csv_writer = record::writer_builder().from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for patron in patrons {
        csv_writer.serialize(PatronRow::from(patron))?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn write_and_sync(mut file: File, patrons: &[Patron]) -> Result<()> {
    write_records(&mut file, patrons)?;
    file.sync_all()?;
    Ok(())
}

fn ends_with_line_break(file: &mut File) -> Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(matches!(last[0], b'\n' | b'\r'))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
