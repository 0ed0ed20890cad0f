//! Error types for the patron roster.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for roster and file operations
pub type Result<T> = std::result::Result<T, RosterError>;

/// A patron field that failed its constraint.
///
/// Returned by construction and by every setter; the record is never left
/// partially updated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Patron ID outside 1000000..=9999999
    #[error("Patron ID must be exactly 7 digits, got {0}")]
    InvalidId(u32),

    /// Name empty after trimming
    #[error("Name cannot be empty.")]
    EmptyName,

    /// Address empty after trimming
    #[error("Address cannot be empty.")]
    EmptyAddress,

    /// Fine parsed but outside 0..=250
    #[error("Overdue fine must be between 0 and 250, got {0}")]
    FineOutOfRange(String),

    /// Fine text is not a number
    #[error("Overdue fine is not a number: {0:?}")]
    InvalidFine(String),
}

/// Errors that can occur while loading or saving the roster.
#[derive(Error, Debug)]
pub enum RosterError {
    /// The patron file could not be opened
    #[error("Cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a line of a patron file did not become a record.
///
/// Rejections are counted as skipped rows and never abort a load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    /// Line did not split into exactly 4 fields
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    /// First field is not an integer
    #[error("patron ID is not an integer: {0:?}")]
    UnparsableId(String),

    /// Patron ID already present in the roster
    #[error("duplicate patron ID {0}")]
    DuplicateId(u32),

    /// Line is not valid UTF-8
    #[error("line is not valid UTF-8")]
    Encoding,

    /// Fields parsed but failed patron validation
    #[error("{0}")]
    Invalid(#[from] ValidationError),
}
