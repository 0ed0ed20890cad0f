//! # Patron Roster
//!
//! Keeps a roster of library patrons in memory and mirrors it to a
//! comma-delimited text file.
//!
//! ## Design Principles
//!
//! - **Always-valid records**: a [`Patron`] cannot be built or edited into an
//!   invalid state; failures come back as [`ValidationError`]
//! - **Unique IDs**: [`PatronRoster`] refuses a second patron with the same ID
//! - **Forgiving loads**: malformed lines are counted and skipped, never fatal
//! - **Explicit file target**: every save takes the path it writes to
//!
//! ## Example
//!
//! ```no_run
//! use patron_roster::{file_sync, Patron, PatronRoster};
//! use rust_decimal::Decimal;
//!
//! let mut roster = PatronRoster::new();
//! let summary = file_sync::load("PatronData.txt", &mut roster).unwrap();
//! println!("loaded {}, skipped {}", summary.loaded, summary.skipped);
//!
//! let patron = Patron::new(1234567, "Jane Doe", "123 Main St", Decimal::new(1250, 2)).unwrap();
//! if roster.add(patron.clone()) {
//!     file_sync::append_one("PatronData.txt", &patron).unwrap();
//! }
//! ```

pub mod console;
pub mod error;
pub mod file_sync;
pub mod fine;
pub mod patron;
pub mod record;
pub mod roster;

pub use console::Console;
pub use error::{Result, RosterError, RowRejection, ValidationError};
pub use file_sync::LoadSummary;
pub use fine::Fine;
pub use patron::Patron;
pub use roster::PatronRoster;
