//! Patron Roster CLI
//!
//! An interactive menu for keeping a roster of library patrons in a
//! comma-delimited text file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- PatronData.txt
//! ```
//!
//! The optional file argument is loaded before the menu starts and becomes the
//! file that adds and removals are saved to.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use patron_roster::{Console, Result};
use std::env;
use std::io;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    if let Some(path) = env::args().nth(1) {
        console.load_file(path)?;
    }

    console.run()
}
