//! Interactive menu over a roster and its backing file.
//!
//! The console owns the session state: the roster and the file most recently
//! loaded. Every mutating action updates the roster first and then mirrors the
//! change to that file, warning when only the in-memory copy changed.

use crate::error::Result;
use crate::file_sync;
use crate::fine::{self, Fine};
use crate::patron::{is_valid_patron_id, Patron};
use crate::roster::PatronRoster;
use log::warn;
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A menu-driven session reading commands from `R` and printing to `W`.
///
/// End of input ends the session the same way as choosing Exit.
pub struct Console<R, W> {
    roster: PatronRoster,
    current_file: Option<PathBuf>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console {
            roster: PatronRoster::new(),
            current_file: None,
            input,
            output,
        }
    }

    pub fn roster(&self) -> &PatronRoster {
        &self.roster
    }

    /// The file auto-saves go to, set by the last load.
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Runs the menu loop until Exit or end of input.
    ///
    /// Only failures writing to the console itself are returned; roster and
    /// file errors are reported to the user and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.display_menu()?;
            let Some(choice) =
                self.read_parsed::<i64>("Enter your choice: ", "Please enter a valid integer.")?
            else {
                writeln!(self.output)?;
                break;
            };

            match choice {
                1 => self.load_prompt()?,
                2 => self.add_patron()?,
                3 => self.remove_patron()?,
                4 => self.find_patron()?,
                5 => self.display_all()?,
                6 => {
                    writeln!(self.output, "Exiting program. Goodbye!")?;
                    break;
                }
                _ => writeln!(
                    self.output,
                    "Invalid choice. Please enter a number from 1 to 6."
                )?,
            }

            writeln!(self.output)?;
        }

        self.output.flush()?;
        Ok(())
    }

    /// Makes `path` the current file and loads it into the roster.
    ///
    /// The path becomes current even when it cannot be opened, so a later add
    /// creates it.
    pub fn load_file(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let outcome = file_sync::load(&path, &mut self.roster);
        self.current_file = Some(path);

        match outcome {
            Ok(summary) => {
                writeln!(self.output, "Loaded patrons: {}", summary.loaded)?;
                writeln!(self.output, "Skipped rows: {}", summary.skipped)?;
            }
            Err(e) => {
                warn!("Load failed: {}", e);
                writeln!(self.output, "Error loading file: {}", e)?;
            }
        }
        Ok(())
    }

    fn display_menu(&mut self) -> Result<()> {
        let current = self
            .current_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none loaded)".to_string());

        writeln!(self.output, "===== Library Management System (LMS) =====")?;
        writeln!(self.output, "Current file: {}", current)?;
        writeln!(self.output, "1. Load patrons from file")?;
        writeln!(self.output, "2. Add a patron (auto-save)")?;
        writeln!(self.output, "3. Remove a patron (auto-save)")?;
        writeln!(self.output, "4. Find a patron by ID")?;
        writeln!(self.output, "5. Display all patrons")?;
        writeln!(self.output, "6. Exit")?;
        writeln!(self.output, "==========================================")?;
        Ok(())
    }

    fn load_prompt(&mut self) -> Result<()> {
        let Some(path) = self.read_line("Enter the file name (example: PatronData.txt): ")?
        else {
            return Ok(());
        };

        if path.is_empty() {
            writeln!(self.output, "File name cannot be empty.")?;
            return Ok(());
        }
        self.load_file(path)
    }

    fn add_patron(&mut self) -> Result<()> {
        let Some(path) = self.current_file.clone() else {
            writeln!(
                self.output,
                "Please load a file first (Option 1) so the system knows where to save."
            )?;
            return Ok(());
        };

        let Some(id) = self.read_patron_id()? else {
            return Ok(());
        };
        if self.roster.is_duplicate(id) {
            writeln!(
                self.output,
                "That Patron ID already exists. Duplicate IDs are not allowed."
            )?;
            return Ok(());
        }

        let Some(name) = self.read_line("Enter patron name: ")? else {
            return Ok(());
        };
        let Some(address) = self.read_line("Enter patron address: ")? else {
            return Ok(());
        };
        let Some(fine) = self.read_fine()? else {
            return Ok(());
        };

        let patron = match Patron::new(id, &name, &address, fine) {
            Ok(patron) => patron,
            Err(e) => {
                writeln!(self.output, "Error adding patron: {}", e)?;
                return Ok(());
            }
        };

        if !self.roster.add(patron.clone()) {
            writeln!(self.output, "Patron could not be added.")?;
            return Ok(());
        }

        match file_sync::append_one(&path, &patron) {
            Ok(()) => writeln!(self.output, "Patron added and saved successfully.")?,
            Err(e) => {
                warn!("Append to {} failed: {}", path.display(), e);
                writeln!(
                    self.output,
                    "Warning: Patron added in memory but could not be saved to the file. ({})",
                    e
                )?;
            }
        }
        Ok(())
    }

    fn remove_patron(&mut self) -> Result<()> {
        let Some(path) = self.current_file.clone() else {
            writeln!(
                self.output,
                "Please load a file first (Option 1) so the system knows which file to update."
            )?;
            return Ok(());
        };

        let Some(id) = self.read_patron_id()? else {
            return Ok(());
        };
        if self.roster.remove(id).is_none() {
            writeln!(self.output, "No patron found with that ID.")?;
            return Ok(());
        }

        match file_sync::rewrite_all(&path, self.roster.list_all()) {
            Ok(()) => writeln!(self.output, "Patron removed and file updated successfully.")?,
            Err(e) => {
                warn!("Rewrite of {} failed: {}", path.display(), e);
                writeln!(
                    self.output,
                    "Warning: Patron removed in memory but file could not be updated. ({})",
                    e
                )?;
            }
        }
        Ok(())
    }

    fn find_patron(&mut self) -> Result<()> {
        let Some(id) = self.read_patron_id()? else {
            return Ok(());
        };

        match self.roster.find(id) {
            Some(patron) => writeln!(self.output, "Patron found:\n{}", patron)?,
            None => writeln!(self.output, "No patron found with that ID.")?,
        }
        Ok(())
    }

    fn display_all(&mut self) -> Result<()> {
        if self.roster.is_empty() {
            writeln!(self.output, "No patrons found.")?;
            return Ok(());
        }

        writeln!(self.output, "----- Patron List -----")?;
        for patron in self.roster.list_all() {
            writeln!(self.output, "{}", patron)?;
        }
        writeln!(self.output, "-----------------------")?;
        Ok(())
    }

    /// Prompts and returns the trimmed line, or `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompts until the line parses as `T`.
    fn read_parsed<T: FromStr>(&mut self, prompt: &str, retry: &str) -> Result<Option<T>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match line.parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "{}", retry)?,
            }
        }
    }

    fn read_patron_id(&mut self) -> Result<Option<u32>> {
        loop {
            let Some(value) =
                self.read_parsed::<i64>("Enter 7-digit Patron ID: ", "Please enter a valid integer.")?
            else {
                return Ok(None);
            };

            match u32::try_from(value) {
                Ok(id) if is_valid_patron_id(id) => return Ok(Some(id)),
                _ => writeln!(
                    self.output,
                    "Invalid ID. Patron ID must be exactly 7 digits (1000000 to 9999999)."
                )?,
            }
        }
    }

    fn read_fine(&mut self) -> Result<Option<Decimal>> {
        loop {
            let Some(line) = self.read_line("Enter overdue fine amount (0 to 250): ")? else {
                return Ok(None);
            };

            match fine::parse_amount(&line) {
                Ok(amount) if Fine::new(amount).is_ok() => return Ok(Some(amount)),
                Ok(_) => writeln!(
                    self.output,
                    "Invalid fine amount. Must be between 0 and 250."
                )?,
                Err(_) => writeln!(self.output, "Please enter a valid number.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Runs a session over `input` and returns the console output.
    fn run_session(input: &str, preload: Option<&Path>) -> (String, Vec<u32>) {
        let mut output = Vec::new();
        let ids = {
            let mut console = Console::new(input.as_bytes(), &mut output);
            if let Some(path) = preload {
                console.load_file(path).unwrap();
            }
            console.run().unwrap();
            console.roster().list_all().iter().map(Patron::id).collect()
        };
        (String::from_utf8(output).unwrap(), ids)
    }

    #[test]
    fn test_exit_immediately() {
        let (output, ids) = run_session("6\n", None);
        assert!(output.contains("Current file: (none loaded)"));
        assert!(output.contains("Exiting program. Goodbye!"));
        assert!(ids.is_empty());
    }

    #[test]
    fn test_end_of_input_exits() {
        let (output, _) = run_session("", None);
        assert!(output.contains("Enter your choice: "));
        assert!(!output.contains("Goodbye"));
    }

    #[test]
    fn test_invalid_menu_input() {
        let (output, _) = run_session("abc\n9\n6\n", None);
        assert!(output.contains("Please enter a valid integer."));
        assert!(output.contains("Invalid choice. Please enter a number from 1 to 6."));
    }

    #[test]
    fn test_add_requires_loaded_file() {
        let (output, ids) = run_session("2\n6\n", None);
        assert!(output.contains("Please load a file first (Option 1)"));
        assert!(ids.is_empty());
    }

    #[test]
    fn test_empty_file_name_refused() {
        let (output, _) = run_session("1\n\n6\n", None);
        assert!(output.contains("File name cannot be empty."));
    }

    #[test]
    fn test_load_missing_file_still_sets_current_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("PatronData.txt");
        let input = format!("1\n{}\n2\n1234567\nJane Doe\n123 Main St\n12.5\n6\n", path.display());

        let (output, ids) = run_session(&input, None);

        assert!(output.contains("Error loading file: Cannot open"));
        assert!(output.contains("Patron added and saved successfully."));
        assert_eq!(ids, vec![1234567]);
        assert_eq!(
            fs::read_to_string(&path).unwrap().lines().collect::<Vec<_>>(),
            vec!["patronId,name,address,overdueFine", "1234567,Jane Doe,123 Main St,12.50"]
        );
    }

    #[test]
    fn test_add_reprompts_until_valid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patrons.txt");
        fs::write(&path, "patronId,name,address,overdueFine\n").unwrap();

        let input = "2\nseven\n123\n1000001\nAlice\n1 Elm St\nfree\n300\n0\n6\n";
        let (output, ids) = run_session(input, Some(&path));

        assert!(output.contains("Please enter a valid integer."));
        assert!(output.contains("Invalid ID. Patron ID must be exactly 7 digits"));
        assert!(output.contains("Please enter a valid number."));
        assert!(output.contains("Invalid fine amount. Must be between 0 and 250."));
        assert_eq!(ids, vec![1000001]);
    }

    #[test]
    fn test_add_duplicate_id_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patrons.txt");
        fs::write(&path, "1000001,Alice,1 Elm St,0\n").unwrap();

        let (output, ids) = run_session("2\n1000001\n6\n", Some(&path));

        assert!(output.contains("That Patron ID already exists. Duplicate IDs are not allowed."));
        assert_eq!(ids, vec![1000001]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1000001,Alice,1 Elm St,0\n");
    }

    #[test]
    fn test_add_with_empty_name_reports_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patrons.txt");
        fs::write(&path, "").unwrap();

        let (output, ids) = run_session("2\n1000001\n   \n1 Elm St\n0\n6\n", Some(&path));

        assert!(output.contains("Error adding patron: Name cannot be empty."));
        assert!(ids.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_remove_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patrons.txt");
        fs::write(
            &path,
            "1000001,Alice,1 Elm St,0\n1000002,Bob,2 Oak St,10\n1000003,Carl,3 Ash St,2.25\n",
        )
        .unwrap();

        let (output, ids) = run_session("3\n1000002\n6\n", Some(&path));

        assert!(output.contains("Loaded patrons: 3"));
        assert!(output.contains("Patron removed and file updated successfully."));
        assert_eq!(ids, vec![1000001, 1000003]);
        assert_eq!(
            fs::read_to_string(&path).unwrap().lines().collect::<Vec<_>>(),
            vec![
                "patronId,name,address,overdueFine",
                "1000001,Alice,1 Elm St,0.00",
                "1000003,Carl,3 Ash St,2.25",
            ]
        );
    }

    #[test]
    fn test_remove_missing_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patrons.txt");
        fs::write(&path, "1000001,Alice,1 Elm St,0\n").unwrap();

        let (output, ids) = run_session("3\n1000009\n6\n", Some(&path));

        assert!(output.contains("No patron found with that ID."));
        assert_eq!(ids, vec![1000001]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1000001,Alice,1 Elm St,0\n");
    }

    #[test]
    fn test_add_warns_when_file_unwritable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("patrons.txt");

        let (output, ids) = run_session(
            &format!("1\n{}\n2\n1000001\nAlice\n1 Elm St\n0\n6\n", path.display()),
            None,
        );

        assert!(output.contains("Warning: Patron added in memory but could not be saved to the file."));
        assert_eq!(ids, vec![1000001]);
    }

    #[test]
    fn test_find_and_display() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patrons.txt");
        fs::write(&path, "1000001,Alice,1 Elm St,1.5\n").unwrap();

        let (output, _) = run_session("4\n1000001\n4\n1000002\n5\n6\n", Some(&path));

        assert!(output.contains(
            "Patron found:\nPatron ID: 1000001, Name: Alice, Address: 1 Elm St, Overdue Fine: $1.50"
        ));
        assert!(output.contains("No patron found with that ID."));
        assert!(output.contains("----- Patron List -----"));
    }

    #[test]
    fn test_load_file_sets_current_file() {
        let mut output = Vec::new();
        let mut console = Console::new("".as_bytes(), &mut output);
        assert!(console.current_file().is_none());

        console.load_file("does-not-exist.txt").unwrap();

        assert_eq!(console.current_file(), Some(Path::new("does-not-exist.txt")));
        assert!(console.roster().is_empty());
    }

    #[test]
    fn test_display_empty_roster() {
        let (output, _) = run_session("5\n6\n", None);
        assert!(output.contains("No patrons found."));
    }
}
