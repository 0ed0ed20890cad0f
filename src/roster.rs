//! In-memory patron store.
//!
//! Holds patrons in insertion order and enforces ID uniqueness. Lookups are a
//! linear scan; the roster never touches the filesystem.

use crate::patron::Patron;
use log::debug;

/// The in-memory roster of patrons.
///
/// No two patrons in the roster share an ID. Listing order is insertion order.
#[derive(Debug, Default, Clone)]
pub struct PatronRoster {
    patrons: Vec<Patron>,
}

impl PatronRoster {
    /// Creates a new empty roster.
    pub fn new() -> Self {
        PatronRoster {
            patrons: Vec::new(),
        }
    }

    /// Adds a patron.
    ///
    /// Returns `false` and leaves the roster unchanged if a patron with the
    /// same ID is already present.
    pub fn add(&mut self, patron: Patron) -> bool {
        if self.is_duplicate(patron.id()) {
            debug!("Rejected duplicate patron ID {}", patron.id());
            return false;
        }

        debug!("Added patron {}", patron.id());
        self.patrons.push(patron);
        true
    }

    /// Removes the patron with the given ID and returns it.
    pub fn remove(&mut self, id: u32) -> Option<Patron> {
        let index = self.patrons.iter().position(|p| p.id() == id)?;
        debug!("Removed patron {}", id);
        Some(self.patrons.remove(index))
    }

    pub fn find(&self, id: u32) -> Option<&Patron> {
        self.patrons.iter().find(|p| p.id() == id)
    }

    /// Mutable lookup for editing name, address or fine through the
    /// validating setters. The ID itself cannot be changed.
    pub fn find_mut(&mut self, id: u32) -> Option<&mut Patron> {
        self.patrons.iter_mut().find(|p| p.id() == id)
    }

    pub fn is_duplicate(&self, id: u32) -> bool {
        self.find(id).is_some()
    }

    /// All patrons in insertion order.
    pub fn list_all(&self) -> &[Patron] {
        &self.patrons
    }

    pub fn len(&self) -> usize {
        self.patrons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patrons.is_empty()
    }
}
