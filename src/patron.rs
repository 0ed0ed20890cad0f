//! Library patron model and field validation.
//!
//! A [`Patron`] can only exist in a valid state: construction and every setter
//! check their input and leave the record untouched on failure.

use crate::error::ValidationError;
use crate::fine::Fine;
use rust_decimal::Decimal;
use std::fmt;

/// Smallest 7-digit patron ID.
pub const MIN_PATRON_ID: u32 = 1_000_000;

/// Largest 7-digit patron ID.
pub const MAX_PATRON_ID: u32 = 9_999_999;

/// Returns `true` if `id` has exactly 7 digits.
pub fn is_valid_patron_id(id: u32) -> bool {
    (MIN_PATRON_ID..=MAX_PATRON_ID).contains(&id)
}

/// A library patron.
///
/// # Invariants
///
/// - `id` is in `1000000..=9999999` and never changes
/// - `name` and `address` are trimmed and non-empty
/// - `fine` is in `0..=250`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patron {
    id: u32,
    name: String,
    address: String,
    fine: Fine,
}

impl Patron {
    /// Creates a validated patron. Name and address are stored trimmed.
    pub fn new(
        id: u32,
        name: &str,
        address: &str,
        fine: Decimal,
    ) -> Result<Self, ValidationError> {
        if !is_valid_patron_id(id) {
            return Err(ValidationError::InvalidId(id));
        }

        Ok(Patron {
            id,
            name: non_empty(name, ValidationError::EmptyName)?,
            address: non_empty(address, ValidationError::EmptyAddress)?,
            fine: Fine::new(fine)?,
        })
    }

    /// Unique patron ID. There is no setter.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn fine(&self) -> Fine {
        self.fine
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = non_empty(name, ValidationError::EmptyName)?;
        Ok(())
    }

    pub fn set_address(&mut self, address: &str) -> Result<(), ValidationError> {
        self.address = non_empty(address, ValidationError::EmptyAddress)?;
        Ok(())
    }

    pub fn set_fine(&mut self, fine: Decimal) -> Result<(), ValidationError> {
        self.fine = Fine::new(fine)?;
        Ok(())
    }
}

fn non_empty(value: &str, err: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

impl fmt::Display for Patron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Patron ID: {}, Name: {}, Address: {}, Overdue Fine: ${}",
            self.id, self.name, self.address, self.fine
        )
    }
}
