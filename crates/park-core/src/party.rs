//! Spot owners and requestors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParkError, Result};

/// Identity of a [`Party`]: the email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartyKey(String);

impl PartyKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user of the system, either owning spots or requesting them.
///
/// Derived equality compares every field. Two parties are the *same person*
/// when their [`Party::key`]s match, regardless of display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Party {
    name: String,
    email: String,
}

impl Party {
    /// Creates a party.
    ///
    /// # Errors
    ///
    /// Returns [`ParkError::InvalidArgument`] if `email` is blank.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(ParkError::invalid("party email must not be empty"));
        }
        Ok(Self {
            name: name.into(),
            email,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Identity key.
    #[must_use]
    pub fn key(&self) -> PartyKey {
        PartyKey(self.email.clone())
    }

    /// Returns true if both values denote the same person.
    #[must_use]
    pub fn same_party(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
