//! Parking spots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::party::Party;
use crate::zone::Zone;

/// Identity of a [`Spot`]: zone plus place number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpotKey {
    /// Zone the spot is in.
    pub zone: Zone,
    /// Place identifier within the zone.
    pub place: String,
}

impl fmt::Display for SpotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.zone.id(), self.place)
    }
}

/// A parking spot owned by a party.
///
/// Derived equality is structural and includes the owner. Stores and the
/// matcher compare spots through [`Spot::key`], which ignores the owner, so
/// stale owner data never splits one physical spot into two.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Spot {
    zone: Zone,
    place: String,
    owner: Party,
}

impl Spot {
    /// Creates a spot.
    #[must_use]
    pub fn new(zone: Zone, place: impl ToString, owner: Party) -> Self {
        Self {
            zone,
            place: place.to_string(),
            owner,
        }
    }

    /// Creates a spot from a zone id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ParkError::InvalidArgument`] if `zone` is not a known
    /// zone id.
    pub fn parse(zone: &str, place: impl ToString, owner: Party) -> Result<Self> {
        Ok(Self::new(Zone::parse(zone)?, place, owner))
    }

    /// Zone the spot is in.
    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Place identifier within the zone.
    #[must_use]
    pub fn place(&self) -> &str {
        &self.place
    }

    /// Owner of the spot.
    #[must_use]
    pub const fn owner(&self) -> &Party {
        &self.owner
    }

    /// Identity key.
    #[must_use]
    pub fn key(&self) -> SpotKey {
        SpotKey {
            zone: self.zone,
            place: self.place.clone(),
        }
    }

    /// Returns true if both values denote the same physical spot.
    #[must_use]
    pub fn same_spot(&self, other: &Self) -> bool {
        self.zone == other.zone && self.place == other.place
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} spot {} owned by {}",
            self.zone.label(),
            self.place,
            self.owner.name()
        )
    }
}
