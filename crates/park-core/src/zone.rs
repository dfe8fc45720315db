//! Parking zones.
//!
//! The set of zones is closed: every spot and every request refers to one of
//! the variants below, identified on the wire by a short stable id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParkError, Result};

/// A physical area containing parking spots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    /// First construction stage of the estate.
    #[serde(rename = "etap1")]
    StageOne,
    /// Second construction stage of the estate.
    #[serde(rename = "etap2")]
    StageTwo,
    /// Street parking outside the estate.
    #[serde(rename = "outside")]
    Outside,
}

impl Zone {
    /// Every zone, in declaration order.
    pub const ALL: [Self; 3] = [Self::StageOne, Self::StageTwo, Self::Outside];

    /// Stable identifier used in storage and text input.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::StageOne => "etap1",
            Self::StageTwo => "etap2",
            Self::Outside => "outside",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StageOne => "Stage I",
            Self::StageTwo => "Stage II",
            Self::Outside => "Outside",
        }
    }

    /// Parses a zone id.
    ///
    /// # Errors
    ///
    /// Returns [`ParkError::InvalidArgument`] if `id` names no zone.
    pub fn parse(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|zone| zone.id() == id)
            .ok_or_else(|| ParkError::invalid(format!("zone '{id}' not one of the zones")))
    }

    /// Parses a comma-separated list of zone ids, silently dropping unknown
    /// names and duplicates while keeping first-seen order.
    #[must_use]
    pub fn filter_list(input: &str) -> Vec<Self> {
        Self::filter_names(input.split(','))
    }

    /// Same as [`Zone::filter_list`] for an already split list.
    #[must_use]
    pub fn filter_names<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut zones = Vec::new();
        for zone in names
            .into_iter()
            .filter_map(|name| Self::parse(name.as_ref().trim()).ok())
        {
            if !zones.contains(&zone) {
                zones.push(zone);
            }
        }
        zones
    }
}

impl FromStr for Zone {
    type Err = ParkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
