//! Requests for a parking spot.

use std::fmt;

use chrono::{DateTime, Utc};
use park_core::{ParkError, Party, PartyKey, Period, Result, Spot, Zone};
use serde::{Deserialize, Serialize};

use crate::offer::Offer;

/// Layout used when describing request times to people.
const HUMAN_HOUR: &str = "%d.%m.%Y %H:00";

/// Identity of a [`Request`]: who, when, and where. The submission time is
/// not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    /// Requestor identity.
    pub requestor: PartyKey,
    /// Requested period.
    pub period: Period,
    /// Acceptable zones, in preference order.
    pub zones: Vec<Zone>,
}

/// A party asking for any spot in a set of zones for a period.
///
/// Pending requests are served in ascending `submitted_at` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    requestor: Party,
    period: Period,
    zones: Vec<Zone>,
    submitted_at: DateTime<Utc>,
}

impl Request {
    /// Creates a request. Duplicate zones are dropped, first occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns [`ParkError::InvalidArgument`] if no zone is given.
    pub fn new(
        requestor: Party,
        period: Period,
        zones: impl IntoIterator<Item = Zone>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self> {
        let mut unique = Vec::new();
        for zone in zones {
            if !unique.contains(&zone) {
                unique.push(zone);
            }
        }
        if unique.is_empty() {
            return Err(ParkError::invalid("request must name at least one valid zone"));
        }
        Ok(Self {
            requestor,
            period,
            zones: unique,
            submitted_at,
        })
    }

    /// Creates a request from a comma-separated list of zone ids, ignoring
    /// ids that name no zone.
    ///
    /// # Errors
    ///
    /// Returns [`ParkError::InvalidArgument`] if none of the ids is valid.
    pub fn from_zone_list(
        requestor: Party,
        period: Period,
        zone_list: &str,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self> {
        Self::new(requestor, period, Zone::filter_list(zone_list), submitted_at)
    }

    /// Creates a request from already split zone ids, ignoring ids that name
    /// no zone.
    ///
    /// # Errors
    ///
    /// Returns [`ParkError::InvalidArgument`] if none of the ids is valid.
    pub fn from_zone_names<I, S>(
        requestor: Party,
        period: Period,
        names: I,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(requestor, period, Zone::filter_names(names), submitted_at)
    }

    /// Who is asking.
    #[must_use]
    pub const fn requestor(&self) -> &Party {
        &self.requestor
    }

    /// The period a spot is needed for.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Acceptable zones.
    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// When the request entered the system.
    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Identity key.
    #[must_use]
    pub fn key(&self) -> RequestKey {
        RequestKey {
            requestor: self.requestor.key(),
            period: self.period,
            zones: self.zones.clone(),
        }
    }

    /// Returns true if both values denote the same request.
    #[must_use]
    pub fn same_request(&self, other: &Self) -> bool {
        self.requestor.same_party(&other.requestor)
            && self.period == other.period
            && self.zones == other.zones
    }

    /// Returns true if `zone` is acceptable.
    #[must_use]
    pub fn accepts_zone(&self, zone: Zone) -> bool {
        self.zones.contains(&zone)
    }

    /// Returns true if `spot` is in an acceptable zone and is free for the
    /// whole requested period during `available`.
    #[must_use]
    pub fn matches(&self, spot: &Spot, available: &Period) -> bool {
        self.accepts_zone(spot.zone()) && available.contains(&self.period)
    }

    /// Same as [`Request::matches`] for an offer.
    #[must_use]
    pub fn matches_offer(&self, offer: &Offer) -> bool {
        self.matches(offer.spot(), &offer.period())
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zones: Vec<&str> = self.zones.iter().map(Zone::id).collect();
        write!(
            f,
            "{} looks for a spot in {} from {} to {}",
            self.requestor.name(),
            zones.join(", "),
            self.period.begin().format(HUMAN_HOUR),
            self.period.end().format(HUMAN_HOUR)
        )
    }
}
