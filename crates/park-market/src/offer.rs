//! Offers of free parking capacity.
//!
//! An offer binds a spot to a period. It is either part of the pool of free
//! capacity ([`OfferStatus::Unmatched`]) or allocated to exactly one request
//! ([`OfferStatus::Matched`]). Offers are never edited in place: the matcher
//! replaces them with new records.

use std::fmt;

use park_core::{Period, Spot, SpotKey};
use serde::{Deserialize, Serialize};

use crate::request::{Request, RequestKey};

/// Layout used when describing offer times to people.
const HUMAN_HOUR: &str = "%d.%m.%Y %H:00";

/// Allocation state of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "request", rename_all = "snake_case")]
pub enum OfferStatus {
    /// Free capacity waiting for a request.
    Unmatched,
    /// Capacity allocated to the contained request.
    Matched(Request),
}

/// Identity of an [`Offer`] record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferKey {
    /// Spot identity.
    pub spot: SpotKey,
    /// Offered period.
    pub period: Period,
    /// Identity of the request the offer is allocated to, if any.
    pub matched: Option<RequestKey>,
}

/// A spot made available for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    spot: Spot,
    period: Period,
    status: OfferStatus,
}

impl Offer {
    /// Free capacity for `spot` during `period`.
    #[must_use]
    pub const fn unmatched(spot: Spot, period: Period) -> Self {
        Self {
            spot,
            period,
            status: OfferStatus::Unmatched,
        }
    }

    /// Capacity on `spot` allocated to `request` for exactly the requested
    /// period.
    #[must_use]
    pub fn matched_with(spot: Spot, request: Request) -> Self {
        Self {
            spot,
            period: request.period(),
            status: OfferStatus::Matched(request),
        }
    }

    /// The offered spot.
    #[must_use]
    pub const fn spot(&self) -> &Spot {
        &self.spot
    }

    /// The offered period.
    #[must_use]
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Allocation state.
    #[must_use]
    pub const fn status(&self) -> &OfferStatus {
        &self.status
    }

    /// The request this offer is allocated to.
    #[must_use]
    pub const fn matched_request(&self) -> Option<&Request> {
        match &self.status {
            OfferStatus::Matched(request) => Some(request),
            OfferStatus::Unmatched => None,
        }
    }

    /// Returns true if the offer is allocated to a request.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        matches!(self.status, OfferStatus::Matched(_))
    }

    /// Identity key.
    #[must_use]
    pub fn key(&self) -> OfferKey {
        OfferKey {
            spot: self.spot.key(),
            period: self.period,
            matched: self.matched_request().map(Request::key),
        }
    }

    /// Returns true if both values denote the same offer record.
    #[must_use]
    pub fn same_offer(&self, other: &Self) -> bool {
        self.key() == other.key()
    }

    /// Returns true if this offer is for the same physical spot as `spot`.
    #[must_use]
    pub fn is_for(&self, spot: &Spot) -> bool {
        self.spot.same_spot(spot)
    }
}

impl fmt::Display for Offer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} free from {} to {}",
            self.spot,
            self.period.begin().format(HUMAN_HOUR),
            self.period.end().format(HUMAN_HOUR)
        )?;
        if let OfferStatus::Matched(request) = &self.status {
            write!(f, ", reserved for {}", request.requestor().name())?;
        }
        Ok(())
    }
}
