//! Offer/request matching for shared parking spots.
//!
//! `park-market` pairs owners who free their spot for a while with people who
//! need one. Owners submit [`Offer`]s; everyone else submits [`Request`]s
//! naming the zones they accept. The [`Matcher`] keeps the two sides
//! reconciled through a [`ParkingStore`].
//!
//! # Features
//!
//! - **Gluing**: free offers on one spot that touch or overlap are merged
//! - **First come, first served**: a new offer goes to the earliest pending
//!   request it can hold
//! - **Best fit**: a new request takes the shortest free offer that holds it
//! - **Fragments**: capacity around a reservation goes back to the pool
//! - **Atomic operations**: a failing store leaves no partial writes
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use park_core::{Party, Period, Spot, Zone};
//! use park_market::{Matcher, MemoryStore, Offer, OfferOutcome, Request};
//!
//! let origin = Utc.with_ymd_and_hms(2018, 1, 2, 0, 0, 0).unwrap();
//! let owner = Party::new("Ann", "ann@example.org").unwrap();
//! let guest = Party::new("Bob", "bob@example.org").unwrap();
//! let spot = Spot::new(Zone::StageOne, 12, owner);
//!
//! let matcher = Matcher::new(MemoryStore::with_spots([spot.clone()]));
//!
//! let request = Request::new(guest, Period::hours(origin, 5, 11), [Zone::StageOne], origin).unwrap();
//! matcher.submit_request(request).unwrap();
//!
//! let outcome = matcher
//!     .submit_offer(Offer::unmatched(spot, Period::hours(origin, 4, 12)))
//!     .unwrap();
//!
//! let OfferOutcome::Matched(allocation) = outcome else { unreachable!() };
//! assert_eq!(allocation.fragments.len(), 2);
//! assert!(matcher.pending_requests().unwrap().is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod matcher;
pub mod offer;
pub mod request;
pub mod store;

pub use config::MatcherConfig;
pub use error::{MarketError, Result, StoreError};
pub use matcher::{
    Allocation, Matcher, OfferCancellation, OfferOutcome, RequestCancellation, RequestOutcome,
};
pub use offer::{Offer, OfferKey, OfferStatus};
pub use request::{Request, RequestKey};
pub use store::{JsonFileStore, MarketState, MemoryStore, ParkingStore, StoreResult};

/// Common imports for embedding the matcher.
pub mod prelude {
    pub use crate::{
        Matcher, MatcherConfig, MarketError, MemoryStore, Offer, OfferOutcome, ParkingStore,
        Request, RequestOutcome,
    };
    pub use park_core::{Party, Period, Spot, Zone};
}
