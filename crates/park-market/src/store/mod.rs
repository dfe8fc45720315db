//! Data-access contract consumed by the matcher, plus two implementations.
//!
//! The matcher reads candidates and writes results exclusively through
//! [`ParkingStore`]. Every public matcher operation brackets its calls with
//! [`ParkingStore::begin`] and either [`ParkingStore::commit`] or
//! [`ParkingStore::rollback`], so a store only has to provide
//! single-transaction isolation, not concurrency control.

mod json;
mod memory;

use chrono::{DateTime, Utc};
use park_core::{Party, Spot};

pub use json::JsonFileStore;
pub use memory::{MarketState, MemoryStore};

use crate::error::StoreError;
use crate::offer::Offer;
use crate::request::Request;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence and query operations for offers and requests.
///
/// Implement this trait to back the matcher with your own storage. Deletes
/// remove one record with the same identity key and are no-ops when nothing
/// matches.
pub trait ParkingStore: Send {
    /// Unmatched offers for the same physical spot.
    fn unmatched_offers_for_spot(&self, spot: &Spot) -> StoreResult<Vec<Offer>>;

    /// Offers (matched or not) for the same physical spot, ordered by period
    /// begin. `begin`/`end`, when given, must equal the period bounds
    /// exactly.
    fn offers_for_spot(
        &self,
        spot: &Spot,
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Offer>>;

    /// Pending requests in ascending submission order.
    ///
    /// With `owner`, only requests accepting a zone in which `owner` holds a
    /// spot are returned. With `before`, only requests whose period ends
    /// strictly before that instant are returned.
    fn pending_requests(
        &self,
        owner: Option<&Party>,
        before: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Request>>;

    /// Adds an offer record.
    fn insert_offer(&mut self, offer: Offer) -> StoreResult<()>;

    /// Removes an offer record.
    fn delete_offer(&mut self, offer: &Offer) -> StoreResult<()>;

    /// Adds a request to the pending queue.
    fn insert_request(&mut self, request: Request) -> StoreResult<()>;

    /// Removes a request from the pending queue.
    fn delete_request(&mut self, request: &Request) -> StoreResult<()>;

    /// All offers allocated to a request.
    fn matched_offers(&self) -> StoreResult<Vec<Offer>>;

    /// All offers in the free pool.
    fn unmatched_offers(&self) -> StoreResult<Vec<Offer>>;

    /// Requests currently satisfied by a matched offer.
    fn matched_requests(&self) -> StoreResult<Vec<Request>> {
        Ok(self
            .matched_offers()?
            .iter()
            .filter_map(Offer::matched_request)
            .cloned()
            .collect())
    }

    /// Opens a transaction.
    fn begin(&mut self) -> StoreResult<()>;

    /// Makes every change since [`ParkingStore::begin`] durable.
    fn commit(&mut self) -> StoreResult<()>;

    /// Discards every change since [`ParkingStore::begin`].
    fn rollback(&mut self);
}
