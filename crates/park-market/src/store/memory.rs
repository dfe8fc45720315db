//! In-memory store.

use chrono::{DateTime, Utc};
use park_core::{Party, Spot, Zone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ParkingStore, StoreResult};
use crate::error::StoreError;
use crate::offer::Offer;
use crate::request::Request;

/// Every offer and pending request known to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketState {
    /// Offer records, matched and unmatched.
    pub offers: Vec<Offer>,
    /// Pending request queue, in insertion order.
    pub requests: Vec<Request>,
}

/// A [`ParkingStore`] kept entirely in memory.
///
/// Transactions are implemented by cloning the state on
/// [`ParkingStore::begin`] and restoring the clone on
/// [`ParkingStore::rollback`]. Writes outside a transaction apply
/// immediately.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    spots: Vec<Spot>,
    state: MarketState,
    checkpoint: Option<MarketState>,
}

impl MemoryStore {
    /// Creates an empty store with no registered spots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that knows about `spots`.
    #[must_use]
    pub fn with_spots(spots: impl IntoIterator<Item = Spot>) -> Self {
        let mut store = Self::new();
        for spot in spots {
            store.register_spot(spot);
        }
        store
    }

    /// Creates a store from previously captured state.
    #[must_use]
    pub fn from_state(spots: impl IntoIterator<Item = Spot>, state: MarketState) -> Self {
        let mut store = Self::with_spots(spots);
        store.state = state;
        store
    }

    /// Registers a spot, replacing any spot with the same identity. Needed
    /// for owner-filtered request queries.
    pub fn register_spot(&mut self, spot: Spot) {
        match self.spots.iter_mut().find(|known| known.same_spot(&spot)) {
            Some(known) => *known = spot,
            None => self.spots.push(spot),
        }
    }

    /// Registered spots.
    #[must_use]
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    /// Current state, including uncommitted changes.
    #[must_use]
    pub const fn state(&self) -> &MarketState {
        &self.state
    }

    /// Returns true while a transaction is open.
    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// Drops every offer and request, keeping registered spots.
    pub fn clear(&mut self) {
        self.state = MarketState::default();
    }

    fn zones_owned_by(&self, owner: &Party) -> Vec<Zone> {
        let mut zones = Vec::new();
        for spot in self.spots.iter().filter(|s| s.owner().same_party(owner)) {
            if !zones.contains(&spot.zone()) {
                zones.push(spot.zone());
            }
        }
        zones
    }
}

impl ParkingStore for MemoryStore {
    fn unmatched_offers_for_spot(&self, spot: &Spot) -> StoreResult<Vec<Offer>> {
        Ok(self
            .state
            .offers
            .iter()
            .filter(|offer| offer.is_for(spot) && !offer.is_matched())
            .cloned()
            .collect())
    }

    fn offers_for_spot(
        &self,
        spot: &Spot,
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Offer>> {
        let mut offers: Vec<Offer> = self
            .state
            .offers
            .iter()
            .filter(|offer| offer.is_for(spot))
            .filter(|offer| begin.is_none_or(|b| offer.period().begin() == b))
            .filter(|offer| end.is_none_or(|e| offer.period().end() == e))
            .cloned()
            .collect();
        offers.sort_by_key(|offer| offer.period().begin());
        Ok(offers)
    }

    fn pending_requests(
        &self,
        owner: Option<&Party>,
        before: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Request>> {
        let owned_zones = owner.map(|owner| self.zones_owned_by(owner));
        let mut requests: Vec<Request> = self
            .state
            .requests
            .iter()
            .filter(|request| before.is_none_or(|limit| request.period().end() < limit))
            .filter(|request| {
                owned_zones
                    .as_ref()
                    .is_none_or(|zones| zones.iter().any(|zone| request.accepts_zone(*zone)))
            })
            .cloned()
            .collect();
        requests.sort_by_key(Request::submitted_at);
        Ok(requests)
    }

    fn insert_offer(&mut self, offer: Offer) -> StoreResult<()> {
        self.state.offers.push(offer);
        Ok(())
    }

    fn delete_offer(&mut self, offer: &Offer) -> StoreResult<()> {
        let key = offer.key();
        if let Some(index) = self.state.offers.iter().position(|o| o.key() == key) {
            self.state.offers.remove(index);
        }
        Ok(())
    }

    fn insert_request(&mut self, request: Request) -> StoreResult<()> {
        self.state.requests.push(request);
        Ok(())
    }

    fn delete_request(&mut self, request: &Request) -> StoreResult<()> {
        if let Some(index) = self
            .state
            .requests
            .iter()
            .position(|r| r.same_request(request))
        {
            self.state.requests.remove(index);
        }
        Ok(())
    }

    fn matched_offers(&self) -> StoreResult<Vec<Offer>> {
        Ok(self
            .state
            .offers
            .iter()
            .filter(|offer| offer.is_matched())
            .cloned()
            .collect())
    }

    fn unmatched_offers(&self) -> StoreResult<Vec<Offer>> {
        Ok(self
            .state
            .offers
            .iter()
            .filter(|offer| !offer.is_matched())
            .cloned()
            .collect())
    }

    fn begin(&mut self) -> StoreResult<()> {
        if self.checkpoint.is_some() {
            return Err(StoreError::Transaction {
                reason: "transaction already open".into(),
            });
        }
        self.checkpoint = Some(self.state.clone());
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.checkpoint
            .take()
            .map(|_| ())
            .ok_or_else(|| StoreError::Transaction {
                reason: "commit without an open transaction".into(),
            })
    }

    fn rollback(&mut self) {
        if let Some(saved) = self.checkpoint.take() {
            debug!(
                offers = saved.offers.len(),
                requests = saved.requests.len(),
                "restoring checkpoint"
            );
            self.state = saved;
        }
    }
}
