//! The matching engine.
//!
//! [`Matcher`] reconciles incoming offers and requests against the state held
//! by a [`ParkingStore`]:
//! - a new offer is glued with touching free capacity on the same spot, then
//!   handed to the earliest pending request it can satisfy
//! - a new request takes the shortest free offer that contains it
//! - cancelling a matched offer re-submits its request
//! - cancelling a matched request re-submits the capacity it held
//!
//! Every public operation runs under one lock inside one store transaction,
//! so callers see either all of its writes or none of them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use park_core::{floor_to_hour, Clock, Party, Period, Spot, SystemClock, Zone};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::MatcherConfig;
use crate::error::{MarketError, Result};
use crate::offer::Offer;
use crate::request::Request;
use crate::store::ParkingStore;

/// Records written by a match between one offer and one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The offer now reserved for the request.
    pub matched: Offer,
    /// Free capacity left before and after the reserved period.
    pub fragments: Vec<Offer>,
}

impl Allocation {
    /// The request that was satisfied.
    #[must_use]
    pub fn request(&self) -> Option<&Request> {
        self.matched.matched_request()
    }
}

/// Result of [`Matcher::submit_offer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferOutcome {
    /// No pending request fits; the offer, possibly glued with neighbouring
    /// free capacity, joined the pool.
    Queued {
        /// The pooled offer.
        offer: Offer,
    },
    /// The offer, possibly glued, was allocated to a pending request.
    Matched(Allocation),
    /// The offer overlaps capacity already reserved on the same spot.
    /// Nothing was changed.
    Rejected {
        /// The reserved offer it collides with.
        conflict: Offer,
    },
}

impl OfferOutcome {
    /// Returns true if the offer was refused.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Returns true if the offer was allocated immediately.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Result of [`Matcher::submit_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// No free offer fits; the request waits in the queue.
    Queued {
        /// The queued request.
        request: Request,
    },
    /// The request took a free offer.
    Matched(Allocation),
}

impl RequestOutcome {
    /// Returns true if the request was satisfied immediately.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// Result of [`Matcher::cancel_offer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferCancellation {
    /// Offer records that were deleted.
    pub removed: Vec<Offer>,
    /// What happened to requests that lost their reservation.
    pub resubmitted: Vec<RequestOutcome>,
}

impl OfferCancellation {
    /// Returns true if no record had the given spot and period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Result of [`Matcher::cancel_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestCancellation {
    /// The request was still pending and was removed from the queue.
    Dequeued,
    /// The request held reservations; they were released and their capacity
    /// re-submitted.
    Released {
        /// Outcome of re-submitting each freed offer.
        resubmitted: Vec<OfferOutcome>,
    },
    /// The request is neither pending nor matched.
    NotFound,
}

/// Matches parking offers with requests.
pub struct Matcher<S: ParkingStore> {
    store: Mutex<S>,
    clock: Arc<dyn Clock>,
    config: MatcherConfig,
}

impl<S: ParkingStore> Matcher<S> {
    /// Creates a matcher with the wall clock and default configuration.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
            clock: Arc::new(SystemClock),
            config: MatcherConfig::default(),
        }
    }

    /// Creates a matcher with an explicit configuration and clock.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if `config` is invalid.
    pub fn with_config(store: S, config: MatcherConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store: Mutex::new(store),
            clock,
            config,
        })
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Builds a request stamped with the matcher's current time.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Invalid`] if `zones` is empty.
    pub fn new_request(
        &self,
        requestor: Party,
        period: Period,
        zones: impl IntoIterator<Item = Zone>,
    ) -> Result<Request> {
        Ok(Request::new(requestor, period, zones, self.clock.now())?)
    }

    /// Offers `offer.spot()` for `offer.period()`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Invalid`] if `offer` is already matched and
    /// [`MarketError::Store`] if the store fails; the store is left
    /// unchanged in both cases.
    pub fn submit_offer(&self, offer: Offer) -> Result<OfferOutcome> {
        self.transaction("submit_offer", |store| submit_offer_in(store, offer))
    }

    /// Withdraws every offer record on `offer.spot()` with exactly
    /// `offer.period()`. Requests that held one of them are re-submitted.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn cancel_offer(&self, offer: &Offer) -> Result<OfferCancellation> {
        self.transaction("cancel_offer", |store| cancel_offer_in(store, offer))
    }

    /// Asks for a spot.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn submit_request(&self, request: Request) -> Result<RequestOutcome> {
        self.transaction("submit_request", |store| submit_request_in(store, request))
    }

    /// Withdraws a request, releasing any capacity reserved for it.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn cancel_request(&self, request: &Request) -> Result<RequestCancellation> {
        self.transaction("cancel_request", |store| cancel_request_in(store, request))
    }

    /// Pending requests `owner` could serve with one of their spots, ending
    /// before `until`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn requests_for_owner(&self, owner: &Party, until: DateTime<Utc>) -> Result<Vec<Request>> {
        Ok(self.store.lock().pending_requests(Some(owner), Some(until))?)
    }

    /// [`Matcher::requests_for_owner`] up to the configured horizon from now,
    /// truncated to the hour.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if the horizon reaches past the
    /// representable time range and [`MarketError::Store`] if the store
    /// fails.
    pub fn requests_for_owner_within_horizon(&self, owner: &Party) -> Result<Vec<Request>> {
        let horizon = self.config.owner_horizon()?;
        let until = self
            .clock
            .now()
            .checked_add_signed(horizon)
            .map(floor_to_hour)
            .ok_or_else(|| MarketError::Config {
                reason: format!(
                    "owner horizon of {} hours overflows the clock",
                    self.config.owner_horizon_hours
                ),
            })?;
        self.requests_for_owner(owner, until)
    }

    /// All free offers.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn unmatched_offers(&self) -> Result<Vec<Offer>> {
        Ok(self.store.lock().unmatched_offers()?)
    }

    /// All reserved offers.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn matched_offers(&self) -> Result<Vec<Offer>> {
        Ok(self.store.lock().matched_offers()?)
    }

    /// Requests holding a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn matched_requests(&self) -> Result<Vec<Request>> {
        Ok(self.store.lock().matched_requests()?)
    }

    /// The request queue in submission order.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn pending_requests(&self) -> Result<Vec<Request>> {
        Ok(self.store.lock().pending_requests(None, None)?)
    }

    /// Every offer on `spot`, ordered by begin.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Store`] if the store fails.
    pub fn offers_for_spot(&self, spot: &Spot) -> Result<Vec<Offer>> {
        Ok(self.store.lock().offers_for_spot(spot, None, None)?)
    }

    /// Runs `f` with shared access to the store while holding the lock.
    pub fn with_store<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.store.lock())
    }

    /// Consumes the matcher and returns its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    fn transaction<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut S) -> Result<T>,
    ) -> Result<T> {
        let mut store = self.store.lock();
        store.begin()?;
        let result = f(&mut *store).and_then(|value| {
            store.commit()?;
            Ok(value)
        });
        if let Err(e) = &result {
            store.rollback();
            warn!(operation, error = %e, "operation rolled back");
        }
        result
    }
}

impl<S: ParkingStore + std::fmt::Debug> std::fmt::Debug for Matcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn submit_offer_in<S: ParkingStore>(store: &mut S, offer: Offer) -> Result<OfferOutcome> {
    if offer.is_matched() {
        return Err(MarketError::invalid(format!(
            "cannot submit an offer that is already reserved: {offer}"
        )));
    }
    let spot = offer.spot().clone();
    let mut period = offer.period();

    let touching: Vec<Offer> = store
        .offers_for_spot(&spot, None, None)?
        .into_iter()
        .filter(|existing| existing.period().gluable(&period))
        .collect();

    if let Some(conflict) = touching
        .iter()
        .find(|existing| existing.is_matched() && existing.period().intersects(&period))
    {
        debug!(spot = %spot.key(), %period, conflict = %conflict.period(), "offer overlaps a reservation");
        return Ok(OfferOutcome::Rejected {
            conflict: conflict.clone(),
        });
    }

    for existing in touching.iter().filter(|existing| !existing.is_matched()) {
        if let Some(glued) = period.glue(&existing.period()) {
            debug!(spot = %spot.key(), %period, with = %existing.period(), %glued, "gluing offers");
            store.delete_offer(existing)?;
            period = glued;
        }
    }

    let offer = Offer::unmatched(spot, period);
    let earliest = store
        .pending_requests(None, None)?
        .into_iter()
        .filter(|request| request.matches_offer(&offer))
        .min_by_key(Request::submitted_at);

    match earliest {
        Some(request) => Ok(OfferOutcome::Matched(commit_match(store, request, &offer)?)),
        None => {
            store.insert_offer(offer.clone())?;
            info!(spot = %offer.spot().key(), period = %offer.period(), "offer queued");
            Ok(OfferOutcome::Queued { offer })
        }
    }
}

fn submit_request_in<S: ParkingStore>(store: &mut S, request: Request) -> Result<RequestOutcome> {
    let tightest = store
        .unmatched_offers()?
        .into_iter()
        .filter(|offer| request.matches_offer(offer))
        .min_by_key(|offer| offer.period().length());

    match tightest {
        Some(offer) => Ok(RequestOutcome::Matched(commit_match(store, request, &offer)?)),
        None => {
            store.insert_request(request.clone())?;
            info!(
                requestor = %request.requestor().key(),
                period = %request.period(),
                "request queued"
            );
            Ok(RequestOutcome::Queued { request })
        }
    }
}

fn cancel_offer_in<S: ParkingStore>(store: &mut S, offer: &Offer) -> Result<OfferCancellation> {
    let period = offer.period();
    let removed = store.offers_for_spot(offer.spot(), Some(period.begin()), Some(period.end()))?;
    let mut resubmitted = Vec::new();

    for record in &removed {
        store.delete_offer(record)?;
        info!(spot = %record.spot().key(), period = %record.period(), "offer withdrawn");
        if let Some(request) = record.matched_request() {
            debug!(requestor = %request.requestor().key(), "re-submitting orphaned request");
            resubmitted.push(submit_request_in(store, request.clone())?);
        }
    }

    Ok(OfferCancellation {
        removed,
        resubmitted,
    })
}

fn cancel_request_in<S: ParkingStore>(store: &mut S, request: &Request) -> Result<RequestCancellation> {
    let pending = store.pending_requests(None, None)?;
    if pending.iter().any(|queued| queued.same_request(request)) {
        store.delete_request(request)?;
        info!(requestor = %request.requestor().key(), period = %request.period(), "request withdrawn");
        return Ok(RequestCancellation::Dequeued);
    }

    let holding: Vec<Offer> = store
        .matched_offers()?
        .into_iter()
        .filter(|offer| {
            offer
                .matched_request()
                .is_some_and(|matched| matched.same_request(request))
        })
        .collect();
    if holding.is_empty() {
        debug!(requestor = %request.requestor().key(), period = %request.period(), "nothing to cancel");
        return Ok(RequestCancellation::NotFound);
    }

    let mut resubmitted = Vec::with_capacity(holding.len());
    for offer in holding {
        store.delete_offer(&offer)?;
        info!(spot = %offer.spot().key(), period = %offer.period(), "reservation released");
        let freed = Offer::unmatched(offer.spot().clone(), offer.period());
        resubmitted.push(submit_offer_in(store, freed)?);
    }
    Ok(RequestCancellation::Released { resubmitted })
}

/// Reserves the part of `offer` covering `request` and returns the leftovers
/// to the pool. The reserved period and the fragments tile `offer.period()`.
fn commit_match<S: ParkingStore>(store: &mut S, request: Request, offer: &Offer) -> Result<Allocation> {
    let available = offer.period();
    let wanted = request.period();

    store.delete_request(&request)?;
    store.delete_offer(offer)?;

    let spot = offer.spot().clone();
    let matched = Offer::matched_with(spot.clone(), request);
    store.insert_offer(matched.clone())?;

    let mut fragments = Vec::with_capacity(2);
    for piece in [available.before(&wanted), available.after(&wanted)]
        .into_iter()
        .flatten()
    {
        let fragment = Offer::unmatched(spot.clone(), piece);
        store.insert_offer(fragment.clone())?;
        fragments.push(fragment);
    }

    info!(
        spot = %spot.key(),
        offered = %available,
        reserved = %wanted,
        fragments = fragments.len(),
        "offer matched"
    );
    Ok(Allocation { matched, fragments })
}
