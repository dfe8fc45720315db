//! Store that snapshots its state to a JSON file on every commit.

use std::path::Path;

use chrono::{DateTime, Utc};
use park_core::{Party, Spot};
use park_persist::JsonStore;
use tracing::{info, warn};

use super::memory::{MarketState, MemoryStore};
use super::{ParkingStore, StoreResult};
use crate::config::MatcherConfig;
use crate::error::MarketError;
use crate::offer::Offer;
use crate::request::Request;

/// A [`MemoryStore`] whose committed state survives restarts.
///
/// Queries are served from memory. A commit writes the full state to the
/// snapshot file before the transaction is closed; if that write fails the
/// commit reports [`crate::StoreError::Persist`] and the transaction stays
/// open so the caller can roll back. A write made outside a transaction is
/// saved at once, and is undone in memory when the save fails.
#[derive(Debug)]
pub struct JsonFileStore {
    inner: MemoryStore,
    snapshot: JsonStore,
}

impl JsonFileStore {
    /// Opens `<dir>/<name>.json`, loading its state if the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Persist`] if the file exists but cannot
    /// be read or parsed.
    pub fn open(
        dir: &Path,
        name: &str,
        spots: impl IntoIterator<Item = Spot>,
    ) -> StoreResult<Self> {
        let snapshot = JsonStore::new(dir, name);
        let state: MarketState = snapshot.try_load()?.unwrap_or_default();
        info!(
            path = %snapshot.path().display(),
            offers = state.offers.len(),
            requests = state.requests.len(),
            "opened parking snapshot"
        );
        Ok(Self {
            inner: MemoryStore::from_state(spots, state),
            snapshot,
        })
    }

    /// Opens the snapshot named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Config`] if `config` has no state directory or
    /// is invalid, and [`MarketError::Store`] if the snapshot cannot be read.
    pub fn from_config(
        config: &MatcherConfig,
        spots: impl IntoIterator<Item = Spot>,
    ) -> crate::Result<Self> {
        config.validate()?;
        let dir = config.state_dir.as_deref().ok_or_else(|| MarketError::Config {
            reason: "state_dir is required for a file-backed store".into(),
        })?;
        Ok(Self::open(dir, &config.snapshot_name, spots)?)
    }

    /// Path of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.snapshot.path()
    }

    /// Registers a spot for owner-filtered queries.
    pub fn register_spot(&mut self, spot: Spot) {
        self.inner.register_spot(spot);
    }

    /// Current in-memory state.
    #[must_use]
    pub const fn state(&self) -> &MarketState {
        self.inner.state()
    }

    fn save(&self) -> StoreResult<()> {
        self.snapshot.save(self.inner.state()).map_err(|e| {
            warn!(path = %self.snapshot.path().display(), error = %e, "snapshot write failed");
            e.into()
        })
    }

    // Writes outside a transaction are flushed immediately and undone in
    // memory if the flush fails.
    fn write_through(
        &mut self,
        write: impl FnOnce(&mut MemoryStore) -> StoreResult<()>,
    ) -> StoreResult<()> {
        if self.inner.in_transaction() {
            return write(&mut self.inner);
        }
        self.inner.begin()?;
        let result = write(&mut self.inner).and_then(|()| self.save());
        match result {
            Ok(()) => self.inner.commit(),
            Err(e) => {
                self.inner.rollback();
                Err(e)
            }
        }
    }
}

impl ParkingStore for JsonFileStore {
    fn unmatched_offers_for_spot(&self, spot: &Spot) -> StoreResult<Vec<Offer>> {
        self.inner.unmatched_offers_for_spot(spot)
    }

    fn offers_for_spot(
        &self,
        spot: &Spot,
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Offer>> {
        self.inner.offers_for_spot(spot, begin, end)
    }

    fn pending_requests(
        &self,
        owner: Option<&Party>,
        before: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Request>> {
        self.inner.pending_requests(owner, before)
    }

    fn insert_offer(&mut self, offer: Offer) -> StoreResult<()> {
        self.write_through(|inner| inner.insert_offer(offer))
    }

    fn delete_offer(&mut self, offer: &Offer) -> StoreResult<()> {
        self.write_through(|inner| inner.delete_offer(offer))
    }

    fn insert_request(&mut self, request: Request) -> StoreResult<()> {
        self.write_through(|inner| inner.insert_request(request))
    }

    fn delete_request(&mut self, request: &Request) -> StoreResult<()> {
        self.write_through(|inner| inner.delete_request(request))
    }

    fn matched_offers(&self) -> StoreResult<Vec<Offer>> {
        self.inner.matched_offers()
    }

    fn unmatched_offers(&self) -> StoreResult<Vec<Offer>> {
        self.inner.unmatched_offers()
    }

    fn begin(&mut self) -> StoreResult<()> {
        self.inner.begin()
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.save()?;
        self.inner.commit()
    }

    fn rollback(&mut self) {
        self.inner.rollback();
    }
}
