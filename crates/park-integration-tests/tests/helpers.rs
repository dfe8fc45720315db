//! Shared fixtures for the integration tests.
//!
//! Hours are numbered from midnight of 2018-01-02; hour 24 is midnight of the
//! next day.

#![allow(dead_code)]

use std::fmt::Debug;
use std::sync::{Arc, Once};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use park_core::{Clock, FixedClock, Party, Period, Spot, Zone};
use park_market::{Matcher, MatcherConfig, MemoryStore, Offer, OfferOutcome, Request, RequestOutcome};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a test-friendly subscriber once per test binary. Set `RUST_LOG`
/// to see the matcher's decisions.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

pub fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 1, 2, 0, 0, 0).unwrap()
}

pub fn today(hour: i64) -> DateTime<Utc> {
    origin() + TimeDelta::hours(hour)
}

pub fn tomorrow(hour: i64) -> DateTime<Utc> {
    today(24 + hour)
}

pub fn hours(from: i64, to: i64) -> Period {
    Period::hours(origin(), from, to)
}

pub fn user_e1() -> Party {
    Party::new("e1only", "e1only@lp.pl").unwrap()
}

pub fn user_e2() -> Party {
    Party::new("e2only", "e2only@lp.pl").unwrap()
}

pub fn user_oute2() -> Party {
    Party::new("oute2", "oe2@lp.pl").unwrap()
}

pub fn user_nopark() -> Party {
    Party::new("nopark", "nopark@lp.pl").unwrap()
}

pub fn spot_e11() -> Spot {
    Spot::new(Zone::StageOne, 1, user_e1())
}

pub fn spot_e21() -> Spot {
    Spot::new(Zone::StageTwo, 1, user_e2())
}

pub fn spot_e22() -> Spot {
    Spot::new(Zone::StageTwo, 2, user_oute2())
}

pub fn spot_out1() -> Spot {
    Spot::new(Zone::Outside, 1, user_oute2())
}

pub fn all_spots() -> Vec<Spot> {
    vec![spot_e11(), spot_e21(), spot_e22(), spot_out1()]
}

/// A matcher over the four fixture spots with a manually driven clock.
pub struct Fixture {
    pub matcher: Matcher<MemoryStore>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        let clock = Arc::new(FixedClock::new(origin() - TimeDelta::days(1)));
        let matcher = Matcher::with_config(
            MemoryStore::with_spots(all_spots()),
            MatcherConfig::default(),
            clock.clone(),
        )
        .unwrap();
        Self { matcher, clock }
    }

    /// Builds a request stamped one minute after the previous one, so
    /// submission order follows call order.
    pub fn request(&self, who: Party, period: Period, zones: &str) -> Request {
        self.clock.advance(TimeDelta::minutes(1));
        Request::from_zone_list(who, period, zones, self.clock.now()).unwrap()
    }

    pub fn offer(&self, spot: Spot, period: Period) -> OfferOutcome {
        self.matcher.submit_offer(Offer::unmatched(spot, period)).unwrap()
    }

    pub fn ask(&self, request: Request) -> RequestOutcome {
        self.matcher.submit_request(request).unwrap()
    }

    pub fn unmatched(&self) -> Vec<Offer> {
        self.matcher.unmatched_offers().unwrap()
    }

    pub fn matched(&self) -> Vec<Offer> {
        self.matcher.matched_offers().unwrap()
    }

    pub fn queue(&self) -> Vec<Request> {
        self.matcher.pending_requests().unwrap()
    }
}

/// Asserts both slices hold the same elements, ignoring order.
pub fn assert_same_contents<T: PartialEq + Debug>(actual: &[T], expected: &[T]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for item in expected {
        assert!(actual.contains(item), "missing {item:?} in {actual:?}");
    }
    for item in actual {
        assert!(expected.contains(item), "unexpected {item:?}");
    }
}
