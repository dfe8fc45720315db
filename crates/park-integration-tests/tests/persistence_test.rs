//! Integration tests for the file-backed store.
//!
//! Tests that committed matcher state survives a restart, that failed
//! operations never reach the snapshot, and that configuration files drive
//! where snapshots live.

mod helpers;

use std::sync::Arc;

use helpers::*;
use park_core::SystemClock;
use park_market::{
    JsonFileStore, MarketError, MarketState, Matcher, MatcherConfig, Offer, ParkingStore,
    RequestCancellation,
};
use park_persist::JsonStore;
use tempfile::TempDir;

fn open(config: &MatcherConfig) -> Matcher<JsonFileStore> {
    init_tracing();
    let store = JsonFileStore::from_config(config, all_spots()).unwrap();
    Matcher::with_config(store, config.clone(), Arc::new(SystemClock)).unwrap()
}

#[test]
fn matches_survive_restart() {
    let dir = TempDir::new().unwrap();
    let config = MatcherConfig::new().with_state_dir(dir.path());
    let request = park_market::Request::from_zone_list(user_nopark(), hours(5, 9), "etap2", today(0)).unwrap();

    {
        let matcher = open(&config);
        matcher
            .submit_offer(Offer::unmatched(spot_e21(), hours(3, 12)))
            .unwrap();
        matcher.submit_request(request.clone()).unwrap();
    }

    let matcher = open(&config);
    assert_eq!(
        matcher.matched_offers().unwrap(),
        vec![Offer::matched_with(spot_e21(), request.clone())]
    );
    assert_eq!(matcher.unmatched_offers().unwrap().len(), 2);

    assert!(matches!(
        matcher.cancel_request(&request).unwrap(),
        RequestCancellation::Released { .. }
    ));
    drop(matcher);

    let matcher = open(&config);
    assert!(matcher.matched_offers().unwrap().is_empty());
    assert_eq!(
        matcher.unmatched_offers().unwrap(),
        vec![Offer::unmatched(spot_e21(), hours(3, 12))]
    );
}

#[test]
fn snapshot_is_plain_json() {
    let dir = TempDir::new().unwrap();
    let config = MatcherConfig::new()
        .with_state_dir(dir.path())
        .with_snapshot_name("garage");
    let matcher = open(&config);
    matcher
        .submit_offer(Offer::unmatched(spot_out1(), hours(1, 2)))
        .unwrap();

    let snapshot = JsonStore::new(dir.path(), "garage");
    let state: MarketState = snapshot.try_load().unwrap().unwrap();
    assert_eq!(state.offers.len(), 1);
    assert!(state.requests.is_empty());

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(snapshot.path()).unwrap()).unwrap();
    assert_eq!(raw["offers"][0]["spot"]["zone"], "outside");
    assert_eq!(raw["offers"][0]["status"]["state"], "unmatched");
}

#[test]
fn rejected_and_invalid_operations_leave_snapshot_alone() {
    let dir = TempDir::new().unwrap();
    let config = MatcherConfig::new().with_state_dir(dir.path());
    let matcher = open(&config);
    matcher
        .submit_offer(Offer::unmatched(spot_e11(), hours(5, 9)))
        .unwrap();
    let request = park_market::Request::from_zone_list(user_nopark(), hours(5, 9), "etap1", today(0)).unwrap();
    matcher.submit_request(request.clone()).unwrap();
    let before: MarketState = JsonStore::new(dir.path(), "parking").try_load().unwrap().unwrap();

    assert!(
        matcher
            .submit_offer(Offer::unmatched(spot_e11(), hours(4, 6)))
            .unwrap()
            .is_rejected()
    );
    let err = matcher
        .submit_offer(Offer::matched_with(spot_e11(), request))
        .unwrap_err();
    assert!(matches!(err, MarketError::Invalid(_)));

    let after: MarketState = JsonStore::new(dir.path(), "parking").try_load().unwrap().unwrap();
    assert_eq!(after, before);
    assert_eq!(matcher.with_store(|store| store.state().clone()), before);
}

#[test]
fn config_file_selects_snapshot_location() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("matcher.json");
    let state_dir = dir.path().join("state");
    std::fs::write(
        &config_path,
        serde_json::json!({
            "owner_horizon_hours": 48,
            "snapshot_name": "lot",
            "state_dir": state_dir,
        })
        .to_string(),
    )
    .unwrap();

    let config = MatcherConfig::from_json_file(&config_path).unwrap();
    assert_eq!(config.owner_horizon_hours, 48);

    let matcher = open(&config);
    matcher
        .submit_offer(Offer::unmatched(spot_e22(), hours(1, 2)))
        .unwrap();

    assert!(state_dir.join("lot.json").exists());
    assert_eq!(matcher.config().snapshot_name, "lot");
}

#[test]
fn unreadable_snapshot_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("parking.json"), "[1, 2").unwrap();
    let config = MatcherConfig::new().with_state_dir(dir.path());

    let err = JsonFileStore::from_config(&config, all_spots()).unwrap_err();
    assert!(matches!(err, MarketError::Store(_)));
}

#[test]
fn owner_filter_uses_registered_spots() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(dir.path(), "parking", Vec::new()).unwrap();
    let request = park_market::Request::from_zone_list(user_nopark(), hours(1, 2), "outside", today(0)).unwrap();
    store.insert_request(request.clone()).unwrap();

    assert!(store.pending_requests(Some(&user_oute2()), None).unwrap().is_empty());
    store.register_spot(spot_out1());
    assert_eq!(store.pending_requests(Some(&user_oute2()), None).unwrap(), vec![request]);
}
