//! Property tests over random sequences of matcher operations.
//!
//! Whatever mix of offers, requests and cancellations arrives, the store must
//! stay consistent:
//! - free offers on one spot never touch each other
//! - reservations on one spot never overlap each other or free offers
//! - every reservation covers exactly its request's period in an accepted zone
//! - a request is never both pending and reserved

mod helpers;

use helpers::*;
use park_core::{Party, Period, Spot, Zone};
use park_market::{Offer, Request};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Offer { spot: usize, start: i64, len: i64 },
    Ask { zone: usize, start: i64, len: i64 },
    CancelOffer { spot: usize, start: i64, len: i64 },
    CancelRequest { index: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..4, 0i64..24, 1i64..8).prop_map(|(spot, start, len)| Op::Offer { spot, start, len }),
        3 => (0usize..3, 0i64..24, 1i64..6).prop_map(|(zone, start, len)| Op::Ask { zone, start, len }),
        1 => (0usize..4, 0i64..24, 1i64..8).prop_map(|(spot, start, len)| Op::CancelOffer { spot, start, len }),
        1 => (0usize..16).prop_map(|index| Op::CancelRequest { index }),
    ]
}

// Distinct requestors keep request identities apart.
fn guest(n: usize) -> Party {
    Party::new(format!("guest{n}"), format!("guest{n}@example.org")).unwrap()
}

fn check_consistency(f: &Fixture, spots: &[Spot]) -> Result<(), TestCaseError> {
    let free = f.unmatched();
    let reserved = f.matched();
    let queue = f.queue();

    for spot in spots {
        let key = spot.key();
        let free_here: Vec<Period> = free.iter().filter(|o| o.spot().key() == key).map(Offer::period).collect();
        let reserved_here: Vec<Period> =
            reserved.iter().filter(|o| o.spot().key() == key).map(Offer::period).collect();

        for (i, a) in free_here.iter().enumerate() {
            for b in free_here.iter().skip(i + 1) {
                prop_assert!(!a.gluable(b), "free offers {a} and {b} touch on {key}");
            }
            for r in &reserved_here {
                prop_assert!(!a.intersects(r), "free {a} overlaps reservation {r} on {key}");
            }
        }
        for (i, a) in reserved_here.iter().enumerate() {
            for b in reserved_here.iter().skip(i + 1) {
                prop_assert!(!a.intersects(b), "reservations {a} and {b} overlap on {key}");
            }
        }
    }

    for offer in &reserved {
        let request = offer.matched_request().expect("reserved offer carries its request");
        prop_assert_eq!(offer.period(), request.period());
        prop_assert!(request.accepts_zone(offer.spot().zone()));
        prop_assert!(!queue.iter().any(|queued| queued.same_request(request)));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn store_stays_consistent(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let f = Fixture::new();
        let spots = all_spots();
        let mut submitted: Vec<Request> = Vec::new();

        for op in ops {
            match op {
                Op::Offer { spot, start, len } => {
                    f.offer(spots[spot].clone(), hours(start, start + len));
                }
                Op::Ask { zone, start, len } => {
                    let zone = Zone::ALL[zone];
                    let request = f.request(guest(submitted.len()), hours(start, start + len), zone.id());
                    submitted.push(request.clone());
                    f.ask(request);
                }
                Op::CancelOffer { spot, start, len } => {
                    f.matcher
                        .cancel_offer(&Offer::unmatched(spots[spot].clone(), hours(start, start + len)))
                        .unwrap();
                }
                Op::CancelRequest { index } => {
                    if !submitted.is_empty() {
                        let request = submitted[index % submitted.len()].clone();
                        f.matcher.cancel_request(&request).unwrap();
                    }
                }
            }
            check_consistency(&f, &spots)?;
        }
    }

    #[test]
    fn every_request_is_pending_reserved_or_cancelled(
        asks in prop::collection::vec((0usize..3, 0i64..24, 1i64..6), 1..12),
        offers in prop::collection::vec((0usize..4, 0i64..24, 1i64..10), 0..12),
    ) {
        let f = Fixture::new();
        let spots = all_spots();
        let mut submitted = Vec::new();
        for (zone, start, len) in asks {
            let request = f.request(guest(submitted.len()), hours(start, start + len), Zone::ALL[zone].id());
            submitted.push(request.clone());
            f.ask(request);
        }
        for (spot, start, len) in offers {
            f.offer(spots[spot].clone(), hours(start, start + len));
        }

        let queue = f.queue();
        let held = f.matcher.matched_requests().unwrap();
        prop_assert_eq!(queue.len() + held.len(), submitted.len());
        for request in &submitted {
            let pending = queue.iter().any(|q| q.same_request(request));
            let reserved = held.iter().any(|h| h.same_request(request));
            prop_assert!(pending ^ reserved, "{request} must be in exactly one place");
        }
    }
}
