//! Zone lifecycle and guard serialization.
//!
//! The zone registry is process-global, so every test here uses its own zone
//! name.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use reqtally_core::zone::{attach_or_create, SharedZone, ZoneSettings};
use reqtally_core::TallyError;

fn settings(name: &str, bytes: usize) -> ZoneSettings {
    ZoneSettings {
        name: name.to_string(),
        capacity_bytes: bytes,
    }
}

#[test]
fn second_init_attaches_instead_of_recreating() {
    let first = attach_or_create(&settings("lifecycle_attach", 64 * 1024)).unwrap();
    first.find_or_increment(42).unwrap();

    // A later worker's init call must see the same zone, state intact.
    let second = attach_or_create(&settings("lifecycle_attach", 64 * 1024)).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.distinct_keys(), 1);
    assert_eq!(second.find_or_increment(42).unwrap(), 2);
}

#[test]
fn capacity_mismatch_is_an_init_error() {
    attach_or_create(&settings("lifecycle_mismatch", 64 * 1024)).unwrap();
    let err = attach_or_create(&settings("lifecycle_mismatch", 128 * 1024)).unwrap_err();
    assert!(matches!(err, TallyError::ZoneInit(_)));
}

#[test]
fn undersized_zone_fails_to_create() {
    let err = SharedZone::create(&settings("lifecycle_tiny", 1)).unwrap_err();
    assert_eq!(err.client_code().as_str(), "ZONE_INIT");
}

#[test]
fn concurrent_same_key_increments_do_not_lose_updates() {
    const THREADS: usize = 8;
    const PER_THREAD: u64 = 500;

    let zone = attach_or_create(&settings("lifecycle_samekey", 1024 * 1024)).unwrap();
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let zone = Arc::clone(&zone);
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    zone.find_or_increment(0x0a000001).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(
        zone.find_or_increment(0x0a000001).unwrap(),
        THREADS as u64 * PER_THREAD + 1
    );
}

#[test]
fn concurrent_mixed_keys_count_exactly() {
    const THREADS: u32 = 4;
    const KEYS_PER_THREAD: u32 = 50;

    let zone = attach_or_create(&settings("lifecycle_mixed", 1024 * 1024)).unwrap();
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let zone = Arc::clone(&zone);
            thread::spawn(move || {
                // Each thread hits a disjoint key range, every key twice.
                for k in 0..KEYS_PER_THREAD {
                    let key = t * KEYS_PER_THREAD + k;
                    zone.find_or_increment(key).unwrap();
                    zone.find_or_increment(key).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(zone.distinct_keys(), (THREADS * KEYS_PER_THREAD) as usize);
    let body = zone.render_report(64 * 1024);
    assert_eq!(body.matches("count: 2<br/>").count(), zone.distinct_keys());
}

#[test]
fn render_is_a_bounded_snapshot() {
    let zone = attach_or_create(&settings("lifecycle_render", 64 * 1024)).unwrap();
    zone.find_or_increment(u32::from(std::net::Ipv4Addr::new(192, 168, 1, 1))).unwrap();

    let body = zone.render_report(1024);
    assert_eq!(body, "req from: 192.168.1.1, count: 1<br/>");
    assert_eq!(zone.render_report(1024), body, "idempotent without mutation");
}
