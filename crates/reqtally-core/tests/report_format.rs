//! Report rendering: line shape, ordering, truncation, idempotency.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::Ipv4Addr;

use reqtally_core::index::CounterIndex;
use reqtally_core::report::render_report;

fn key(addr: &str) -> u32 {
    u32::from(addr.parse::<Ipv4Addr>().unwrap())
}

#[test]
fn single_client_three_requests() {
    let mut index = CounterIndex::with_node_capacity(8);
    for _ in 0..3 {
        index.find_or_increment(key("192.168.1.1")).unwrap();
    }
    let body = render_report(index.ascending(), 1024);
    assert_eq!(body, "req from: 192.168.1.1, count: 3<br/>");
}

#[test]
fn two_clients_ascending_key_order() {
    let mut index = CounterIndex::with_node_capacity(8);
    index.find_or_increment(key("10.0.0.1")).unwrap();
    index.find_or_increment(key("10.0.0.2")).unwrap();
    index.find_or_increment(key("10.0.0.1")).unwrap();

    assert!(key("10.0.0.1") < key("10.0.0.2"));
    let body = render_report(index.ascending(), 1024);
    assert_eq!(
        body,
        "req from: 10.0.0.1, count: 2<br/>req from: 10.0.0.2, count: 1<br/>"
    );
}

#[test]
fn empty_index_renders_empty_body() {
    let index = CounterIndex::with_node_capacity(8);
    assert_eq!(render_report(index.ascending(), 1024), "");
}

#[test]
fn truncation_drops_whole_lines() {
    let mut index = CounterIndex::with_node_capacity(8);
    index.find_or_increment(key("1.1.1.1")).unwrap();
    index.find_or_increment(key("2.2.2.2")).unwrap();

    let one_line = "req from: 1.1.1.1, count: 1<br/>";
    // Room for the first line plus a fragment of the second: the second
    // line must be dropped entirely, never split.
    let body = render_report(index.ascending(), one_line.len() + 5);
    assert_eq!(body, one_line);

    // Smaller than a single line: nothing is emitted.
    let body = render_report(index.ascending(), one_line.len() - 1);
    assert_eq!(body, "");
}

#[test]
fn report_length_is_used_bytes() {
    let mut index = CounterIndex::with_node_capacity(8);
    index.find_or_increment(key("8.8.8.8")).unwrap();
    let body = render_report(index.ascending(), 1024);
    assert!(body.len() < 1024, "length reflects bytes written, not cap");
    assert_eq!(body.len(), "req from: 8.8.8.8, count: 1<br/>".len());
}

#[test]
fn rerender_is_byte_identical() {
    let mut index = CounterIndex::with_node_capacity(64);
    for k in [7u32, 3, 99, 3, 7, 12] {
        index.find_or_increment(k).unwrap();
    }
    let first = render_report(index.ascending(), 1024);
    let second = render_report(index.ascending(), 1024);
    assert_eq!(first, second);
}
