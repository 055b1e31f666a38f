//! Lightweight in-process metrics (dependency-free).
//!
//! Counters are stored as atomics behind `DashMap` label keys and rendered
//! by the `/metrics` handler in Prometheus text format.

pub mod metrics;
