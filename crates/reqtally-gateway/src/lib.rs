//! reqtally gateway library entry.
//!
//! This crate wires the config layer, shared counting zone, the counting
//! handler, and operational endpoints into one HTTP service. It is intended
//! to be consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod count;
pub mod obs;
pub mod ops;
pub mod router;
