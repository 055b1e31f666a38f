//! reqtally core: the shared request counter.
//!
//! This crate holds everything that lives inside the shared counting zone:
//! the slab arena backing node storage, the ordered counter index (an
//! insertion-only red-black tree keyed by client address), the bounded text
//! report, and the zone lifecycle (create once, attach thereafter). It
//! carries no HTTP or runtime dependencies so the gateway and tests can use
//! it directly.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `TallyError`/`Result` so a full arena
//! or a bad zone definition never crashes the serving process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod arena;
pub mod error;
pub mod index;
pub mod report;
pub mod zone;

/// Shared result type.
pub use error::{Result, TallyError};
