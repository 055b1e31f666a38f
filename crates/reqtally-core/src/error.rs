//! Shared error type across reqtally crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Counter arena is full; new client keys can no longer be tracked.
    ArenaExhausted,
    /// Shared zone could not be created or attached.
    ZoneInit,
    /// Invalid configuration.
    BadConfig,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::ArenaExhausted => "ARENA_EXHAUSTED",
            ClientCode::ZoneInit => "ZONE_INIT",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TallyError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("counter arena exhausted ({slots} node slots in use)")]
    ArenaExhausted { slots: usize },
    #[error("zone init: {0}")]
    ZoneInit(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TallyError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TallyError::ArenaExhausted { .. } => ClientCode::ArenaExhausted,
            TallyError::ZoneInit(_) => ClientCode::ZoneInit,
            TallyError::BadConfig(_) => ClientCode::BadConfig,
            TallyError::Internal(_) => ClientCode::Internal,
        }
    }
}
