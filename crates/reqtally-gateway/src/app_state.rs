//! Shared application state for the reqtally gateway.

use std::sync::Arc;

use reqtally_core::error::Result;
use reqtally_core::zone::{self, SharedZone, ZoneSettings};

use crate::config::TallyConfig;
use crate::obs::metrics::TallyMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: TallyConfig,
    zone: Arc<SharedZone>,
    metrics: TallyMetrics,
}

impl AppState {
    /// Build application state.
    ///
    /// Creates the shared counting zone (or attaches to it if an earlier
    /// initializer in this process already built it). A zone that cannot be
    /// initialized is a startup failure: the counting endpoint must not come
    /// up without it.
    pub fn new(cfg: TallyConfig) -> Result<Self> {
        let zone = zone::attach_or_create(&ZoneSettings {
            name: cfg.counter.zone_name.clone(),
            capacity_bytes: cfg.counter.zone_bytes,
        })?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                zone,
                metrics: TallyMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &TallyConfig {
        &self.inner.cfg
    }

    pub fn zone(&self) -> &SharedZone {
        &self.inner.zone
    }

    pub fn metrics(&self) -> &TallyMetrics {
        &self.inner.metrics
    }

    /// Extra gauge lines appended to the `/metrics` output.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("reqtally_distinct_clients", self.inner.zone.distinct_keys() as u64),
            ("reqtally_zone_capacity_bytes", self.inner.zone.capacity_bytes() as u64),
        ]
    }
}
