//! Shared zone lifecycle: create once, attach thereafter.
//!
//! A zone is the container every handler invocation shares: one counter
//! index (with its arena) behind one mutex. Zones are looked up by name in a
//! process-global registry. The first `attach_or_create` call for a name
//! builds the zone; later calls get the existing one back unchanged, the way
//! worker initialization re-attaches to shared memory instead of re-creating
//! it. Nothing inside a zone is ever torn down before process exit.
//!
//! Lock discipline: all index access goes through lexical `MutexGuard`
//! scopes, so the guard is released on every exit path, error returns
//! included. Acquisition blocks with no timeout; critical sections are one
//! tree descent plus at most one allocation and rebalance.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::error::{Result, TallyError};
use crate::index::CounterIndex;
use crate::report;

/// Zone identity and sizing, fixed at creation.
#[derive(Debug, Clone)]
pub struct ZoneSettings {
    pub name: String,
    pub capacity_bytes: usize,
}

/// The shared container: one guarded counter index, living for the process.
#[derive(Debug)]
pub struct SharedZone {
    name: String,
    capacity_bytes: usize,
    index: Mutex<CounterIndex>,
}

impl SharedZone {
    /// Build a fresh zone (unregistered). Fails if the byte budget cannot
    /// hold even one counter node.
    pub fn create(settings: &ZoneSettings) -> Result<Self> {
        let index = CounterIndex::with_byte_budget(settings.capacity_bytes);
        if index.node_capacity() == 0 {
            return Err(TallyError::ZoneInit(format!(
                "zone {}: {} bytes cannot hold a single counter node",
                settings.name, settings.capacity_bytes
            )));
        }
        tracing::info!(
            zone = %settings.name,
            bytes = settings.capacity_bytes,
            nodes = index.node_capacity(),
            "counting zone created"
        );
        Ok(SharedZone {
            name: settings.name.clone(),
            capacity_bytes: settings.capacity_bytes,
            index: Mutex::new(index),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    /// Distinct client keys currently tracked.
    pub fn distinct_keys(&self) -> usize {
        self.index.lock().len()
    }

    /// Serialized find-or-increment for one client key.
    ///
    /// Returns the key's count after this call. An exhausted arena surfaces
    /// as `ArenaExhausted` and leaves the index untouched.
    pub fn find_or_increment(&self, key: u32) -> Result<u64> {
        let mut index = self.index.lock();
        let count = index.find_or_increment(key)?;
        if count == 1 {
            tracing::debug!(zone = %self.name, key, "new client key tracked");
        }
        Ok(count)
    }

    /// Render the report under the guard: a strict snapshot of the index,
    /// bounded to `max_bytes`.
    pub fn render_report(&self, max_bytes: usize) -> String {
        let index = self.index.lock();
        report::render_report(index.ascending(), max_bytes)
    }
}

static REGISTRY: OnceLock<Mutex<HashMap<String, Arc<SharedZone>>>> = OnceLock::new();

/// Create the named zone on first call, attach to it on every later call.
///
/// Attaching with a different byte capacity than the zone was created with
/// is a `ZoneInit` error rather than a silent resize.
pub fn attach_or_create(settings: &ZoneSettings) -> Result<Arc<SharedZone>> {
    let registry = REGISTRY.get_or_init(|| Mutex::new(HashMap::new()));
    let mut zones = registry.lock();

    if let Some(existing) = zones.get(&settings.name) {
        if existing.capacity_bytes() != settings.capacity_bytes {
            return Err(TallyError::ZoneInit(format!(
                "zone {} already exists with {} bytes, requested {}",
                settings.name,
                existing.capacity_bytes(),
                settings.capacity_bytes
            )));
        }
        tracing::debug!(zone = %settings.name, "attached to existing counting zone");
        return Ok(Arc::clone(existing));
    }

    let zone = Arc::new(SharedZone::create(settings)?);
    zones.insert(settings.name.clone(), Arc::clone(&zone));
    Ok(zone)
}
