use serde::Deserialize;

use reqtally_core::error::{Result, TallyError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub counter: CounterSection,
}

impl TallyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TallyError::BadConfig("version must be 1".into()));
        }

        self.counter.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CounterSection {
    /// Registry name of the shared counting zone.
    #[serde(default = "default_zone_name")]
    pub zone_name: String,

    /// Byte budget for the zone's node arena.
    #[serde(default = "default_zone_bytes")]
    pub zone_bytes: usize,

    /// Cap on the rendered report body.
    #[serde(default = "default_max_report_bytes")]
    pub max_report_bytes: usize,

    /// Route the counting handler is bound to.
    #[serde(default = "default_route")]
    pub route: String,
}

impl Default for CounterSection {
    fn default() -> Self {
        Self {
            zone_name: default_zone_name(),
            zone_bytes: default_zone_bytes(),
            max_report_bytes: default_max_report_bytes(),
            route: default_route(),
        }
    }
}

impl CounterSection {
    pub fn validate(&self) -> Result<()> {
        if self.zone_name.is_empty() {
            return Err(TallyError::BadConfig("counter.zone_name must not be empty".into()));
        }
        if !(4096..=1 << 30).contains(&self.zone_bytes) {
            return Err(TallyError::BadConfig(
                "counter.zone_bytes must be between 4096 and 1073741824".into(),
            ));
        }
        if !(64..=65536).contains(&self.max_report_bytes) {
            return Err(TallyError::BadConfig(
                "counter.max_report_bytes must be between 64 and 65536".into(),
            ));
        }
        if !self.route.starts_with('/') {
            return Err(TallyError::BadConfig("counter.route must start with '/'".into()));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_zone_name() -> String {
    "req_tally".into()
}
fn default_zone_bytes() -> usize {
    1024 * 1024
}
fn default_max_report_bytes() -> usize {
    1024
}
fn default_route() -> String {
    "/count".into()
}
