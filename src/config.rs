use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::utils::distance::EARTH_RADIUS_KM;

/// Environment variable holding the routing service base URL
pub const ROUTING_URL_ENV: &str = "OSRM_BASE_URL";

/// Penalty constants and tuning knobs for the plan optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Penalty per estimated kilometer (lambda2)
    pub km_penalty: f64,
    /// Per-store penalty used by the cheapest plan
    pub cheapest_store_penalty: f64,
    /// Base of the slider-driven per-store penalty: base * (0.5 + slider / 20)
    pub store_penalty_base: f64,
    pub earth_radius_km: f64,
    /// Store count from which single-store candidates are evaluated in parallel
    pub parallel_store_threshold: usize,
    pub routing: RoutingConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            km_penalty: 0.2,
            cheapest_store_penalty: 0.01,
            store_penalty_base: 2.0,
            earth_radius_km: EARTH_RADIUS_KM,
            parallel_store_threshold: 256,
            routing: RoutingConfig::default(),
        }
    }
}

/// Optional routing service used for routed distance matrices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub base_url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_ms: 2000,
        }
    }
}

impl RoutingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Fills `base_url` from the environment when the file left it unset
    pub fn apply_env(&mut self) {
        if self.base_url.is_none() {
            self.base_url = std::env::var(ROUTING_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty());
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OptimizerConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        source,
        path: path.to_path_buf(),
    })
}
