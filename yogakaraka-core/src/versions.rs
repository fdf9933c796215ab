//! Version stamps and fingerprints for stored detection results.

use crate::catalog::SpecificationCatalog;
use crate::chart::Chart;
use crate::config::EngineConfig;
use crate::error::YogaError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Bumped whenever a rule's condition or emitted name changes
pub const RULESET_VERSION: &str = "1.0.0";
pub const NORMALIZATION_VERSION: &str = "1.0.0";
pub const CATALOG_VERSION: &str = "1.0.0";
pub use crate::constants::TABLES_VERSION;

/// sha256 of any serializable value's JSON form
pub fn calculate_config_hash<T: Serialize>(value: &T) -> Result<String, YogaError> {
    let json = serde_json::to_string(value)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Identifies one detection run: the chart, the configuration, the catalog
/// and every versioned table involved. Stored results whose fingerprint no
/// longer matches predate a change and should be recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RunFingerprint {
    pub chart_hash: String,
    pub config_hash: String,
    pub catalog_hash: String,
    pub engine_version: String,
    pub ruleset_version: String,
    pub normalization_version: String,
    pub catalog_version: String,
    pub tables_version: String,
}

impl RunFingerprint {
    pub fn new(chart: &Chart, config: &EngineConfig, catalog: &SpecificationCatalog) -> Result<Self, YogaError> {
        Ok(Self {
            chart_hash: calculate_config_hash(chart)?,
            config_hash: calculate_config_hash(config)?,
            catalog_hash: catalog.fingerprint()?,
            engine_version: ENGINE_VERSION.to_string(),
            ruleset_version: RULESET_VERSION.to_string(),
            normalization_version: NORMALIZATION_VERSION.to_string(),
            catalog_version: catalog.version.clone(),
            tables_version: TABLES_VERSION.to_string(),
        })
    }

    pub fn to_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.chart_hash);
        hasher.update(&self.config_hash);
        hasher.update(&self.catalog_hash);
        hasher.update(&self.engine_version);
        hasher.update(&self.ruleset_version);
        hasher.update(&self.normalization_version);
        hasher.update(&self.catalog_version);
        hasher.update(&self.tables_version);
        format!("{:x}", hasher.finalize())
    }
}
