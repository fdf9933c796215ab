use crate::types::{HouseDistanceMode, RuleFamily};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_exaltation_weight() -> f64 {
    3.0
}

fn default_own_weight() -> f64 {
    2.0
}

fn default_neutral_weight() -> f64 {
    1.0
}

fn default_debilitation_weight() -> f64 {
    0.0
}

fn default_house_bonus() -> f64 {
    1.0
}

fn default_strong_threshold() -> f64 {
    3.0
}

fn default_medium_threshold() -> f64 {
    1.75
}

fn default_combustion_cancel_orb() -> f64 {
    6.0
}

/// Top-level engine configuration. Every section is optional in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub strength: StrengthConfig,
    #[serde(default)]
    pub cancellation: CancellationConfig,
    /// Which rule families run
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub debug: DebugSettings,
    /// YAML specification catalog to report against instead of the built-in one
    #[serde(default)]
    pub catalog_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Evaluate rules on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Overrides the chart's own house-distance mode when set
    #[serde(default)]
    pub house_distance_mode: Option<HouseDistanceMode>,
    /// Keep cancelled results in the returned list
    #[serde(default = "default_true")]
    pub include_cancelled: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            parallel: true,
            house_distance_mode: None,
            include_cancelled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthConfig {
    #[serde(default = "default_exaltation_weight")]
    pub exaltation_weight: f64,
    #[serde(default = "default_own_weight")]
    pub mooltrikona_weight: f64,
    #[serde(default = "default_own_weight")]
    pub own_weight: f64,
    #[serde(default = "default_neutral_weight")]
    pub neutral_weight: f64,
    #[serde(default = "default_debilitation_weight")]
    pub debilitation_weight: f64,
    /// Added per contributing planet placed in a kendra or trikona
    #[serde(default = "default_house_bonus")]
    pub kendra_trikona_bonus: f64,
    /// Mean score at or above which a result is strong
    #[serde(default = "default_strong_threshold")]
    pub strong_threshold: f64,
    /// Mean score at or above which a result is medium
    #[serde(default = "default_medium_threshold")]
    pub medium_threshold: f64,
}

impl Default for StrengthConfig {
    fn default() -> Self {
        Self {
            exaltation_weight: default_exaltation_weight(),
            mooltrikona_weight: default_own_weight(),
            own_weight: default_own_weight(),
            neutral_weight: default_neutral_weight(),
            debilitation_weight: default_debilitation_weight(),
            kendra_trikona_bonus: default_house_bonus(),
            strong_threshold: default_strong_threshold(),
            medium_threshold: default_medium_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationConfig {
    /// A combust contributor within this many degrees of the Sun cancels a yoga
    #[serde(default = "default_combustion_cancel_orb")]
    pub combustion_cancel_orb_deg: f64,
    /// Apply the debilitation check to Rahu and Ketu
    #[serde(default)]
    pub cancel_on_node_debilitation: bool,
    /// Honor cancellation reasons supplied by the rules themselves
    #[serde(default = "default_true")]
    pub honor_rule_bhanga: bool,
    /// Also accept a dispositor in a kendra from the Moon, the exaltation lord
    /// in a kendra, and vargottama as neecha bhanga. Off: only a dispositor in
    /// a kendra from the ascendant saves a debilitated contributor.
    #[serde(default)]
    pub extended_neecha_bhanga: bool,
}

impl Default for CancellationConfig {
    fn default() -> Self {
        Self {
            combustion_cancel_orb_deg: default_combustion_cancel_orb(),
            cancel_on_node_debilitation: false,
            honor_rule_bhanga: true,
            extended_neecha_bhanga: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rule families by config key. Families not listed run.
    #[serde(default)]
    pub families: Vec<FamilyConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            families: RuleFamily::ALL
                .iter()
                .map(|family| FamilyConfig {
                    name: family.key().to_string(),
                    enabled: true,
                })
                .collect(),
        }
    }
}

impl PipelineConfig {
    pub fn is_enabled(&self, family: RuleFamily) -> bool {
        self.families
            .iter()
            .find(|f| f.name == family.key())
            .map_or(true, |f| f.enabled)
    }

    pub fn disable(&mut self, family: RuleFamily) {
        match self.families.iter_mut().find(|f| f.name == family.key()) {
            Some(entry) => entry.enabled = false,
            None => self.families.push(FamilyConfig {
                name: family.key().to_string(),
                enabled: false,
            }),
        }
    }
}

/// Trace raw detections whose names match any pattern through each stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DebugSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub filter_patterns: Vec<String>,
}

impl EngineConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {path}"))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config {path}"))?;
        for warning in config.validate() {
            log::warn!("{path}: {warning}");
        }
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load config with fallback to defaults
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                log::warn!("Failed to load config from {p}, using defaults: {e:#}");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Non-fatal problems: unknown family names and inverted thresholds
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for family in &self.pipeline.families {
            if !RuleFamily::ALL.iter().any(|f| f.key() == family.name) {
                warnings.push(format!("unknown rule family '{}'", family.name));
            }
        }
        if self.strength.medium_threshold > self.strength.strong_threshold {
            warnings.push(format!(
                "medium_threshold {} exceeds strong_threshold {}",
                self.strength.medium_threshold, self.strength.strong_threshold
            ));
        }
        if self.cancellation.combustion_cancel_orb_deg < 0.0 {
            warnings.push("combustion_cancel_orb_deg is negative".to_string());
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = EngineConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.strength.strong_threshold, 3.0);
        assert_eq!(config.strength.medium_threshold, 1.75);
        assert!(config.engine.parallel);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let yaml = r#"
engine:
  parallel: false
  house_distance_mode: legacy_absolute
strength:
  strong_threshold: 3.5
pipeline:
  families:
    - name: dosha
      enabled: false
    - name: nakshatra
"#;
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.engine.parallel);
        assert_eq!(
            config.engine.house_distance_mode,
            Some(HouseDistanceMode::LegacyAbsolute)
        );
        assert_eq!(config.strength.strong_threshold, 3.5);
        assert_eq!(config.strength.exaltation_weight, 3.0);
        assert!(!config.pipeline.is_enabled(RuleFamily::Dosha));
        assert!(config.pipeline.is_enabled(RuleFamily::Named));
        assert_eq!(config.validate(), vec!["unknown rule family 'nakshatra'"]);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = EngineConfig::load_with_fallback(Some("/nonexistent/yogakaraka.yaml"));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_disable_family() {
        let mut pipeline = PipelineConfig { families: vec![] };
        assert!(pipeline.is_enabled(RuleFamily::RajSystematic));
        pipeline.disable(RuleFamily::RajSystematic);
        assert!(!pipeline.is_enabled(RuleFamily::RajSystematic));
    }
}
