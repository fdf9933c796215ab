use crate::chart::Chart;
use crate::config::{DebugSettings, EngineConfig};
use crate::error::YogaError;
use crate::types::*;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Debug configuration for pipeline tracing
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub filter_patterns: Vec<String>,
}

impl DebugConfig {
    pub fn new(enabled: bool, filter_patterns: Vec<String>) -> Self {
        Self {
            enabled,
            filter_patterns,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            filter_patterns: Vec::new(),
        }
    }

    pub fn from_settings(settings: &DebugSettings) -> Self {
        Self::new(settings.enabled, settings.filter_patterns.clone())
    }

    fn matches(&self, name: &str) -> bool {
        self.filter_patterns.iter().any(|pattern| {
            // Try regex first, fall back to simple string contains
            match Regex::new(pattern) {
                Ok(regex) => regex.is_match(name),
                Err(_) => name.contains(pattern.as_str()),
            }
        })
    }
}

/// Trace names matching the debug filters at one pipeline stage
pub fn debug_pipeline_names<'a>(
    stage: &str,
    names: impl IntoIterator<Item = &'a str>,
    debug_config: &DebugConfig,
) {
    if !debug_config.enabled || debug_config.filter_patterns.is_empty() {
        return;
    }

    let matching: Vec<&str> = names
        .into_iter()
        .filter(|name| debug_config.matches(name))
        .collect();

    if !matching.is_empty() {
        log::debug!("[{}] {} matching: {}", stage, matching.len(), matching.join(", "));
    }
}

// ===== RULE DEFINITION =====

/// What a detector reports for one match. The engine attaches rule metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Variant spelling; None means the rule's canonical name
    pub name: Option<String>,
    pub description: String,
    pub planets: Vec<Planet>,
    pub bhanga: Option<String>,
}

impl Detection {
    pub fn new(description: impl Into<String>, planets: impl IntoIterator<Item = Planet>) -> Self {
        Self {
            name: None,
            description: description.into(),
            planets: planets.into_iter().collect(),
            bhanga: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_bhanga(mut self, reason: Option<String>) -> Self {
        self.bhanga = reason;
        self
    }
}

pub type Detector = Box<dyn Fn(&Chart) -> Vec<Detection> + Send + Sync>;

/// A registered detector. Rules are pure: they read only the chart and the
/// static tables, and never see another rule's output.
pub struct YogaRule {
    pub id: String,
    pub canonical_name: String,
    pub family: RuleFamily,
    pub kind: YogaKind,
    pub default_category: Category,
    /// Scriptural or traditional source
    pub reference: String,
    detector: Detector,
}

impl YogaRule {
    pub fn new(
        id: impl Into<String>,
        canonical_name: impl Into<String>,
        family: RuleFamily,
        detector: impl Fn(&Chart) -> Vec<Detection> + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            canonical_name: canonical_name.into(),
            family,
            kind: YogaKind::Yoga,
            default_category: family.default_category(),
            reference: String::new(),
            detector: Box::new(detector),
        }
    }

    pub fn dosha(mut self) -> Self {
        self.kind = YogaKind::Dosha;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.default_category = category;
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    pub fn detect(&self, chart: &Chart) -> Vec<RawYoga> {
        (self.detector)(chart)
            .into_iter()
            .map(|d| RawYoga {
                rule_id: self.id.clone(),
                name: d.name.unwrap_or_else(|| self.canonical_name.clone()),
                kind: self.kind,
                family: self.family,
                default_category: self.default_category,
                description: d.description,
                contributing_planets: d.planets,
                bhanga: d.bhanga,
            })
            .collect()
    }
}

impl fmt::Debug for YogaRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YogaRule")
            .field("id", &self.id)
            .field("canonical_name", &self.canonical_name)
            .field("family", &self.family)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

// ===== REGISTRY =====

static BUILTIN_REGISTRY: Lazy<Arc<RuleRegistry>> =
    Lazy::new(|| Arc::new(RuleRegistry::new(super::builtin_rules())));

/// Immutable, ordered set of rules. Registry order is the merge order.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<YogaRule>,
}

impl RuleRegistry {
    pub fn new(rules: Vec<YogaRule>) -> Self {
        Self { rules }
    }

    /// The process-wide catalog of built-in rules, constructed on first use
    pub fn builtin() -> Arc<RuleRegistry> {
        Arc::clone(&BUILTIN_REGISTRY)
    }

    pub fn rules(&self) -> &[YogaRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&YogaRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    pub fn by_family(&self, family: RuleFamily) -> impl Iterator<Item = &YogaRule> {
        self.rules.iter().filter(move |rule| rule.family == family)
    }

    /// Distinct canonical names the registry can emit, sorted
    pub fn canonical_names(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|rule| rule.canonical_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rule ids must be unique
    pub fn validate(&self) -> Result<(), YogaError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(YogaError::DuplicateRuleId(rule.id.clone()));
            }
        }
        Ok(())
    }
}

// ===== ENGINE =====

/// Output of one pass over the registry, in registry order
#[derive(Debug, Clone)]
pub struct EngineRun {
    pub raw: Vec<RawYoga>,
    pub rules_evaluated: usize,
    pub family_timings: Vec<(RuleFamily, Duration)>,
}

pub struct RuleEngine {
    registry: Arc<RuleRegistry>,
    debug_config: DebugConfig,
}

impl RuleEngine {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            debug_config: DebugConfig::disabled(),
        }
    }

    pub fn set_debug_config(&mut self, debug_config: DebugConfig) {
        self.debug_config = debug_config;
    }

    pub fn debug_config(&self) -> &DebugConfig {
        &self.debug_config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Evaluate every enabled rule against the chart. Parallel and sequential
    /// runs return identical output: results are collected per rule and then
    /// concatenated in registry order.
    pub fn run(&self, chart: &Chart, config: &EngineConfig) -> EngineRun {
        for family in RuleFamily::ALL {
            if !config.pipeline.is_enabled(family) {
                log::debug!("Skipping disabled family: {family}");
            }
        }

        let active: Vec<&YogaRule> = self
            .registry
            .rules()
            .iter()
            .filter(|rule| config.pipeline.is_enabled(rule.family))
            .collect();

        let evaluate = |rule: &&YogaRule| {
            let start = Instant::now();
            let raw = rule.detect(chart);
            (rule.family, raw, start.elapsed())
        };

        let outputs: Vec<(RuleFamily, Vec<RawYoga>, Duration)> = if config.engine.parallel {
            active.par_iter().map(evaluate).collect()
        } else {
            active.iter().map(evaluate).collect()
        };

        let mut family_timings: Vec<(RuleFamily, Duration)> = Vec::new();
        let mut raw = Vec::new();
        for (family, detections, elapsed) in outputs {
            match family_timings.iter_mut().find(|(f, _)| *f == family) {
                Some((_, total)) => *total += elapsed,
                None => family_timings.push((family, elapsed)),
            }
            raw.extend(detections);
        }

        debug_pipeline_names(
            "RuleCatalog",
            raw.iter().map(|r| r.name.as_str()),
            &self.debug_config,
        );
        log::debug!(
            "{} rules evaluated, {} raw detections",
            active.len(),
            raw.len()
        );

        EngineRun {
            raw,
            rules_evaluated: active.len(),
            family_timings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chart() -> Chart {
        Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Sagittarius, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap()
    }

    fn toy_registry() -> RuleRegistry {
        RuleRegistry::new(vec![
            YogaRule::new("toy.always", "Always Yoga", RuleFamily::Named, |_| {
                vec![Detection::new("always fires", [Planet::Sun])]
            }),
            YogaRule::new("toy.never", "Never Yoga", RuleFamily::Named, |_| Vec::new()),
            YogaRule::new("toy.variant", "Variant Dosha", RuleFamily::Dosha, |_| {
                vec![Detection::new("spelled differently", [Planet::Mars]).named("Varient Dosh")]
            })
            .dosha(),
        ])
    }

    #[test]
    fn test_rule_metadata_attached() {
        let engine = RuleEngine::new(Arc::new(toy_registry()));
        let run = engine.run(&sample_chart(), &EngineConfig::default());
        assert_eq!(run.rules_evaluated, 3);
        assert_eq!(run.raw.len(), 2);
        assert_eq!(run.raw[0].name, "Always Yoga");
        assert_eq!(run.raw[1].name, "Varient Dosh");
        assert_eq!(run.raw[1].kind, YogaKind::Dosha);
        assert_eq!(run.raw[1].default_category, Category::Dosha);
    }

    #[test]
    fn test_disabled_family_is_skipped() {
        let engine = RuleEngine::new(Arc::new(toy_registry()));
        let mut config = EngineConfig::default();
        config.pipeline.disable(RuleFamily::Dosha);
        let run = engine.run(&sample_chart(), &config);
        assert_eq!(run.rules_evaluated, 2);
        assert!(run.raw.iter().all(|r| r.family == RuleFamily::Named));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let engine = RuleEngine::new(RuleRegistry::builtin());
        let chart = sample_chart();
        let mut sequential = EngineConfig::default();
        sequential.engine.parallel = false;
        let a = engine.run(&chart, &EngineConfig::default());
        let b = engine.run(&chart, &sequential);
        assert_eq!(a.raw, b.raw);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let registry = RuleRegistry::new(vec![
            YogaRule::new("dup", "A Yoga", RuleFamily::Named, |_| Vec::new()),
            YogaRule::new("dup", "B Yoga", RuleFamily::Named, |_| Vec::new()),
        ]);
        assert!(matches!(
            registry.validate(),
            Err(YogaError::DuplicateRuleId(id)) if id == "dup"
        ));
    }

    #[test]
    fn test_builtin_registry_is_well_formed() {
        let registry = RuleRegistry::builtin();
        registry.validate().unwrap();
        assert!(registry.len() >= 150, "only {} rules", registry.len());
        assert_eq!(registry.by_family(RuleFamily::RajSystematic).count(), 40);
        assert_eq!(registry.by_family(RuleFamily::PanchaMahapurusha).count(), 5);
    }
}
