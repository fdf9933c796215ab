use crate::catalog::SpecificationCatalog;
use crate::categorize::Categorizer;
use crate::chart::{Chart, ChartInput};
use crate::config::EngineConfig;
use crate::error::{MalformedChartError, YogaError};
use crate::evaluator::evaluate_all;
use crate::normalize::NormalizationTable;
use crate::report::{self, Stats};
use crate::rules::{debug_pipeline_names, engine::DebugConfig, RuleEngine, RuleRegistry};
use crate::types::*;
use crate::versions::RunFingerprint;
use anyhow::Result;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::{Duration, Instant};

static DEFAULT_DETECTOR: Lazy<YogaDetector> = Lazy::new(YogaDetector::new);

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        log::debug!("{}: {:.3}ms", step_name, elapsed.as_secs_f64() * 1000.0);
        self.timings.push((step_name.to_string(), elapsed));

        result
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn into_timings(self) -> Vec<(String, Duration)> {
        self.timings
    }
}

/// Formatted per-step timing table, one line per step plus a total
pub fn summary_lines(timings: &[(String, Duration)]) -> Vec<String> {
    if timings.is_empty() {
        return Vec::new();
    }

    let total: Duration = timings.iter().map(|(_, d)| *d).sum();
    let mut lines: Vec<String> = timings
        .iter()
        .map(|(step, duration)| {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            format!(
                "{:.<35} {:.3}ms ({:.1}%)",
                step,
                duration.as_secs_f64() * 1000.0,
                percentage
            )
        })
        .collect();
    lines.push(format!("{:.<35} {:.3}ms", "Total", total.as_secs_f64() * 1000.0));
    lines
}

/// Results of one pipeline pass plus per-stage timings (empty unless profiled)
#[derive(Debug, Clone)]
pub struct DetectionRun {
    pub results: Vec<YogaResult>,
    pub raw_count: usize,
    pub rules_evaluated: usize,
    pub timings: Vec<(String, Duration)>,
}

/// Chart → rule catalog → evaluator → normalize/merge → categorize.
pub struct YogaDetector {
    config: EngineConfig,
    catalog: Cow<'static, SpecificationCatalog>,
    normalization: &'static NormalizationTable,
    rule_engine: RuleEngine,
}

impl Default for YogaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl YogaDetector {
    /// Built-in rules, catalog and default configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            catalog: Cow::Borrowed(SpecificationCatalog::builtin()),
            normalization: NormalizationTable::global(),
            rule_engine: RuleEngine::new(RuleRegistry::builtin()),
        }
    }

    /// Detector for a loaded configuration. Loads `catalog_path` when set.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => Cow::Owned(SpecificationCatalog::load_from_file(path)?),
            None => Cow::Borrowed(SpecificationCatalog::builtin()),
        };

        let mut rule_engine = RuleEngine::new(RuleRegistry::builtin());
        rule_engine.set_debug_config(DebugConfig::from_settings(&config.debug));

        Ok(Self {
            config,
            catalog,
            normalization: NormalizationTable::global(),
            rule_engine,
        })
    }

    /// Replace the registry, e.g. with a subset of rules
    pub fn with_registry(mut self, registry: Arc<RuleRegistry>) -> Self {
        let debug_config = self.rule_engine.debug_config().clone();
        self.rule_engine = RuleEngine::new(registry);
        self.rule_engine.set_debug_config(debug_config);
        self
    }

    pub fn with_catalog(mut self, catalog: SpecificationCatalog) -> Self {
        self.catalog = Cow::Owned(catalog);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SpecificationCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &RuleRegistry {
        self.rule_engine.registry()
    }

    pub fn detect_all(&self, chart: &Chart) -> Vec<YogaResult> {
        self.run(chart, false).results
    }

    /// Validate raw input and detect. Validation is the only fatal step.
    pub fn detect_input(&self, input: ChartInput) -> Result<Vec<YogaResult>, MalformedChartError> {
        let chart = Chart::new(input)?;
        Ok(self.detect_all(&chart))
    }

    pub fn run(&self, chart: &Chart, profile: bool) -> DetectionRun {
        let mut profiler = StepProfiler::new(profile);
        let debug_config = self.rule_engine.debug_config();

        let overridden;
        let chart = match self.config.engine.house_distance_mode {
            Some(mode) if mode != chart.options().house_distance_mode => {
                overridden = chart.with_house_distance_mode(mode);
                &overridden
            }
            _ => chart,
        };

        let engine_run = profiler.time_step("Rule catalog", || self.rule_engine.run(chart, &self.config));
        let raw_count = engine_run.raw.len();
        let rules_evaluated = engine_run.rules_evaluated;
        for (family, elapsed) in &engine_run.family_timings {
            log::debug!("  {family}: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
        }

        let scored = profiler.time_step("Evaluation", || evaluate_all(chart, engine_run.raw, &self.config));
        debug_pipeline_names(
            "Evaluator",
            scored.iter().filter(|s| s.evaluation.cancelled).map(|s| s.raw.name.as_str()),
            debug_config,
        );

        let merged = profiler.time_step("Normalization", || self.normalization.merge(scored));
        debug_pipeline_names(
            "Normalizer",
            merged.iter().map(|m| m.canonical_name.as_str()),
            debug_config,
        );

        let categorizer = Categorizer::new(&self.catalog);
        let mut results = profiler.time_step("Categorization", || categorizer.categorize_all(merged));
        if !self.config.engine.include_cancelled {
            results.retain(YogaResult::is_active);
        }
        debug_pipeline_names(
            "Categorizer",
            results.iter().map(|r| r.canonical_name.as_str()),
            debug_config,
        );

        log::info!(
            "Detected {} yogas from {} raw detections ({} rules evaluated)",
            results.len(),
            raw_count,
            rules_evaluated
        );

        DetectionRun {
            results,
            raw_count,
            rules_evaluated,
            timings: profiler.into_timings(),
        }
    }

    pub fn report(&self, results: &[YogaResult]) -> Stats {
        report::report(results, &self.catalog)
    }

    pub fn registry_coverage(&self) -> Stats {
        report::registry_coverage(self.registry(), &self.catalog)
    }

    pub fn fingerprint(&self, chart: &Chart) -> Result<RunFingerprint, YogaError> {
        RunFingerprint::new(chart, &self.config, &self.catalog)
    }
}

/// Run the full pipeline with built-in rules, catalog and defaults
pub fn detect_all(chart: &Chart) -> Vec<YogaResult> {
    DEFAULT_DETECTOR.detect_all(chart)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> Chart {
        Chart::builder(Sign::Capricorn)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Taurus, 2.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 12.0)
            .place(Planet::Jupiter, Sign::Pisces, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_results_sorted_by_category_then_name() {
        let results = detect_all(&chart());
        assert!(!results.is_empty());
        for pair in results.windows(2) {
            let a = (pair[0].category, &pair[0].canonical_name);
            let b = (pair[1].category, &pair[1].canonical_name);
            assert!(a < b, "{a:?} before {b:?}");
        }
    }

    #[test]
    fn test_include_cancelled_filter() {
        let mut config = EngineConfig::default();
        config.engine.include_cancelled = false;
        let detector = YogaDetector::with_config(config).unwrap();
        assert!(detector.detect_all(&chart()).iter().all(YogaResult::is_active));
    }

    #[test]
    fn test_profiled_run_records_each_stage() {
        let run = YogaDetector::new().run(&chart(), true);
        let steps: Vec<&str> = run.timings.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(steps, vec!["Rule catalog", "Evaluation", "Normalization", "Categorization"]);
        assert_eq!(summary_lines(&run.timings).len(), 5);
        assert!(run.rules_evaluated >= 150);

        assert!(YogaDetector::new().run(&chart(), false).timings.is_empty());
    }

    #[test]
    fn test_missing_catalog_file_is_an_error() {
        let config = EngineConfig {
            catalog_path: Some("/nonexistent/catalog.yaml".to_string()),
            ..EngineConfig::default()
        };
        assert!(YogaDetector::with_config(config).is_err());
    }
}
