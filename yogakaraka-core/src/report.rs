use crate::catalog::SpecificationCatalog;
use crate::rules::RuleRegistry;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    /// Catalog entries of this category that were detected
    pub implemented_count: usize,
    pub total_in_spec: usize,
    /// Catalog entries of this category that were not detected, sorted
    pub missing_names: Vec<String>,
}

/// A canonical name the catalog does not list. Logged and collected,
/// never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingInconsistencyWarning {
    pub canonical_name: String,
    pub catalog_version: String,
}

impl std::fmt::Display for ReportingInconsistencyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' is not listed in specification catalog {}",
            self.canonical_name, self.catalog_version
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub catalog_version: String,
    pub catalog_fingerprint: String,
    pub total_results: usize,
    pub total_cancelled: usize,
    /// Result counts keyed by strength name
    pub strength_distribution: BTreeMap<String, usize>,
    /// One entry per category, in category order
    pub categories: Vec<CategoryStats>,
    pub unrecognized: Vec<ReportingInconsistencyWarning>,
}

impl Stats {
    pub fn category(&self, category: Category) -> Option<&CategoryStats> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn implemented_total(&self) -> usize {
        self.categories.iter().map(|c| c.implemented_count).sum()
    }

    pub fn spec_total(&self) -> usize {
        self.categories.iter().map(|c| c.total_in_spec).sum()
    }
}

/// Coverage analytics over a set of canonical names
pub struct CoverageAnalytics;

impl CoverageAnalytics {
    /// Set difference of `detected` against the catalog, per category
    pub fn compute(detected: &BTreeSet<&str>, catalog: &SpecificationCatalog) -> (Vec<CategoryStats>, Vec<ReportingInconsistencyWarning>) {
        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let mut implemented_count = 0;
                let mut total_in_spec = 0;
                let mut missing_names = Vec::new();
                for entry in catalog.in_category(category) {
                    total_in_spec += 1;
                    if detected.contains(entry.name.as_str()) {
                        implemented_count += 1;
                    } else {
                        missing_names.push(entry.name.clone());
                    }
                }
                missing_names.sort();
                CategoryStats {
                    category,
                    implemented_count,
                    total_in_spec,
                    missing_names,
                }
            })
            .collect();

        let unrecognized = detected
            .iter()
            .filter(|name| !catalog.contains(name))
            .map(|name| {
                let warning = ReportingInconsistencyWarning {
                    canonical_name: name.to_string(),
                    catalog_version: catalog.version.clone(),
                };
                log::warn!("{warning}");
                warning
            })
            .collect();

        (categories, unrecognized)
    }

    fn strength_distribution(results: &[YogaResult]) -> BTreeMap<String, usize> {
        let mut distribution = BTreeMap::new();
        for result in results {
            *distribution.entry(result.strength.to_string()).or_insert(0) += 1;
        }
        distribution
    }

    fn fingerprint(catalog: &SpecificationCatalog) -> String {
        catalog.fingerprint().unwrap_or_else(|e| {
            log::warn!("Could not fingerprint catalog {}: {e}", catalog.version);
            String::new()
        })
    }
}

/// Coverage of a run's results against the catalog
pub fn report(results: &[YogaResult], catalog: &SpecificationCatalog) -> Stats {
    let detected: BTreeSet<&str> = results.iter().map(|r| r.canonical_name.as_str()).collect();
    let (categories, unrecognized) = CoverageAnalytics::compute(&detected, catalog);

    let stats = Stats {
        catalog_version: catalog.version.clone(),
        catalog_fingerprint: CoverageAnalytics::fingerprint(catalog),
        total_results: results.len(),
        total_cancelled: results.iter().filter(|r| r.cancelled).count(),
        strength_distribution: CoverageAnalytics::strength_distribution(results),
        categories,
        unrecognized,
    };
    log::info!(
        "Report: {} results ({} cancelled), {}/{} catalog entries detected",
        stats.total_results,
        stats.total_cancelled,
        stats.implemented_total(),
        stats.spec_total()
    );
    stats
}

/// Coverage of what the registry can emit, independent of any chart
pub fn registry_coverage(registry: &RuleRegistry, catalog: &SpecificationCatalog) -> Stats {
    let names = registry.canonical_names();
    let detected: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    let (categories, unrecognized) = CoverageAnalytics::compute(&detected, catalog);

    Stats {
        catalog_version: catalog.version.clone(),
        catalog_fingerprint: CoverageAnalytics::fingerprint(catalog),
        total_results: detected.len(),
        total_cancelled: 0,
        strength_distribution: BTreeMap::new(),
        categories,
        unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn catalog() -> SpecificationCatalog {
        let entry = |name: &str, category| CatalogEntry {
            name: name.to_string(),
            category,
            kind: YogaKind::Yoga,
            bphs_category: BphsCategory::Standard,
            bphs_section: String::new(),
            bphs_ref: String::new(),
        };
        SpecificationCatalog {
            version: "test".to_string(),
            entries: vec![
                entry("Sunapha Yoga", Category::MoonBased),
                entry("Anapha Yoga", Category::MoonBased),
                entry("Durudhura Yoga", Category::MoonBased),
                entry("Ruchaka Yoga", Category::PanchaMahapurusha),
            ],
        }
    }

    fn result(name: &str, category: Category, strength: Strength, cancelled: bool) -> YogaResult {
        YogaResult {
            name: name.to_string(),
            canonical_name: name.to_string(),
            description: String::new(),
            strength,
            kind: YogaKind::Yoga,
            category,
            bphs_category: BphsCategory::Standard,
            bphs_section: String::new(),
            bphs_ref: String::new(),
            contributing_planets: vec![],
            cancelled,
            cancellation_reason: None,
            rule_ids: vec![],
        }
    }

    #[test]
    fn test_set_difference_per_category() {
        let results = vec![
            result("Sunapha Yoga", Category::MoonBased, Strength::Strong, false),
            result("Durudhura Yoga", Category::MoonBased, Strength::Weak, true),
        ];
        let stats = report(&results, &catalog());

        let moon = stats.category(Category::MoonBased).unwrap();
        assert_eq!(moon.implemented_count, 2);
        assert_eq!(moon.total_in_spec, 3);
        assert_eq!(moon.missing_names, vec!["Anapha Yoga"]);

        let pmp = stats.category(Category::PanchaMahapurusha).unwrap();
        assert_eq!(pmp.implemented_count, 0);
        assert_eq!(pmp.missing_names, vec!["Ruchaka Yoga"]);

        assert_eq!(stats.categories.len(), Category::ALL.len());
        assert_eq!(stats.total_results, 2);
        assert_eq!(stats.total_cancelled, 1);
        assert_eq!(stats.strength_distribution.get("strong"), Some(&1));
        assert!(stats.unrecognized.is_empty());
    }

    #[test]
    fn test_report_is_deterministic() {
        let results = vec![
            result("Ruchaka Yoga", Category::PanchaMahapurusha, Strength::Strong, false),
            result("Anapha Yoga", Category::MoonBased, Strength::Medium, false),
        ];
        let first = report(&results, &catalog());
        let second = report(&results, &catalog());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_unknown_names_are_warnings() {
        let results = vec![
            result("Zeta Yoga", Category::Named, Strength::Weak, false),
            result("Alpha Yoga", Category::Named, Strength::Weak, false),
            result("Zeta Yoga", Category::Named, Strength::Weak, false),
        ];
        let stats = report(&results, &catalog());
        let names: Vec<&str> = stats.unrecognized.iter().map(|w| w.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Yoga", "Zeta Yoga"]);
        assert_eq!(stats.implemented_total(), 0);
        assert_eq!(stats.spec_total(), 4);
    }

    #[test]
    fn test_registry_covers_builtin_catalog() {
        let stats = registry_coverage(&RuleRegistry::builtin(), SpecificationCatalog::builtin());
        assert!(stats.unrecognized.is_empty(), "{:?}", stats.unrecognized);
        let named = stats.category(Category::Named).unwrap();
        assert!(named.missing_names.contains(&"Bharati Yoga".to_string()));
        assert_eq!(stats.category(Category::RajYoga).unwrap().missing_names, Vec::<String>::new());
    }
}
