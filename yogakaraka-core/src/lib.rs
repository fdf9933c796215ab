// Yogakaraka Core Library
//
// Rule-based detection of classical yogas and doshas over validated natal
// chart placements: scoring, cancellation, name normalization and coverage
// reporting against a versioned specification catalog.

pub mod types;
pub mod error;
pub mod constants;
pub mod chart;
pub mod dignity;
pub mod config;
pub mod rules;
pub mod evaluator;
pub mod normalize;
pub mod catalog;
pub mod categorize;
pub mod report;
pub mod versions;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{MalformedChartError, YogaError};
pub use chart::{Chart, ChartBuilder, ChartInput, ChartOptions, PlacementInput};
pub use config::EngineConfig;
pub use catalog::{CatalogEntry, SpecificationCatalog};
pub use normalize::{merge, normalize, MergedYoga, Normalized};
pub use report::{registry_coverage, report, ReportingInconsistencyWarning, Stats};
pub use rules::{RuleEngine, RuleRegistry, YogaRule};
pub use processor::{detect_all, DetectionRun, YogaDetector};
pub use versions::RunFingerprint;
