use crate::catalog::SpecificationCatalog;
use crate::normalize::MergedYoga;
use crate::types::*;

/// Attaches catalog classification to merged detections.
pub struct Categorizer<'a> {
    catalog: &'a SpecificationCatalog,
}

impl Default for Categorizer<'static> {
    fn default() -> Self {
        Self::new(SpecificationCatalog::builtin())
    }
}

impl<'a> Categorizer<'a> {
    pub fn new(catalog: &'a SpecificationCatalog) -> Self {
        Self { catalog }
    }

    pub fn categorize(&self, merged: MergedYoga) -> YogaResult {
        let (category, bphs_category, bphs_section, bphs_ref) = match self.catalog.get(&merged.canonical_name) {
            Some(entry) => (
                entry.category,
                entry.bphs_category,
                entry.bphs_section.clone(),
                entry.bphs_ref.clone(),
            ),
            None => {
                log::debug!("'{}' is not in catalog {}", merged.canonical_name, self.catalog.version);
                (merged.category, BphsCategory::NonBphsPractical, String::new(), String::new())
            }
        };

        YogaResult {
            name: merged.name,
            canonical_name: merged.canonical_name,
            description: merged.description,
            strength: merged.strength,
            kind: merged.kind,
            category,
            bphs_category,
            bphs_section,
            bphs_ref,
            contributing_planets: merged.contributing_planets,
            cancelled: merged.cancelled,
            cancellation_reason: merged.cancellation_reason,
            rule_ids: merged.rule_ids,
        }
    }

    /// Categorize and order by category, then canonical name
    pub fn categorize_all(&self, merged: Vec<MergedYoga>) -> Vec<YogaResult> {
        let mut results: Vec<YogaResult> = merged.into_iter().map(|m| self.categorize(m)).collect();
        results.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.canonical_name.cmp(&b.canonical_name))
        });
        results
    }
}

pub fn categorize(merged: MergedYoga, catalog: &SpecificationCatalog) -> YogaResult {
    Categorizer::new(catalog).categorize(merged)
}
