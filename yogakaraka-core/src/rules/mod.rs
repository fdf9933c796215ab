// Rule catalog - one module per family, assembled into the registry here:
// - engine.rs: YogaRule, RuleRegistry, RuleEngine and debug tracing
// - pancha_mahapurusha.rs: the five great-person yogas
// - nabhasa.rs: Ashraya, Dala, Akriti and Sankhya shapes
// - solar.rs / lunar.rs: yogas counted from the Sun and the Moon
// - raj.rs: systematic kendra-trikona combinator plus the other raj yogas
// - dhana.rs: systematic wealth combinator plus ascendant patterns
// - dosha.rs: afflictions
// - named.rs: rare leaf yogas with one reference each

pub mod dhana;
pub mod dosha;
pub mod engine;
pub mod lunar;
pub mod nabhasa;
pub mod named;
pub mod pancha_mahapurusha;
pub mod raj;
pub mod solar;

pub use engine::*;

use crate::chart::Chart;
use crate::dignity::{is_debilitated, is_dignified, is_in_kendra_or_trikona};
use crate::types::Planet;

/// Registry order: families in `RuleFamily::ALL` order, rules in declaration
/// order within each family.
pub(crate) fn builtin_rules() -> Vec<YogaRule> {
    let mut rules = Vec::new();
    rules.extend(pancha_mahapurusha::rules());
    rules.extend(nabhasa::rules());
    rules.extend(solar::rules());
    rules.extend(lunar::rules());
    rules.extend(raj::rules());
    rules.extend(dhana::rules());
    rules.extend(dosha::rules());
    rules.extend(named::rules());
    rules
}

/// One detection when the condition holds
pub(crate) fn when(condition: bool, detection: impl FnOnce() -> Detection) -> Vec<Detection> {
    if condition {
        vec![detection()]
    } else {
        Vec::new()
    }
}

/// Dignified, or in a kendra or trikona without being debilitated
pub(crate) fn is_strong(chart: &Chart, planet: Planet) -> bool {
    is_dignified(chart, planet)
        || (is_in_kendra_or_trikona(chart, planet) && !is_debilitated(chart, planet))
}

pub(crate) fn planet_list(planets: &[Planet]) -> String {
    planets
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn house_list(houses: &[u8]) -> String {
    houses
        .iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rule id fragment, e.g. `Ardha Chandra Yoga` -> `ardha_chandra`
pub(crate) fn slug(name: &str) -> String {
    name.trim_end_matches(" Yoga")
        .trim_end_matches(" Dosha")
        .to_lowercase()
        .replace(['-', ' '], "_")
}
