//! Strength scoring and cancellation for raw detections.

use crate::chart::Chart;
use crate::config::{CancellationConfig, EngineConfig, StrengthConfig};
use crate::dignity::{dignity_of, is_in_kendra_or_trikona, neecha_bhanga_with, separation_from_sun};
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub strength: Strength,
    /// Mean per-planet score the strength was read from
    pub score: f64,
    pub cancelled: bool,
    pub reason: Option<String>,
}

/// A raw detection with its evaluation attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredYoga {
    pub raw: RawYoga,
    pub evaluation: Evaluation,
}

pub fn evaluate(chart: &Chart, raw: &RawYoga, config: &EngineConfig) -> Evaluation {
    let score = score(chart, &raw.contributing_planets, &config.strength);
    let strength = if raw.contributing_planets.is_empty() {
        Strength::Weak
    } else {
        strength_for(score, &config.strength)
    };

    let mut reasons = Vec::new();
    if raw.kind == YogaKind::Yoga {
        reasons.extend(planet_cancellations(chart, &raw.contributing_planets, &config.cancellation));
    }
    if config.cancellation.honor_rule_bhanga {
        reasons.extend(raw.bhanga.clone());
    }

    let cancelled = !reasons.is_empty();
    Evaluation {
        strength,
        score,
        cancelled,
        reason: cancelled.then(|| reasons.join("; ")),
    }
}

pub fn evaluate_all(chart: &Chart, raw: Vec<RawYoga>, config: &EngineConfig) -> Vec<ScoredYoga> {
    raw.into_iter()
        .map(|raw| {
            let evaluation = evaluate(chart, &raw, config);
            ScoredYoga { raw, evaluation }
        })
        .collect()
}

/// Mean of dignity weight plus house bonus over the contributing planets
fn score(chart: &Chart, planets: &[Planet], weights: &StrengthConfig) -> f64 {
    if planets.is_empty() {
        return 0.0;
    }
    let total: f64 = planets
        .iter()
        .map(|&p| {
            let dignity = match dignity_of(chart, p).dignity {
                Dignity::Exaltation => weights.exaltation_weight,
                Dignity::Mooltrikona => weights.mooltrikona_weight,
                Dignity::Own => weights.own_weight,
                Dignity::Neutral => weights.neutral_weight,
                Dignity::Debilitation => weights.debilitation_weight,
            };
            let bonus = if is_in_kendra_or_trikona(chart, p) {
                weights.kendra_trikona_bonus
            } else {
                0.0
            };
            dignity + bonus
        })
        .sum();
    total / planets.len() as f64
}

fn strength_for(score: f64, thresholds: &StrengthConfig) -> Strength {
    if score >= thresholds.strong_threshold {
        Strength::Strong
    } else if score >= thresholds.medium_threshold {
        Strength::Medium
    } else {
        Strength::Weak
    }
}

/// Debilitation without neecha bhanga, or combustion inside the orb
fn planet_cancellations(chart: &Chart, planets: &[Planet], config: &CancellationConfig) -> Vec<String> {
    let mut reasons = Vec::new();
    for &planet in planets {
        let placement = chart.placement(planet);

        if (!planet.is_node() || config.cancel_on_node_debilitation)
            && dignity_of(chart, planet).dignity == Dignity::Debilitation
            && neecha_bhanga_with(chart, planet, config.extended_neecha_bhanga).is_none()
        {
            reasons.push(format!(
                "{planet} is debilitated in {} without cancellation",
                placement.sign
            ));
        }

        if placement.combust && planet != Planet::Sun && !planet.is_node() {
            let separation = separation_from_sun(chart, planet);
            if separation <= config.combustion_cancel_orb_deg {
                reasons.push(format!("{planet} is combust, {separation:.1}° from the Sun"));
            }
        }
    }
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartBuilder;

    fn base() -> ChartBuilder {
        Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Pisces, 2.0)
            .place(Planet::Moon, Sign::Taurus, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Pisces, 28.0)
            .place(Planet::Jupiter, Sign::Gemini, 5.0)
            .place(Planet::Venus, Sign::Aquarius, 20.0)
            .place(Planet::Saturn, Sign::Scorpio, 25.0)
            .nodes(Sign::Cancer, 12.0)
    }

    fn raw(kind: YogaKind, planets: Vec<Planet>, bhanga: Option<&str>) -> RawYoga {
        RawYoga {
            rule_id: "test.rule".to_string(),
            name: "Test Yoga".to_string(),
            kind,
            family: RuleFamily::Named,
            default_category: Category::Named,
            description: String::new(),
            contributing_planets: planets,
            bhanga: bhanga.map(str::to_string),
        }
    }

    #[test]
    fn test_exalted_angular_planet_is_strong() {
        let chart = base().build().unwrap();
        let eval = evaluate(&chart, &raw(YogaKind::Yoga, vec![Planet::Mars], None), &EngineConfig::default());
        assert_eq!(eval.score, 4.0);
        assert_eq!(eval.strength, Strength::Strong);
        assert!(!eval.cancelled);
    }

    #[test]
    fn test_no_planets_is_weak() {
        let chart = base().build().unwrap();
        let eval = evaluate(&chart, &raw(YogaKind::Yoga, vec![], None), &EngineConfig::default());
        assert_eq!(eval.strength, Strength::Weak);
    }

    #[test]
    fn test_debilitated_without_bhanga_cancels() {
        let chart = base().build().unwrap();
        let eval = evaluate(
            &chart,
            &raw(YogaKind::Yoga, vec![Planet::Sun, Planet::Mercury], None),
            &EngineConfig::default(),
        );
        assert!(eval.cancelled);
        assert!(eval.reason.unwrap().contains("Mercury is debilitated in Pisces"));
    }

    #[test]
    fn test_combustion_inside_orb() {
        // Venus 4 degrees behind the Sun
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Pisces, 2.0)
            .place(Planet::Moon, Sign::Taurus, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Aquarius, 20.0)
            .place(Planet::Jupiter, Sign::Gemini, 5.0)
            .place(Planet::Venus, Sign::Pisces, 6.0)
            .place(Planet::Saturn, Sign::Scorpio, 25.0)
            .nodes(Sign::Cancer, 12.0)
            .combust(Planet::Venus)
            .build()
            .unwrap();

        let venus = raw(YogaKind::Yoga, vec![Planet::Venus], None);
        let eval = evaluate(&chart, &venus, &EngineConfig::default());
        assert!(eval.cancelled);
        assert!(eval.reason.unwrap().contains("Venus is combust"));

        let mut narrow = EngineConfig::default();
        narrow.cancellation.combustion_cancel_orb_deg = 3.0;
        assert!(!evaluate(&chart, &venus, &narrow).cancelled);
    }

    #[test]
    fn test_dosha_uses_rule_bhanga_only() {
        let chart = base().build().unwrap();
        let plain = evaluate(&chart, &raw(YogaKind::Dosha, vec![Planet::Mercury], None), &EngineConfig::default());
        assert!(!plain.cancelled);

        let cancelled = evaluate(
            &chart,
            &raw(YogaKind::Dosha, vec![Planet::Mercury], Some("Jupiter aspects")),
            &EngineConfig::default(),
        );
        assert!(cancelled.cancelled);
        assert_eq!(cancelled.reason.as_deref(), Some("Jupiter aspects"));

        let mut ignore = EngineConfig::default();
        ignore.cancellation.honor_rule_bhanga = false;
        assert!(!evaluate(&chart, &raw(YogaKind::Dosha, vec![Planet::Mercury], Some("x")), &ignore).cancelled);
    }
}
