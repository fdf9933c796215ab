//! Afflictions. Each dosha carries its own bhanga (cancellation) where the
//! tradition recognizes one; the evaluator's generic cancellation does not
//! apply to doshas.

use super::{planet_list, when, Detection, YogaRule};
use crate::chart::Chart;
use crate::constants::{in_gandanta, MANGLIK_HOUSES};
use crate::dignity::*;
use crate::types::*;

const PRACTICAL: &str = "Practical tradition";

/// Kaal Sarpa sub-types indexed by Rahu's house (1-based)
pub const KAAL_SARPA_TYPES: [&str; 12] = [
    "Anant",
    "Kulik",
    "Vasuki",
    "Shankhpal",
    "Padma",
    "Mahapadma",
    "Takshak",
    "Karkotak",
    "Shankhachud",
    "Ghatak",
    "Vishdhar",
    "Sheshnag",
];

pub fn kaal_sarpa_name(rahu_house: u8) -> String {
    let index = usize::from(rahu_house.clamp(1, 12) - 1);
    format!("{} Kaal Sarpa Dosha", KAAL_SARPA_TYPES[index])
}

/// All seven classical planets strictly on one side of the Rahu-Ketu axis
pub fn hemmed_by_nodes(chart: &Chart) -> bool {
    let rahu = chart.placement(Planet::Rahu).longitude();
    let offsets: Vec<f64> = Planet::CLASSICAL
        .iter()
        .map(|&p| (chart.placement(p).longitude() - rahu).rem_euclid(360.0))
        .collect();
    offsets.iter().all(|&o| o > 0.0 && o < 180.0) || offsets.iter().all(|&o| o > 180.0)
}

fn nodes_with(chart: &Chart, planet: Planet) -> Vec<Planet> {
    [Planet::Rahu, Planet::Ketu]
        .into_iter()
        .filter(|&node| are_conjunct(chart, planet, node))
        .collect()
}

fn sorted(mut planets: Vec<Planet>) -> Vec<Planet> {
    planets.sort();
    planets.dedup();
    planets
}

pub fn rules() -> Vec<YogaRule> {
    let mut rules = manglik_rules();

    for house in 1..=12u8 {
        rules.push(
            YogaRule::new(
                format!("dosha.kaal_sarpa.{house}"),
                kaal_sarpa_name(house),
                RuleFamily::Dosha,
                move |chart| {
                    let holds = chart.house_of(Planet::Rahu) == house && hemmed_by_nodes(chart);
                    when(holds, || {
                        Detection::new(
                            format!(
                                "All seven planets between Rahu (house {house}) and Ketu (house {})",
                                chart.house_of(Planet::Ketu)
                            ),
                            [Planet::Rahu, Planet::Ketu],
                        )
                    })
                },
            )
            .dosha()
            .reference(PRACTICAL),
        );
    }

    rules.push(dosha("dosha.pitra", "Pitra Dosha", pitra));
    rules.push(dosha("dosha.gandanta", "Gandanta Dosha", |chart| {
        let caught: Vec<Planet> = Planet::CLASSICAL
            .into_iter()
            .filter(|&p| {
                let placement = chart.placement(p);
                in_gandanta(placement.sign, placement.degree)
            })
            .collect();
        when(!caught.is_empty(), || {
            Detection::new(
                format!("{} at a water-fire sign junction", planet_list(&caught)),
                caught,
            )
        })
    }));
    rules.push(dosha("dosha.grahan", "Grahan Dosha", |chart| {
        [(Planet::Sun, "Surya Grahan Dosha"), (Planet::Moon, "Chandra Grahan Dosha")]
            .into_iter()
            .filter_map(|(luminary, variant)| {
                let nodes = nodes_with(chart, luminary);
                (!nodes.is_empty()).then(|| {
                    let mut planets = vec![luminary];
                    planets.extend(&nodes);
                    Detection::new(
                        format!("{luminary} with {}", planet_list(&nodes)),
                        sorted(planets),
                    )
                    .named(variant)
                })
            })
            .collect()
    }));
    rules.push(dosha("dosha.guru_chandal", "Guru Chandal Dosha", |chart| {
        let nodes = nodes_with(chart, Planet::Jupiter);
        when(!nodes.is_empty(), || {
            let dignity = dignity_of(chart, Planet::Jupiter).dignity;
            let bhanga = dignity
                .is_dignified()
                .then(|| format!("Jupiter is {}", dignity.label()));
            let mut planets = vec![Planet::Jupiter];
            planets.extend(&nodes);
            Detection::new(format!("Jupiter with {}", planet_list(&nodes)), sorted(planets))
                .with_bhanga(bhanga)
        })
    }));
    rules.push(dosha("dosha.angarak", "Angarak Dosha", |chart| {
        let nodes = nodes_with(chart, Planet::Mars);
        when(!nodes.is_empty(), || {
            let mut planets = vec![Planet::Mars];
            planets.extend(&nodes);
            Detection::new(format!("Mars with {}", planet_list(&nodes)), sorted(planets))
        })
    }));
    rules.push(dosha("dosha.shrapit", "Shrapit Dosha", |chart| {
        when(are_conjunct(chart, Planet::Saturn, Planet::Rahu), || {
            Detection::new(
                format!("Saturn and Rahu together in {}", chart.sign_of(Planet::Saturn)),
                [Planet::Saturn, Planet::Rahu],
            )
        })
    }));
    rules.push(dosha("dosha.vish", "Vish Dosha", |chart| {
        when(are_conjunct(chart, Planet::Moon, Planet::Saturn), || {
            Detection::new(
                format!("Moon and Saturn together in {}", chart.sign_of(Planet::Moon)),
                [Planet::Moon, Planet::Saturn],
            )
        })
    }));
    rules.push(dosha("dosha.papa_kartari", "Papa Kartari Dosha", |chart| {
        let malefics_in = |house: u8| -> Vec<Planet> {
            chart
                .planets_in_house(house)
                .into_iter()
                .filter(|&p| is_malefic(chart, p))
                .collect()
        };
        let (twelfth, second) = (malefics_in(12), malefics_in(2));
        when(!twelfth.is_empty() && !second.is_empty(), || {
            Detection::new(
                format!(
                    "Ascendant hemmed by {} in the 12th and {} in the 2nd",
                    planet_list(&twelfth),
                    planet_list(&second)
                ),
                sorted(twelfth.iter().chain(second.iter()).copied().collect()),
            )
        })
    }));

    rules
}

fn dosha(
    id: &str,
    name: &str,
    detector: impl Fn(&Chart) -> Vec<Detection> + Send + Sync + 'static,
) -> YogaRule {
    YogaRule::new(id, name, RuleFamily::Dosha, detector)
        .dosha()
        .reference(PRACTICAL)
}

// ===== MANGLIK =====

fn manglik_rules() -> Vec<YogaRule> {
    [
        ("lagna", "Manglik Dosha", None),
        ("moon", "Kuja Dosha (from Moon)", Some(Planet::Moon)),
        ("venus", "Mangal Dosha (from Venus)", Some(Planet::Venus)),
    ]
    .into_iter()
    .map(|(key, variant, reference)| {
        dosha(&format!("dosha.manglik.{key}"), "Manglik Dosha", move |chart| {
            let from = reference.map_or(1, |p| chart.house_of(p));
            let distance = house_distance(from, chart.house_of(Planet::Mars));
            when(MANGLIK_HOUSES.contains(&distance), || {
                let origin = reference.map_or("the ascendant", Planet::name);
                let mut planets = vec![Planet::Mars];
                planets.extend(reference);
                Detection::new(
                    format!("Mars in house {distance} counted from {origin}"),
                    sorted(planets),
                )
                .named(variant)
                .with_bhanga(manglik_bhanga(chart))
            })
        })
    })
    .collect()
}

fn manglik_bhanga(chart: &Chart) -> Option<String> {
    let dignity = dignity_of(chart, Planet::Mars).dignity;
    if dignity.is_dignified() {
        return Some(format!("Mars is {} in {}", dignity.label(), chart.sign_of(Planet::Mars)));
    }
    if is_influenced_by(chart, Planet::Mars, Planet::Jupiter) {
        return Some("Jupiter joins or aspects Mars".to_string());
    }
    None
}

// ===== PITRA =====

fn pitra(chart: &Chart) -> Vec<Detection> {
    let mut clauses = Vec::new();
    let mut planets = Vec::new();

    let sun_nodes = nodes_with(chart, Planet::Sun);
    if !sun_nodes.is_empty() {
        clauses.push(format!("Sun with {}", planet_list(&sun_nodes)));
        planets.push(Planet::Sun);
        planets.extend(&sun_nodes);
    }

    for node in [Planet::Rahu, Planet::Ketu] {
        if chart.house_of(node) == 9 {
            clauses.push(format!("{node} in the 9th"));
            planets.push(node);
        }
    }

    if chart.house_of(Planet::Sun) == 9 && chart.house_of(Planet::Saturn) == 9 {
        clauses.push("Sun and Saturn in the 9th".to_string());
        planets.extend([Planet::Sun, Planet::Saturn]);
    }

    let ninth_lord = lord_of_house(chart, 9);
    if are_conjunct(chart, ninth_lord, Planet::Rahu) {
        clauses.push(format!("9th lord {ninth_lord} with Rahu"));
        planets.extend([ninth_lord, Planet::Rahu]);
    }

    if clauses.is_empty() {
        return Vec::new();
    }
    vec![Detection::new(clauses.join("; "), sorted(planets))]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(chart: &Chart) -> Vec<RawYoga> {
        rules().iter().flat_map(|rule| rule.detect(chart)).collect()
    }

    fn hemmed_chart() -> Chart {
        // Rahu at 10 Aries, Ketu at 10 Libra; everything between them
        Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Gemini, 20.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Taurus, 5.0)
            .place(Planet::Venus, Sign::Virgo, 20.0)
            .place(Planet::Saturn, Sign::Libra, 5.0)
            .nodes(Sign::Aries, 10.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_kaal_sarpa_type_by_rahu_house() {
        assert_eq!(kaal_sarpa_name(1), "Anant Kaal Sarpa Dosha");
        assert_eq!(kaal_sarpa_name(12), "Sheshnag Kaal Sarpa Dosha");

        let chart = hemmed_chart();
        assert!(hemmed_by_nodes(&chart));
        let names: Vec<String> = detect(&chart).into_iter().map(|r| r.name).collect();
        assert!(names.contains(&"Anant Kaal Sarpa Dosha".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("Kulik")));
    }

    #[test]
    fn test_planet_past_ketu_breaks_kaal_sarpa() {
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Gemini, 20.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Taurus, 5.0)
            .place(Planet::Venus, Sign::Virgo, 20.0)
            .place(Planet::Saturn, Sign::Libra, 15.0)
            .nodes(Sign::Aries, 10.0)
            .build()
            .unwrap();
        assert!(!hemmed_by_nodes(&chart));
    }

    #[test]
    fn test_manglik_from_three_references() {
        // Mars in Gemini: 3rd from Aries, 12th from the Cancer Moon, 10th from Virgo Venus
        let found = detect(&hemmed_chart());
        let manglik: Vec<&RawYoga> = found
            .iter()
            .filter(|r| r.rule_id.starts_with("dosha.manglik"))
            .collect();
        assert_eq!(manglik.len(), 1);
        assert_eq!(manglik[0].name, "Kuja Dosha (from Moon)");
        assert_eq!(manglik[0].contributing_planets, vec![Planet::Moon, Planet::Mars]);
        // Jupiter in Taurus does not aspect Gemini
        assert!(manglik[0].bhanga.is_none());
    }

    #[test]
    fn test_guru_chandal_bhanga_when_jupiter_dignified() {
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Gemini, 20.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Sagittarius, 5.0)
            .place(Planet::Venus, Sign::Virgo, 20.0)
            .place(Planet::Saturn, Sign::Libra, 15.0)
            .nodes(Sign::Sagittarius, 10.0)
            .build()
            .unwrap();
        let found = detect(&chart);
        let chandal = found.iter().find(|r| r.name == "Guru Chandal Dosha").unwrap();
        assert_eq!(chandal.contributing_planets, vec![Planet::Jupiter, Planet::Rahu]);
        assert_eq!(chandal.bhanga.as_deref(), Some("Jupiter is mooltrikona"));
    }
}
