use super::{planet_list, when, Detection, YogaRule};
use crate::chart::Chart;
use crate::constants::UPACHAYAS;
use crate::dignity::*;
use crate::types::*;

const REFERENCE: &str = "BPHS Ch. 37";

/// Planets other than the Sun flanking the Moon: (2nd, 12th). The nodes count.
fn flanking(chart: &Chart) -> (Vec<Planet>, Vec<Planet>) {
    let moon = chart.house_of(Planet::Moon);
    let pick = |n| -> Vec<Planet> {
        planets_at_distance(chart, moon, n)
            .into_iter()
            .filter(|&p| p != Planet::Sun)
            .collect()
    };
    (pick(2), pick(12))
}

fn with_moon(others: &[Planet]) -> Vec<Planet> {
    let mut planets = vec![Planet::Moon];
    planets.extend_from_slice(others);
    planets.sort();
    planets.dedup();
    planets
}

/// Natural benefics other than the Moon that currently count as benefic
fn benefics(chart: &Chart) -> Vec<Planet> {
    [Planet::Mercury, Planet::Jupiter, Planet::Venus]
        .into_iter()
        .filter(|&p| is_benefic(chart, p))
        .collect()
}

fn distance_from_moon(chart: &Chart, planet: Planet) -> u8 {
    house_distance(chart.house_of(Planet::Moon), chart.house_of(planet))
}

pub fn rules() -> Vec<YogaRule> {
    vec![
        YogaRule::new("lunar.sunapha", "Sunapha Yoga", RuleFamily::MoonBased, |chart| {
            let (second, twelfth) = flanking(chart);
            when(!second.is_empty() && twelfth.is_empty(), || {
                Detection::new(
                    format!("{} in the 2nd from the Moon", planet_list(&second)),
                    with_moon(&second),
                )
            })
        })
        .reference(REFERENCE),
        YogaRule::new("lunar.anapha", "Anapha Yoga", RuleFamily::MoonBased, |chart| {
            let (second, twelfth) = flanking(chart);
            when(second.is_empty() && !twelfth.is_empty(), || {
                Detection::new(
                    format!("{} in the 12th from the Moon", planet_list(&twelfth)),
                    with_moon(&twelfth),
                )
            })
        })
        .reference(REFERENCE),
        YogaRule::new(
            "lunar.durudhura",
            "Durudhura Yoga",
            RuleFamily::MoonBased,
            |chart| {
                let (second, twelfth) = flanking(chart);
                when(!second.is_empty() && !twelfth.is_empty(), || {
                    let both: Vec<Planet> = second.iter().chain(twelfth.iter()).copied().collect();
                    Detection::new(
                        format!(
                            "{} in the 2nd and {} in the 12th from the Moon",
                            planet_list(&second),
                            planet_list(&twelfth)
                        ),
                        with_moon(&both),
                    )
                })
            },
        )
        .reference(REFERENCE),
        YogaRule::new(
            "lunar.kemadruma",
            "Kemadruma Yoga",
            RuleFamily::MoonBased,
            kemadruma,
        )
        .dosha()
        .category(Category::Dosha)
        .reference(REFERENCE),
        YogaRule::new(
            "lunar.gajakesari",
            "Gajakesari Yoga",
            RuleFamily::MoonBased,
            |chart| {
                let moon = chart.house_of(Planet::Moon);
                let jupiter = chart.house_of(Planet::Jupiter);
                when(in_kendra_relationship(chart, moon, jupiter), || {
                    Detection::new(
                        format!(
                            "Jupiter in the {} from the Moon",
                            ordinal(distance_from_moon(chart, Planet::Jupiter))
                        ),
                        [Planet::Moon, Planet::Jupiter],
                    )
                })
            },
        )
        .reference(REFERENCE),
        YogaRule::new(
            "lunar.chandra_mangala",
            "Chandra-Mangala Yoga",
            RuleFamily::MoonBased,
            |chart| {
                when(are_conjunct(chart, Planet::Moon, Planet::Mars), || {
                    Detection::new(
                        format!("Moon and Mars together in {}", chart.sign_of(Planet::Moon)),
                        [Planet::Moon, Planet::Mars],
                    )
                })
            },
        )
        .reference("Phaladeepika Ch. 6"),
        YogaRule::new("lunar.adhi", "Adhi Yoga", RuleFamily::MoonBased, |chart| {
            let placed: Vec<Planet> = benefics(chart)
                .into_iter()
                .filter(|&p| matches!(distance_from_moon(chart, p), 6..=8))
                .collect();
            when(placed.len() >= 2, || {
                Detection::new(
                    format!("{} in the 6th, 7th or 8th from the Moon", planet_list(&placed)),
                    with_moon(&placed),
                )
            })
        })
        .reference(REFERENCE),
        YogaRule::new("lunar.amala", "Amala Yoga", RuleFamily::MoonBased, amala)
            .reference("Phaladeepika Ch. 6"),
        YogaRule::new(
            "lunar.vasumati",
            "Vasumati Yoga",
            RuleFamily::MoonBased,
            |chart| {
                let placed: Vec<Planet> = benefics(chart)
                    .into_iter()
                    .filter(|&p| UPACHAYAS.contains(&distance_from_moon(chart, p)))
                    .collect();
                when(placed.len() >= 2, || {
                    Detection::new(
                        format!("{} in upachayas from the Moon", planet_list(&placed)),
                        with_moon(&placed),
                    )
                })
            },
        )
        .reference("Phaladeepika Ch. 6"),
        YogaRule::new("lunar.shakata", "Shakata Yoga", RuleFamily::MoonBased, |chart| {
            let distance = distance_from_moon(chart, Planet::Jupiter);
            when(matches!(distance, 6 | 8 | 12), || {
                let bhanga = [Planet::Jupiter, Planet::Moon]
                    .into_iter()
                    .find(|&p| is_in_kendra(chart, p))
                    .map(|p| format!("{p} is in a kendra from the ascendant"));
                Detection::new(
                    format!("Jupiter in the {} from the Moon", ordinal(distance)),
                    [Planet::Moon, Planet::Jupiter],
                )
                .with_bhanga(bhanga)
            })
        })
        .dosha()
        .category(Category::Dosha)
        .reference(REFERENCE),
    ]
}

/// Nothing but the Sun in the 2nd or 12th from the Moon, and no planet other
/// than the Moon and the nodes in a kendra from the Moon or from the
/// ascendant.
fn kemadruma(chart: &Chart) -> Vec<Detection> {
    let (second, twelfth) = flanking(chart);
    if !second.is_empty() || !twelfth.is_empty() {
        return Vec::new();
    }

    let moon = chart.house_of(Planet::Moon);
    let supported = Planet::ALL
        .into_iter()
        .filter(|&p| !matches!(p, Planet::Moon | Planet::Rahu | Planet::Ketu))
        .any(|p| {
            let house = chart.house_of(p);
            in_kendra_relationship(chart, moon, house) || in_kendra_relationship(chart, 1, house)
        });
    if supported {
        return Vec::new();
    }

    let bhanga = aspects_planet(chart, Planet::Jupiter, Planet::Moon)
        .then(|| "Jupiter aspects the Moon".to_string());
    vec![Detection::new(
        "No planet in the 2nd, 12th or kendras from the Moon, and none in kendras from the ascendant",
        [Planet::Moon],
    )
    .with_bhanga(bhanga)]
}

/// Only benefics in the 10th from the Moon or from the ascendant
fn amala(chart: &Chart) -> Vec<Detection> {
    let moon = chart.house_of(Planet::Moon);
    [("Moon", moon), ("ascendant", 1)]
        .into_iter()
        .filter_map(|(reference, from)| {
            let occupants = planets_at_distance(chart, from, 10);
            let only_benefics =
                !occupants.is_empty() && occupants.iter().all(|&p| is_benefic(chart, p));
            only_benefics.then(|| {
                Detection::new(
                    format!(
                        "Only benefics ({}) in the 10th from the {reference}",
                        planet_list(&occupants)
                    ),
                    occupants,
                )
            })
        })
        .collect()
}

pub(crate) fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
