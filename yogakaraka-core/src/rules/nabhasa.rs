//! Nabhasa yogas (BPHS Ch. 35). Every shape is judged over the seven
//! classical planets only; the nodes never take part.

use super::{house_list, planet_list, slug, when, Detection, YogaRule};
use crate::chart::Chart;
use crate::constants::KENDRAS;
use crate::dignity::{house_at, is_benefic, is_malefic};
use crate::types::*;
use std::collections::BTreeSet;

const REFERENCE: &str = "BPHS Ch. 35";

pub fn rules() -> Vec<YogaRule> {
    let mut rules = Vec::new();
    rules.extend(ashraya_rules());
    rules.extend(dala_rules());
    rules.extend(akriti_rules());
    rules.extend(sankhya_rules());
    rules
}

// ===== ASHRAYA =====

fn ashraya_rules() -> Vec<YogaRule> {
    [
        ("Rajju Yoga", Modality::Movable, "movable"),
        ("Musala Yoga", Modality::Fixed, "fixed"),
        ("Nala Yoga", Modality::Dual, "dual"),
    ]
    .into_iter()
    .map(|(name, modality, label)| {
        YogaRule::new(
            format!("ashraya.{}", slug(name)),
            name,
            RuleFamily::NabhasaAshraya,
            move |chart| {
                let confined = Planet::CLASSICAL
                    .iter()
                    .all(|&p| chart.sign_of(p).modality() == modality);
                when(confined, || {
                    Detection::new(
                        format!("All seven planets occupy {label} signs"),
                        Planet::CLASSICAL,
                    )
                })
            },
        )
        .reference(REFERENCE)
    })
    .collect()
}

// ===== DALA =====

fn dala_rules() -> Vec<YogaRule> {
    vec![
        YogaRule::new("dala.mala", "Mala Yoga", RuleFamily::NabhasaDala, |chart| {
            dala(chart, true)
        })
        .reference(REFERENCE),
        YogaRule::new("dala.sarpa", "Sarpa Yoga", RuleFamily::NabhasaDala, |chart| {
            dala(chart, false)
        })
        .reference(REFERENCE),
    ]
}

/// Mala: benefics in kendras and malefics in 3/6/11. Sarpa swaps the roles.
fn dala(chart: &Chart, benefics_angular: bool) -> Vec<Detection> {
    let benefics: Vec<Planet> = Planet::CLASSICAL
        .into_iter()
        .filter(|&p| is_benefic(chart, p))
        .collect();
    let malefics: Vec<Planet> = Planet::CLASSICAL
        .into_iter()
        .filter(|&p| is_malefic(chart, p))
        .collect();
    if benefics.is_empty() || malefics.is_empty() {
        return Vec::new();
    }

    let (angular, cadent) = if benefics_angular {
        (&benefics, &malefics)
    } else {
        (&malefics, &benefics)
    };
    let holds = angular.iter().all(|&p| KENDRAS.contains(&chart.house_of(p)))
        && cadent.iter().all(|&p| matches!(chart.house_of(p), 3 | 6 | 11));

    when(holds, || {
        let mut planets: Vec<Planet> = angular.iter().chain(cadent.iter()).copied().collect();
        planets.sort();
        Detection::new(
            format!(
                "{} in kendras; {} in the 3rd, 6th or 11th",
                planet_list(angular),
                planet_list(cadent)
            ),
            planets,
        )
    })
}

// ===== AKRITI =====

/// Each shape lists alternative house sets. A shape holds when every
/// classical planet sits inside one set and every house of that set is
/// occupied.
const AKRITI_SHAPES: &[(&str, &[&[u8]])] = &[
    ("Gada Yoga", &[&[1, 4], &[4, 7], &[7, 10], &[10, 1]]),
    ("Nabhasa Shakata Yoga", &[&[1, 7]]),
    ("Vihaga Yoga", &[&[4, 10]]),
    ("Shringataka Yoga", &[&[1, 5, 9]]),
    ("Hala Yoga", &[&[2, 6, 10], &[3, 7, 11], &[4, 8, 12]]),
    ("Kamala Yoga", &[&[1, 4, 7, 10]]),
    ("Vapi Yoga", &[&[2, 5, 8, 11], &[3, 6, 9, 12]]),
    ("Yupa Yoga", &[&[1, 2, 3, 4]]),
    ("Shara Yoga", &[&[4, 5, 6, 7]]),
    ("Shakti Yoga", &[&[7, 8, 9, 10]]),
    ("Danda Yoga", &[&[10, 11, 12, 1]]),
    ("Nauka Yoga", &[&[1, 2, 3, 4, 5, 6, 7]]),
    ("Kuta Yoga", &[&[4, 5, 6, 7, 8, 9, 10]]),
    ("Chhatra Yoga", &[&[7, 8, 9, 10, 11, 12, 1]]),
    ("Chapa Yoga", &[&[10, 11, 12, 1, 2, 3, 4]]),
    ("Chakra Yoga", &[&[1, 3, 5, 7, 9, 11]]),
    ("Samudra Yoga", &[&[2, 4, 6, 8, 10, 12]]),
];

fn akriti_rules() -> Vec<YogaRule> {
    let mut rules: Vec<YogaRule> = AKRITI_SHAPES
        .iter()
        .map(|&(name, alternatives)| {
            YogaRule::new(
                format!("akriti.{}", slug(name)),
                name,
                RuleFamily::NabhasaAkriti,
                move |chart| {
                    let found = alternatives.iter().copied().find(|houses| fills_exactly(chart, houses));
                    match found {
                        Some(houses) => vec![Detection::new(
                            format!("All seven planets occupy houses {}", house_list(houses)),
                            Planet::CLASSICAL,
                        )],
                        None => Vec::new(),
                    }
                },
            )
            .reference(REFERENCE)
        })
        .collect();

    rules.push(
        YogaRule::new("akriti.vajra", "Vajra Yoga", RuleFamily::NabhasaAkriti, |chart| {
            vajra_yava(chart, true)
        })
        .reference(REFERENCE),
    );
    rules.push(
        YogaRule::new("akriti.yava", "Yava Yoga", RuleFamily::NabhasaAkriti, |chart| {
            vajra_yava(chart, false)
        })
        .reference(REFERENCE),
    );
    rules.push(
        YogaRule::new(
            "akriti.ardha_chandra",
            "Ardha Chandra Yoga",
            RuleFamily::NabhasaAkriti,
            |chart| {
                // seven consecutive houses starting anywhere but a kendra
                let found = (1..=12u8)
                    .filter(|start| !KENDRAS.contains(start))
                    .map(|start| consecutive(start, 7))
                    .find(|houses| fills_exactly(chart, houses));
                match found {
                    Some(houses) => vec![Detection::new(
                        format!(
                            "All seven planets occupy the seven houses from the {}",
                            houses[0]
                        ),
                        Planet::CLASSICAL,
                    )],
                    None => Vec::new(),
                }
            },
        )
        .reference(REFERENCE),
    );
    rules
}

fn fills_exactly(chart: &Chart, houses: &[u8]) -> bool {
    Planet::CLASSICAL
        .iter()
        .all(|&p| houses.contains(&chart.house_of(p)))
        && houses
            .iter()
            .all(|&h| Planet::CLASSICAL.iter().any(|&p| chart.house_of(p) == h))
}

fn consecutive(start: u8, len: u8) -> Vec<u8> {
    (1..=len).map(|n| house_at(start, n)).collect()
}

/// Vajra: benefics in the 1st and 7th, malefics in the 4th and 10th, every
/// planet angular. Yava is the reverse.
fn vajra_yava(chart: &Chart, benefics_in_lagna_axis: bool) -> Vec<Detection> {
    if !Planet::CLASSICAL
        .iter()
        .all(|&p| KENDRAS.contains(&chart.house_of(p)))
    {
        return Vec::new();
    }

    let (benefic_houses, malefic_houses): (&[u8], &[u8]) = if benefics_in_lagna_axis {
        (&[1, 7], &[4, 10])
    } else {
        (&[4, 10], &[1, 7])
    };

    let benefics: Vec<Planet> = Planet::CLASSICAL
        .into_iter()
        .filter(|&p| is_benefic(chart, p))
        .collect();
    let malefics: Vec<Planet> = Planet::CLASSICAL
        .into_iter()
        .filter(|&p| is_malefic(chart, p))
        .collect();

    let holds = !benefics.is_empty()
        && !malefics.is_empty()
        && benefics.iter().all(|&p| benefic_houses.contains(&chart.house_of(p)))
        && malefics.iter().all(|&p| malefic_houses.contains(&chart.house_of(p)));

    when(holds, || {
        Detection::new(
            format!(
                "Benefics in houses {}, malefics in houses {}",
                house_list(benefic_houses),
                house_list(malefic_houses)
            ),
            Planet::CLASSICAL,
        )
    })
}

// ===== SANKHYA =====

const SANKHYA: [&str; 7] = [
    "Gola Yoga",
    "Yuga Yoga",
    "Shula Yoga",
    "Kedara Yoga",
    "Pasha Yoga",
    "Dama Yoga",
    "Vallaki Yoga",
];

fn sankhya_rules() -> Vec<YogaRule> {
    SANKHYA
        .iter()
        .enumerate()
        .map(|(i, &name)| {
            let count = i + 1;
            YogaRule::new(
                format!("sankhya.{}", slug(name)),
                name,
                RuleFamily::NabhasaSankhya,
                move |chart| {
                    let signs: BTreeSet<Sign> =
                        Planet::CLASSICAL.iter().map(|&p| chart.sign_of(p)).collect();
                    when(signs.len() == count, || {
                        Detection::new(
                            format!("All seven planets occupy exactly {count} signs"),
                            Planet::CLASSICAL,
                        )
                    })
                },
            )
            .reference(REFERENCE)
        })
        .collect()
}
