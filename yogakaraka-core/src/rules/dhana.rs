//! Wealth yogas (BPHS Ch. 41) and Daridra (Ch. 42).

use super::raj::RelationMode;
use super::{is_strong, planet_list, when, Detection, YogaRule};
use crate::chart::Chart;
use crate::constants::{own_signs, DUSTHANAS};
use crate::dignity::*;
use crate::types::*;

const REFERENCE: &str = "BPHS Ch. 41";

/// House pairs whose lords combine for wealth
pub const DHANA_PAIRS: [(u8, u8); 10] = [
    (1, 2),
    (1, 5),
    (1, 9),
    (1, 11),
    (2, 5),
    (2, 9),
    (2, 11),
    (5, 9),
    (5, 11),
    (9, 11),
];

pub const DHANA_MODES: [RelationMode; 3] = [
    RelationMode::Conjunction,
    RelationMode::MutualAspect,
    RelationMode::SignExchange,
];

pub fn systematic_name(a: u8, b: u8, mode: RelationMode) -> String {
    format!("Dhana Yoga ({a}-{b}, {mode})")
}

pub fn systematic_names() -> Vec<String> {
    DHANA_PAIRS
        .iter()
        .flat_map(|&(a, b)| DHANA_MODES.iter().map(move |&mode| systematic_name(a, b, mode)))
        .collect()
}

pub fn ascendant_pattern_name(ascendant: Sign) -> String {
    format!("Dhana Yoga ({ascendant} Ascendant)")
}

pub fn lagna_lord_pattern_name(lord: Planet) -> String {
    format!("Dhana Yoga ({lord} in Lagna)")
}

/// Planets in the 11th that complete the wealth pattern of a 5th lord in
/// its own sign in the 5th
fn fifth_lord_partners(fifth_lord: Planet) -> &'static [Planet] {
    use Planet::*;
    match fifth_lord {
        Sun => &[Moon, Jupiter, Mars],
        Moon => &[Saturn],
        Mars => &[Venus],
        Mercury => &[Moon, Mars, Jupiter],
        Jupiter => &[Mercury],
        Venus => &[Mars],
        Saturn => &[Moon, Sun],
        Rahu | Ketu => &[],
    }
}

/// Planets that must join or aspect a lagna lord in its own sign in the 1st
fn lagna_lord_partners(lagna_lord: Planet) -> &'static [Planet] {
    use Planet::*;
    match lagna_lord {
        Sun => &[Mars, Jupiter],
        Moon => &[Jupiter, Mars],
        Mars => &[Mercury, Venus, Saturn],
        Mercury => &[Saturn, Venus],
        Jupiter => &[Mercury, Mars],
        Venus => &[Saturn, Mercury],
        Saturn => &[Mars, Jupiter],
        Rahu | Ketu => &[],
    }
}

fn in_own_sign(chart: &Chart, planet: Planet) -> bool {
    own_signs(planet).contains(&chart.sign_of(planet))
}

pub fn rules() -> Vec<YogaRule> {
    let mut rules = Vec::new();

    for (a, b) in DHANA_PAIRS {
        for mode in DHANA_MODES {
            rules.push(
                YogaRule::new(
                    format!("dhana.{a}_{b}.{}", mode.key()),
                    systematic_name(a, b, mode),
                    RuleFamily::Dhana,
                    move |chart| {
                        let la = lord_of_house(chart, a);
                        let lb = lord_of_house(chart, b);
                        when(mode.holds(chart, la, lb), || {
                            let mut planets = vec![la, lb];
                            planets.sort();
                            Detection::new(
                                format!(
                                    "{la} (lord of {a}) and {lb} (lord of {b}) in {}",
                                    mode.label().to_lowercase()
                                ),
                                planets,
                            )
                        })
                    },
                )
                .reference(REFERENCE),
            );
        }
    }

    for ascendant in Sign::ALL {
        rules.push(
            YogaRule::new(
                format!("dhana.ascendant.{}", ascendant.name().to_lowercase()),
                ascendant_pattern_name(ascendant),
                RuleFamily::Dhana,
                move |chart| {
                    if chart.ascendant() != ascendant {
                        return Vec::new();
                    }
                    let lord = lord_of_house(chart, 5);
                    if chart.house_of(lord) != 5 || !in_own_sign(chart, lord) {
                        return Vec::new();
                    }
                    let partners: Vec<Planet> = fifth_lord_partners(lord)
                        .iter()
                        .copied()
                        .filter(|&p| chart.house_of(p) == 11)
                        .collect();
                    when(!partners.is_empty(), || {
                        let mut planets = vec![lord];
                        planets.extend(&partners);
                        planets.sort();
                        Detection::new(
                            format!(
                                "5th lord {lord} in its own sign in the 5th; {} in the 11th",
                                planet_list(&partners)
                            ),
                            planets,
                        )
                    })
                },
            )
            .reference(REFERENCE),
        );
    }

    for lord in Planet::CLASSICAL {
        rules.push(
            YogaRule::new(
                format!("dhana.lagna_lord.{}", lord.name().to_lowercase()),
                lagna_lord_pattern_name(lord),
                RuleFamily::Dhana,
                move |chart| {
                    let holds = lord_of_house(chart, 1) == lord
                        && chart.house_of(lord) == 1
                        && in_own_sign(chart, lord)
                        && lagna_lord_partners(lord)
                            .iter()
                            .all(|&p| is_influenced_by(chart, lord, p));
                    when(holds, || {
                        let partners = lagna_lord_partners(lord);
                        let mut planets = vec![lord];
                        planets.extend(partners);
                        planets.sort();
                        Detection::new(
                            format!(
                                "Lagna lord {lord} in its own sign in the 1st, joined or aspected by {}",
                                planet_list(partners)
                            ),
                            planets,
                        )
                    })
                },
            )
            .reference(REFERENCE),
        );
    }

    rules.push(
        YogaRule::new("dhana.lakshmi", "Lakshmi Yoga", RuleFamily::Dhana, |chart| {
            let ninth = lord_of_house(chart, 9);
            let lagna = lord_of_house(chart, 1);
            let holds = is_dignified(chart, ninth)
                && is_in_kendra_or_trikona(chart, ninth)
                && is_strong(chart, lagna);
            when(holds, || {
                let mut planets = vec![ninth, lagna];
                planets.sort();
                planets.dedup();
                Detection::new(
                    format!(
                        "9th lord {ninth} dignified in house {}; lagna lord {lagna} strong",
                        chart.house_of(ninth)
                    ),
                    planets,
                )
            })
        })
        .reference(REFERENCE),
    );

    rules.push(
        YogaRule::new("dhana.daridra", "Daridra Yoga", RuleFamily::Dhana, |chart| {
            let eleventh = lord_of_house(chart, 11);
            let placed = chart.house_of(eleventh);
            when(DUSTHANAS.contains(&placed), || {
                Detection::new(
                    format!("11th lord {eleventh} in house {placed}"),
                    [eleventh],
                )
            })
        })
        .dosha()
        .category(Category::Dosha)
        .reference("BPHS Ch. 42"),
    );

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(chart: &Chart) -> Vec<RawYoga> {
        rules().iter().flat_map(|rule| rule.detect(chart)).collect()
    }

    #[test]
    fn test_rule_counts() {
        assert_eq!(systematic_names().len(), 30);
        // 30 systematic + 12 ascendant + 7 lagna lord + Lakshmi + Daridra
        assert_eq!(rules().len(), 51);
    }

    #[test]
    fn test_aries_ascendant_pattern() {
        // Aries: Sun in Leo in the 5th, Jupiter in Aquarius in the 11th
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Aquarius, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap();
        let found = detect(&chart);
        let pattern = found
            .iter()
            .find(|r| r.name == "Dhana Yoga (Aries Ascendant)")
            .unwrap();
        assert_eq!(pattern.contributing_planets, vec![Planet::Sun, Planet::Jupiter]);
        assert!(!found.iter().any(|r| r.name == "Dhana Yoga (Taurus Ascendant)"));
    }

    #[test]
    fn test_daridra_is_a_dosha() {
        // Aries: 11th lord Saturn in Virgo, the 6th
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Sagittarius, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Virgo, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap();
        let found = detect(&chart);
        let daridra = found.iter().find(|r| r.name == "Daridra Yoga").unwrap();
        assert_eq!(daridra.kind, YogaKind::Dosha);
        assert_eq!(daridra.contributing_planets, vec![Planet::Saturn]);
    }
}
