//! Rare named yogas. No shared structure: each rule is a leaf tied to one
//! reference.

use super::{is_strong, planet_list, when, Detection, YogaRule};
use crate::chart::Chart;
use crate::constants::{natural_relation, Relation, DUSTHANAS, KENDRAS, TRIKONAS};
use crate::dignity::*;
use crate::types::*;

const BPHS_36: &str = "BPHS Ch. 36";

fn named(
    id: &str,
    name: &str,
    reference: &str,
    detector: impl Fn(&Chart) -> Vec<Detection> + Send + Sync + 'static,
) -> YogaRule {
    YogaRule::new(format!("named.{id}"), name, RuleFamily::Named, detector).reference(reference)
}

fn sorted(mut planets: Vec<Planet>) -> Vec<Planet> {
    planets.sort();
    planets.dedup();
    planets
}

fn benefics(chart: &Chart) -> Vec<Planet> {
    Planet::ALL
        .into_iter()
        .filter(|&p| is_benefic(chart, p))
        .collect()
}

pub fn rules() -> Vec<YogaRule> {
    vec![
        named("saraswati", "Saraswati Yoga", "Phaladeepika Ch. 6", saraswati),
        named("parvata", "Parvata Yoga", BPHS_36, parvata),
        named("kahala", "Kahala Yoga", BPHS_36, |chart| {
            let fourth = lord_of_house(chart, 4);
            let ninth = lord_of_house(chart, 9);
            let lagna = lord_of_house(chart, 1);
            let holds = fourth != ninth
                && in_kendra_relationship(chart, chart.house_of(fourth), chart.house_of(ninth))
                && is_strong(chart, lagna);
            when(holds, || {
                Detection::new(
                    format!("4th lord {fourth} and 9th lord {ninth} in mutual kendras; lagna lord {lagna} strong"),
                    sorted(vec![fourth, ninth, lagna]),
                )
            })
        }),
        named("chamara", "Chamara Yoga", BPHS_36, |chart| {
            let lagna = lord_of_house(chart, 1);
            let holds = is_exalted(chart, lagna)
                && is_in_kendra(chart, lagna)
                && (aspects_planet(chart, Planet::Jupiter, lagna)
                    || are_conjunct(chart, Planet::Jupiter, lagna));
            when(holds, || {
                Detection::new(
                    format!("Lagna lord {lagna} exalted in a kendra under Jupiter's influence"),
                    sorted(vec![lagna, Planet::Jupiter]),
                )
            })
        }),
        named("shankha", "Shankha Yoga", BPHS_36, |chart| {
            let fifth = lord_of_house(chart, 5);
            let sixth = lord_of_house(chart, 6);
            let lagna = lord_of_house(chart, 1);
            let holds = fifth != sixth
                && in_kendra_relationship(chart, chart.house_of(fifth), chart.house_of(sixth))
                && is_strong(chart, lagna);
            when(holds, || {
                Detection::new(
                    format!("5th lord {fifth} and 6th lord {sixth} in mutual kendras; lagna lord {lagna} strong"),
                    sorted(vec![fifth, sixth, lagna]),
                )
            })
        }),
        named("bheri", "Bheri Yoga", BPHS_36, |chart| {
            let lagna = lord_of_house(chart, 1);
            let ninth = lord_of_house(chart, 9);
            let holds = [Planet::Jupiter, Planet::Venus, lagna]
                .into_iter()
                .all(|p| is_in_kendra(chart, p))
                && is_strong(chart, ninth);
            when(holds, || {
                Detection::new(
                    format!("Jupiter, Venus and lagna lord {lagna} in kendras; 9th lord {ninth} strong"),
                    sorted(vec![Planet::Jupiter, Planet::Venus, lagna, ninth]),
                )
            })
        }),
        named("mridanga", "Mridanga Yoga", BPHS_36, |chart| {
            let lagna = lord_of_house(chart, 1);
            let supporters: Vec<Planet> = Planet::CLASSICAL
                .into_iter()
                .filter(|&p| p != lagna && is_dignified(chart, p) && is_in_kendra_or_trikona(chart, p))
                .collect();
            when(!supporters.is_empty() && is_strong(chart, lagna), || {
                let mut planets = supporters.clone();
                planets.push(lagna);
                Detection::new(
                    format!(
                        "{} dignified in kendras or trikonas; lagna lord {lagna} strong",
                        planet_list(&supporters)
                    ),
                    sorted(planets),
                )
            })
        }),
        named("sreenatha", "Sreenatha Yoga", "Phaladeepika Ch. 6", |chart| {
            let seventh = lord_of_house(chart, 7);
            let ninth = lord_of_house(chart, 9);
            let tenth = lord_of_house(chart, 10);
            let holds = is_exalted(chart, seventh)
                && chart.house_of(seventh) == 10
                && (ninth == tenth || are_conjunct(chart, ninth, tenth));
            when(holds, || {
                Detection::new(
                    format!("7th lord {seventh} exalted in the 10th; 9th and 10th lords joined"),
                    sorted(vec![seventh, ninth, tenth]),
                )
            })
        }),
        named("amsavatara", "Amsavatara Yoga", BPHS_36, |chart| {
            let holds = chart.ascendant().modality() == Modality::Movable
                && is_in_kendra(chart, Planet::Jupiter)
                && is_in_kendra(chart, Planet::Venus)
                && is_exalted(chart, Planet::Saturn)
                && is_in_kendra(chart, Planet::Saturn);
            when(holds, || {
                Detection::new(
                    "Movable ascendant; Jupiter and Venus in kendras; Saturn exalted in a kendra",
                    [Planet::Jupiter, Planet::Venus, Planet::Saturn],
                )
            })
        }),
        named("kusuma", "Kusuma Yoga", BPHS_36, |chart| {
            let holds = chart.ascendant().modality() == Modality::Fixed
                && is_in_kendra(chart, Planet::Venus)
                && is_in_trikona(chart, Planet::Moon)
                && chart.house_of(Planet::Saturn) == 10;
            when(holds, || {
                Detection::new(
                    "Fixed ascendant; Venus in a kendra, Moon in a trikona, Saturn in the 10th",
                    [Planet::Moon, Planet::Venus, Planet::Saturn],
                )
            })
        }),
        named("gauri", "Gauri Yoga", BPHS_36, |chart| {
            let holds = is_dignified(chart, Planet::Moon)
                && is_in_kendra_or_trikona(chart, Planet::Moon)
                && aspects_planet(chart, Planet::Jupiter, Planet::Moon);
            when(holds, || {
                Detection::new(
                    format!(
                        "Moon {} in house {}, aspected by Jupiter",
                        dignity_of(chart, Planet::Moon).dignity.label(),
                        chart.house_of(Planet::Moon)
                    ),
                    [Planet::Moon, Planet::Jupiter],
                )
            })
        }),
        named("khadga", "Khadga Yoga", BPHS_36, |chart| {
            let second = lord_of_house(chart, 2);
            let ninth = lord_of_house(chart, 9);
            let lagna = lord_of_house(chart, 1);
            let holds = chart.house_of(second) == 9
                && chart.house_of(ninth) == 2
                && is_in_kendra_or_trikona(chart, lagna);
            when(holds, || {
                Detection::new(
                    format!("2nd lord {second} in the 9th and 9th lord {ninth} in the 2nd; lagna lord {lagna} well placed"),
                    sorted(vec![second, ninth, lagna]),
                )
            })
        }),
        named("kalanidhi", "Kalanidhi Yoga", BPHS_36, |chart| {
            let holds = matches!(chart.house_of(Planet::Jupiter), 2 | 5)
                && is_influenced_by(chart, Planet::Jupiter, Planet::Mercury)
                && is_influenced_by(chart, Planet::Jupiter, Planet::Venus);
            when(holds, || {
                Detection::new(
                    format!(
                        "Jupiter in the {} joined or aspected by Mercury and Venus",
                        super::lunar::ordinal(chart.house_of(Planet::Jupiter))
                    ),
                    [Planet::Mercury, Planet::Jupiter, Planet::Venus],
                )
            })
        }),
        named("shubha_kartari", "Shubha Kartari Yoga", "Phaladeepika Ch. 6", |chart| {
            let in_house = |house: u8| -> Vec<Planet> {
                chart
                    .planets_in_house(house)
                    .into_iter()
                    .filter(|&p| is_benefic(chart, p))
                    .collect()
            };
            let (twelfth, second) = (in_house(12), in_house(2));
            when(!twelfth.is_empty() && !second.is_empty(), || {
                Detection::new(
                    format!(
                        "Ascendant flanked by {} in the 12th and {} in the 2nd",
                        planet_list(&twelfth),
                        planet_list(&second)
                    ),
                    sorted(twelfth.iter().chain(second.iter()).copied().collect()),
                )
            })
        }),
        named("vargottama", "Vargottama Yoga", "BPHS Ch. 7", |chart| {
            let planets: Vec<Planet> = Planet::CLASSICAL
                .into_iter()
                .filter(|&p| dignity_of(chart, p).vargottama && is_in_kendra_or_trikona(chart, p))
                .collect();
            when(!planets.is_empty(), || {
                Detection::new(
                    format!("{} vargottama in a kendra or trikona", planet_list(&planets)),
                    planets,
                )
            })
        }),
        named("pushkala", "Pushkala Yoga", BPHS_36, |chart| {
            let moon_lord = dispositor(chart, Planet::Moon);
            let lagna = lord_of_house(chart, 1);
            let holds = moon_lord != Planet::Moon
                && (moon_lord == lagna || are_conjunct(chart, moon_lord, lagna))
                && is_in_kendra(chart, moon_lord)
                && chart.is_occupied(1);
            when(holds, || {
                Detection::new(
                    format!("Moon's dispositor {moon_lord} with lagna lord {lagna} in a kendra; ascendant occupied"),
                    sorted(vec![Planet::Moon, moon_lord, lagna]),
                )
            })
        }),
        named("lagnadhi", "Lagnadhi Yoga", "Phaladeepika Ch. 6", |chart| {
            let in_678 = |p: Planet| matches!(chart.house_of(p), 6..=8);
            let placed: Vec<Planet> = [Planet::Mercury, Planet::Jupiter, Planet::Venus]
                .into_iter()
                .filter(|&p| is_benefic(chart, p) && in_678(p))
                .collect();
            let afflicted = Planet::ALL
                .into_iter()
                .any(|p| is_malefic(chart, p) && in_678(p));
            when(placed.len() >= 2 && !afflicted, || {
                Detection::new(
                    format!("{} in the 6th, 7th or 8th free of malefics", planet_list(&placed)),
                    placed,
                )
            })
        }),
        named("chatussagara", "Chatussagara Yoga", "Phaladeepika Ch. 6", |chart| {
            let holds = KENDRAS.iter().all(|&h| chart.is_occupied(h));
            when(holds, || {
                let planets: Vec<Planet> = Planet::ALL
                    .into_iter()
                    .filter(|&p| is_in_kendra(chart, p))
                    .collect();
                Detection::new("All four kendras occupied", planets)
            })
        }),
        named("trilochana", "Trilochana Yoga", "Jataka Parijata Ch. 7", |chart| {
            let trio = [Planet::Sun, Planet::Moon, Planet::Mars];
            let trine = |a: Planet, b: Planet| {
                in_trikona_relationship(chart, chart.house_of(a), chart.house_of(b))
                    && in_trikona_relationship(chart, chart.house_of(b), chart.house_of(a))
            };
            let holds = trine(trio[0], trio[1]) && trine(trio[1], trio[2]) && trine(trio[0], trio[2]);
            when(holds, || Detection::new("Sun, Moon and Mars in mutual trines", trio))
        }),
        named("maha_parivartana", "Maha Parivartana Yoga", BPHS_36, |chart| {
            exchanges(chart, ExchangeKind::Maha)
        }),
        named("khala_parivartana", "Khala Parivartana Yoga", BPHS_36, |chart| {
            exchanges(chart, ExchangeKind::Khala)
        }),
        named("dainya_parivartana", "Dainya Parivartana Yoga", BPHS_36, |chart| {
            exchanges(chart, ExchangeKind::Dainya)
        }),
    ]
}

/// Jupiter, Venus and Mercury in kendras, trikonas or the 2nd, with Jupiter
/// in its own, exaltation or a friend's sign
fn saraswati(chart: &Chart) -> Vec<Detection> {
    let trio = [Planet::Mercury, Planet::Jupiter, Planet::Venus];
    let well_placed = trio.iter().all(|&p| {
        let house = chart.house_of(p);
        house == 2 || KENDRAS.contains(&house) || TRIKONAS.contains(&house)
    });
    let jupiter_comfortable = is_dignified(chart, Planet::Jupiter)
        || natural_relation(Planet::Jupiter, dispositor(chart, Planet::Jupiter)) == Relation::Friend;
    when(well_placed && jupiter_comfortable, || {
        Detection::new(
            "Mercury, Jupiter and Venus in kendras, trikonas or the 2nd; Jupiter comfortably placed",
            trio,
        )
    })
}

/// Benefics in kendras with the 6th and 8th free of malefics
fn parvata(chart: &Chart) -> Vec<Detection> {
    let angular: Vec<Planet> = benefics(chart)
        .into_iter()
        .filter(|&p| is_in_kendra(chart, p))
        .collect();
    let sixth_eighth_clear = [6, 8]
        .into_iter()
        .flat_map(|h| chart.planets_in_house(h))
        .all(|p| !is_malefic(chart, p));
    when(!angular.is_empty() && sixth_eighth_clear, || {
        Detection::new(
            format!("{} in kendras; 6th and 8th free of malefics", planet_list(&angular)),
            angular,
        )
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExchangeKind {
    Maha,
    Khala,
    Dainya,
}

/// Classify every sign exchange by the houses involved: any dusthana makes
/// it Dainya, otherwise the 3rd makes it Khala, otherwise Maha.
fn exchanges(chart: &Chart, kind: ExchangeKind) -> Vec<Detection> {
    let mut found = Vec::new();
    for (i, &a) in Planet::CLASSICAL.iter().enumerate() {
        for &b in &Planet::CLASSICAL[i + 1..] {
            if !sign_exchange(chart, a, b) {
                continue;
            }
            let (ha, hb) = (chart.house_of(a), chart.house_of(b));
            let class = if DUSTHANAS.contains(&ha) || DUSTHANAS.contains(&hb) {
                ExchangeKind::Dainya
            } else if ha == 3 || hb == 3 {
                ExchangeKind::Khala
            } else {
                ExchangeKind::Maha
            };
            if class == kind {
                found.push(Detection::new(
                    format!("{a} in house {ha} and {b} in house {hb} exchange signs"),
                    [a, b],
                ));
            }
        }
    }
    found
}
