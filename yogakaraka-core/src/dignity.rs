//! Dignity and relationship helpers shared by every rule family.
//!
//! All functions are total over a validated `Chart`. Missing optional data
//! (no navamsa sign, unknown moon phase) makes the dependent predicate false.

use crate::chart::{angular_distance, Chart};
use crate::constants::{self, KENDRAS, TRIKONAS};
use crate::types::*;

// ===== DIGNITY =====

/// Computed dignity plus the independent vargottama flag.
pub fn dignity_of(chart: &Chart, planet: Planet) -> DignityStatus {
    let p = chart.placement(planet);
    DignityStatus {
        dignity: constants::dignity_in(planet, p.sign, p.degree),
        vargottama: p.d9_sign == Some(p.sign),
    }
}

/// Exalted, mooltrikona or in own sign
pub fn is_dignified(chart: &Chart, planet: Planet) -> bool {
    dignity_of(chart, planet).dignity.is_dignified()
}

pub fn is_exalted(chart: &Chart, planet: Planet) -> bool {
    dignity_of(chart, planet).dignity == Dignity::Exaltation
}

pub fn is_debilitated(chart: &Chart, planet: Planet) -> bool {
    dignity_of(chart, planet).dignity == Dignity::Debilitation
}

/// Lord of the sign a planet occupies
pub fn dispositor(chart: &Chart, planet: Planet) -> Planet {
    constants::sign_lord(chart.sign_of(planet))
}

// ===== BENEFIC / MALEFIC =====

pub fn is_benefic(chart: &Chart, planet: Planet) -> bool {
    let p = chart.placement(planet);
    match planet {
        Planet::Jupiter | Planet::Venus => true,
        Planet::Mercury => chart.options().treat_mercury_as_benefic && !p.tainted,
        Planet::Moon => chart.options().moon_phase == MoonPhase::Waxing && !p.tainted,
        _ => false,
    }
}

pub fn is_malefic(chart: &Chart, planet: Planet) -> bool {
    let p = chart.placement(planet);
    match planet {
        Planet::Sun | Planet::Mars | Planet::Saturn | Planet::Rahu | Planet::Ketu => true,
        Planet::Moon => chart.options().moon_phase == MoonPhase::Waning || p.tainted,
        Planet::Mercury => p.tainted,
        Planet::Jupiter | Planet::Venus => false,
    }
}

// ===== HOUSE ARITHMETIC =====

/// Directional distance from `from` to `to`, counting `from` as 1.
/// `house_distance(1, 10) == 10` and `house_distance(10, 1) == 4`.
pub fn house_distance(from: u8, to: u8) -> u8 {
    (to + 12 - from) % 12 + 1
}

/// Historical undirected difference, kept only for parity with stored results.
pub fn legacy_house_distance(from: u8, to: u8) -> u8 {
    from.abs_diff(to)
}

/// House reached by counting `n` houses from `from` (inclusive)
pub fn house_at(from: u8, n: u8) -> u8 {
    (from + n + 10) % 12 + 1
}

/// Distance used by the relationship predicates, honoring the chart's mode.
pub fn relationship_distance(chart: &Chart, from: u8, to: u8) -> u8 {
    match chart.options().house_distance_mode {
        HouseDistanceMode::Directional => house_distance(from, to),
        HouseDistanceMode::LegacyAbsolute => legacy_house_distance(from, to),
    }
}

pub fn in_kendra_relationship(chart: &Chart, from: u8, to: u8) -> bool {
    KENDRAS.contains(&relationship_distance(chart, from, to))
}

pub fn in_trikona_relationship(chart: &Chart, from: u8, to: u8) -> bool {
    TRIKONAS.contains(&relationship_distance(chart, from, to))
}

pub fn is_in_kendra(chart: &Chart, planet: Planet) -> bool {
    KENDRAS.contains(&chart.house_of(planet))
}

pub fn is_in_trikona(chart: &Chart, planet: Planet) -> bool {
    TRIKONAS.contains(&chart.house_of(planet))
}

pub fn is_in_kendra_or_trikona(chart: &Chart, planet: Planet) -> bool {
    is_in_kendra(chart, planet) || is_in_trikona(chart, planet)
}

pub fn is_in_dusthana(chart: &Chart, planet: Planet) -> bool {
    constants::DUSTHANAS.contains(&chart.house_of(planet))
}

/// Planets whose directional distance from `reference_house` is `n`
pub fn planets_at_distance(chart: &Chart, reference_house: u8, n: u8) -> Vec<Planet> {
    chart.planets_in_house(house_at(reference_house, n))
}

// ===== LORDSHIP =====

pub fn lord_of_house(chart: &Chart, house: u8) -> Planet {
    // sign number ((ascendant + house - 2) mod 12) + 1
    constants::sign_lord(chart.sign_on_house(house))
}

// ===== ASPECTS AND CONJUNCTION =====

/// Graha drishti: every planet aspects the 7th house from itself; Mars also
/// the 4th and 8th, Jupiter the 5th and 9th, Saturn the 3rd and 10th.
pub fn aspects(chart: &Chart, planet: Planet, to_house: u8) -> bool {
    let distance = house_distance(chart.house_of(planet), to_house);
    if distance == 7 {
        return true;
    }
    match planet {
        Planet::Mars => matches!(distance, 4 | 8),
        Planet::Jupiter => matches!(distance, 5 | 9),
        Planet::Saturn => matches!(distance, 3 | 10),
        _ => false,
    }
}

/// `by` casts an aspect on the house `target` occupies
pub fn aspects_planet(chart: &Chart, by: Planet, target: Planet) -> bool {
    by != target && aspects(chart, by, chart.house_of(target))
}

pub fn mutual_aspect(chart: &Chart, a: Planet, b: Planet) -> bool {
    aspects_planet(chart, a, b) && aspects_planet(chart, b, a)
}

/// Same sign
pub fn are_conjunct(chart: &Chart, a: Planet, b: Planet) -> bool {
    a != b && chart.sign_of(a) == chart.sign_of(b)
}

/// Conjunct with or aspected by `by`
pub fn is_influenced_by(chart: &Chart, target: Planet, by: Planet) -> bool {
    are_conjunct(chart, target, by) || aspects_planet(chart, by, target)
}

/// Parivartana: each planet occupies a sign ruled by the other
pub fn sign_exchange(chart: &Chart, a: Planet, b: Planet) -> bool {
    a != b && dispositor(chart, a) == b && dispositor(chart, b) == a
}

/// Angular separation from the Sun in degrees, in [0, 180]
pub fn separation_from_sun(chart: &Chart, planet: Planet) -> f64 {
    angular_distance(
        chart.placement(Planet::Sun).longitude(),
        chart.placement(planet).longitude(),
    )
}

// ===== DEBILITATION CANCELLATION =====

/// The first classical neecha-bhanga condition for a debilitated planet, if
/// any. None when the planet is not debilitated.
pub fn neecha_bhanga(chart: &Chart, planet: Planet) -> Option<String> {
    neecha_bhanga_with(chart, planet, true)
}

/// Neecha bhanga as applied to yoga cancellation. Only a dispositor in a
/// kendra from the ascendant counts unless `extended` also admits the Moon
/// kendras, the exaltation lord and vargottama.
pub fn neecha_bhanga_with(chart: &Chart, planet: Planet, extended: bool) -> Option<String> {
    let status = dignity_of(chart, planet);
    if status.dignity != Dignity::Debilitation {
        return None;
    }

    let disp = dispositor(chart, planet);
    if in_kendra_relationship(chart, 1, chart.house_of(disp)) {
        return Some(format!("{planet}'s dispositor {disp} is in a kendra from the ascendant"));
    }
    if !extended {
        return None;
    }

    let moon = chart.house_of(Planet::Moon);
    if in_kendra_relationship(chart, moon, chart.house_of(disp)) {
        return Some(format!("{planet}'s dispositor {disp} is in a kendra from the Moon"));
    }

    let exaltation_lord = constants::sign_lord(constants::exaltation_sign(planet));
    let house = chart.house_of(exaltation_lord);
    if in_kendra_relationship(chart, 1, house) || in_kendra_relationship(chart, moon, house) {
        return Some(format!(
            "{exaltation_lord}, lord of {planet}'s exaltation sign, is in a kendra from the ascendant or the Moon"
        ));
    }

    if status.vargottama {
        return Some(format!("{planet} is vargottama"));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aries_chart() -> Chart {
        Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Sagittarius, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_house_distance_is_directional() {
        for h in 1..=12 {
            assert_eq!(house_distance(h, h), 1);
        }
        assert_eq!(house_distance(1, 10), 10);
        assert_eq!(house_distance(10, 1), 4);
        assert_eq!(house_distance(12, 2), 3);
        assert_eq!(house_at(10, 4), 1);
        assert_eq!(house_at(1, 12), 12);
    }

    #[test]
    fn test_saturn_special_aspects() {
        let chart = aries_chart();
        let saturn = chart.house_of(Planet::Saturn);
        assert!(aspects(&chart, Planet::Saturn, house_at(saturn, 3)));
        assert!(aspects(&chart, Planet::Saturn, house_at(saturn, 10)));
        assert!(aspects(&chart, Planet::Saturn, house_at(saturn, 7)));
        assert!(!aspects(&chart, Planet::Saturn, house_at(saturn, 2)));
        assert!(!aspects(&chart, Planet::Saturn, house_at(saturn, 9)));
    }

    #[test]
    fn test_lordship_from_aries() {
        let chart = aries_chart();
        assert_eq!(lord_of_house(&chart, 1), Planet::Mars);
        assert_eq!(lord_of_house(&chart, 5), Planet::Sun);
        assert_eq!(lord_of_house(&chart, 10), Planet::Saturn);
        assert_eq!(lord_of_house(&chart, 12), Planet::Jupiter);
    }

    #[test]
    fn test_dignities() {
        let chart = aries_chart();
        assert_eq!(dignity_of(&chart, Planet::Mars).dignity, Dignity::Exaltation);
        assert_eq!(dignity_of(&chart, Planet::Sun).dignity, Dignity::Mooltrikona);
        assert_eq!(dignity_of(&chart, Planet::Moon).dignity, Dignity::Own);
        assert_eq!(dignity_of(&chart, Planet::Venus).dignity, Dignity::Own);
        assert!(!dignity_of(&chart, Planet::Mars).vargottama);
    }

    #[test]
    fn test_vargottama_reported_alongside_debilitation() {
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Libra, 10.0)
            .navamsa(Planet::Sun, Sign::Libra)
            .place(Planet::Moon, Sign::Taurus, 15.0)
            .place(Planet::Mars, Sign::Aries, 5.0)
            .place(Planet::Mercury, Sign::Libra, 20.0)
            .place(Planet::Jupiter, Sign::Gemini, 5.0)
            .place(Planet::Venus, Sign::Scorpio, 2.0)
            .place(Planet::Saturn, Sign::Pisces, 25.0)
            .nodes(Sign::Virgo, 12.0)
            .build()
            .unwrap();
        let status = dignity_of(&chart, Planet::Sun);
        assert_eq!(status.dignity, Dignity::Debilitation);
        assert!(status.vargottama);
    }

    #[test]
    fn test_benefic_malefic_context() {
        let chart = aries_chart();
        assert!(is_benefic(&chart, Planet::Jupiter));
        assert!(is_benefic(&chart, Planet::Mercury));
        assert!(!is_benefic(&chart, Planet::Moon));
        assert!(!is_malefic(&chart, Planet::Moon));
        assert!(is_malefic(&chart, Planet::Ketu));
        assert!(!is_malefic(&chart, Planet::Venus));

        let waning = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .tainted(Planet::Mercury)
            .place(Planet::Jupiter, Sign::Sagittarius, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .moon_phase(MoonPhase::Waning)
            .build()
            .unwrap();
        assert!(is_malefic(&waning, Planet::Moon));
        assert!(is_malefic(&waning, Planet::Mercury));
        assert!(!is_benefic(&waning, Planet::Mercury));
    }

    #[test]
    fn test_legacy_mode_changes_relationships() {
        let chart = aries_chart();
        // houses 1 and 10: directional distance 10, legacy difference 9
        assert!(in_kendra_relationship(&chart, 1, 10));
        let legacy = chart.with_house_distance_mode(HouseDistanceMode::LegacyAbsolute);
        assert!(!in_kendra_relationship(&legacy, 1, 10));
        assert!(in_kendra_relationship(&legacy, 1, 11));

        assert_eq!(legacy_house_distance(1, 10), 9);
        assert_eq!(legacy_house_distance(4, 4), 0);
        assert!(in_kendra_relationship(&chart, 4, 4));
        assert!(!in_kendra_relationship(&legacy, 4, 4));
        assert!(!in_trikona_relationship(&legacy, 4, 4));
    }

    #[test]
    fn test_neecha_bhanga_conditions() {
        // Mercury debilitated in Pisces (house 12), dispositor Jupiter in house 3,
        // Moon in house 2: no cancellation
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Pisces, 2.0)
            .place(Planet::Moon, Sign::Taurus, 15.0)
            .place(Planet::Mars, Sign::Virgo, 5.0)
            .place(Planet::Mercury, Sign::Pisces, 28.0)
            .place(Planet::Jupiter, Sign::Gemini, 5.0)
            .place(Planet::Venus, Sign::Aquarius, 2.0)
            .place(Planet::Saturn, Sign::Scorpio, 25.0)
            .nodes(Sign::Cancer, 12.0)
            .build()
            .unwrap();
        assert!(is_debilitated(&chart, Planet::Mercury));
        assert_eq!(neecha_bhanga(&chart, Planet::Mercury), None);

        // Jupiter moved to Cancer, house 4, a kendra from the ascendant
        let rescued = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Pisces, 2.0)
            .place(Planet::Moon, Sign::Taurus, 15.0)
            .place(Planet::Mars, Sign::Virgo, 5.0)
            .place(Planet::Mercury, Sign::Pisces, 28.0)
            .place(Planet::Jupiter, Sign::Cancer, 5.0)
            .place(Planet::Venus, Sign::Aquarius, 2.0)
            .place(Planet::Saturn, Sign::Scorpio, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap();
        let reason = neecha_bhanga(&rescued, Planet::Mercury).unwrap();
        assert!(reason.contains("dispositor Jupiter"));
        assert!(neecha_bhanga_with(&rescued, Planet::Mercury, false).is_some());
    }

    #[test]
    fn test_moon_kendra_dispositor_needs_extended_rules() {
        // Mercury debilitated in Pisces (house 12), Jupiter in Gemini (house 3),
        // Moon in Pisces: Jupiter sits in the 4th from the Moon only
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Pisces, 2.0)
            .place(Planet::Moon, Sign::Pisces, 15.0)
            .place(Planet::Mars, Sign::Virgo, 5.0)
            .place(Planet::Mercury, Sign::Pisces, 28.0)
            .place(Planet::Jupiter, Sign::Gemini, 5.0)
            .place(Planet::Venus, Sign::Aquarius, 2.0)
            .place(Planet::Saturn, Sign::Scorpio, 25.0)
            .nodes(Sign::Cancer, 12.0)
            .build()
            .unwrap();
        assert_eq!(neecha_bhanga_with(&chart, Planet::Mercury, false), None);
        let reason = neecha_bhanga_with(&chart, Planet::Mercury, true).unwrap();
        assert!(reason.contains("kendra from the Moon"));
    }
}
