//! Shared astrological tables.
//!
//! Every rule family reads dignity, lordship, friendship and house-group data
//! from here so that families which must agree cannot drift apart. Bump
//! `TABLES_VERSION` whenever a value changes; it feeds the run fingerprint.
//!
//! Degree ranges and the friendship table follow BPHS ch. 3.

use crate::types::{Dignity, Planet, Sign};

pub const TABLES_VERSION: &str = "1.2.0";

// ---------------------------------------------------------------------------
// House groups
// ---------------------------------------------------------------------------

pub const KENDRAS: [u8; 4] = [1, 4, 7, 10];
pub const TRIKONAS: [u8; 3] = [1, 5, 9];
pub const DUSTHANAS: [u8; 3] = [6, 8, 12];
pub const UPACHAYAS: [u8; 4] = [3, 6, 10, 11];
pub const PANAPHARAS: [u8; 4] = [2, 5, 8, 11];
pub const APOKLIMAS: [u8; 4] = [3, 6, 9, 12];

/// Houses Mars must occupy, counted from the reference point, for Manglik dosha
pub const MANGLIK_HOUSES: [u8; 6] = [1, 2, 4, 7, 8, 12];

// ---------------------------------------------------------------------------
// Sign lordship
// ---------------------------------------------------------------------------

const SIGN_LORDS: [Planet; 12] = [
    Planet::Mars,    // Aries
    Planet::Venus,   // Taurus
    Planet::Mercury, // Gemini
    Planet::Moon,    // Cancer
    Planet::Sun,     // Leo
    Planet::Mercury, // Virgo
    Planet::Venus,   // Libra
    Planet::Mars,    // Scorpio
    Planet::Jupiter, // Sagittarius
    Planet::Saturn,  // Capricorn
    Planet::Saturn,  // Aquarius
    Planet::Jupiter, // Pisces
];

pub fn sign_lord(sign: Sign) -> Planet {
    SIGN_LORDS[(sign.number() - 1) as usize]
}

/// Signs owned by a planet. Empty for the nodes.
pub fn own_signs(planet: Planet) -> &'static [Sign] {
    match planet {
        Planet::Sun => &[Sign::Leo],
        Planet::Moon => &[Sign::Cancer],
        Planet::Mars => &[Sign::Aries, Sign::Scorpio],
        Planet::Mercury => &[Sign::Gemini, Sign::Virgo],
        Planet::Jupiter => &[Sign::Sagittarius, Sign::Pisces],
        Planet::Venus => &[Sign::Taurus, Sign::Libra],
        Planet::Saturn => &[Sign::Capricorn, Sign::Aquarius],
        Planet::Rahu | Planet::Ketu => &[],
    }
}

// ---------------------------------------------------------------------------
// Dignity ranges
// ---------------------------------------------------------------------------

/// A half-open degree span `[from, to)` inside one sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeRange {
    pub sign: Sign,
    pub from: f64,
    pub to: f64,
}

impl DegreeRange {
    const fn whole(sign: Sign) -> Self {
        Self {
            sign,
            from: 0.0,
            to: 30.0,
        }
    }

    pub fn contains(&self, sign: Sign, degree: f64) -> bool {
        self.sign == sign && degree >= self.from && degree < self.to
    }
}

/// Exaltation span. The Moon and Mercury are exalted only up to their
/// mooltrikona boundary; the others hold exaltation across the whole sign.
/// Rahu and Ketu follow the Taurus/Scorpio convention.
pub fn exaltation(planet: Planet) -> DegreeRange {
    match planet {
        Planet::Sun => DegreeRange::whole(Sign::Aries),
        Planet::Moon => DegreeRange {
            sign: Sign::Taurus,
            from: 0.0,
            to: 3.0,
        },
        Planet::Mars => DegreeRange::whole(Sign::Capricorn),
        Planet::Mercury => DegreeRange {
            sign: Sign::Virgo,
            from: 0.0,
            to: 15.0,
        },
        Planet::Jupiter => DegreeRange::whole(Sign::Cancer),
        Planet::Venus => DegreeRange::whole(Sign::Pisces),
        Planet::Saturn => DegreeRange::whole(Sign::Libra),
        Planet::Rahu => DegreeRange::whole(Sign::Taurus),
        Planet::Ketu => DegreeRange::whole(Sign::Scorpio),
    }
}

pub fn exaltation_sign(planet: Planet) -> Sign {
    exaltation(planet).sign
}

/// Debilitation is the whole sign opposite the exaltation sign.
pub fn debilitation_sign(planet: Planet) -> Sign {
    exaltation_sign(planet).nth(7)
}

pub fn mooltrikona(planet: Planet) -> Option<DegreeRange> {
    let (sign, from, to) = match planet {
        Planet::Sun => (Sign::Leo, 0.0, 20.0),
        Planet::Moon => (Sign::Taurus, 3.0, 30.0),
        Planet::Mars => (Sign::Aries, 0.0, 12.0),
        Planet::Mercury => (Sign::Virgo, 15.0, 20.0),
        Planet::Jupiter => (Sign::Sagittarius, 0.0, 10.0),
        Planet::Venus => (Sign::Libra, 0.0, 15.0),
        Planet::Saturn => (Sign::Aquarius, 0.0, 20.0),
        Planet::Rahu | Planet::Ketu => return None,
    };
    Some(DegreeRange { sign, from, to })
}

/// Dignity from sign and degree alone. Checked in precedence order:
/// exaltation, debilitation, mooltrikona, own sign.
pub fn dignity_in(planet: Planet, sign: Sign, degree: f64) -> Dignity {
    if exaltation(planet).contains(sign, degree) {
        return Dignity::Exaltation;
    }
    if debilitation_sign(planet) == sign {
        return Dignity::Debilitation;
    }
    if mooltrikona(planet).is_some_and(|range| range.contains(sign, degree)) {
        return Dignity::Mooltrikona;
    }
    if own_signs(planet).contains(&sign) {
        return Dignity::Own;
    }
    Dignity::Neutral
}

// ---------------------------------------------------------------------------
// Natural friendship
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Friend,
    Neutral,
    Enemy,
}

/// Naisargika relationship of `planet` towards `other`. Neutral for the nodes
/// and for a planet towards itself.
pub fn natural_relation(planet: Planet, other: Planet) -> Relation {
    use Relation::*;

    if planet == other || planet.is_node() || other.is_node() {
        return Neutral;
    }

    if natural_friends(planet).contains(&other) {
        Friend
    } else if natural_enemies(planet).contains(&other) {
        Enemy
    } else {
        Neutral
    }
}

fn natural_friends(planet: Planet) -> &'static [Planet] {
    use Planet::*;
    match planet {
        Sun => &[Moon, Mars, Jupiter],
        Moon => &[Sun, Mercury],
        Mars => &[Sun, Moon, Jupiter],
        Mercury => &[Sun, Venus],
        Jupiter => &[Sun, Moon, Mars],
        Venus => &[Mercury, Saturn],
        Saturn => &[Mercury, Venus],
        Rahu | Ketu => &[],
    }
}

fn natural_enemies(planet: Planet) -> &'static [Planet] {
    use Planet::*;
    match planet {
        Sun => &[Venus, Saturn],
        Moon => &[],
        Mars => &[Mercury],
        Mercury => &[Moon],
        Jupiter => &[Mercury, Venus],
        Venus => &[Sun, Moon],
        Saturn => &[Sun, Moon, Mars],
        Rahu | Ketu => &[],
    }
}

// ---------------------------------------------------------------------------
// Combustion
// ---------------------------------------------------------------------------

/// Classical combustion orb in degrees from the Sun. None for bodies that are
/// never combust.
pub fn combustion_orb(planet: Planet, retrograde: bool) -> Option<f64> {
    match planet {
        Planet::Moon => Some(12.0),
        Planet::Mars => Some(17.0),
        Planet::Mercury => Some(if retrograde { 12.0 } else { 14.0 }),
        Planet::Jupiter => Some(11.0),
        Planet::Venus => Some(if retrograde { 8.0 } else { 10.0 }),
        Planet::Saturn => Some(15.0),
        Planet::Sun | Planet::Rahu | Planet::Ketu => None,
    }
}

// ---------------------------------------------------------------------------
// Gandanta
// ---------------------------------------------------------------------------

/// Width of a gandanta junction on either side of a water/fire boundary
pub const GANDANTA_SPAN_DEG: f64 = 10.0 / 3.0;

/// True when the position lies in the last 3°20' of a water sign or the first
/// 3°20' of a fire sign that follows one (Aries, Leo, Sagittarius).
pub fn in_gandanta(sign: Sign, degree: f64) -> bool {
    match sign {
        Sign::Cancer | Sign::Scorpio | Sign::Pisces => degree >= 30.0 - GANDANTA_SPAN_DEG,
        Sign::Aries | Sign::Leo | Sign::Sagittarius => degree < GANDANTA_SPAN_DEG,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_lords_cover_zodiac() {
        assert_eq!(sign_lord(Sign::Aries), Planet::Mars);
        assert_eq!(sign_lord(Sign::Leo), Planet::Sun);
        assert_eq!(sign_lord(Sign::Pisces), Planet::Jupiter);
        for planet in Planet::CLASSICAL {
            for sign in own_signs(planet) {
                assert_eq!(sign_lord(*sign), planet);
            }
        }
    }

    #[test]
    fn test_debilitation_opposes_exaltation() {
        assert_eq!(debilitation_sign(Planet::Sun), Sign::Libra);
        assert_eq!(debilitation_sign(Planet::Mars), Sign::Cancer);
        assert_eq!(debilitation_sign(Planet::Saturn), Sign::Aries);
        assert_eq!(debilitation_sign(Planet::Rahu), Sign::Scorpio);
    }

    #[test]
    fn test_moon_and_mercury_ranges() {
        assert_eq!(dignity_in(Planet::Moon, Sign::Taurus, 2.5), Dignity::Exaltation);
        assert_eq!(dignity_in(Planet::Moon, Sign::Taurus, 3.0), Dignity::Mooltrikona);
        assert_eq!(dignity_in(Planet::Mercury, Sign::Virgo, 10.0), Dignity::Exaltation);
        assert_eq!(dignity_in(Planet::Mercury, Sign::Virgo, 17.0), Dignity::Mooltrikona);
        assert_eq!(dignity_in(Planet::Mercury, Sign::Virgo, 25.0), Dignity::Own);
        assert_eq!(dignity_in(Planet::Sun, Sign::Leo, 25.0), Dignity::Own);
        assert_eq!(dignity_in(Planet::Sun, Sign::Gemini, 25.0), Dignity::Neutral);
    }

    #[test]
    fn test_gandanta_boundaries() {
        assert!(in_gandanta(Sign::Pisces, 27.0));
        assert!(!in_gandanta(Sign::Pisces, 26.0));
        assert!(in_gandanta(Sign::Aries, 3.0));
        assert!(!in_gandanta(Sign::Aries, 3.5));
        assert!(!in_gandanta(Sign::Taurus, 0.5));
    }

    #[test]
    fn test_friendship_is_not_symmetric() {
        assert_eq!(natural_relation(Planet::Moon, Planet::Mercury), Relation::Friend);
        assert_eq!(natural_relation(Planet::Mercury, Planet::Moon), Relation::Enemy);
        assert_eq!(natural_relation(Planet::Rahu, Planet::Sun), Relation::Neutral);
    }
}
