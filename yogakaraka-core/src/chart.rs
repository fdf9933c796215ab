use crate::constants::{combustion_orb, dignity_in};
use crate::error::MalformedChartError;
use crate::types::*;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

// ===== INPUT CONTRACT =====
// What the chart provider sends. Nothing here is trusted until `Chart::new`
// has checked it.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementInput {
    pub planet: Planet,
    pub sign: u8,
    pub house: u8,
    pub degree: f64,
    #[serde(default)]
    pub retrograde: bool,
    #[serde(default)]
    pub combust: bool,
    #[serde(default)]
    pub dignity: Option<DignityHint>,
    /// Afflicted by malefic conjunction or aspect
    #[serde(default)]
    pub tainted: bool,
    #[serde(default)]
    pub d9_sign: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default = "default_true")]
    pub treat_mercury_as_benefic: bool,
    #[serde(default)]
    pub moon_phase: MoonPhase,
    #[serde(default)]
    pub house_distance_mode: HouseDistanceMode,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            treat_mercury_as_benefic: true,
            moon_phase: MoonPhase::Unknown,
            house_distance_mode: HouseDistanceMode::Directional,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInput {
    pub ascendant_sign: u8,
    pub placements: Vec<PlacementInput>,
    #[serde(default)]
    pub options: ChartOptions,
}

// ===== VALIDATED CHART =====

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetPlacement {
    pub planet: Planet,
    pub sign: Sign,
    pub house: u8,
    pub degree: f64,
    pub retrograde: bool,
    pub combust: bool,
    pub dignity_hint: Option<DignityHint>,
    pub tainted: bool,
    pub d9_sign: Option<Sign>,
}

impl PlanetPlacement {
    /// Sidereal longitude in [0, 360)
    pub fn longitude(&self) -> f64 {
        (self.sign.number() - 1) as f64 * 30.0 + self.degree
    }
}

/// One natal chart. Every planet is present and every placement satisfies
/// `house == ((sign - ascendant) mod 12) + 1`; rules rely on both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChartInput", into = "ChartInput")]
pub struct Chart {
    ascendant: Sign,
    /// Indexed by `Planet::index`
    placements: Vec<PlanetPlacement>,
    options: ChartOptions,
}

/// House a sign falls in for the given ascendant
pub fn house_from_ascendant(ascendant: Sign, sign: Sign) -> u8 {
    (sign.number() + 12 - ascendant.number()) % 12 + 1
}

impl Chart {
    pub fn new(input: ChartInput) -> Result<Self, MalformedChartError> {
        let ascendant = Sign::from_number(input.ascendant_sign)
            .ok_or(MalformedChartError::AscendantOutOfRange(input.ascendant_sign))?;

        let mut slots: Vec<Option<PlanetPlacement>> = vec![None; Planet::ALL.len()];
        for raw in &input.placements {
            let placement = validate_placement(ascendant, raw)?;
            let slot = &mut slots[raw.planet.index()];
            if slot.is_some() {
                return Err(MalformedChartError::DuplicatePlanet(raw.planet));
            }
            *slot = Some(placement);
        }

        let mut placements = Vec::with_capacity(Planet::ALL.len());
        for planet in Planet::ALL {
            match slots[planet.index()] {
                Some(placement) => placements.push(placement),
                None => return Err(MalformedChartError::MissingPlanet(planet)),
            }
        }

        let rahu = placements[Planet::Rahu.index()].sign;
        let ketu = placements[Planet::Ketu.index()].sign;
        if rahu.nth(7) != ketu {
            return Err(MalformedChartError::NodesNotOpposed {
                rahu: rahu.number(),
                ketu: ketu.number(),
            });
        }

        let chart = Self {
            ascendant,
            placements,
            options: input.options,
        };
        chart.log_advisory_mismatches();
        Ok(chart)
    }

    pub fn builder(ascendant: Sign) -> ChartBuilder {
        ChartBuilder::new(ascendant)
    }

    pub fn ascendant(&self) -> Sign {
        self.ascendant
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    pub fn placement(&self, planet: Planet) -> &PlanetPlacement {
        &self.placements[planet.index()]
    }

    /// Placements in planet-index order
    pub fn placements(&self) -> impl Iterator<Item = &PlanetPlacement> {
        self.placements.iter()
    }

    pub fn house_of(&self, planet: Planet) -> u8 {
        self.placement(planet).house
    }

    pub fn sign_of(&self, planet: Planet) -> Sign {
        self.placement(planet).sign
    }

    /// Sign occupying a house (1-based) counted from the ascendant
    pub fn sign_on_house(&self, house: u8) -> Sign {
        self.ascendant.nth(house)
    }

    /// Planets in a house, in planet-index order
    pub fn planets_in_house(&self, house: u8) -> Vec<Planet> {
        self.placements
            .iter()
            .filter(|p| p.house == house)
            .map(|p| p.planet)
            .collect()
    }

    pub fn is_occupied(&self, house: u8) -> bool {
        self.placements.iter().any(|p| p.house == house)
    }

    /// Copy of this chart with a different house-distance mode
    pub fn with_house_distance_mode(&self, mode: HouseDistanceMode) -> Chart {
        let mut chart = self.clone();
        chart.options.house_distance_mode = mode;
        chart
    }

    /// Upstream dignity and combustion labels are advisory. Disagreements are
    /// traced so provider drift is visible, never fatal.
    fn log_advisory_mismatches(&self) {
        for p in &self.placements {
            if let Some(hint) = p.dignity_hint {
                let computed = dignity_in(p.planet, p.sign, p.degree);
                let agrees = match hint {
                    DignityHint::Exaltation => computed == Dignity::Exaltation,
                    DignityHint::Own => computed == Dignity::Own,
                    DignityHint::Mooltrikona => computed == Dignity::Mooltrikona,
                    DignityHint::Debilitation => computed == Dignity::Debilitation,
                    DignityHint::Neutral => computed == Dignity::Neutral,
                    DignityHint::Vargottama => p.d9_sign == Some(p.sign),
                };
                if !agrees {
                    log::debug!(
                        "{}: upstream dignity {:?} ignored, computed {:?}",
                        p.planet,
                        hint,
                        computed
                    );
                }
            }

            if p.combust {
                let sun = self.placement(Planet::Sun).longitude();
                let separation = angular_distance(sun, p.longitude());
                match combustion_orb(p.planet, p.retrograde) {
                    Some(orb) if separation <= orb => {}
                    Some(orb) => log::debug!(
                        "{}: flagged combust at {:.1}° from the Sun (classical orb {:.0}°)",
                        p.planet,
                        separation,
                        orb
                    ),
                    None => log::debug!("{}: flagged combust but cannot be combust", p.planet),
                }
            }
        }
    }
}

/// Shortest arc between two longitudes, in [0, 180]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

fn validate_placement(
    ascendant: Sign,
    raw: &PlacementInput,
) -> Result<PlanetPlacement, MalformedChartError> {
    let planet = raw.planet;
    let sign = Sign::from_number(raw.sign).ok_or(MalformedChartError::SignOutOfRange {
        planet,
        sign: raw.sign,
    })?;
    if !(1..=12).contains(&raw.house) {
        return Err(MalformedChartError::HouseOutOfRange {
            planet,
            house: raw.house,
        });
    }
    if !raw.degree.is_finite() || raw.degree < 0.0 || raw.degree >= 30.0 {
        return Err(MalformedChartError::DegreeOutOfRange {
            planet,
            degree: raw.degree,
        });
    }
    let d9_sign = match raw.d9_sign {
        Some(n) => Some(
            Sign::from_number(n)
                .ok_or(MalformedChartError::NavamsaSignOutOfRange { planet, sign: n })?,
        ),
        None => None,
    };

    let expected = house_from_ascendant(ascendant, sign);
    if raw.house != expected {
        return Err(MalformedChartError::HouseSignMismatch {
            planet,
            sign: raw.sign,
            house: raw.house,
            ascendant: ascendant.number(),
            expected,
        });
    }

    Ok(PlanetPlacement {
        planet,
        sign,
        house: raw.house,
        degree: raw.degree,
        retrograde: raw.retrograde,
        combust: raw.combust,
        dignity_hint: raw.dignity,
        tainted: raw.tainted,
        d9_sign,
    })
}

impl TryFrom<ChartInput> for Chart {
    type Error = MalformedChartError;

    fn try_from(input: ChartInput) -> Result<Self, Self::Error> {
        Chart::new(input)
    }
}

impl From<Chart> for ChartInput {
    fn from(chart: Chart) -> Self {
        ChartInput {
            ascendant_sign: chart.ascendant.number(),
            placements: chart
                .placements
                .iter()
                .map(|p| PlacementInput {
                    planet: p.planet,
                    sign: p.sign.number(),
                    house: p.house,
                    degree: p.degree,
                    retrograde: p.retrograde,
                    combust: p.combust,
                    dignity: p.dignity_hint,
                    tainted: p.tainted,
                    d9_sign: p.d9_sign.map(Sign::number),
                })
                .collect(),
            options: chart.options,
        }
    }
}

// ===== BUILDER =====

/// Assembles a `ChartInput` from signs and degrees, deriving each house from
/// the ascendant. Validation still happens in `build`.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    ascendant: Sign,
    placements: Vec<PlacementInput>,
    options: ChartOptions,
}

impl ChartBuilder {
    pub fn new(ascendant: Sign) -> Self {
        Self {
            ascendant,
            placements: Vec::new(),
            options: ChartOptions::default(),
        }
    }

    pub fn place(mut self, planet: Planet, sign: Sign, degree: f64) -> Self {
        self.placements.push(PlacementInput {
            planet,
            sign: sign.number(),
            house: house_from_ascendant(self.ascendant, sign),
            degree,
            retrograde: false,
            combust: false,
            dignity: None,
            tainted: false,
            d9_sign: None,
        });
        self
    }

    /// Places Rahu and Ketu on opposite signs at the same degree
    pub fn nodes(self, rahu: Sign, degree: f64) -> Self {
        self.place(Planet::Rahu, rahu, degree)
            .place(Planet::Ketu, rahu.nth(7), degree)
    }

    pub fn retrograde(self, planet: Planet) -> Self {
        self.update(planet, |p| p.retrograde = true)
    }

    pub fn combust(self, planet: Planet) -> Self {
        self.update(planet, |p| p.combust = true)
    }

    pub fn tainted(self, planet: Planet) -> Self {
        self.update(planet, |p| p.tainted = true)
    }

    pub fn navamsa(self, planet: Planet, sign: Sign) -> Self {
        self.update(planet, |p| p.d9_sign = Some(sign.number()))
    }

    pub fn moon_phase(mut self, phase: MoonPhase) -> Self {
        self.options.moon_phase = phase;
        self
    }

    pub fn mercury_benefic(mut self, benefic: bool) -> Self {
        self.options.treat_mercury_as_benefic = benefic;
        self
    }

    fn update(mut self, planet: Planet, f: impl FnOnce(&mut PlacementInput)) -> Self {
        if let Some(p) = self.placements.iter_mut().find(|p| p.planet == planet) {
            f(p);
        }
        self
    }

    pub fn into_input(self) -> ChartInput {
        ChartInput {
            ascendant_sign: self.ascendant.number(),
            placements: self.placements,
            options: self.options,
        }
    }

    pub fn build(self) -> Result<Chart, MalformedChartError> {
        Chart::new(self.into_input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_builder() -> ChartBuilder {
        Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Sagittarius, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .nodes(Sign::Gemini, 12.0)
    }

    #[test]
    fn test_builder_derives_houses() {
        let chart = full_builder().build().unwrap();
        assert_eq!(chart.house_of(Planet::Mars), 10);
        assert_eq!(chart.house_of(Planet::Sun), 5);
        assert_eq!(chart.house_of(Planet::Ketu), 9);
        assert_eq!(chart.sign_on_house(10), Sign::Capricorn);
    }

    #[test]
    fn test_missing_planet_rejected() {
        let mut input = full_builder().into_input();
        input.placements.retain(|p| p.planet != Planet::Venus);
        assert_eq!(
            Chart::new(input).unwrap_err(),
            MalformedChartError::MissingPlanet(Planet::Venus)
        );
    }

    #[test]
    fn test_duplicate_planet_rejected() {
        let mut input = full_builder().into_input();
        let extra = input.placements[0].clone();
        input.placements.push(extra);
        assert_eq!(
            Chart::new(input).unwrap_err(),
            MalformedChartError::DuplicatePlanet(Planet::Sun)
        );
    }

    #[test]
    fn test_house_sign_mismatch_rejected() {
        let mut input = full_builder().into_input();
        input.placements[2].house = 9;
        assert!(matches!(
            Chart::new(input).unwrap_err(),
            MalformedChartError::HouseSignMismatch {
                planet: Planet::Mars,
                expected: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_range_checks() {
        let mut input = full_builder().into_input();
        input.placements[1].degree = 30.0;
        assert!(matches!(
            Chart::new(input).unwrap_err(),
            MalformedChartError::DegreeOutOfRange { planet: Planet::Moon, .. }
        ));

        let mut input = full_builder().into_input();
        input.ascendant_sign = 13;
        assert_eq!(
            Chart::new(input).unwrap_err(),
            MalformedChartError::AscendantOutOfRange(13)
        );

        let mut input = full_builder().into_input();
        input.placements[0].sign = 0;
        assert!(matches!(
            Chart::new(input).unwrap_err(),
            MalformedChartError::SignOutOfRange { planet: Planet::Sun, sign: 0 }
        ));
    }

    #[test]
    fn test_nodes_must_oppose() {
        let input = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Sagittarius, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .place(Planet::Rahu, Sign::Gemini, 12.0)
            .place(Planet::Ketu, Sign::Capricorn, 12.0)
            .into_input();
        assert_eq!(
            Chart::new(input).unwrap_err(),
            MalformedChartError::NodesNotOpposed { rahu: 3, ketu: 10 }
        );
    }

    #[test]
    fn test_json_roundtrip_keeps_validation() {
        let chart = full_builder().build().unwrap();
        let json = serde_json::to_string(&chart).unwrap();
        let back: Chart = serde_json::from_str(&json).unwrap();
        assert_eq!(chart, back);

        let broken = json.replace("\"ascendant_sign\":1", "\"ascendant_sign\":2");
        assert!(serde_json::from_str::<Chart>(&broken).is_err());
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert_eq!(angular_distance(350.0, 10.0), 20.0);
        assert_eq!(angular_distance(10.0, 350.0), 20.0);
        assert_eq!(angular_distance(0.0, 180.0), 180.0);
    }
}
