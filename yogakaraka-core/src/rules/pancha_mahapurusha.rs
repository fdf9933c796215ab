use super::{slug, when, Detection, YogaRule};
use crate::dignity::{dignity_of, is_in_kendra};
use crate::types::*;

const MAHAPURUSHA: [(Planet, &str); 5] = [
    (Planet::Mars, "Ruchaka Yoga"),
    (Planet::Mercury, "Bhadra Yoga"),
    (Planet::Jupiter, "Hamsa Yoga"),
    (Planet::Venus, "Malavya Yoga"),
    (Planet::Saturn, "Sasa Yoga"),
];

/// Planet in a kendra from the ascendant and in its own, mooltrikona or
/// exaltation sign.
pub fn rules() -> Vec<YogaRule> {
    MAHAPURUSHA
        .iter()
        .map(|&(planet, name)| {
            YogaRule::new(
                format!("pmp.{}", slug(name)),
                name,
                RuleFamily::PanchaMahapurusha,
                move |chart| {
                    let dignity = dignity_of(chart, planet).dignity;
                    when(is_in_kendra(chart, planet) && dignity.is_dignified(), || {
                        Detection::new(
                            format!(
                                "{planet} {} in {} in house {}",
                                dignity.label(),
                                chart.sign_of(planet),
                                chart.house_of(planet)
                            ),
                            [planet],
                        )
                    })
                },
            )
            .reference("BPHS Ch. 75")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Chart;

    fn chart_with_mars(sign: Sign) -> Chart {
        Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, sign, 28.0)
            .place(Planet::Mercury, Sign::Leo, 20.0)
            .place(Planet::Jupiter, Sign::Gemini, 5.0)
            .place(Planet::Venus, Sign::Virgo, 20.0)
            .place(Planet::Saturn, Sign::Leo, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap()
    }

    fn ruchaka() -> YogaRule {
        rules().into_iter().find(|r| r.canonical_name == "Ruchaka Yoga").unwrap()
    }

    #[test]
    fn test_exalted_mars_in_tenth() {
        let found = ruchaka().detect(&chart_with_mars(Sign::Capricorn));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].contributing_planets, vec![Planet::Mars]);
        assert!(found[0].description.contains("exalted"));
    }

    #[test]
    fn test_own_sign_outside_kendra() {
        // Scorpio is the 8th house from Aries
        assert!(ruchaka().detect(&chart_with_mars(Sign::Scorpio)).is_empty());
    }

    #[test]
    fn test_neutral_in_kendra() {
        // Libra is the 7th house but not a dignity for Mars
        assert!(ruchaka().detect(&chart_with_mars(Sign::Libra)).is_empty());
    }
}
