use super::{planet_list, when, Detection, YogaRule};
use crate::chart::Chart;
use crate::dignity::{are_conjunct, planets_at_distance};
use crate::types::*;

const REFERENCE: &str = "BPHS Ch. 38";

/// Planets other than the Moon flanking the Sun: (2nd, 12th)
fn flanking(chart: &Chart) -> (Vec<Planet>, Vec<Planet>) {
    let sun = chart.house_of(Planet::Sun);
    let pick = |n| -> Vec<Planet> {
        planets_at_distance(chart, sun, n)
            .into_iter()
            .filter(|&p| p != Planet::Moon)
            .collect()
    };
    (pick(2), pick(12))
}

pub fn rules() -> Vec<YogaRule> {
    vec![
        YogaRule::new("solar.vesi", "Vesi Yoga", RuleFamily::SunBased, |chart| {
            let (second, twelfth) = flanking(chart);
            when(!second.is_empty() && twelfth.is_empty(), || {
                Detection::new(
                    format!("{} in the 2nd from the Sun", planet_list(&second)),
                    std::iter::once(Planet::Sun).chain(second.iter().copied()),
                )
            })
        })
        .reference(REFERENCE),
        YogaRule::new("solar.vasi", "Vasi Yoga", RuleFamily::SunBased, |chart| {
            let (second, twelfth) = flanking(chart);
            when(second.is_empty() && !twelfth.is_empty(), || {
                Detection::new(
                    format!("{} in the 12th from the Sun", planet_list(&twelfth)),
                    std::iter::once(Planet::Sun).chain(twelfth.iter().copied()),
                )
            })
        })
        .reference(REFERENCE),
        YogaRule::new(
            "solar.ubhayachari",
            "Ubhayachari Yoga",
            RuleFamily::SunBased,
            |chart| {
                let (second, twelfth) = flanking(chart);
                when(!second.is_empty() && !twelfth.is_empty(), || {
                    let mut planets = vec![Planet::Sun];
                    planets.extend(second.iter().chain(twelfth.iter()).copied());
                    planets.sort();
                    Detection::new(
                        format!(
                            "{} in the 2nd and {} in the 12th from the Sun",
                            planet_list(&second),
                            planet_list(&twelfth)
                        ),
                        planets,
                    )
                })
            },
        )
        .reference(REFERENCE),
        YogaRule::new(
            "solar.budha_aditya",
            "Budha-Aditya Yoga",
            RuleFamily::SunBased,
            |chart| {
                when(are_conjunct(chart, Planet::Sun, Planet::Mercury), || {
                    Detection::new(
                        format!("Sun and Mercury together in {}", chart.sign_of(Planet::Sun)),
                        [Planet::Sun, Planet::Mercury],
                    )
                })
            },
        )
        .reference("Phaladeepika Ch. 6"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(chart: &Chart) -> Vec<RawYoga> {
        rules().iter().flat_map(|rule| rule.detect(chart)).collect()
    }

    #[test]
    fn test_ubhayachari_replaces_vesi_and_vasi() {
        let chart = Chart::builder(Sign::Aries)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Virgo, 20.0)
            .place(Planet::Mercury, Sign::Leo, 20.0)
            .place(Planet::Jupiter, Sign::Pisces, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap();
        // Moon alone in the 12th from the Sun does not count
        let found = detect(&chart);
        let names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"Vesi Yoga"));
        assert!(!names.contains(&"Ubhayachari Yoga"));
        assert!(names.contains(&"Budha-Aditya Yoga"));

        let vesi = found.iter().find(|r| r.name == "Vesi Yoga").unwrap();
        assert_eq!(vesi.contributing_planets, vec![Planet::Sun, Planet::Mars]);
    }
}
