//! Raj yogas. The kendra-trikona lord relationships are produced by one
//! combinator over (kendra, trikona, mode); the rest are leaf rules.

use super::{when, Detection, YogaRule};
use crate::chart::Chart;
use crate::constants::DUSTHANAS;
use crate::dignity::*;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KENDRA_HOUSES: [u8; 4] = [1, 4, 7, 10];
pub const TRIKONA_HOUSES: [u8; 2] = [5, 9];

/// How two house lords can be connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationMode {
    Conjunction,
    MutualAspect,
    MutualKendra,
    MutualTrikona,
    SignExchange,
}

impl RelationMode {
    pub const ALL: [RelationMode; 5] = [
        RelationMode::Conjunction,
        RelationMode::MutualAspect,
        RelationMode::MutualKendra,
        RelationMode::MutualTrikona,
        RelationMode::SignExchange,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RelationMode::Conjunction => "Conjunction",
            RelationMode::MutualAspect => "Mutual Aspect",
            RelationMode::MutualKendra => "Mutual Kendra",
            RelationMode::MutualTrikona => "Mutual Trikona",
            RelationMode::SignExchange => "Sign Exchange",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            RelationMode::Conjunction => "conjunction",
            RelationMode::MutualAspect => "mutual_aspect",
            RelationMode::MutualKendra => "mutual_kendra",
            RelationMode::MutualTrikona => "mutual_trikona",
            RelationMode::SignExchange => "sign_exchange",
        }
    }

    /// Whether two distinct planets stand in this relation. Kendra and
    /// trikona distances follow the chart's house-distance mode.
    pub fn holds(self, chart: &Chart, a: Planet, b: Planet) -> bool {
        if a == b {
            return false;
        }
        let (ha, hb) = (chart.house_of(a), chart.house_of(b));
        match self {
            RelationMode::Conjunction => ha == hb,
            RelationMode::MutualAspect => mutual_aspect(chart, a, b),
            RelationMode::MutualKendra => in_kendra_relationship(chart, ha, hb),
            RelationMode::MutualTrikona => in_trikona_relationship(chart, ha, hb),
            RelationMode::SignExchange => sign_exchange(chart, a, b),
        }
    }
}

impl fmt::Display for RelationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical name of one systematic combination, e.g.
/// `Kendra-Trikona Raj Yoga (1-5, Conjunction)`
pub fn systematic_name(kendra: u8, trikona: u8, mode: RelationMode) -> String {
    format!("Kendra-Trikona Raj Yoga ({kendra}-{trikona}, {mode})")
}

/// Every systematic canonical name in registry order
pub fn systematic_names() -> Vec<String> {
    let mut names = Vec::new();
    for k in KENDRA_HOUSES {
        for t in TRIKONA_HOUSES {
            for mode in RelationMode::ALL {
                names.push(systematic_name(k, t, mode));
            }
        }
    }
    names
}

/// All five mode verdicts for one kendra/trikona lord pair
#[derive(Debug, Clone, PartialEq)]
pub struct PairEvaluation {
    pub kendra: u8,
    pub trikona: u8,
    pub kendra_lord: Planet,
    pub trikona_lord: Planet,
    pub verdicts: [(RelationMode, bool); 5],
}

impl PairEvaluation {
    /// One planet rules both houses; that is a yogakaraka, not a relation
    pub fn same_lord(&self) -> bool {
        self.kendra_lord == self.trikona_lord
    }

    pub fn satisfied(&self) -> impl Iterator<Item = RelationMode> + '_ {
        self.verdicts
            .iter()
            .filter(|(_, holds)| *holds)
            .map(|(mode, _)| *mode)
    }
}

pub fn evaluate_pair(chart: &Chart, kendra: u8, trikona: u8) -> PairEvaluation {
    let kendra_lord = lord_of_house(chart, kendra);
    let trikona_lord = lord_of_house(chart, trikona);
    PairEvaluation {
        kendra,
        trikona,
        kendra_lord,
        trikona_lord,
        verdicts: RelationMode::ALL.map(|mode| (mode, mode.holds(chart, kendra_lord, trikona_lord))),
    }
}

fn systematic_rules() -> Vec<YogaRule> {
    let mut rules = Vec::new();
    for k in KENDRA_HOUSES {
        for t in TRIKONA_HOUSES {
            for mode in RelationMode::ALL {
                rules.push(
                    YogaRule::new(
                        format!("raj.kt.{k}_{t}.{}", mode.key()),
                        systematic_name(k, t, mode),
                        RuleFamily::RajSystematic,
                        move |chart| {
                            let kl = lord_of_house(chart, k);
                            let tl = lord_of_house(chart, t);
                            when(mode.holds(chart, kl, tl), || {
                                let mut planets = vec![kl, tl];
                                planets.sort();
                                Detection::new(
                                    format!(
                                        "{kl} (lord of {k}) and {tl} (lord of {t}) in {}",
                                        mode.label().to_lowercase()
                                    ),
                                    planets,
                                )
                            })
                        },
                    )
                    .reference("BPHS Ch. 39"),
                );
            }
        }
    }
    rules
}

pub fn rules() -> Vec<YogaRule> {
    let mut rules = systematic_rules();
    rules.push(
        YogaRule::new(
            "raj.yogakaraka",
            "Yogakaraka Raj Yoga",
            RuleFamily::RajYoga,
            yogakaraka,
        )
        .reference("BPHS Ch. 34"),
    );
    rules.push(
        YogaRule::new(
            "raj.dharma_karmadhipati",
            "Dharma-Karmadhipati Yoga",
            RuleFamily::RajYoga,
            dharma_karmadhipati,
        )
        .reference("BPHS Ch. 39"),
    );
    for (house, name) in [
        (6, "Harsha Viparita Raj Yoga"),
        (8, "Sarala Viparita Raj Yoga"),
        (12, "Vimala Viparita Raj Yoga"),
    ] {
        rules.push(
            YogaRule::new(
                format!("raj.viparita.{house}"),
                name,
                RuleFamily::RajYoga,
                move |chart| {
                    let lord = lord_of_house(chart, house);
                    let placed = chart.house_of(lord);
                    when(DUSTHANAS.contains(&placed), || {
                        Detection::new(
                            format!("{lord}, lord of the {house}th, in house {placed}"),
                            [lord],
                        )
                    })
                },
            )
            .reference("Phaladeepika Ch. 6"),
        );
    }
    rules.push(
        YogaRule::new(
            "raj.neecha_bhanga",
            "Neecha Bhanga Raj Yoga",
            RuleFamily::RajYoga,
            |chart| {
                Planet::CLASSICAL
                    .into_iter()
                    .filter_map(|p| neecha_bhanga(chart, p).map(|reason| Detection::new(reason, [p])))
                    .collect()
            },
        )
        .reference("Phaladeepika Ch. 7"),
    );
    rules
}

/// A planet ruling both a kendra (other than the 1st) and a trikona
fn yogakaraka(chart: &Chart) -> Vec<Detection> {
    Planet::CLASSICAL
        .into_iter()
        .filter_map(|planet| {
            let kendra = [4, 7, 10].into_iter().find(|&h| lord_of_house(chart, h) == planet)?;
            let trikona = TRIKONA_HOUSES
                .into_iter()
                .find(|&h| lord_of_house(chart, h) == planet)?;
            Some(Detection::new(
                format!("{planet} rules both house {kendra} and house {trikona}"),
                [planet],
            ))
        })
        .collect()
}

fn dharma_karmadhipati(chart: &Chart) -> Vec<Detection> {
    let ninth = lord_of_house(chart, 9);
    let tenth = lord_of_house(chart, 10);
    if ninth == tenth {
        return vec![Detection::new(
            format!("{ninth} rules both the 9th and the 10th"),
            [ninth],
        )];
    }

    let link = [
        RelationMode::Conjunction,
        RelationMode::SignExchange,
        RelationMode::MutualAspect,
    ]
    .into_iter()
    .find(|mode| mode.holds(chart, ninth, tenth));

    match link {
        Some(mode) => {
            let mut planets = vec![ninth, tenth];
            planets.sort();
            vec![Detection::new(
                format!(
                    "9th lord {ninth} and 10th lord {tenth} in {}",
                    mode.label().to_lowercase()
                ),
                planets,
            )]
        }
        None => Vec::new(),
    }
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
    fn test_systematic_names_are_distinct() {
        let names = systematic_names();
        assert_eq!(names.len(), 40);
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), 40);
        assert_eq!(names[0], "Kendra-Trikona Raj Yoga (1-5, Conjunction)");
    }

    #[test]
    fn test_pair_evaluation_reports_every_mode() {
        let chart = aries_chart();
        let pair = evaluate_pair(&chart, 1, 5);
        assert_eq!(pair.kendra_lord, Planet::Mars);
        assert_eq!(pair.trikona_lord, Planet::Sun);
        assert_eq!(pair.verdicts.len(), 5);
        // Mars in the 10th and the Sun in the 5th sit 6/8 from each other
        assert_eq!(pair.satisfied().count(), 0);
    }

    #[test]
    fn test_mutual_trikona_between_fourth_and_ninth_lords() {
        let chart = aries_chart();
        // 4th lord Moon in Cancer (4), 9th lord Jupiter in Sagittarius (9): 4 -> 9 is the 6th
        let pair = evaluate_pair(&chart, 4, 9);
        assert_eq!(pair.kendra_lord, Planet::Moon);
        assert_eq!(pair.trikona_lord, Planet::Jupiter);
        assert!(!pair.satisfied().any(|m| m == RelationMode::MutualTrikona));

        // 10th lord Saturn (11) and 5th lord Sun (5) face each other
        let pair = evaluate_pair(&chart, 10, 5);
        assert!(pair.satisfied().any(|m| m == RelationMode::MutualAspect));
    }

    #[test]
    fn test_yogakaraka_for_taurus() {
        // Saturn rules the 9th (Capricorn) and 10th (Aquarius) for Taurus
        let chart = Chart::builder(Sign::Taurus)
            .place(Planet::Sun, Sign::Leo, 10.0)
            .place(Planet::Moon, Sign::Cancer, 15.0)
            .place(Planet::Mars, Sign::Capricorn, 28.0)
            .place(Planet::Mercury, Sign::Virgo, 10.0)
            .place(Planet::Jupiter, Sign::Sagittarius, 5.0)
            .place(Planet::Venus, Sign::Libra, 20.0)
            .place(Planet::Saturn, Sign::Aquarius, 25.0)
            .nodes(Sign::Gemini, 12.0)
            .build()
            .unwrap();
        let found = yogakaraka(&chart);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].planets, vec![Planet::Saturn]);
        assert_eq!(dharma_karmadhipati(&chart).len(), 1);
    }
}
