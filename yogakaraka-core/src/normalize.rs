//! Spelling-variant reconciliation and merging of duplicate detections.
//!
//! Lookup keys are lowercased with whitespace, hyphens, underscores and
//! slashes collapsed to single spaces, and common transliteration endings
//! (`yog`, `dosh`, `dosham`, `raja yoga`) folded. A key that misses is retried
//! with bracketed qualifiers removed, so `Kuja Dosha (from Moon)` resolves
//! through `kuja dosha`.

use crate::evaluator::ScoredYoga;
use crate::rules::{dhana, dosha, raj};
use crate::types::*;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-_/]+").expect("Invalid separator regex"));

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\(\[][^\)\]]*[\)\]]").expect("Invalid bracket regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static ENDINGS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"\byog(am)?\b").expect("Invalid yoga regex"), "yoga"),
        (Regex::new(r"\bdosh(am)?\b").expect("Invalid dosha regex"), "dosha"),
        (Regex::new(r"\braja yoga\b").expect("Invalid raja regex"), "raj yoga"),
    ]
});

static GLOBAL_TABLE: Lazy<NormalizationTable> = Lazy::new(NormalizationTable::builtin);

/// Lookup key for a raw name
pub fn clean_key(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let mut key = SEPARATORS.replace_all(lower.trim(), " ").into_owned();
    for (pattern, replacement) in ENDINGS.iter() {
        key = pattern.replace_all(&key, *replacement).into_owned();
    }
    key.trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalized {
    pub canonical_name: String,
    /// None when the table does not know the name
    pub category: Option<Category>,
}

pub fn normalize(raw_name: &str) -> Normalized {
    NormalizationTable::global().normalize(raw_name)
}

pub fn merge(scored: Vec<ScoredYoga>) -> Vec<MergedYoga> {
    NormalizationTable::global().merge(scored)
}

// ===== TABLE =====

/// (canonical, category, variants)
type Group = (&'static str, Category, &'static [&'static str]);

const GROUPS: &[Group] = &[
    // Pancha Mahapurusha
    ("Ruchaka Yoga", Category::PanchaMahapurusha, &["Ruchak Yoga", "Ruchaka", "Rucaka Yoga", "Ruchaka Mahapurusha Yoga"]),
    ("Bhadra Yoga", Category::PanchaMahapurusha, &["Bhadra", "Bhadra Mahapurusha Yoga", "Bhadr Yoga"]),
    ("Hamsa Yoga", Category::PanchaMahapurusha, &["Hansa Yoga", "Hamsa", "Hamsa Mahapurusha Yoga", "Hans Yoga"]),
    ("Malavya Yoga", Category::PanchaMahapurusha, &["Malavya", "Malavya Mahapurusha Yoga", "Malva Yoga", "Malavia Yoga"]),
    ("Sasa Yoga", Category::PanchaMahapurusha, &["Shasha Yoga", "Sasha Yoga", "Shasa Yoga", "Sasa Mahapurusha Yoga"]),
    // Nabhasa
    ("Rajju Yoga", Category::Nabhasa, &["Rajju", "Raju Yoga"]),
    ("Musala Yoga", Category::Nabhasa, &["Musal Yoga", "Mushala Yoga"]),
    ("Nala Yoga", Category::Nabhasa, &["Nal Yoga"]),
    ("Mala Yoga", Category::Nabhasa, &["Maala Yoga", "Srik Yoga", "Sraka Yoga"]),
    ("Sarpa Yoga", Category::Nabhasa, &["Sarp Yoga", "Bhujanga Yoga"]),
    ("Gada Yoga", Category::Nabhasa, &["Gadaa Yoga"]),
    ("Nabhasa Shakata Yoga", Category::Nabhasa, &["Akriti Shakata Yoga", "Nabhasa Sakata Yoga"]),
    ("Vihaga Yoga", Category::Nabhasa, &["Vihag Yoga", "Pakshi Yoga"]),
    ("Shringataka Yoga", Category::Nabhasa, &["Sringataka Yoga", "Shringatak Yoga"]),
    ("Hala Yoga", Category::Nabhasa, &["Hal Yoga"]),
    ("Vajra Yoga", Category::Nabhasa, &["Vajr Yoga"]),
    ("Yava Yoga", Category::Nabhasa, &["Yav Yoga"]),
    ("Kamala Yoga", Category::Nabhasa, &["Kamal Yoga", "Padma Yoga"]),
    ("Vapi Yoga", Category::Nabhasa, &["Vaapi Yoga"]),
    ("Yupa Yoga", Category::Nabhasa, &["Yoopa Yoga", "Yup Yoga"]),
    ("Shara Yoga", Category::Nabhasa, &["Sara Yoga", "Ishu Yoga", "Shar Yoga"]),
    ("Shakti Yoga", Category::Nabhasa, &["Sakti Yoga", "Shakthi Yoga"]),
    ("Danda Yoga", Category::Nabhasa, &["Dand Yoga"]),
    ("Nauka Yoga", Category::Nabhasa, &["Nau Yoga", "Nouka Yoga"]),
    ("Kuta Yoga", Category::Nabhasa, &["Koota Yoga", "Koot Yoga"]),
    ("Chhatra Yoga", Category::Nabhasa, &["Chatra Yoga", "Chhatr Yoga"]),
    ("Chapa Yoga", Category::Nabhasa, &["Chaapa Yoga", "Karmuka Yoga", "Chap Yoga"]),
    ("Ardha Chandra Yoga", Category::Nabhasa, &["Ardhachandra Yoga", "Ardh Chandra Yoga", "Ardha Chandra"]),
    ("Chakra Yoga", Category::Nabhasa, &["Chakr Yoga"]),
    ("Samudra Yoga", Category::Nabhasa, &["Samudr Yoga"]),
    ("Gola Yoga", Category::Nabhasa, &["Gol Yoga"]),
    ("Yuga Yoga", Category::Nabhasa, &["Yug Yoga"]),
    ("Shula Yoga", Category::Nabhasa, &["Shool Yoga", "Soola Yoga", "Shoola Yoga", "Sula Yoga"]),
    ("Kedara Yoga", Category::Nabhasa, &["Kedar Yoga"]),
    ("Pasha Yoga", Category::Nabhasa, &["Paasa Yoga", "Pasa Yoga", "Paash Yoga"]),
    ("Dama Yoga", Category::Nabhasa, &["Daama Yoga", "Damini Yoga"]),
    ("Vallaki Yoga", Category::Nabhasa, &["Veena Yoga", "Vina Yoga", "Vallaki"]),
    // Sun-based
    ("Vesi Yoga", Category::SunBased, &["Veshi Yoga", "Vesi"]),
    ("Vasi Yoga", Category::SunBased, &["Voshi Yoga", "Vosi Yoga", "Vashi Yoga"]),
    ("Ubhayachari Yoga", Category::SunBased, &["Ubhayachara Yoga", "Obhayachari Yoga", "Ubhaychari Yoga"]),
    ("Budha-Aditya Yoga", Category::SunBased, &["Budhaditya Yoga", "Buddha Aditya Yoga", "Budh Aditya Yoga", "Nipuna Yoga"]),
    // Moon-based
    ("Sunapha Yoga", Category::MoonBased, &["Sunaphaa Yoga", "Sunafa Yoga", "Sunapha"]),
    ("Anapha Yoga", Category::MoonBased, &["Anaphaa Yoga", "Anafa Yoga", "Anapha"]),
    ("Durudhura Yoga", Category::MoonBased, &["Dhurdhura Yoga", "Durdhura Yoga", "Dhurudhura Yoga"]),
    ("Kemadruma Yoga", Category::Dosha, &["Kemadruma Dosha", "Kemdrum Yoga", "Kemadrum Dosh", "Kemadruma"]),
    ("Gajakesari Yoga", Category::MoonBased, &["Gaja Kesari Yoga", "Gaj Kesari Yoga", "Gajakesari", "Gajakesri Yoga"]),
    ("Chandra-Mangala Yoga", Category::MoonBased, &["Chandra Mangal Yoga", "Chandramangala Yoga", "Chandra Mangala"]),
    ("Adhi Yoga", Category::MoonBased, &["Chandra Adhi Yoga", "Chandradhi Yoga"]),
    ("Amala Yoga", Category::MoonBased, &["Amal Yoga", "Amla Yoga"]),
    ("Vasumati Yoga", Category::MoonBased, &["Vasumathi Yoga", "Vasumat Yoga"]),
    ("Shakata Yoga", Category::Dosha, &["Sakata Yoga", "Shakat Yoga", "Shakata Dosha"]),
    // Raj
    ("Yogakaraka Raj Yoga", Category::RajYoga, &["Yogakaraka", "Yoga Karaka Raj Yoga", "Yogakarak Yoga", "Yogakaraka Yoga"]),
    ("Dharma-Karmadhipati Yoga", Category::RajYoga, &["Dharma Karma Adhipati Yoga", "Dharmakarmadhipati Yoga", "Dharma Karmadhipati Raja Yoga"]),
    ("Harsha Viparita Raj Yoga", Category::RajYoga, &["Harsha Yoga", "Harsh Yoga", "Harsha Viparita Yoga"]),
    ("Sarala Viparita Raj Yoga", Category::RajYoga, &["Sarala Yoga", "Saral Yoga", "Sarala Viparita Yoga"]),
    ("Vimala Viparita Raj Yoga", Category::RajYoga, &["Vimala Yoga", "Vimal Yoga", "Vimala Viparita Yoga"]),
    ("Neecha Bhanga Raj Yoga", Category::RajYoga, &["Neechabhanga Raja Yoga", "Nicha Bhanga Raj Yoga", "Neech Bhang Raj Yoga", "Neecha Bhanga Yoga"]),
    // Dhana
    ("Lakshmi Yoga", Category::Dhana, &["Laxmi Yoga", "Lakshmi"]),
    ("Daridra Yoga", Category::Dosha, &["Daridra Dosha", "Daridraya Yoga", "Daridrya Yoga"]),
    // Dosha
    ("Manglik Dosha", Category::Dosha, &["Kuja Dosha", "Mangal Dosha", "Mangalik Dosha", "Manglik", "Chevvai Dosham", "Bhauma Dosha"]),
    ("Pitra Dosha", Category::Dosha, &["Pitru Dosha", "Pitri Dosha", "Pitr Dosh"]),
    ("Gandanta Dosha", Category::Dosha, &["Gandant Dosha", "Gandanta", "Gandanta Yoga"]),
    ("Grahan Dosha", Category::Dosha, &["Grahana Dosha", "Surya Grahan Dosha", "Chandra Grahan Dosha", "Grahan Yoga"]),
    ("Guru Chandal Dosha", Category::Dosha, &["Guru Chandala Yoga", "Guru Chandal Yoga", "Chandal Dosha"]),
    ("Angarak Dosha", Category::Dosha, &["Angaraka Yoga", "Angarak Yoga", "Angaraka Dosha"]),
    ("Shrapit Dosha", Category::Dosha, &["Shrapit Yoga", "Shrapita Dosha"]),
    ("Vish Dosha", Category::Dosha, &["Vish Yoga", "Visha Yoga", "Visha Dosha"]),
    ("Papa Kartari Dosha", Category::Dosha, &["Paap Kartari Yoga", "Papakartari Yoga", "Papa Kartari Yoga"]),
    ("Kalathra Dosha", Category::Dosha, &["Kalatra Dosha", "Kalathra Dosham"]),
    ("Punarphoo Dosha", Category::Dosha, &["Punarphu Dosha", "Punarpoo Dosha"]),
    // Named
    ("Saraswati Yoga", Category::Named, &["Sarasvati Yoga", "Saraswathi Yoga"]),
    ("Parvata Yoga", Category::Named, &["Parvat Yoga"]),
    ("Kahala Yoga", Category::Named, &["Kahal Yoga"]),
    ("Chamara Yoga", Category::Named, &["Chamar Yoga"]),
    ("Shankha Yoga", Category::Named, &["Sankha Yoga", "Shankh Yoga"]),
    ("Bheri Yoga", Category::Named, &["Bheree Yoga"]),
    ("Mridanga Yoga", Category::Named, &["Mridang Yoga"]),
    ("Sreenatha Yoga", Category::Named, &["Srinatha Yoga", "Shrinath Yoga", "Sreenath Yoga"]),
    ("Amsavatara Yoga", Category::Named, &["Amshavatara Yoga", "Amsavatar Yoga"]),
    ("Kusuma Yoga", Category::Named, &["Kusum Yoga"]),
    ("Gauri Yoga", Category::Named, &["Gowri Yoga"]),
    ("Khadga Yoga", Category::Named, &["Khadg Yoga"]),
    ("Kalanidhi Yoga", Category::Named, &["Kala Nidhi Yoga"]),
    ("Shubha Kartari Yoga", Category::Named, &["Shubh Kartari Yoga", "Subha Kartari Yoga"]),
    ("Vargottama Yoga", Category::Named, &["Vargottam Yoga", "Vargottama"]),
    ("Pushkala Yoga", Category::Named, &["Pushkal Yoga"]),
    ("Lagnadhi Yoga", Category::Named, &["Lagna Adhi Yoga", "Lagnaadhi Yoga"]),
    ("Chatussagara Yoga", Category::Named, &["Chatussagar Yoga", "Chatus Sagara Yoga"]),
    ("Trilochana Yoga", Category::Named, &["Trilochan Yoga"]),
    ("Maha Parivartana Yoga", Category::Named, &["Maha Parivartan Yoga", "Mahaparivartana Yoga"]),
    ("Khala Parivartana Yoga", Category::Named, &["Khala Yoga", "Khal Parivartana Yoga"]),
    ("Dainya Parivartana Yoga", Category::Named, &["Dainya Yoga", "Dainya Parivartan Yoga"]),
    ("Bharati Yoga", Category::Named, &["Bharathi Yoga"]),
    ("Kalpadruma Yoga", Category::Named, &["Kalpa Druma Yoga"]),
    ("Matsya Yoga", Category::Named, &["Matsy Yoga"]),
    ("Kurma Yoga", Category::Named, &["Koorma Yoga"]),
    ("Mahabhagya Yoga", Category::Named, &["Maha Bhagya Yoga", "Mahabhagya"]),
    ("Chandika Yoga", Category::Named, &["Chandik Yoga"]),
    ("Hari Hara Brahma Yoga", Category::Named, &["Harihara Brahma Yoga", "Hari-Hara-Brahma Yoga"]),
];

/// Static, versioned map from lookup key to canonical name and category.
#[derive(Debug, Clone)]
pub struct NormalizationTable {
    entries: HashMap<String, (String, Category)>,
}

impl NormalizationTable {
    /// The process-wide table, built on first use
    pub fn global() -> &'static NormalizationTable {
        &GLOBAL_TABLE
    }

    pub fn builtin() -> Self {
        let mut groups: Vec<(String, Category, Vec<String>)> = GROUPS
            .iter()
            .map(|&(canonical, category, variants)| {
                (
                    canonical.to_string(),
                    category,
                    variants.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect();
        groups.extend(generated_groups());

        let mut entries = HashMap::new();
        // canonical names first so they always resolve to themselves
        for (canonical, category, _) in &groups {
            entries.insert(clean_key(canonical), (canonical.clone(), *category));
        }
        for (canonical, category, variants) in &groups {
            for variant in variants {
                entries
                    .entry(clean_key(variant))
                    .or_insert_with(|| (canonical.clone(), *category));
            }
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (lookup key, canonical name) pairs in key order
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(key, (canonical, _))| (key.as_str(), canonical.as_str()))
            .collect();
        entries.sort();
        entries
    }

    pub fn contains_canonical(&self, name: &str) -> bool {
        self.entries
            .get(&clean_key(name))
            .is_some_and(|(canonical, _)| canonical == name)
    }

    pub fn normalize(&self, raw_name: &str) -> Normalized {
        let key = clean_key(raw_name);
        if let Some((canonical, category)) = self.entries.get(&key) {
            return Normalized {
                canonical_name: canonical.clone(),
                category: Some(*category),
            };
        }

        let stripped = clean_key(&BRACKETED.replace_all(raw_name, ""));
        if stripped != key {
            if let Some((canonical, category)) = self.entries.get(&stripped) {
                return Normalized {
                    canonical_name: canonical.clone(),
                    category: Some(*category),
                };
            }
        }

        Normalized {
            canonical_name: WHITESPACE.replace_all(raw_name.trim(), " ").into_owned(),
            category: None,
        }
    }

    /// Fold detections sharing a canonical name into one, in first-seen order.
    /// The strongest member (first on ties) supplies name and description;
    /// planets and rule ids are unioned; the result is cancelled only when
    /// every member was.
    pub fn merge(&self, scored: Vec<ScoredYoga>) -> Vec<MergedYoga> {
        let mut order: HashMap<String, usize> = HashMap::new();
        let mut pending: Vec<PendingMerge> = Vec::new();

        for item in scored {
            let normalized = self.normalize(&item.raw.name);
            match order.get(&normalized.canonical_name) {
                Some(&index) => pending[index].absorb(item),
                None => {
                    order.insert(normalized.canonical_name.clone(), pending.len());
                    pending.push(PendingMerge::start(normalized, item));
                }
            }
        }

        pending.into_iter().map(PendingMerge::finish).collect()
    }
}

/// Canonical names produced by the systematic combinators, with the
/// spellings other sources use for them
fn generated_groups() -> Vec<(String, Category, Vec<String>)> {
    let mut groups = Vec::new();

    for k in raj::KENDRA_HOUSES {
        for t in raj::TRIKONA_HOUSES {
            for mode in raj::RelationMode::ALL {
                let label = mode.label();
                groups.push((
                    raj::systematic_name(k, t, mode),
                    Category::RajYoga,
                    vec![
                        format!("Kendra Trikona Raja Yoga {k} {t} {label}"),
                        format!("Raja Yoga ({k}-{t} lords, {label})"),
                        format!("Kendra-Trikona Raja Yog ({k}-{t}, {label})"),
                    ],
                ));
            }
        }
    }

    for (a, b) in dhana::DHANA_PAIRS {
        for mode in dhana::DHANA_MODES {
            let label = mode.label();
            groups.push((
                dhana::systematic_name(a, b, mode),
                Category::Dhana,
                vec![
                    format!("Dhana Yoga {a} {b} {label}"),
                    format!("Dhana Yog ({a}-{b} lords, {label})"),
                ],
            ));
        }
    }

    for sign in Sign::ALL {
        groups.push((
            dhana::ascendant_pattern_name(sign),
            Category::Dhana,
            vec![
                format!("Dhana Yoga for {sign} Lagna"),
                format!("{sign} Lagna Dhana Yoga"),
            ],
        ));
    }

    for planet in Planet::CLASSICAL {
        groups.push((
            dhana::lagna_lord_pattern_name(planet),
            Category::Dhana,
            vec![format!("Dhana Yoga ({planet} Lagna Lord)")],
        ));
    }

    for house in 1..=12u8 {
        let name = dosha::kaal_sarpa_name(house);
        let sub = dosha::KAAL_SARPA_TYPES[usize::from(house - 1)];
        groups.push((
            name,
            Category::Dosha,
            vec![
                format!("{sub} Kalsarpa Dosha"),
                format!("{sub} Kala Sarpa Dosha"),
                format!("{sub} Kaal Sarp Dosh"),
                format!("{sub} Kaal Sarpa Yoga"),
            ],
        ));
    }

    groups
}

// ===== MERGE =====

/// One canonical yoga after duplicates are folded together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedYoga {
    pub canonical_name: String,
    /// Name as emitted by the strongest member
    pub name: String,
    pub description: String,
    pub kind: YogaKind,
    pub category: Category,
    pub strength: Strength,
    pub contributing_planets: Vec<Planet>,
    pub cancelled: bool,
    pub cancellation_reason: Option<String>,
    pub rule_ids: Vec<String>,
}

struct PendingMerge {
    merged: MergedYoga,
    all_cancelled: bool,
    reasons: Vec<String>,
}

impl PendingMerge {
    fn start(normalized: Normalized, item: ScoredYoga) -> Self {
        let ScoredYoga { raw, evaluation } = item;
        let mut planets = raw.contributing_planets;
        planets.sort();
        planets.dedup();
        Self {
            merged: MergedYoga {
                canonical_name: normalized.canonical_name,
                name: raw.name,
                description: raw.description,
                kind: raw.kind,
                category: normalized.category.unwrap_or(raw.default_category),
                strength: evaluation.strength,
                contributing_planets: planets,
                cancelled: evaluation.cancelled,
                cancellation_reason: None,
                rule_ids: vec![raw.rule_id],
            },
            all_cancelled: evaluation.cancelled,
            reasons: evaluation.reason.into_iter().collect(),
        }
    }

    fn absorb(&mut self, item: ScoredYoga) {
        let ScoredYoga { raw, evaluation } = item;
        let merged = &mut self.merged;

        if evaluation.strength > merged.strength {
            merged.strength = evaluation.strength;
            merged.name = raw.name;
            merged.description = raw.description;
        }

        merged.contributing_planets.extend(raw.contributing_planets);
        merged.contributing_planets.sort();
        merged.contributing_planets.dedup();

        if !merged.rule_ids.contains(&raw.rule_id) {
            merged.rule_ids.push(raw.rule_id);
        }

        self.all_cancelled &= evaluation.cancelled;
        if let Some(reason) = evaluation.reason {
            if !self.reasons.contains(&reason) {
                self.reasons.push(reason);
            }
        }
    }

    fn finish(self) -> MergedYoga {
        let mut merged = self.merged;
        merged.cancelled = self.all_cancelled;
        merged.cancellation_reason = self.all_cancelled.then(|| self.reasons.join("; "));
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluation;

    fn scored(rule_id: &str, name: &str, planets: Vec<Planet>, strength: Strength, reason: Option<&str>) -> ScoredYoga {
        ScoredYoga {
            raw: RawYoga {
                rule_id: rule_id.to_string(),
                name: name.to_string(),
                kind: YogaKind::Dosha,
                family: RuleFamily::Dosha,
                default_category: Category::Dosha,
                description: format!("{name} description"),
                contributing_planets: planets,
                bhanga: None,
            },
            evaluation: Evaluation {
                strength,
                score: 0.0,
                cancelled: reason.is_some(),
                reason: reason.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_clean_key() {
        assert_eq!(clean_key("  Gaja-Kesari   Yog "), "gaja kesari yoga");
        assert_eq!(clean_key("Kuja_Dosham"), "kuja dosha");
        assert_eq!(clean_key("Neecha Bhanga Raja Yoga"), "neecha bhanga raj yoga");
    }

    #[test]
    fn test_variants_resolve() {
        let n = normalize("Gaj Kesari Yog");
        assert_eq!(n.canonical_name, "Gajakesari Yoga");
        assert_eq!(n.category, Some(Category::MoonBased));

        assert_eq!(normalize("Kuja Dosha (from Moon)").canonical_name, "Manglik Dosha");
        assert_eq!(normalize("Surya Grahan Dosha").canonical_name, "Grahan Dosha");
        assert_eq!(
            normalize("kendra trikona raja yoga 1 5 conjunction").canonical_name,
            "Kendra-Trikona Raj Yoga (1-5, Conjunction)"
        );
    }

    #[test]
    fn test_systematic_names_do_not_collapse() {
        let a = normalize("Kendra-Trikona Raj Yoga (1-5, Conjunction)");
        let b = normalize("Kendra-Trikona Raj Yoga (4-9, Sign Exchange)");
        assert_ne!(a.canonical_name, b.canonical_name);
    }

    #[test]
    fn test_unknown_name_passes_through() {
        let n = normalize("  Some   Regional Yoga ");
        assert_eq!(n.canonical_name, "Some Regional Yoga");
        assert_eq!(n.category, None);
        assert_eq!(normalize(&n.canonical_name), n);
    }

    #[test]
    fn test_idempotent_over_table() {
        let table = NormalizationTable::global();
        assert!(table.len() > 300);
        for (key, _) in table.entries() {
            let once = table.normalize(key);
            assert_eq!(table.normalize(&once.canonical_name), once, "key {key}");
        }
    }

    #[test]
    fn test_merge_keeps_strongest_and_unions_planets() {
        let merged = merge(vec![
            scored("a", "Manglik Dosha", vec![Planet::Mars], Strength::Weak, None),
            scored("b", "Kuja Dosha (from Moon)", vec![Planet::Moon, Planet::Mars], Strength::Strong, Some("x")),
            scored("c", "Mangal Dosha (from Venus)", vec![Planet::Venus, Planet::Mars], Strength::Strong, None),
        ]);
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert_eq!(m.canonical_name, "Manglik Dosha");
        assert_eq!(m.name, "Kuja Dosha (from Moon)");
        assert_eq!(m.strength, Strength::Strong);
        assert_eq!(m.contributing_planets, vec![Planet::Moon, Planet::Mars, Planet::Venus]);
        assert_eq!(m.rule_ids, vec!["a", "b", "c"]);
        assert!(!m.cancelled);
        assert!(m.cancellation_reason.is_none());
    }

    #[test]
    fn test_merge_active_member_outweighs_stronger_cancelled_one() {
        let merged = merge(vec![
            scored("moon", "Kuja Dosha (from Moon)", vec![Planet::Mars], Strength::Strong, Some("Jupiter aspects Mars")),
            scored("lagna", "Manglik Dosha", vec![Planet::Mars], Strength::Medium, None),
        ]);
        assert_eq!(merged.len(), 1);
        let m = &merged[0];
        assert_eq!(m.name, "Kuja Dosha (from Moon)");
        assert_eq!(m.description, "Kuja Dosha (from Moon) description");
        assert_eq!(m.strength, Strength::Strong);
        assert!(!m.cancelled);
        assert_eq!(m.cancellation_reason, None);
        assert_eq!(m.rule_ids, vec!["moon", "lagna"]);
    }

    #[test]
    fn test_merge_cancelled_only_when_all_cancelled() {
        let merged = merge(vec![
            scored("a", "Manglik Dosha", vec![Planet::Mars], Strength::Weak, Some("Mars is own sign")),
            scored("b", "Kuja Dosha", vec![Planet::Mars], Strength::Weak, Some("Jupiter aspects Mars")),
        ]);
        assert!(merged[0].cancelled);
        assert_eq!(
            merged[0].cancellation_reason.as_deref(),
            Some("Mars is own sign; Jupiter aspects Mars")
        );
    }
}
