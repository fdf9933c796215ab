//! The specification catalog: the reference list of yogas and doshas that
//! coverage reports are measured against. It deliberately names entries the
//! engine has no rule for.

use crate::error::YogaError;
use crate::rules::{dhana, dosha, raj};
use crate::types::*;
use crate::versions::{self, calculate_config_hash};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static BUILTIN_CATALOG: Lazy<SpecificationCatalog> = Lazy::new(SpecificationCatalog::build_builtin);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub category: Category,
    pub kind: YogaKind,
    pub bphs_category: BphsCategory,
    #[serde(default)]
    pub bphs_section: String,
    #[serde(default)]
    pub bphs_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationCatalog {
    pub version: String,
    pub entries: Vec<CatalogEntry>,
}

// (name, category, kind, bphs category, section, reference)
type LeafEntry = (&'static str, Category, YogaKind, BphsCategory, &'static str, &'static str);

const PMP: &str = "Pancha Mahapurusha Yogas";
const NABHASA: &str = "Nabhasa Yogas";
const SOLAR: &str = "Yogas from the Sun";
const LUNAR: &str = "Yogas from the Moon";
const RAJ: &str = "Raja Yogas";
const DHANA: &str = "Dhana Yogas";
const DOSHA: &str = "Doshas";
const NAMED: &str = "Named Yogas";

const LEAF_ENTRIES: &[LeafEntry] = {
    use crate::types::BphsCategory::*;
    use crate::types::Category as C;
    use crate::types::YogaKind::{Dosha as D, Yoga as Y};
    &[
        ("Ruchaka Yoga", C::PanchaMahapurusha, Y, MajorPositive, PMP, "BPHS Ch. 75"),
        ("Bhadra Yoga", C::PanchaMahapurusha, Y, MajorPositive, PMP, "BPHS Ch. 75"),
        ("Hamsa Yoga", C::PanchaMahapurusha, Y, MajorPositive, PMP, "BPHS Ch. 75"),
        ("Malavya Yoga", C::PanchaMahapurusha, Y, MajorPositive, PMP, "BPHS Ch. 75"),
        ("Sasa Yoga", C::PanchaMahapurusha, Y, MajorPositive, PMP, "BPHS Ch. 75"),
        ("Rajju Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Musala Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Nala Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Mala Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Sarpa Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Gada Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Nabhasa Shakata Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Vihaga Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Shringataka Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Hala Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Vajra Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Yava Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Kamala Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Vapi Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Yupa Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Shara Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Shakti Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Danda Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Nauka Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Kuta Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Chhatra Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Chapa Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Ardha Chandra Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Chakra Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Samudra Yoga", C::Nabhasa, Y, Standard, NABHASA, "BPHS Ch. 35"),
        ("Gola Yoga", C::Nabhasa, Y, MinorSubtle, NABHASA, "BPHS Ch. 35"),
        ("Yuga Yoga", C::Nabhasa, Y, MinorSubtle, NABHASA, "BPHS Ch. 35"),
        ("Shula Yoga", C::Nabhasa, Y, MinorSubtle, NABHASA, "BPHS Ch. 35"),
        ("Kedara Yoga", C::Nabhasa, Y, MinorSubtle, NABHASA, "BPHS Ch. 35"),
        ("Pasha Yoga", C::Nabhasa, Y, MinorSubtle, NABHASA, "BPHS Ch. 35"),
        ("Dama Yoga", C::Nabhasa, Y, MinorSubtle, NABHASA, "BPHS Ch. 35"),
        ("Vallaki Yoga", C::Nabhasa, Y, MinorSubtle, NABHASA, "BPHS Ch. 35"),
        ("Vesi Yoga", C::SunBased, Y, Standard, SOLAR, "BPHS Ch. 38"),
        ("Vasi Yoga", C::SunBased, Y, Standard, SOLAR, "BPHS Ch. 38"),
        ("Ubhayachari Yoga", C::SunBased, Y, Standard, SOLAR, "BPHS Ch. 38"),
        ("Budha-Aditya Yoga", C::SunBased, Y, MinorSubtle, SOLAR, "Phaladeepika Ch. 6"),
        ("Sunapha Yoga", C::MoonBased, Y, Standard, LUNAR, "BPHS Ch. 37"),
        ("Anapha Yoga", C::MoonBased, Y, Standard, LUNAR, "BPHS Ch. 37"),
        ("Durudhura Yoga", C::MoonBased, Y, Standard, LUNAR, "BPHS Ch. 37"),
        ("Kemadruma Yoga", C::Dosha, D, MajorChallenge, LUNAR, "BPHS Ch. 37"),
        ("Gajakesari Yoga", C::MoonBased, Y, MajorPositive, LUNAR, "Phaladeepika Ch. 6"),
        ("Adhi Yoga", C::MoonBased, Y, MajorPositive, LUNAR, "BPHS Ch. 37"),
        ("Amala Yoga", C::MoonBased, Y, Standard, LUNAR, "Phaladeepika Ch. 6"),
        ("Vasumati Yoga", C::MoonBased, Y, Standard, LUNAR, "Phaladeepika Ch. 6"),
        ("Shakata Yoga", C::Dosha, D, MinorSubtle, LUNAR, "BPHS Ch. 37"),
        ("Chandra-Mangala Yoga", C::MoonBased, Y, MinorSubtle, LUNAR, "Phaladeepika Ch. 6"),
        ("Yogakaraka Raj Yoga", C::RajYoga, Y, MajorPositive, RAJ, "BPHS Ch. 34"),
        ("Dharma-Karmadhipati Yoga", C::RajYoga, Y, MajorPositive, RAJ, "BPHS Ch. 39"),
        ("Harsha Viparita Raj Yoga", C::RajYoga, Y, Standard, RAJ, "Phaladeepika Ch. 6"),
        ("Sarala Viparita Raj Yoga", C::RajYoga, Y, Standard, RAJ, "Phaladeepika Ch. 6"),
        ("Vimala Viparita Raj Yoga", C::RajYoga, Y, Standard, RAJ, "Phaladeepika Ch. 6"),
        ("Neecha Bhanga Raj Yoga", C::RajYoga, Y, Standard, RAJ, "Phaladeepika Ch. 7"),
        ("Lakshmi Yoga", C::Dhana, Y, MajorPositive, DHANA, "BPHS Ch. 41"),
        ("Daridra Yoga", C::Dosha, D, MajorChallenge, DHANA, "BPHS Ch. 42"),
        ("Manglik Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Pitra Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Gandanta Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Grahan Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Guru Chandal Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Angarak Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Shrapit Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Vish Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Papa Kartari Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Kalathra Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Punarphoo Dosha", C::Dosha, D, NonBphsPractical, DOSHA, "Practical tradition"),
        ("Saraswati Yoga", C::Named, Y, Standard, NAMED, "Phaladeepika Ch. 6"),
        ("Parvata Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Kahala Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Chamara Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Shankha Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Bheri Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Mridanga Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Sreenatha Yoga", C::Named, Y, Standard, NAMED, "Phaladeepika Ch. 6"),
        ("Amsavatara Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Kusuma Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Gauri Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Khadga Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Kalanidhi Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Shubha Kartari Yoga", C::Named, Y, MinorSubtle, NAMED, "Phaladeepika Ch. 6"),
        ("Vargottama Yoga", C::Named, Y, MinorSubtle, NAMED, "BPHS Ch. 7"),
        ("Pushkala Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Lagnadhi Yoga", C::Named, Y, Standard, NAMED, "Phaladeepika Ch. 6"),
        ("Chatussagara Yoga", C::Named, Y, Standard, NAMED, "Phaladeepika Ch. 6"),
        ("Trilochana Yoga", C::Named, Y, Standard, NAMED, "Jataka Parijata Ch. 7"),
        ("Maha Parivartana Yoga", C::Named, Y, MajorPositive, NAMED, "Phaladeepika Ch. 6"),
        ("Khala Parivartana Yoga", C::Named, Y, MinorSubtle, NAMED, "Phaladeepika Ch. 6"),
        ("Dainya Parivartana Yoga", C::Named, Y, MajorChallenge, NAMED, "Phaladeepika Ch. 6"),
        ("Bharati Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Kalpadruma Yoga", C::Named, Y, MajorPositive, NAMED, "BPHS Ch. 36"),
        ("Matsya Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Kurma Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Mahabhagya Yoga", C::Named, Y, MajorPositive, NAMED, "BPHS Ch. 36"),
        ("Chandika Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
        ("Hari Hara Brahma Yoga", C::Named, Y, Standard, NAMED, "BPHS Ch. 36"),
    ]
};

impl SpecificationCatalog {
    /// The catalog compiled into the crate
    pub fn builtin() -> &'static SpecificationCatalog {
        &BUILTIN_CATALOG
    }

    fn build_builtin() -> Self {
        let mut entries: Vec<CatalogEntry> = LEAF_ENTRIES
            .iter()
            .map(|&(name, category, kind, bphs_category, section, reference)| CatalogEntry {
                name: name.to_string(),
                category,
                kind,
                bphs_category,
                bphs_section: section.to_string(),
                bphs_ref: reference.to_string(),
            })
            .collect();

        let generated = |name: String, category, kind, bphs_category, section: &str, reference: &str| CatalogEntry {
            name,
            category,
            kind,
            bphs_category,
            bphs_section: section.to_string(),
            bphs_ref: reference.to_string(),
        };

        for name in raj::systematic_names() {
            entries.push(generated(name, Category::RajYoga, YogaKind::Yoga, BphsCategory::MajorPositive, RAJ, "BPHS Ch. 39"));
        }
        for name in dhana::systematic_names() {
            entries.push(generated(name, Category::Dhana, YogaKind::Yoga, BphsCategory::Standard, DHANA, "BPHS Ch. 41"));
        }
        for sign in Sign::ALL {
            entries.push(generated(
                dhana::ascendant_pattern_name(sign),
                Category::Dhana,
                YogaKind::Yoga,
                BphsCategory::Standard,
                DHANA,
                "BPHS Ch. 41",
            ));
        }
        for planet in Planet::CLASSICAL {
            entries.push(generated(
                dhana::lagna_lord_pattern_name(planet),
                Category::Dhana,
                YogaKind::Yoga,
                BphsCategory::Standard,
                DHANA,
                "BPHS Ch. 41",
            ));
        }
        for house in 1..=12u8 {
            entries.push(generated(
                dosha::kaal_sarpa_name(house),
                Category::Dosha,
                YogaKind::Dosha,
                BphsCategory::NonBphsPractical,
                DOSHA,
                "Practical tradition",
            ));
        }

        Self {
            version: versions::CATALOG_VERSION.to_string(),
            entries,
        }
    }

    /// Load a catalog from a YAML file and check it for duplicates
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {path}"))?;
        let catalog = Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse catalog {path}"))?;
        catalog.validate()?;
        log::info!("Loaded catalog {} ({} entries) from {path}", catalog.version, catalog.entries.len());
        Ok(catalog)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |entry| entry.category == category)
    }

    pub fn validate(&self) -> std::result::Result<(), YogaError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(YogaError::DuplicateCatalogEntry {
                    version: self.version.clone(),
                    name: entry.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// sha256 over the serialized catalog
    pub fn fingerprint(&self) -> std::result::Result<String, YogaError> {
        calculate_config_hash(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let catalog = SpecificationCatalog::builtin();
        assert!(catalog.validate().is_ok());
        assert!(catalog.len() >= 100 && catalog.len() <= 280, "{} entries", catalog.len());
        assert_eq!(catalog.version, versions::CATALOG_VERSION);
    }

    #[test]
    fn test_systematic_names_listed() {
        let catalog = SpecificationCatalog::builtin();
        let raj = catalog
            .entries
            .iter()
            .filter(|e| e.name.starts_with("Kendra-Trikona Raj Yoga ("))
            .count();
        assert_eq!(raj, 40);
        let dhana = dhana::systematic_names().iter().filter(|n| catalog.contains(n)).count();
        assert_eq!(dhana, 30);
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let yaml = r#"
version: "test"
entries:
  - name: Gajakesari Yoga
    category: moon_based
    kind: yoga
    bphs_category: major_positive
  - name: Gajakesari Yoga
    category: moon_based
    kind: yoga
    bphs_category: major_positive
"#;
        let catalog = SpecificationCatalog::from_yaml_str(yaml).unwrap();
        assert!(catalog.get("Gajakesari Yoga").unwrap().bphs_ref.is_empty());
        match catalog.validate() {
            Err(YogaError::DuplicateCatalogEntry { name, .. }) => assert_eq!(name, "Gajakesari Yoga"),
            other => panic!("expected duplicate entry error, got {other:?}"),
        }
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let catalog = SpecificationCatalog::builtin().clone();
        let mut edited = catalog.clone();
        edited.entries.pop();
        assert_eq!(catalog.fingerprint().unwrap(), SpecificationCatalog::builtin().fingerprint().unwrap());
        assert_ne!(catalog.fingerprint().unwrap(), edited.fingerprint().unwrap());
    }
}
