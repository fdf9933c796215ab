use serde::{Deserialize, Serialize};
use std::fmt;

// ===== CELESTIAL PRIMITIVES =====
// Planet order is fixed: it is the index order used for sorting contributing
// planets and for every per-planet table in `constants`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Planet {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    Rahu,
    Ketu,
}

impl Planet {
    pub const ALL: [Planet; 9] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Mars,
        Planet::Mercury,
        Planet::Jupiter,
        Planet::Venus,
        Planet::Saturn,
        Planet::Rahu,
        Planet::Ketu,
    ];

    /// The seven visible planets used by the Nabhasa and Kaal Sarpa families
    pub const CLASSICAL: [Planet; 7] = [
        Planet::Sun,
        Planet::Moon,
        Planet::Mars,
        Planet::Mercury,
        Planet::Jupiter,
        Planet::Venus,
        Planet::Saturn,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Planet::Sun => "Sun",
            Planet::Moon => "Moon",
            Planet::Mars => "Mars",
            Planet::Mercury => "Mercury",
            Planet::Jupiter => "Jupiter",
            Planet::Venus => "Venus",
            Planet::Saturn => "Saturn",
            Planet::Rahu => "Rahu",
            Planet::Ketu => "Ketu",
        }
    }

    pub fn is_node(self) -> bool {
        matches!(self, Planet::Rahu | Planet::Ketu)
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Zodiac sign, serialized as its number (Aries = 1 … Pisces = 12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sign {
    Aries = 1,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn from_number(n: u8) -> Option<Sign> {
        if (1..=12).contains(&n) {
            Some(Sign::ALL[(n - 1) as usize])
        } else {
            None
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    /// Sign `n` places along the zodiac, counting this sign as 1
    pub fn nth(self, n: u8) -> Sign {
        let offset = (self.number() as u32 - 1 + (n as u32 + 11)) % 12;
        Sign::ALL[offset as usize]
    }

    pub fn modality(self) -> Modality {
        match (self.number() - 1) % 3 {
            0 => Modality::Movable,
            1 => Modality::Fixed,
            _ => Modality::Dual,
        }
    }

    pub fn element(self) -> Element {
        match (self.number() - 1) % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }
}

impl TryFrom<u8> for Sign {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Sign::from_number(value).ok_or_else(|| format!("sign must be in 1..=12, got {value}"))
    }
}

impl From<Sign> for u8 {
    fn from(sign: Sign) -> u8 {
        sign.number()
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Movable,
    Fixed,
    Dual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

// ===== DIGNITY =====

/// Computed positional dignity. Vargottama is tracked separately in
/// `DignityStatus` so it never hides a debilitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dignity {
    Exaltation,
    Mooltrikona,
    Own,
    Neutral,
    Debilitation,
}

impl Dignity {
    /// Exalted, mooltrikona or own sign
    pub fn is_dignified(self) -> bool {
        matches!(self, Dignity::Exaltation | Dignity::Mooltrikona | Dignity::Own)
    }

    pub fn label(self) -> &'static str {
        match self {
            Dignity::Exaltation => "exalted",
            Dignity::Mooltrikona => "mooltrikona",
            Dignity::Own => "own sign",
            Dignity::Neutral => "neutral",
            Dignity::Debilitation => "debilitated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DignityStatus {
    pub dignity: Dignity,
    pub vargottama: bool,
}

/// Upstream dignity label carried on a placement. Advisory only: the engine
/// recomputes dignity from sign and degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DignityHint {
    #[serde(alias = "exalted")]
    Exaltation,
    #[serde(alias = "own_sign")]
    Own,
    #[serde(alias = "moolatrikona")]
    Mooltrikona,
    #[serde(alias = "debilitated")]
    Debilitation,
    Neutral,
    Vargottama,
}

// ===== CHART OPTIONS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    Waxing,
    Waning,
    #[default]
    Unknown,
}

/// How two house numbers are compared by the kendra/trikona relationship
/// helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseDistanceMode {
    /// `((to - from) mod 12) + 1`
    #[default]
    Directional,
    /// `|to - from|`, reproduces results stored before the directional fix.
    /// The same house gives 0, so it is never a kendra or trikona.
    LegacyAbsolute,
}

// ===== RESULT TAXONOMY =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YogaKind {
    Yoga,
    Dosha,
}

/// Reporting category. Declaration order is the report sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PanchaMahapurusha,
    Nabhasa,
    SunBased,
    MoonBased,
    RajYoga,
    Dhana,
    Dosha,
    Named,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::PanchaMahapurusha,
        Category::Nabhasa,
        Category::SunBased,
        Category::MoonBased,
        Category::RajYoga,
        Category::Dhana,
        Category::Dosha,
        Category::Named,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::PanchaMahapurusha => "Pancha Mahapurusha",
            Category::Nabhasa => "Nabhasa",
            Category::SunBased => "Sun-based",
            Category::MoonBased => "Moon-based",
            Category::RajYoga => "Raj Yoga",
            Category::Dhana => "Dhana",
            Category::Dosha => "Dosha",
            Category::Named => "Named",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BphsCategory {
    MajorPositive,
    Standard,
    MajorChallenge,
    MinorSubtle,
    NonBphsPractical,
}

/// Rule family. Families are the unit of enable/disable in `PipelineConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFamily {
    PanchaMahapurusha,
    NabhasaAshraya,
    NabhasaDala,
    NabhasaAkriti,
    NabhasaSankhya,
    SunBased,
    MoonBased,
    RajSystematic,
    RajYoga,
    Dhana,
    Dosha,
    Named,
}

impl RuleFamily {
    pub const ALL: [RuleFamily; 12] = [
        RuleFamily::PanchaMahapurusha,
        RuleFamily::NabhasaAshraya,
        RuleFamily::NabhasaDala,
        RuleFamily::NabhasaAkriti,
        RuleFamily::NabhasaSankhya,
        RuleFamily::SunBased,
        RuleFamily::MoonBased,
        RuleFamily::RajSystematic,
        RuleFamily::RajYoga,
        RuleFamily::Dhana,
        RuleFamily::Dosha,
        RuleFamily::Named,
    ];

    /// Config key, e.g. `nabhasa_akriti`
    pub fn key(self) -> &'static str {
        match self {
            RuleFamily::PanchaMahapurusha => "pancha_mahapurusha",
            RuleFamily::NabhasaAshraya => "nabhasa_ashraya",
            RuleFamily::NabhasaDala => "nabhasa_dala",
            RuleFamily::NabhasaAkriti => "nabhasa_akriti",
            RuleFamily::NabhasaSankhya => "nabhasa_sankhya",
            RuleFamily::SunBased => "sun_based",
            RuleFamily::MoonBased => "moon_based",
            RuleFamily::RajSystematic => "raj_systematic",
            RuleFamily::RajYoga => "raj_yoga",
            RuleFamily::Dhana => "dhana",
            RuleFamily::Dosha => "dosha",
            RuleFamily::Named => "named",
        }
    }

    pub fn default_category(self) -> Category {
        match self {
            RuleFamily::PanchaMahapurusha => Category::PanchaMahapurusha,
            RuleFamily::NabhasaAshraya
            | RuleFamily::NabhasaDala
            | RuleFamily::NabhasaAkriti
            | RuleFamily::NabhasaSankhya => Category::Nabhasa,
            RuleFamily::SunBased => Category::SunBased,
            RuleFamily::MoonBased => Category::MoonBased,
            RuleFamily::RajSystematic | RuleFamily::RajYoga => Category::RajYoga,
            RuleFamily::Dhana => Category::Dhana,
            RuleFamily::Dosha => Category::Dosha,
            RuleFamily::Named => Category::Named,
        }
    }
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ===== PIPELINE VALUES =====
// RawYoga -> ScoredYoga (evaluator) -> MergedYoga (normalize) -> YogaResult (categorize).
// Each stage builds new values; nothing is mutated after it leaves its stage.

/// One raw detection as emitted by a rule, tagged with the rule's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawYoga {
    pub rule_id: String,
    /// Name as the rule spelled it; may be a variant of the canonical name
    pub name: String,
    pub kind: YogaKind,
    pub family: RuleFamily,
    pub default_category: Category,
    pub description: String,
    pub contributing_planets: Vec<Planet>,
    /// Rule-local cancellation reason (dosha bhanga)
    pub bhanga: Option<String>,
}

/// Final, categorized detection handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YogaResult {
    pub name: String,
    pub canonical_name: String,
    pub description: String,
    pub strength: Strength,
    pub kind: YogaKind,
    pub category: Category,
    pub bphs_category: BphsCategory,
    pub bphs_section: String,
    pub bphs_ref: String,
    /// Stable planet-index order
    pub contributing_planets: Vec<Planet>,
    pub cancelled: bool,
    pub cancellation_reason: Option<String>,
    /// Rules whose detections were merged into this result
    pub rule_ids: Vec<String>,
}

impl YogaResult {
    pub fn is_active(&self) -> bool {
        !self.cancelled
    }
}
