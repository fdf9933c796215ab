use crate::types::Planet;

/// Chart invariant violations, raised once when a `ChartInput` is validated.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MalformedChartError {
    #[error("ascendant sign must be in 1..=12, got {0}")]
    AscendantOutOfRange(u8),

    #[error("chart has no placement for {0}")]
    MissingPlanet(Planet),

    #[error("chart lists {0} more than once")]
    DuplicatePlanet(Planet),

    #[error("{planet}: sign must be in 1..=12, got {sign}")]
    SignOutOfRange { planet: Planet, sign: u8 },

    #[error("{planet}: house must be in 1..=12, got {house}")]
    HouseOutOfRange { planet: Planet, house: u8 },

    #[error("{planet}: degree must be in [0, 30), got {degree}")]
    DegreeOutOfRange { planet: Planet, degree: f64 },

    #[error("{planet}: navamsa sign must be in 1..=12, got {sign}")]
    NavamsaSignOutOfRange { planet: Planet, sign: u8 },

    #[error("{planet}: house {house} does not match sign {sign} for ascendant {ascendant} (expected house {expected})")]
    HouseSignMismatch {
        planet: Planet,
        sign: u8,
        house: u8,
        ascendant: u8,
        expected: u8,
    },

    #[error("Ketu must occupy the sign opposite Rahu (Rahu in {rahu}, Ketu in {ketu})")]
    NodesNotOpposed { rahu: u8, ketu: u8 },
}

/// Structural errors from the registry, catalog and fingerprint surfaces.
/// File loaders wrap these in `anyhow` with the offending path as context.
#[derive(thiserror::Error, Debug)]
pub enum YogaError {
    #[error(transparent)]
    MalformedChart(#[from] MalformedChartError),

    #[error("failed to serialize for fingerprinting: {0}")]
    Fingerprint(#[from] serde_json::Error),

    #[error("duplicate rule id '{0}' in registry")]
    DuplicateRuleId(String),

    #[error("catalog '{version}' lists '{name}' more than once")]
    DuplicateCatalogEntry { version: String, name: String },
}
