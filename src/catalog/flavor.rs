use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Game version track an addon release targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameVersion {
    /// Current retail expansion
    Retail,
    /// The "stay forever" classic realms
    ClassicEra,
    /// Burning Crusade classic
    ClassicTbc,
}

/// Upstream version-type code that did not map to a known flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown game version type id: {0}")]
pub struct ClassificationMiss(pub i64);

const RETAIL_TYPE_ID: i64 = 517;
const CLASSIC_ERA_TYPE_ID: i64 = 67408;
const CLASSIC_TBC_TYPE_ID: i64 = 73246;

impl GameVersion {
    /// All flavors in canonical order
    pub const ALL: [Self; 3] = [Self::Retail, Self::ClassicEra, Self::ClassicTbc];

    /// Upstream numeric version-type code for this flavor
    pub const fn version_type_id(self) -> i64 {
        match self {
            Self::Retail => RETAIL_TYPE_ID,
            Self::ClassicEra => CLASSIC_ERA_TYPE_ID,
            Self::ClassicTbc => CLASSIC_TBC_TYPE_ID,
        }
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Retail => "Retail",
            Self::ClassicEra => "ClassicEra",
            Self::ClassicTbc => "ClassicTbc",
        };
        f.write_str(name)
    }
}

/// Map an upstream version-type code to a flavor.
///
/// This is the only place the numeric codes are interpreted; every provider
/// goes through it. A miss is not fatal: callers skip the record and log it.
pub const fn classify_flavor(version_type_id: i64) -> Result<GameVersion, ClassificationMiss> {
    match version_type_id {
        RETAIL_TYPE_ID => Ok(GameVersion::Retail),
        CLASSIC_ERA_TYPE_ID => Ok(GameVersion::ClassicEra),
        CLASSIC_TBC_TYPE_ID => Ok(GameVersion::ClassicTbc),
        other => Err(ClassificationMiss(other)),
    }
}
