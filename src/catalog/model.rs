use super::GameVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream catalog an addon record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// CurseForge, the largest addon site
    Curse,
    /// Tukui.org, home of ElvUI and Tukui
    Tukui,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curse => f.write_str("Curse"),
            Self::Tukui => f.write_str("Tukui"),
        }
    }
}

/// One flavor-specific release of an addon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    /// Game version track
    pub flavor: GameVersion,
    /// Target game version as published upstream
    pub game_version: String,
    /// ISO-8601 release timestamp, empty when upstream had none
    pub date: String,
}

/// One addon as listed by a single source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    /// Identifier, unique within its source only
    pub id: i64,
    /// Display name
    pub name: String,
    /// Project page
    pub url: String,
    /// Download counter
    pub number_of_downloads: u64,
    /// Short description
    pub summary: String,
    /// Latest release per flavor, at most one entry per flavor
    pub versions: Vec<Version>,
    /// Category names in source order
    pub categories: Vec<String>,
    source: Source,
}

impl Addon {
    /// Create an addon with no versions or categories for the given source
    pub fn new(source: Source, id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            url: String::new(),
            number_of_downloads: 0,
            summary: String::new(),
            versions: Vec::new(),
            categories: Vec::new(),
            source,
        }
    }

    /// Provider that produced this record
    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Release for a given flavor, if any
    pub fn version_for(&self, flavor: GameVersion) -> Option<&Version> {
        self.versions.iter().find(|v| v.flavor == flavor)
    }
}
