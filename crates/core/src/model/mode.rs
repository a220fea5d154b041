use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown travel mode: {0}")]
pub struct ModeParseError(pub String);

/// How the train runs along the route.
///
/// - `Normal`: stops at every station, short legs.
/// - `Express`: stops only at express stations, long legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Normal,
    #[serde(alias = "nozomi")]
    Express,
}

impl TravelMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Normal => "normal",
            TravelMode::Express => "express",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            // service name used by web front-ends
            "express" | "nozomi" => Ok(Self::Express),
            _ => Err(ModeParseError(s.to_owned())),
        }
    }
}
