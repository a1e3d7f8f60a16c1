use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Which overlay is showing. Exactly one value is active at any time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherState {
    /// No overlay and no particle system.
    #[default]
    Clear,
    Rain,
    Snow,
}

/// The weather kinds that own a particle system.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precipitation {
    Rain,
    Snow,
}

impl Precipitation {
    pub const ALL: [Precipitation; 2] = [Precipitation::Rain, Precipitation::Snow];

    pub fn as_str(self) -> &'static str {
        match self {
            Precipitation::Rain => "rain",
            Precipitation::Snow => "snow",
        }
    }
}

impl std::fmt::Display for Precipitation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WeatherState {
    pub fn precipitation(self) -> Option<Precipitation> {
        match self {
            WeatherState::Clear => None,
            WeatherState::Rain => Some(Precipitation::Rain),
            WeatherState::Snow => Some(Precipitation::Snow),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeatherState::Clear => "clear",
            WeatherState::Rain => "rain",
            WeatherState::Snow => "snow",
        }
    }
}

impl From<Precipitation> for WeatherState {
    fn from(kind: Precipitation) -> Self {
        match kind {
            Precipitation::Rain => WeatherState::Rain,
            Precipitation::Snow => WeatherState::Snow,
        }
    }
}

impl std::fmt::Display for WeatherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the UI tags `"rain"`, `"snow"` and `"clear"` (case-insensitive).
impl FromStr for WeatherState {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Ok(WeatherState::Clear),
            "rain" => Ok(WeatherState::Rain),
            "snow" => Ok(WeatherState::Snow),
            _ => Err(WeatherError::UnknownWeather(s.to_string())),
        }
    }
}
