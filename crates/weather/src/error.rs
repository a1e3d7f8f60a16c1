use crate::state::Precipitation;

/// Errors returned by the overlay controller.
///
/// All of them are recoverable: the controller keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// The texture for this kind has not finished decoding.
    AssetNotReady(Precipitation),
    /// Intensity must be a finite, non-negative number.
    InvalidIntensity(String),
    UnknownWeather(String),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::AssetNotReady(kind) => write!(f, "{kind} texture is not loaded yet"),
            WeatherError::InvalidIntensity(value) => {
                write!(f, "invalid intensity {value:?}: expected a non-negative number")
            }
            WeatherError::UnknownWeather(tag) => {
                write!(f, "unknown weather {tag:?}: expected rain, snow or clear")
            }
        }
    }
}

impl std::error::Error for WeatherError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    Encode(String),
    Decode(String),
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::Encode(msg) => write!(f, "texture encode failed: {msg}"),
            TextureError::Decode(msg) => write!(f, "texture decode failed: {msg}"),
        }
    }
}

impl std::error::Error for TextureError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "overlay config unreadable: {msg}"),
            ConfigError::Parse(msg) => write!(f, "overlay config malformed: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "overlay config invalid: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
