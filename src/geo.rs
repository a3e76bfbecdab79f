use crate::structs::GeoPoint;

use std::error::Error;
use std::fmt;
use std::time::Duration;

//////////////////////////////////////////////////////////
// Geolocation
//////////////////////////////////////////////////////////

/// Options passed to a position request, mirroring the browser geolocation knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocateOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Maximum age of a cached fix the provider may return.
    pub maximum_age: Duration,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Why a position request failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeoError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unsupported,
    Unknown,
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GeoError::PermissionDenied => "Permissão de localização negada.",
            GeoError::PositionUnavailable => "Informação de localização indisponível.",
            GeoError::Timeout => "Tempo limite ao obter localização.",
            GeoError::Unsupported => "Geolocalização não é suportada pelo seu navegador.",
            GeoError::Unknown => "Ocorreu um erro desconhecido.",
        };
        write!(f, "{}", text)
    }
}

impl Error for GeoError {}

/// Source of the user's current position.
#[allow(async_fn_in_trait)]
pub trait Locator {
    async fn current_position(&self, options: LocateOptions) -> Result<GeoPoint, GeoError>;
}

/// Locator for frontends without a positioning facility. Always fails, which
/// sends the map widget down its default-location path.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLocator;

impl Locator for NoLocator {
    async fn current_position(&self, _options: LocateOptions) -> Result<GeoPoint, GeoError> {
        Err(GeoError::Unsupported)
    }
}
