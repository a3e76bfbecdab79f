use crate::structs::GeoPoint;
use std::time::Duration;

//////////////////////////////////////////////////////////
// Application configuration
//////////////////////////////////////////////////////////

/// Fallback position when no geolocation fix is available (São Paulo).
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint {
    lat: -23.55052,
    lon: -46.633308,
};

/// POI search radius around the user, in meters.
pub const SEARCH_RADIUS: u32 = 4000;

/// 5 minutes. Defined by the original configuration but not consulted anywhere.
pub const CACHE_DURATION: Duration = Duration::from_secs(5 * 60);

/// Route line color when the frontend exposes no primary theme color.
pub const ROUTE_COLOR_FALLBACK: &str = "#7E2A53";

pub const CHAT_BACKEND_URL: &str = "http://localhost:3000/chatAmina";
pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const ORS_BASE_URL: &str = "https://api.openrouteservice.org";

/// Routing credential, injected at startup instead of shipped in source.
pub fn ors_api_key() -> crate::WidgetResult<String> {
    require_key(std::env::var("ORS_API_KEY").ok())
}

fn require_key(value: Option<String>) -> crate::WidgetResult<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err("ORS_API_KEY must be set.")?,
    }
}
