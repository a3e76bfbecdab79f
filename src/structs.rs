use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Styling class of a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
    Error,
}

/// One rendered line of conversation. Never mutated after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub role: MessageRole,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, role: MessageRole) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }
}

/// One POI search result. Replaced wholesale on the next search.
#[derive(Clone, Debug, PartialEq)]
pub struct PoliceStation {
    pub name: String,
    pub location: GeoPoint,
}

/// Aggregate distance/duration of a computed path, independent of geometry.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Default)]
pub struct RouteSummary {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
}

impl RouteSummary {
    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    pub fn duration_min(&self) -> i64 {
        (self.duration / 60.0).round() as i64
    }
}

/// A computed driving path between two points.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub path: Vec<GeoPoint>,
    pub summary: RouteSummary,
}
