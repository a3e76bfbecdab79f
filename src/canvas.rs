use crate::structs::GeoPoint;

//////////////////////////////////////////////////////////
// Map rendering surface
//////////////////////////////////////////////////////////

pub type LayerId = u64;

/// What the map widget needs from a rendering surface: markers, one-off
/// polylines and view control. A single `remove_layer` covers both layer kinds.
pub trait MapCanvas {
    fn add_marker(&mut self, at: GeoPoint, popup: &str) -> LayerId;
    fn draw_polyline(&mut self, path: &[GeoPoint], color: &str) -> LayerId;
    fn remove_layer(&mut self, id: LayerId);
    fn set_view(&mut self, center: GeoPoint, zoom: u8);
    fn fit_bounds(&mut self, path: &[GeoPoint], padding: u32);
    /// Primary theme color of the page, if the frontend has one.
    fn primary_color(&self) -> Option<String>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub id: LayerId,
    pub at: GeoPoint,
    pub popup: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub id: LayerId,
    pub path: Vec<GeoPoint>,
    pub color: String,
}

/// In-memory canvas. Backs the terminal frontend and the widget tests.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    next_id: LayerId,
    markers: Vec<Marker>,
    polylines: Vec<Polyline>,
    view: Option<(GeoPoint, u8)>,
    theme_color: Option<String>,
}

impl MemoryCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme_color(color: impl Into<String>) -> Self {
        Self {
            theme_color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn polylines(&self) -> &[Polyline] {
        &self.polylines
    }

    pub fn view(&self) -> Option<(GeoPoint, u8)> {
        self.view
    }
}

impl MapCanvas for MemoryCanvas {
    fn add_marker(&mut self, at: GeoPoint, popup: &str) -> LayerId {
        self.next_id += 1;
        self.markers.push(Marker {
            id: self.next_id,
            at,
            popup: popup.to_string(),
        });
        self.next_id
    }

    fn draw_polyline(&mut self, path: &[GeoPoint], color: &str) -> LayerId {
        self.next_id += 1;
        self.polylines.push(Polyline {
            id: self.next_id,
            path: path.to_vec(),
            color: color.to_string(),
        });
        self.next_id
    }

    fn remove_layer(&mut self, id: LayerId) {
        self.markers.retain(|m| m.id != id);
        self.polylines.retain(|p| p.id != id);
    }

    fn set_view(&mut self, center: GeoPoint, zoom: u8) {
        self.view = Some((center, zoom));
    }

    fn fit_bounds(&mut self, path: &[GeoPoint], _padding: u32) {
        // Center on the path's bounding box; zoom is up to the real frontend.
        if path.is_empty() {
            return;
        }
        let (mut min_lat, mut max_lat) = (f64::MAX, f64::MIN);
        let (mut min_lon, mut max_lon) = (f64::MAX, f64::MIN);
        for p in path {
            min_lat = min_lat.min(p.lat);
            max_lat = max_lat.max(p.lat);
            min_lon = min_lon.min(p.lon);
            max_lon = max_lon.max(p.lon);
        }
        let center = GeoPoint::new((min_lat + max_lat) / 2.0, (min_lon + max_lon) / 2.0);
        let zoom = self.view.map(|(_, z)| z).unwrap_or(13);
        self.view = Some((center, zoom));
    }

    fn primary_color(&self) -> Option<String> {
        self.theme_color.clone()
    }
}
