use crate::config::{CHAT_BACKEND_URL, ORS_BASE_URL, OVERPASS_URL};
use crate::structs::*;
use crate::WidgetResult;

use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

//////////////////////////////////////////////////////////
// Service seams
//////////////////////////////////////////////////////////

/// Conversational backend: one message in, one reply out.
#[allow(async_fn_in_trait)]
pub trait ChatBackend {
    async fn send_message(&self, text: &str) -> WidgetResult<String>;
}

/// POI search around a point.
#[allow(async_fn_in_trait)]
pub trait StationFinder {
    async fn nearby_stations(
        &self,
        center: GeoPoint,
        radius: u32,
    ) -> WidgetResult<Vec<PoliceStation>>;
}

/// Driving-route computation between two points.
#[allow(async_fn_in_trait)]
pub trait RoutePlanner {
    async fn driving_route(&self, start: GeoPoint, end: GeoPoint) -> WidgetResult<Route>;
}

//////////////////////////////////////////////////////////
// Chat backend over HTTP
//////////////////////////////////////////////////////////

#[derive(Deserialize)]
struct ChatReply {
    reply: String,
}

#[derive(Deserialize)]
struct ChatErrorBody {
    error: Option<String>,
}

/// Error text of a failed chat response, falling back to the generic message
/// when the body is not JSON or carries no `error` field.
pub fn parse_chat_error(body: &str) -> String {
    serde_json::from_str::<ChatErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| "Erro ao conectar com o servidor.".to_string())
}

pub struct HttpChatBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpChatBackend {
    pub fn new() -> Self {
        Self::with_url(CHAT_BACKEND_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for HttpChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatBackend for HttpChatBackend {
    async fn send_message(&self, text: &str) -> WidgetResult<String> {
        let resp = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "message": text }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(parse_chat_error(&body))?;
        }

        let body: ChatReply = resp.json().await?;
        Ok(body.reply)
    }
}

//////////////////////////////////////////////////////////
// Overpass station search
//////////////////////////////////////////////////////////

#[derive(Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Deserialize)]
struct OverpassElement {
    #[serde(default)]
    tags: Option<OverpassTags>,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
}

#[derive(Deserialize)]
struct OverpassTags {
    name: Option<String>,
}

#[derive(Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    /// Direct coordinates when present, else the computed center. Relations
    /// without either are unplottable and get dropped by the caller.
    fn location(&self) -> Option<GeoPoint> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => self.center.as_ref().map(|c| GeoPoint::new(c.lat, c.lon)),
        }
    }

    fn name(&self) -> String {
        self.tags
            .as_ref()
            .and_then(|t| t.name.clone())
            .unwrap_or_else(|| "Delegacia de Polícia".to_string())
    }
}

pub fn overpass_query(center: GeoPoint, radius: u32) -> String {
    format!(
        "[out:json];\n(\n  \
         node[\"amenity\"=\"police\"](around:{r},{lat},{lon});\n  \
         way[\"amenity\"=\"police\"](around:{r},{lat},{lon});\n  \
         relation[\"amenity\"=\"police\"](around:{r},{lat},{lon});\n);\n\
         out center;",
        r = radius,
        lat = center.lat,
        lon = center.lon,
    )
}

pub fn parse_stations(body: &str) -> WidgetResult<Vec<PoliceStation>> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    let stations = response
        .elements
        .into_iter()
        .filter_map(|el| {
            el.location().map(|location| PoliceStation {
                name: el.name(),
                location,
            })
        })
        .collect();
    Ok(stations)
}

pub struct OverpassFinder {
    client: reqwest::Client,
    url: String,
}

impl OverpassFinder {
    pub fn new() -> Self {
        Self::with_url(OVERPASS_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for OverpassFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl StationFinder for OverpassFinder {
    async fn nearby_stations(
        &self,
        center: GeoPoint,
        radius: u32,
    ) -> WidgetResult<Vec<PoliceStation>> {
        let resp = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/plain")
            .body(overpass_query(center, radius))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err("Falha ao buscar delegacias (Overpass API).")?;
        }

        parse_stations(&resp.text().await?)
    }
}

//////////////////////////////////////////////////////////
// OpenRouteService routing
//////////////////////////////////////////////////////////

#[derive(Deserialize)]
struct OrsResponse {
    features: Vec<OrsFeature>,
}

#[derive(Deserialize)]
struct OrsFeature {
    geometry: OrsGeometry,
    properties: OrsProperties,
}

#[derive(Deserialize)]
struct OrsGeometry {
    /// [lon, lat] pairs, per the GeoJSON convention.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct OrsProperties {
    summary: RouteSummary,
}

pub fn parse_route(body: &str) -> WidgetResult<Route> {
    let response: OrsResponse = serde_json::from_str(body)?;
    let feature = response
        .features
        .into_iter()
        .next()
        .ok_or("Falha ao calcular a rota.")?;

    let path = feature
        .geometry
        .coordinates
        .iter()
        .map(|&[lon, lat]| GeoPoint::new(lat, lon))
        .collect();

    Ok(Route {
        path,
        summary: feature.properties.summary,
    })
}

pub struct OrsPlanner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OrsPlanner {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(ORS_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl RoutePlanner for OrsPlanner {
    async fn driving_route(&self, start: GeoPoint, end: GeoPoint) -> WidgetResult<Route> {
        // ORS wants lon,lat order.
        let url = format!(
            "{}/v2/directions/driving-car?api_key={}&start={},{}&end={},{}",
            self.base_url, self.api_key, start.lon, start.lat, end.lon, end.lat,
        );

        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err("Falha ao calcular a rota.")?;
        }

        parse_route(&resp.text().await?)
    }
}
